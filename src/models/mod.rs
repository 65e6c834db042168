mod answer;
mod filter;
mod question;

pub use answer::Answer;
pub use filter::{QuizFilter, Scope};
pub use question::{Difficulty, Explanation, GrammarPoint, Question, UnknownLabel, BLANK_MARKER};
