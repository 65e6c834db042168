//! The two remote operations the quiz depends on: generating a batch of
//! questions and explaining a wrong answer.

mod explanation;
mod questions;

pub use explanation::{ExplanationError, Explainer};
pub use questions::{GenerationError, QuestionGenerator, ValidationIssue, parse_batch};
