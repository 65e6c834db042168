use chrono::{DateTime, Utc};

use super::Question;

/// A learner's submitted choice for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Refers to [`Question::id`] within the current batch.
    pub question_id: String,
    pub selected_option: String,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl Answer {
    pub fn record(question: &Question, selected_option: String) -> Self {
        Self {
            question_id: question.id.clone(),
            is_correct: question.is_correct(&selected_option),
            selected_option,
            answered_at: Utc::now(),
        }
    }
}
