use crate::locale::ENCOURAGEMENT_PHRASES;
use crate::models::Answer;

/// Summary shown when a batch is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// Percentage in `0..=100`.
    pub accuracy: u32,
    pub encouragement: &'static str,
}

impl Score {
    pub fn from_answers(answers: &[Answer]) -> Self {
        let correct = answers.iter().filter(|a| a.is_correct).count();
        let total = answers.len();
        let accuracy = accuracy(correct, total);
        Self {
            correct,
            total,
            accuracy,
            encouragement: encouragement(accuracy),
        }
    }
}

/// `round(100 * correct / total)` with halves rounded up; zero answers count
/// as a denominator of one.
pub fn accuracy(correct: usize, total: usize) -> u32 {
    let total = total.max(1);
    ((200 * correct + total) / (2 * total)) as u32
}

/// Maps 0..=100 linearly onto the phrase list.
pub fn encouragement(accuracy: u32) -> &'static str {
    let last = ENCOURAGEMENT_PHRASES.len() - 1;
    let index = (accuracy as usize * last / 100).min(last);
    ENCOURAGEMENT_PHRASES[index]
}
