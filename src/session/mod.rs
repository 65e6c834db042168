//! The quiz lifecycle.
//!
//! [`Session`] is a synchronous state machine. Transitions that need the
//! language model hand back a [`FetchRequest`] or [`ExplainRequest`]; the
//! caller performs it and feeds the result in through
//! [`Session::batch_loaded`] or [`Session::explanation_ready`]. Every request
//! carries a ticket so results that arrive after a newer request was issued
//! are dropped instead of overwriting fresher state.

mod score;

use tracing::{debug, error, info, warn};

use crate::locale::GENERATION_FAILED;
use crate::models::{Answer, Question, QuizFilter};
use crate::tutor::GenerationError;

pub use score::{Score, accuracy, encouragement};

/// Questions per batch; reaching a multiple of this ends the batch.
pub const BATCH_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error { message: String, detail: String },
    AwaitingSelection,
    Submitted,
    Result,
}

/// Identifies one batch fetch. Later fetches get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchTicket(u64);

/// Identifies the explanation for one question of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExplainTicket {
    batch: BatchTicket,
    question: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: BatchTicket,
    pub filter: QuizFilter,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub ticket: ExplainTicket,
    /// Sentence with the blank written out as a marker.
    pub sentence: String,
    pub selected: String,
    pub correct: String,
}

/// The model's feedback on a wrong answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Insight {
    #[default]
    None,
    Pending,
    Ready(String),
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    filter: QuizFilter,
    questions: Vec<Question>,
    index: usize,
    answers: Vec<Answer>,
    selection: Option<String>,
    insight: Insight,
    ticket: BatchTicket,
}

impl Session {
    /// Starts in `Loading` along with the fetch for the first batch.
    pub fn new(filter: QuizFilter) -> (Self, FetchRequest) {
        let mut session = Self {
            phase: Phase::Loading,
            filter,
            questions: Vec::new(),
            index: 0,
            answers: Vec::new(),
            selection: None,
            insight: Insight::None,
            ticket: BatchTicket(0),
        };
        let request = session.begin_fetch();
        (session, request)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn filter(&self) -> QuizFilter {
        self.filter
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::AwaitingSelection | Phase::Submitted => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer_for(&self, question: &Question) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question.id)
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn insight(&self) -> &Insight {
        &self.insight
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn score(&self) -> Score {
        Score::from_answers(&self.answers)
    }

    /// Switches the filter. An unchanged filter does nothing; otherwise the
    /// current batch is discarded and a new one requested.
    pub fn set_filter(&mut self, filter: QuizFilter) -> Option<FetchRequest> {
        if filter == self.filter {
            return None;
        }
        info!(%filter, "filter changed");
        self.filter = filter;
        Some(self.begin_fetch())
    }

    /// Re-requests the same filter after a failed fetch.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        match self.phase {
            Phase::Error { .. } => Some(self.begin_fetch()),
            _ => None,
        }
    }

    pub fn start_new_batch(&mut self) -> Option<FetchRequest> {
        match self.phase {
            Phase::Result => Some(self.begin_fetch()),
            _ => None,
        }
    }

    /// Applies a finished fetch. Returns false when the result was stale and
    /// ignored.
    pub fn batch_loaded(
        &mut self,
        ticket: BatchTicket,
        result: Result<Vec<Question>, GenerationError>,
    ) -> bool {
        if ticket != self.ticket || self.phase != Phase::Loading {
            debug!(?ticket, current = ?self.ticket, "discarding stale batch");
            return false;
        }

        match result {
            Ok(questions) if !questions.is_empty() => {
                self.questions = questions;
                self.index = 0;
                self.answers.clear();
                self.clear_question_state();
                self.phase = Phase::AwaitingSelection;
            }
            Ok(_) => self.fail(GenerationError::NoQuestions),
            Err(err) => self.fail(err),
        }
        true
    }

    /// Picks an option of the current question. Ignored once submitted or
    /// when the text is not one of the options.
    pub fn select_option(&mut self, option: &str) {
        if self.phase != Phase::AwaitingSelection {
            return;
        }
        let Some(question) = self.questions.get(self.index) else {
            return;
        };
        if question.options.iter().any(|o| o == option) {
            self.selection = Some(option.to_string());
        }
    }

    pub fn select_option_at(&mut self, index: usize) {
        let option = self
            .current_question()
            .and_then(|q| q.options.get(index))
            .cloned();
        if let Some(option) = option {
            self.select_option(&option);
        }
    }

    /// Records the pending selection. A wrong answer also yields the request
    /// for its explanation.
    pub fn submit(&mut self) -> Option<ExplainRequest> {
        if self.phase != Phase::AwaitingSelection {
            return None;
        }
        let selected = self.selection.clone()?;
        let question = self.questions.get(self.index)?;

        let answer = Answer::record(question, selected);
        debug!(id = %answer.question_id, correct = answer.is_correct, "answer recorded");

        let request = (!answer.is_correct).then(|| ExplainRequest {
            ticket: ExplainTicket {
                batch: self.ticket,
                question: self.index,
            },
            sentence: question.rendered_sentence(),
            selected: answer.selected_option.clone(),
            correct: question.correct_answer.clone(),
        });

        self.answers.push(answer);
        self.phase = Phase::Submitted;
        if request.is_some() {
            self.insight = Insight::Pending;
        }
        request
    }

    /// Applies explanation text if it still belongs to the question on screen.
    pub fn explanation_ready(&mut self, ticket: ExplainTicket, text: String) -> bool {
        let current = ExplainTicket {
            batch: self.ticket,
            question: self.index,
        };
        if ticket != current || self.phase != Phase::Submitted {
            debug!(?ticket, "discarding stale explanation");
            return false;
        }
        self.insight = Insight::Ready(text);
        true
    }

    /// Moves past a submitted question, ending the batch on a multiple of
    /// [`BATCH_SIZE`] or at the last question.
    pub fn next(&mut self) {
        if self.phase != Phase::Submitted {
            return;
        }
        let next = self.index + 1;
        if next % BATCH_SIZE == 0 || next >= self.questions.len() {
            let score = self.score();
            info!(correct = score.correct, total = score.total, accuracy = score.accuracy, "batch finished");
            self.phase = Phase::Result;
        } else {
            self.index = next;
            self.clear_question_state();
            self.phase = Phase::AwaitingSelection;
        }
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        self.ticket = BatchTicket(self.ticket.0 + 1);
        self.phase = Phase::Loading;
        self.questions.clear();
        self.answers.clear();
        self.index = 0;
        self.clear_question_state();

        FetchRequest {
            ticket: self.ticket,
            filter: self.filter,
            count: BATCH_SIZE,
        }
    }

    fn fail(&mut self, err: GenerationError) {
        match &err {
            GenerationError::NoQuestions => warn!("batch came back empty"),
            other => error!("failed to generate questions: {}", other),
        }
        self.phase = Phase::Error {
            message: GENERATION_FAILED.to_string(),
            detail: err.to_string(),
        };
    }

    fn clear_question_state(&mut self) {
        self.selection = None;
        self.insight = Insight::None;
    }
}
