use crossterm::event::KeyCode;

use crate::models::{Question, QuizFilter};
use crate::session::{BatchTicket, ExplainRequest, ExplainTicket, FetchRequest, Phase, Session};
use crate::tutor::GenerationError;

const NUM_OPTIONS: usize = 4;
const OPTION_KEYS: [[char; 2]; NUM_OPTIONS] = [['1', 'a'], ['2', 'b'], ['3', 'c'], ['4', 'd']];

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    Fetch(FetchRequest),
    Explain(ExplainRequest),
}

impl From<Option<FetchRequest>> for Control {
    fn from(request: Option<FetchRequest>) -> Self {
        request.map_or(Control::Continue, Control::Fetch)
    }
}

impl From<Option<ExplainRequest>> for Control {
    fn from(request: Option<ExplainRequest>) -> Self {
        request.map_or(Control::Continue, Control::Explain)
    }
}

/// A finished remote call on its way back to the UI loop.
#[derive(Debug)]
pub enum Outcome {
    Batch {
        ticket: BatchTicket,
        result: Result<Vec<Question>, GenerationError>,
    },
    Explanation {
        ticket: ExplainTicket,
        text: String,
    },
}

/// The session plus the state that only matters for drawing it.
pub struct App {
    session: Session,
    cursor: usize,
    spinner: usize,
    result_scroll: usize,
}

impl App {
    pub fn new(filter: QuizFilter) -> (Self, FetchRequest) {
        let (session, request) = Session::new(filter);
        let app = Self {
            session,
            cursor: 0,
            spinner: 0,
            result_scroll: 0,
        };
        (app, request)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Highlighted option of the current question.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// Advances animations; called when no input arrived within a poll.
    pub fn tick(&mut self) {
        self.spinner = self.spinner.wrapping_add(1);
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Batch { ticket, result } => {
                if self.session.batch_loaded(ticket, result) {
                    self.cursor = 0;
                    self.result_scroll = 0;
                }
            }
            Outcome::Explanation { ticket, text } => {
                self.session.explanation_ready(ticket, text);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Control {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('f') | KeyCode::Char('F') => {
                let filter = self.session.filter().with_next_difficulty();
                return self.session.set_filter(filter).into();
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                let filter = self.session.filter().with_next_category();
                return self.session.set_filter(filter).into();
            }
            _ => {}
        }

        match self.session.phase().clone() {
            Phase::Loading => Control::Continue,
            Phase::Error { .. } => self.handle_error_input(key),
            Phase::AwaitingSelection => self.handle_question_input(key),
            Phase::Submitted => self.handle_submitted_input(key),
            Phase::Result => self.handle_result_input(key),
        }
    }

    fn handle_error_input(&mut self, key: KeyCode) -> Control {
        match key {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => self.session.retry().into(),
            _ => Control::Continue,
        }
    }

    fn handle_question_input(&mut self, key: KeyCode) -> Control {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = (self.cursor + NUM_OPTIONS - 1) % NUM_OPTIONS;
                Control::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1) % NUM_OPTIONS;
                Control::Continue
            }
            KeyCode::Char(' ') => {
                self.session.select_option_at(self.cursor);
                Control::Continue
            }
            KeyCode::Char(c) => {
                let lower = c.to_ascii_lowercase();
                if let Some(index) = OPTION_KEYS.iter().position(|keys| keys.contains(&lower)) {
                    self.cursor = index;
                    self.session.select_option_at(index);
                }
                Control::Continue
            }
            KeyCode::Enter => self.session.submit().into(),
            _ => Control::Continue,
        }
    }

    fn handle_submitted_input(&mut self, key: KeyCode) -> Control {
        if matches!(key, KeyCode::Enter | KeyCode::Char('n') | KeyCode::Right) {
            self.session.next();
            self.cursor = 0;
            self.result_scroll = 0;
        }
        Control::Continue
    }

    fn handle_result_input(&mut self, key: KeyCode) -> Control {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let max_scroll = self.session.answers().len().saturating_sub(1);
                self.result_scroll = (self.result_scroll + 1).min(max_scroll);
                Control::Continue
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.result_scroll = self.result_scroll.saturating_sub(1);
                Control::Continue
            }
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.session.start_new_batch().into()
            }
            _ => Control::Continue,
        }
    }
}
