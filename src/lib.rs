//! # grammar-tutor
//!
//! A terminal English-grammar trainer. Questions are written on demand by a
//! hosted language model, five at a time; wrong answers get a short
//! explanation from the same model.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use grammar_tutor::{GeminiClient, QuizFilter, Tutor, TutorError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TutorError> {
//!     let model = Arc::new(GeminiClient::new(
//!         std::env::var("GEMINI_API_KEY").ok(),
//!         "gemini-3-flash-preview",
//!         "https://generativelanguage.googleapis.com",
//!     ));
//!
//!     Tutor::new(model, QuizFilter::default(), "Chinese").run().await
//! }
//! ```

mod app;
pub mod config;
pub mod gemini;
pub mod locale;
pub mod logging;
pub mod models;
pub mod session;
pub mod terminal;
pub mod tutor;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

pub use app::{App, Control, Outcome};
pub use gemini::{GeminiClient, LanguageModel};
pub use models::{Answer, Difficulty, GrammarPoint, Question, QuizFilter, Scope};
pub use session::{ExplainRequest, FetchRequest, Phase, Session};
pub use tutor::{Explainer, GenerationError, QuestionGenerator};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for running the tutor.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// A tutor session that can be run in the terminal.
pub struct Tutor {
    app: App,
    first_batch: FetchRequest,
    generator: QuestionGenerator,
    explainer: Explainer,
}

impl Tutor {
    /// `learner_language` is the language explanations are written in.
    pub fn new(
        model: Arc<dyn LanguageModel>,
        filter: QuizFilter,
        learner_language: impl Into<String>,
    ) -> Self {
        let learner_language = learner_language.into();
        let (app, first_batch) = App::new(filter);
        Self {
            app,
            first_batch,
            generator: QuestionGenerator::new(Arc::clone(&model), learner_language.clone()),
            explainer: Explainer::new(model, learner_language),
        }
    }

    /// Takes over the terminal until the learner quits.
    ///
    /// Must be called inside a tokio runtime; model requests run as spawned
    /// tasks and report back over a channel drained between frames.
    pub async fn run(self) -> Result<(), TutorError> {
        let Tutor {
            mut app,
            first_batch,
            generator,
            explainer,
        } = self;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let workers = Workers {
            generator,
            explainer,
            outcomes: tx,
        };
        workers.spawn_fetch(first_batch);

        let mut screen = terminal::Screen::enter()?;
        let result = run_event_loop(screen.terminal(), &mut app, &workers, &mut rx);
        screen.leave()?;
        info!("tutor closed");
        result
    }
}

/// Performs a batch fetch and packages the result for [`App::apply`].
pub async fn fetch_batch(generator: &QuestionGenerator, request: FetchRequest) -> Outcome {
    let result = generator.generate(request.filter, request.count).await;
    Outcome::Batch {
        ticket: request.ticket,
        result,
    }
}

/// Performs an explanation request and packages the text for [`App::apply`].
pub async fn fetch_explanation(explainer: &Explainer, request: ExplainRequest) -> Outcome {
    let text = explainer
        .explain(&request.sentence, &request.selected, &request.correct)
        .await;
    Outcome::Explanation {
        ticket: request.ticket,
        text,
    }
}

struct Workers {
    generator: QuestionGenerator,
    explainer: Explainer,
    outcomes: UnboundedSender<Outcome>,
}

impl Workers {
    fn spawn_fetch(&self, request: FetchRequest) {
        let generator = self.generator.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = fetch_batch(&generator, request).await;
            // The receiver is gone once the UI has exited.
            let _ = outcomes.send(outcome);
        });
    }

    fn spawn_explain(&self, request: ExplainRequest) {
        let explainer = self.explainer.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = fetch_explanation(&explainer, request).await;
            let _ = outcomes.send(outcome);
        });
    }
}

fn run_event_loop(
    terminal: &mut terminal::TutorTerminal,
    app: &mut App,
    workers: &Workers,
    outcomes: &mut UnboundedReceiver<Outcome>,
) -> Result<(), TutorError> {
    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            app.tick();
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match app.handle_key(key.code) {
                Control::Continue => {}
                Control::Quit => break,
                Control::Fetch(request) => workers.spawn_fetch(request),
                Control::Explain(request) => workers.spawn_explain(request),
            }
        }
    }

    Ok(())
}
