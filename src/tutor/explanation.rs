use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::gemini::{GenerateRequest, LanguageModel, ModelError};
use crate::locale::{EXPLANATION_EMPTY, EXPLANATION_UNAVAILABLE};

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;

#[derive(Debug, Error)]
pub enum ExplanationError {
    #[error(transparent)]
    Model(ModelError),

    #[error("explanation came back empty")]
    Empty,
}

impl From<ModelError> for ExplanationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::EmptyResponse => ExplanationError::Empty,
            other => ExplanationError::Model(other),
        }
    }
}

impl ExplanationError {
    /// Text shown to the learner in place of an explanation.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            ExplanationError::Empty => EXPLANATION_EMPTY,
            ExplanationError::Model(_) => EXPLANATION_UNAVAILABLE,
        }
    }
}

/// Asks the language model why a wrong answer is wrong.
#[derive(Clone)]
pub struct Explainer {
    model: Arc<dyn LanguageModel>,
    learner_language: String,
}

impl Explainer {
    pub fn new(model: Arc<dyn LanguageModel>, learner_language: impl Into<String>) -> Self {
        Self {
            model,
            learner_language: learner_language.into(),
        }
    }

    /// Always yields text; failures become a fixed fallback so the learner
    /// is never stuck waiting on this call.
    pub async fn explain(&self, sentence: &str, selected: &str, correct: &str) -> String {
        match self.try_explain(sentence, selected, correct).await {
            Ok(text) => text,
            Err(err) => {
                warn!("explanation unavailable, using fallback: {}", err);
                err.fallback_text().to_string()
            }
        }
    }

    pub async fn try_explain(
        &self,
        sentence: &str,
        selected: &str,
        correct: &str,
    ) -> Result<String, ExplanationError> {
        info!(selected, correct, "requesting explanation");
        let prompt = build_prompt(sentence, selected, correct, &self.learner_language);
        let request = GenerateRequest::text(prompt).with_sampling(TEMPERATURE, TOP_P);

        let text = self.model.generate(request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ExplanationError::Empty);
        }
        Ok(text.to_string())
    }
}

fn build_prompt(sentence: &str, selected: &str, correct: &str, learner_language: &str) -> String {
    format!(
        "Context: for the sentence \"{sentence}\" a student chose \"{selected}\", \
         but the correct answer is \"{correct}\".\n\
         Task: explain in {learner_language} why \"{correct}\" is right and \"{selected}\" is wrong.\n\
         Audience: {learner_language}-speaking middle school students.\n\
         Tone: professional and encouraging.\n\
         State the grammar rule and give one short example."
    )
}
