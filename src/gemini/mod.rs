//! Access to the hosted generative language model.
//!
//! Everything above this module talks to a [`LanguageModel`]; [`GeminiClient`]
//! is the implementation used at runtime.

mod client;
mod wire;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use client::{DEFAULT_API_BASE, DEFAULT_MODEL, GeminiClient};

/// A single-turn prompt plus the output constraints for it.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// When set, the model is asked to answer with JSON matching this schema.
    pub response_schema: Option<Value>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
            temperature: None,
            top_p: None,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            response_schema: Some(schema),
            ..Self::text(prompt)
        }
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = Some(temperature);
        self.top_p = Some(top_p);
        self
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("language model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("language model returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("language model returned no text")]
    EmptyResponse,
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ModelError>;
}
