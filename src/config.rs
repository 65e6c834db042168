use std::env;
use std::path::PathBuf;

use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_LANGUAGE: &str = "Chinese";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent keys are not rejected up front; requests fail at the service.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    /// Native language of the learner, used for explanations.
    pub learner_language: String,
    pub log_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        Self {
            api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            model: or_default("GEMINI_MODEL", DEFAULT_MODEL),
            api_base: or_default("GEMINI_API_BASE", DEFAULT_API_BASE),
            learner_language: or_default("TUTOR_LANGUAGE", DEFAULT_LANGUAGE),
            log_dir: PathBuf::from(or_default("TUTOR_LOG_DIR", DEFAULT_LOG_DIR)),
            rust_log: or_default("RUST_LOG", DEFAULT_LOG_FILTER),
        }
    }
}
