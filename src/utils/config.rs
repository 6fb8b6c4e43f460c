use crate::types::{AppError, Result};
use std::env;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_MAX_ITERATIONS: usize = 3;
pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_WORD_LIMIT: usize = 250;

/// Immutable per-invocation configuration.
///
/// Constructed once from the environment, optionally overridden by CLI
/// flags, then threaded explicitly into the orchestrator and clients.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub tavily_api_key: String,
    /// Model identifier for the completion service.
    pub model: String,
    /// Tool-visit threshold for the termination rule.
    pub max_iterations: usize,
    /// Result-count cap per search query.
    pub max_results: usize,
    /// Target answer length in words.
    pub word_limit: usize,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// Both API keys are required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            tavily_api_key: require_env("TAVILY_API_KEY")?,
            model: env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_iterations: parse_env("MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?,
            max_results: parse_env("MAX_RESULTS", DEFAULT_MAX_RESULTS)?,
            word_limit: parse_env("WORD_LIMIT", DEFAULT_WORD_LIMIT)?,
        })
    }

    /// Apply per-invocation overrides, returning the updated configuration.
    pub fn with_overrides(
        mut self,
        max_iterations: Option<usize>,
        model: Option<String>,
        max_results: Option<usize>,
        word_limit: Option<usize>,
    ) -> Self {
        if let Some(value) = max_iterations {
            self.max_iterations = value;
        }
        if let Some(value) = model {
            self.model = value;
        }
        if let Some(value) = max_results {
            self.max_results = value;
        }
        if let Some(value) = word_limit {
            self.word_limit = value;
        }
        self
    }
}

fn require_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Configuration(format!(
            "{} not found in environment variables",
            key
        ))),
    }
}

fn parse_env(key: &str, default: usize) -> Result<usize> {
    match env::var(key) {
        Ok(value) => value.parse().map_err(|_| {
            AppError::Configuration(format!("{} must be a non-negative integer, got '{}'", key, value))
        }),
        Err(_) => Ok(default),
    }
}
