//! Type definitions for the llm module.

use std::time::Duration;
use thiserror::Error;

/// Prompts are capped at this many characters before submission.
pub const MAX_PROMPT_CHARS: usize = 15_000;

/// Text form of [`ModelOutput::Exhausted`].
pub const GENERATION_FAILED: &str = "Content generation failed after multiple attempts";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// One request sent to a [`GenerativeModel`](super::GenerativeModel).
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRequest {
    pub prompt: String,
    pub format: ResponseFormat,
    pub temperature: f32,
}

#[derive(Clone, Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model request timed out after {0:?}")]
    Timeout(Duration),
    #[error("model returned an empty response")]
    EmptyResponse,
}

/// Result of a retried generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelOutput {
    Text(String),
    /// Every attempt failed or came back empty.
    Exhausted,
}

impl ModelOutput {
    pub fn text(&self) -> Option<&str> {
        match self {
            ModelOutput::Text(text) => Some(text),
            ModelOutput::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, ModelOutput::Exhausted)
    }

    /// The generated text, or [`GENERATION_FAILED`].
    pub fn as_str(&self) -> &str {
        self.text().unwrap_or(GENERATION_FAILED)
    }
}

/// Attempt budget, temperature progression and backoff for one logical call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_temperature: f32,
    pub temperature_step: f32,
    /// Delay after attempt `n` is `backoff_base^n` seconds.
    pub backoff_base: f64,
}

impl RetryPolicy {
    /// Clustering and analysis calls.
    pub const GENERAL: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        base_temperature: 0.3,
        temperature_step: 0.2,
        backoff_base: 1.5,
    };

    /// Report generation.
    pub const REPORT: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        base_temperature: 0.4,
        temperature_step: 0.1,
        backoff_base: 2.0,
    };

    pub fn temperature(&self, attempt: u32) -> f32 {
        self.base_temperature + attempt as f32 * self.temperature_step
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_base.powi(attempt as i32))
    }
}
