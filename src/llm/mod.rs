//! Generative model access for newsweave.
//!
//! [`GenerativeModel`] is the seam to the model service; [`ModelClient`] wraps
//! it with prompt capping, per-attempt temperature, timeouts and backoff.

mod client;
mod ollama;
mod types;

pub use self::client::*;
pub use self::ollama::OllamaModel;
pub use self::types::*;

use async_trait::async_trait;

/// A generative language model service.
///
/// Implementations make exactly one request per call and report transport
/// problems as [`ModelError`]; retrying is the job of [`ModelClient`].
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn generate(&self, request: ModelRequest) -> Result<String, ModelError>;
}
