use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use ollama_rs::generation::parameters::FormatType;
use ollama_rs::Ollama;
use tracing::debug;

use super::types::{ModelError, ModelRequest, ResponseFormat};
use super::GenerativeModel;
use crate::TARGET_LLM_REQUEST;

/// [`GenerativeModel`] backed by an Ollama server.
#[derive(Clone, Debug)]
pub struct OllamaModel {
    ollama: Ollama,
    model: String,
}

impl OllamaModel {
    /// Fails when `host` does not form a usable URL.
    pub fn new(host: &str, port: u16, model: impl Into<String>) -> Result<Self> {
        let host = host.trim();
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| anyhow!("Invalid Ollama host {:?}: {}", host, e))?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(anyhow!("Invalid Ollama host {:?}: no host name", host));
        }
        debug!(target: TARGET_LLM_REQUEST, "Connecting to Ollama at {}:{}", base_url, port);

        Ok(OllamaModel {
            ollama: Ollama::new(base_url, port),
            model: model.into(),
        })
    }
}

#[async_trait]
impl GenerativeModel for OllamaModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: ModelRequest) -> Result<String, ModelError> {
        let mut generation = GenerationRequest::new(self.model.clone(), request.prompt);
        generation.options = Some(GenerationOptions::default().temperature(request.temperature));
        if request.format == ResponseFormat::Json {
            generation.format = Some(FormatType::Json);
        }

        let response = self
            .ollama
            .generate(generation)
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_is_validated() {
        let model = OllamaModel::new("gpu-box", 11434, "vanilj/Phi-4:latest").unwrap();
        assert_eq!(model.model_name(), "vanilj/Phi-4:latest");
        assert!(OllamaModel::new("https://ollama.example.com", 443, "m").is_ok());

        assert!(OllamaModel::new("bad host", 11434, "m").is_err());
        assert!(OllamaModel::new("http://", 11434, "m").is_err());
        assert!(OllamaModel::new("", 11434, "m").is_err());
    }
}
