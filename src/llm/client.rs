use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, warn};

use super::types::{
    ModelError, ModelOutput, ModelRequest, ResponseFormat, RetryPolicy, DEFAULT_REQUEST_TIMEOUT,
    MAX_PROMPT_CHARS,
};
use super::GenerativeModel;
use crate::util::truncate_chars;
use crate::TARGET_LLM_REQUEST;

/// Shared handle to the model service, threaded through the pipeline.
#[derive(Clone)]
pub struct ModelClient {
    model: Arc<dyn GenerativeModel>,
    request_timeout: Duration,
}

impl ModelClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        ModelClient {
            model,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Generates a response using [`RetryPolicy::GENERAL`].
    pub async fn generate(&self, prompt: &str, format: ResponseFormat) -> ModelOutput {
        self.generate_with_policy(prompt, format, &RetryPolicy::GENERAL)
            .await
    }

    /// Generates a response, retrying failed or empty attempts with backoff.
    pub async fn generate_with_policy(
        &self,
        prompt: &str,
        format: ResponseFormat,
        policy: &RetryPolicy,
    ) -> ModelOutput {
        for attempt in 0..policy.max_attempts {
            match self.attempt(prompt, format, attempt, policy).await {
                Ok(text) => {
                    debug!(target: TARGET_LLM_REQUEST, "Model response received on attempt {}/{}", attempt + 1, policy.max_attempts);
                    return ModelOutput::Text(text);
                }
                Err(e) => {
                    warn!(target: TARGET_LLM_REQUEST, "Model call attempt {}/{} failed: {}", attempt + 1, policy.max_attempts, e);
                }
            }

            if attempt + 1 < policy.max_attempts {
                let delay = policy.backoff(attempt);
                debug!(target: TARGET_LLM_REQUEST, "Backing off for {:.1}s before retry", delay.as_secs_f64());
                sleep(delay).await;
            }
        }

        error!(target: TARGET_LLM_REQUEST, "No response generated after {} attempts", policy.max_attempts);
        ModelOutput::Exhausted
    }

    /// Makes exactly one model call.
    ///
    /// `attempt_hint` selects the temperature from `policy`. Empty or
    /// whitespace-only responses are reported as [`ModelError::EmptyResponse`].
    pub async fn attempt(
        &self,
        prompt: &str,
        format: ResponseFormat,
        attempt_hint: u32,
        policy: &RetryPolicy,
    ) -> Result<String, ModelError> {
        let request = ModelRequest {
            prompt: truncate_chars(prompt, MAX_PROMPT_CHARS).to_string(),
            format,
            temperature: policy.temperature(attempt_hint),
        };

        debug!(
            target: TARGET_LLM_REQUEST,
            "Sending {:?} request to {} (temperature {:.2}, {} chars)",
            format,
            self.model.model_name(),
            request.temperature,
            request.prompt.chars().count()
        );

        match timeout(self.request_timeout, self.model.generate(request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => Err(ModelError::EmptyResponse),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ModelError::Timeout(self.request_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GENERATION_FAILED;
    use crate::test_support::{transport_error, ScriptedModel, StalledModel};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("hello".to_string())]));
        let client = ModelClient::new(model.clone());

        let output = client.generate("prompt", ResponseFormat::Text).await;

        assert_eq!(output, ModelOutput::Text("hello".to_string()));
        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].format, ResponseFormat::Text);
        assert!((requests[0].temperature - 0.3).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_raise_temperature() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(transport_error()),
            Ok("   ".to_string()),
            Ok("{\"ok\":true}".to_string()),
        ]));
        let client = ModelClient::new(model.clone());

        let output = client.generate("prompt", ResponseFormat::Json).await;

        assert_eq!(output.text(), Some("{\"ok\":true}"));
        let temperatures: Vec<f32> = model.requests().iter().map(|r| r.temperature).collect();
        assert_eq!(temperatures.len(), 3);
        assert!(temperatures.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(model
            .requests()
            .iter()
            .all(|r| r.format == ResponseFormat::Json));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_is_bounded_and_backs_off() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(transport_error()),
            Err(transport_error()),
            Err(transport_error()),
            Ok("never requested".to_string()),
        ]));
        let client = ModelClient::new(model.clone());

        let started = Instant::now();
        let output = client.generate("prompt", ResponseFormat::Text).await;
        let elapsed = started.elapsed();

        assert_eq!(output, ModelOutput::Exhausted);
        assert_eq!(output.as_str(), GENERATION_FAILED);
        assert_eq!(model.call_count(), 3);
        // 1.5^0 + 1.5^1, no sleep after the final attempt
        assert!(elapsed >= Duration::from_millis(2500));
        assert!(elapsed < Duration::from_millis(2600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_is_capped() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("done".to_string())]));
        let client = ModelClient::new(model.clone());
        let prompt = "x".repeat(MAX_PROMPT_CHARS + 5_000);

        client.generate(&prompt, ResponseFormat::Text).await;

        assert_eq!(model.requests()[0].prompt.chars().count(), MAX_PROMPT_CHARS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_model_times_out() {
        let client = ModelClient::new(Arc::new(StalledModel))
            .with_request_timeout(Duration::from_secs(5));

        let result = client
            .attempt("prompt", ResponseFormat::Text, 0, &RetryPolicy::GENERAL)
            .await;
        assert!(matches!(result, Err(ModelError::Timeout(_))));

        let output = client.generate("prompt", ResponseFormat::Text).await;
        assert!(output.is_exhausted());
    }
}
