//! Per-cluster fact, conflict and entity analysis.

use serde_json::Value;
use tracing::{debug, warn};

use crate::llm::{ModelClient, ModelOutput, ResponseFormat, GENERATION_FAILED};
use crate::prompt::analysis_prompt;
use crate::TARGET_LLM_REQUEST;

/// Opaque analysis payload handed to the report stage.
///
/// The expected keys are facts, conflicts, missing_info, entities and summary,
/// but nothing here enforces them.
#[derive(Clone, Debug, PartialEq)]
pub enum Analysis {
    Structured(Value),
    Text(String),
    /// The model produced nothing usable.
    Unavailable,
}

impl Analysis {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Analysis::Unavailable)
    }

    /// Renders the analysis for inclusion in a follow-up prompt.
    pub fn to_prompt_text(&self) -> String {
        match self {
            Analysis::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Analysis::Text(text) => text.clone(),
            Analysis::Unavailable => GENERATION_FAILED.to_string(),
        }
    }
}

impl From<ModelOutput> for Analysis {
    fn from(output: ModelOutput) -> Self {
        match output {
            ModelOutput::Text(raw) => match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => Analysis::Structured(value),
                Err(_) => Analysis::Text(raw),
            },
            ModelOutput::Exhausted => Analysis::Unavailable,
        }
    }
}

/// Analyzes the (already length-capped) contents of one cluster's articles.
pub async fn analyze_contents(client: &ModelClient, contents: &[String]) -> Analysis {
    debug!(target: TARGET_LLM_REQUEST, "Analyzing cluster of {} articles", contents.len());

    let output = client
        .generate(&analysis_prompt(contents), ResponseFormat::Json)
        .await;
    let analysis = Analysis::from(output);

    match &analysis {
        Analysis::Structured(_) => {}
        Analysis::Text(_) => {
            debug!(target: TARGET_LLM_REQUEST, "Analysis response was not JSON, passing it on as text")
        }
        Analysis::Unavailable => {
            warn!(target: TARGET_LLM_REQUEST, "Analysis unavailable after retries")
        }
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{transport_error, ScriptedModel};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_structured_analysis() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            r#"{"facts":["A won"],"conflicts":"none","missing_info":[],"entities":["A"],"summary":"A won."}"#
                .to_string(),
        )]));
        let client = ModelClient::new(model.clone());

        let analysis =
            analyze_contents(&client, &["first".to_string(), "second".to_string()]).await;

        assert_eq!(
            analysis,
            Analysis::Structured(json!({
                "facts": ["A won"],
                "conflicts": "none",
                "missing_info": [],
                "entities": ["A"],
                "summary": "A won."
            }))
        );
        let request = &model.requests()[0];
        assert_eq!(request.format, ResponseFormat::Json);
        assert!(request.prompt.contains("first"));
        assert!(request.prompt.contains("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_json_passes_through() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("Facts: A won.".to_string())]));
        let client = ModelClient::new(model);

        let analysis = analyze_contents(&client, &["body".to_string()]).await;

        assert_eq!(analysis, Analysis::Text("Facts: A won.".to_string()));
        assert_eq!(analysis.to_prompt_text(), "Facts: A won.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_analysis_is_unavailable() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(transport_error()),
            Err(transport_error()),
            Err(transport_error()),
        ]));
        let client = ModelClient::new(model);

        let analysis = analyze_contents(&client, &["body".to_string()]).await;

        assert!(analysis.is_unavailable());
        assert_eq!(analysis.to_prompt_text(), GENERATION_FAILED);
    }
}
