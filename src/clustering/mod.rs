//! Story clustering: model-driven grouping of article titles with a
//! deterministic singleton fallback.

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::validate_groups;

use tracing::{debug, info, warn};

use crate::llm::{ModelClient, ModelOutput, ResponseFormat};
use crate::prompt::clustering_prompt;
use crate::TARGET_LLM_REQUEST;

/// Partitions `titles` into story groups.
///
/// Falls back to [`ClusterAssignment::singletons`] whenever the model response
/// is unavailable or fails [`validate_groups`]. A rejected response is never
/// retried; only the model call itself is.
pub async fn cluster_titles(client: &ModelClient, titles: &[String]) -> ClusterAssignment {
    if titles.is_empty() {
        debug!(target: TARGET_LLM_REQUEST, "No titles to cluster");
        return ClusterAssignment::default();
    }

    let prompt = clustering_prompt(titles);
    let outcome = match client.generate(&prompt, ResponseFormat::Json).await {
        ModelOutput::Text(raw) => validate_groups(&raw, titles.len()),
        ModelOutput::Exhausted => GroupingOutcome::Invalid(InvalidGrouping::ModelUnavailable),
    };

    match outcome {
        GroupingOutcome::Valid(assignment) => {
            info!(target: TARGET_LLM_REQUEST, "Clustered {} articles into {} stories", titles.len(), assignment.len());
            assignment
        }
        GroupingOutcome::Invalid(reason) => {
            warn!(target: TARGET_LLM_REQUEST, "Rejected model clustering ({}), using one cluster per article", reason);
            ClusterAssignment::singletons(titles.len())
        }
    }
}
