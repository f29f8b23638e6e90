pub mod analysis;
pub mod clustering;
pub mod config;
pub mod document;
pub mod environment;
pub mod extract;
pub mod feed;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::BTreeSet;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";

/// Maximum number of characters of extracted article text kept per article.
pub const MAX_ARTICLE_CHARS: usize = 2000;

/// Extractions at or below this many characters are treated as failures.
pub const MIN_ARTICLE_CHARS: usize = 100;

/// A collected news article, ready for clustering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub source: String,
    pub content: String,
}

impl Article {
    /// Builds an article, capping `content` at [`MAX_ARTICLE_CHARS`].
    pub fn new(title: impl Into<String>, source: impl Into<String>, content: &str) -> Self {
        Article {
            title: title.into(),
            source: source.into(),
            content: util::truncate_chars(content, MAX_ARTICLE_CHARS).to_string(),
        }
    }
}

/// A synthesized report for one story cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub headline: String,
    pub sources: BTreeSet<String>,
    pub body: String,
}

impl Report {
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

pub use analysis::{analyze_contents, Analysis};
pub use clustering::{cluster_titles, validate_groups, ClusterAssignment, GroupingOutcome};
pub use llm::{GenerativeModel, ModelClient, ModelError, ModelOutput, ModelRequest, ResponseFormat};
pub use pipeline::{Pipeline, PipelineSettings};
pub use report::{synthesize_report, ReportSettings, Synthesis};
