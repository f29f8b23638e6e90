//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::warn;

use crate::environment::{parse_or_default, split_list};
use crate::feed::{is_valid_url, FeedConfig};
use crate::llm::DEFAULT_REQUEST_TIMEOUT;
use crate::pipeline::{PipelineSettings, DEFAULT_ENTRIES_PER_FEED};
use crate::report::{ReportSettings, DEFAULT_MIN_REPORT_CHARS};

pub const DEFAULT_OLLAMA_HOST: &str = "localhost";
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;
pub const DEFAULT_MODEL: &str = "vanilj/Phi-4:latest";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

const DEFAULT_FEEDS: [(&str, &str); 3] = [
    ("BBC News", "http://feeds.bbci.co.uk/news/rss.xml"),
    ("Reuters", "http://feeds.reuters.com/reuters/topNews"),
    ("AP News", "https://apnews.com/feed"),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub feeds: Vec<FeedConfig>,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub model: String,
    pub entries_per_feed: usize,
    pub llm_timeout: Duration,
    pub min_report_chars: usize,
    pub output_dir: PathBuf,
}

impl Config {
    /// Reads `NEWSWEAVE_FEEDS`, `OLLAMA_HOST`, `OLLAMA_PORT`, `OLLAMA_MODEL`,
    /// `ENTRIES_PER_FEED`, `LLM_TIMEOUT_SECS`, `MIN_REPORT_CHARS` and `OUTPUT_DIR`.
    pub fn from_env() -> Self {
        Config::from_lookup(|var| env::var(var).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |var: &str, default: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let feeds = lookup("NEWSWEAVE_FEEDS")
            .map(|raw| parse_feed_specs(&raw))
            .filter(|feeds| !feeds.is_empty())
            .unwrap_or_else(default_feeds);

        let timeout_secs = parse_or_default(
            "LLM_TIMEOUT_SECS",
            lookup("LLM_TIMEOUT_SECS").as_deref(),
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
        );

        Config {
            feeds,
            ollama_host: text("OLLAMA_HOST", DEFAULT_OLLAMA_HOST),
            ollama_port: parse_or_default(
                "OLLAMA_PORT",
                lookup("OLLAMA_PORT").as_deref(),
                DEFAULT_OLLAMA_PORT,
            ),
            model: text("OLLAMA_MODEL", DEFAULT_MODEL),
            entries_per_feed: parse_or_default(
                "ENTRIES_PER_FEED",
                lookup("ENTRIES_PER_FEED").as_deref(),
                DEFAULT_ENTRIES_PER_FEED,
            ),
            llm_timeout: Duration::from_secs(timeout_secs),
            min_report_chars: parse_or_default(
                "MIN_REPORT_CHARS",
                lookup("MIN_REPORT_CHARS").as_deref(),
                DEFAULT_MIN_REPORT_CHARS,
            ),
            output_dir: PathBuf::from(text("OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            entries_per_feed: self.entries_per_feed,
            report: ReportSettings {
                min_report_chars: self.min_report_chars,
                ..ReportSettings::default()
            },
        }
    }
}

pub fn default_feeds() -> Vec<FeedConfig> {
    DEFAULT_FEEDS
        .iter()
        .map(|(name, url)| FeedConfig::new(*name, *url))
        .collect()
}

/// Parses `name|url;name|url`. Malformed entries are skipped with a warning.
pub fn parse_feed_specs(raw: &str) -> Vec<FeedConfig> {
    split_list(raw, ';')
        .into_iter()
        .filter_map(|definition| {
            let Some((name, url)) = definition.split_once('|') else {
                warn!("Skipping feed definition without a name: {:?}", definition);
                return None;
            };
            let (name, url) = (name.trim(), url.trim());
            if name.is_empty() || !is_valid_url(url) {
                warn!("Skipping invalid feed definition: {:?}", definition);
                return None;
            }
            Some(FeedConfig::new(name, url))
        })
        .collect()
}
