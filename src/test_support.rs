//! In-memory fakes for the pipeline's external seams.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::extract::{ArticleExtractor, Extraction};
use crate::feed::{FeedConfig, FeedEntry, FeedSource};
use crate::llm::{GenerativeModel, ModelError, ModelRequest};

pub(crate) fn transport_error() -> ModelError {
    ModelError::Transport("connection refused".to_string())
}

/// Replays a fixed list of responses in order.
pub(crate) struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub(crate) fn new(responses: Vec<Result<String, ModelError>>) -> Self {
        ScriptedModel {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: ModelRequest) -> Result<String, ModelError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Transport("script exhausted".to_string())))
    }
}

/// Answers each request with a closure, so responses can depend on the prompt.
pub(crate) struct FnModel<F> {
    respond: F,
    requests: Mutex<Vec<ModelRequest>>,
}

impl<F> FnModel<F>
where
    F: Fn(&ModelRequest) -> Result<String, ModelError> + Send + Sync,
{
    pub(crate) fn new(respond: F) -> Self {
        FnModel {
            respond,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count_matching(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.prompt.contains(needle))
            .count()
    }
}

#[async_trait]
impl<F> GenerativeModel for FnModel<F>
where
    F: Fn(&ModelRequest) -> Result<String, ModelError> + Send + Sync,
{
    fn model_name(&self) -> &str {
        "fn-model"
    }

    async fn generate(&self, request: ModelRequest) -> Result<String, ModelError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.respond)(&request)
    }
}

/// Never answers within any sane timeout.
pub(crate) struct StalledModel;

#[async_trait]
impl GenerativeModel for StalledModel {
    fn model_name(&self) -> &str {
        "stalled"
    }

    async fn generate(&self, _request: ModelRequest) -> Result<String, ModelError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }
}

/// Feeds keyed by name; an `Err` entry simulates a fetch failure.
#[derive(Default)]
pub(crate) struct StaticFeedSource {
    feeds: HashMap<String, std::result::Result<Vec<FeedEntry>, String>>,
}

impl StaticFeedSource {
    pub(crate) fn with_feed(mut self, name: &str, entries: Vec<FeedEntry>) -> Self {
        self.feeds.insert(name.to_string(), Ok(entries));
        self
    }

    pub(crate) fn with_failing_feed(mut self, name: &str, message: &str) -> Self {
        self.feeds.insert(name.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn entries(&self, feed: &FeedConfig) -> Result<Vec<FeedEntry>> {
        match self.feeds.get(&feed.name) {
            Some(Ok(entries)) => Ok(entries.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Err(anyhow!("unknown feed {}", feed.name)),
        }
    }
}

/// Extracts text from a fixed URL → text map; unknown URLs extract as empty.
#[derive(Default)]
pub(crate) struct MapExtractor {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl MapExtractor {
    pub(crate) fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleExtractor for MapExtractor {
    async fn extract(&self, url: &str) -> Extraction {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(text) => Extraction::Text(text.clone()),
            None => Extraction::Empty,
        }
    }
}

pub(crate) fn entry(title: &str, link: &str) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        link: link.to_string(),
    }
}

pub(crate) fn feed(name: &str) -> FeedConfig {
    FeedConfig {
        name: name.to_string(),
        url: format!("https://{}.example.com/rss", name.to_lowercase().replace(' ', "")),
    }
}
