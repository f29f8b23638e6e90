//! HTTP client creation and feed fetching.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, info};

use super::parser::parse_feed;
use super::types::{FeedConfig, FeedEntry, FEED_ACCEPT, REQUEST_TIMEOUT, USER_AGENT};
use super::util::is_valid_url;
use super::FeedSource;
use crate::TARGET_WEB_REQUEST;

/// Create the HTTP client used for feed requests
pub fn create_http_client() -> Result<reqwest::Client> {
    debug!(target: TARGET_WEB_REQUEST, "Creating feed HTTP client");

    reqwest::Client::builder()
        .cookie_store(true)
        .gzip(true)
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))
}

/// [`FeedSource`] that downloads feeds over HTTP.
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self> {
        Ok(HttpFeedSource {
            client: create_http_client()?,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn entries(&self, feed: &FeedConfig) -> Result<Vec<FeedEntry>> {
        if !is_valid_url(&feed.url) {
            bail!("Invalid feed URL: {}", feed.url);
        }

        debug!(target: TARGET_WEB_REQUEST, "Loading {} feed from {}", feed.name, feed.url);
        let response = self
            .client
            .get(&feed.url)
            .header(header::ACCEPT, FEED_ACCEPT)
            .send()
            .await
            .map_err(|e| anyhow!("Request to {} failed: {}", feed.url, e))?;

        if !response.status().is_success() {
            bail!("HTTP error {} from {}", response.status(), feed.url);
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|s| s.to_lowercase());

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body from {}: {}", feed.url, e))?;

        let entries = parse_feed(&body, content_type.as_deref())?;
        info!(target: TARGET_WEB_REQUEST, "Parsed {} feed with {} entries", feed.name, entries.len());
        Ok(entries)
    }
}
