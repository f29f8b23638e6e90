//! News feed ingestion.
//!
//! This module fetches RSS, Atom and JSON feeds and turns them into ordered
//! [`FeedEntry`] lists for the pipeline.

mod client;
mod parser;
mod types;
mod util;

pub use self::client::*;
pub use self::parser::parse_feed;
pub use self::types::*;
pub use self::util::*;

use anyhow::Result;
use async_trait::async_trait;

/// Source of entries for a configured feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Entries in feed order. An error skips only this feed.
    async fn entries(&self, feed: &FeedConfig) -> Result<Vec<FeedEntry>>;
}
