//! Feed parsing logic for RSS, Atom, and JSON formats.

use anyhow::{anyhow, bail, Result};
use feed_rs::model::Feed;
use feed_rs::parser;
use std::io::Cursor;
use tracing::debug;

use super::types::{FeedEntry, JsonFeed};
use super::util::cleanup_xml;
use crate::TARGET_WEB_REQUEST;

/// Parse a feed body into entries, in feed order.
///
/// JSON Feed is used when the content type says JSON; everything else goes
/// through feed-rs, with one retry on cleaned-up XML. Entries without a link
/// are dropped.
pub fn parse_feed(body: &str, content_type: Option<&str>) -> Result<Vec<FeedEntry>> {
    if content_type.map_or(false, |ct| ct.contains("json")) {
        debug!(target: TARGET_WEB_REQUEST, "Processing as JSON feed");
        let feed: JsonFeed =
            serde_json::from_str(body).map_err(|e| anyhow!("Failed to parse JSON feed: {}", e))?;
        return Ok(feed
            .items
            .into_iter()
            .filter_map(|item| {
                let link = item.url.or(item.id)?;
                Some(FeedEntry::new(item.title, link))
            })
            .collect());
    }

    match parser::parse(Cursor::new(body.as_bytes())) {
        Ok(feed) => Ok(entries_from(feed)),
        Err(first_err) => {
            let cleaned = cleanup_xml(body);
            if !(cleaned.contains("<rss") || cleaned.contains("<feed")) {
                bail!("Feed doesn't appear to be RSS or Atom: {}", first_err);
            }

            let feed = parser::parse(Cursor::new(cleaned.as_bytes())).map_err(|second_err| {
                anyhow!(
                    "Failed to parse feed even after cleanup. First error: {}. Second error: {}",
                    first_err,
                    second_err
                )
            })?;
            debug!(target: TARGET_WEB_REQUEST, "Feed parsed successfully after XML cleanup");
            Ok(entries_from(feed))
        }
    }
}

fn entries_from(feed: Feed) -> Vec<FeedEntry> {
    feed.entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.first()?.href.clone();
            Some(FeedEntry::new(entry.title.map(|t| t.content), link))
        })
        .collect()
}
