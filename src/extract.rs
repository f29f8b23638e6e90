//! Article text extraction.

use async_trait::async_trait;
use readability::extractor;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, warn};

use crate::TARGET_WEB_REQUEST;

pub const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome of extracting the main text of a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    /// Extraction failed, timed out, or found no text.
    Empty,
}

impl Extraction {
    /// Trimmed text, if it is longer than `min_chars` characters.
    pub fn text_longer_than(&self, min_chars: usize) -> Option<&str> {
        match self {
            Extraction::Text(text) => {
                let text = text.trim();
                (text.chars().count() > min_chars).then_some(text)
            }
            Extraction::Empty => None,
        }
    }
}

/// Pulls the main body text out of an article URL.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Extraction;
}

/// [`ArticleExtractor`] using readability on a blocking thread.
pub struct ReadabilityExtractor {
    timeout: Duration,
}

impl ReadabilityExtractor {
    pub fn new(timeout: Duration) -> Self {
        ReadabilityExtractor { timeout }
    }
}

impl Default for ReadabilityExtractor {
    fn default() -> Self {
        ReadabilityExtractor::new(EXTRACTION_TIMEOUT)
    }
}

#[async_trait]
impl ArticleExtractor for ReadabilityExtractor {
    async fn extract(&self, url: &str) -> Extraction {
        debug!(target: TARGET_WEB_REQUEST, "Extracting URL: {}", url);

        let target = url.to_string();
        extract_blocking(url, self.timeout, move || {
            extractor::scrape(&target)
                .map(|product| product.text)
                .map_err(|e| e.to_string())
        })
        .await
    }
}

/// Runs `scrape` on the blocking pool, mapping every failure to [`Extraction::Empty`].
async fn extract_blocking<F>(url: &str, limit: Duration, scrape: F) -> Extraction
where
    F: FnOnce() -> Result<String, String> + Send + 'static,
{
    match timeout(limit, tokio::task::spawn_blocking(scrape)).await {
        Ok(Ok(Ok(text))) => {
            let text = text.trim();
            if text.is_empty() {
                warn!(target: TARGET_WEB_REQUEST, "Extracted empty article from URL: {}", url);
                Extraction::Empty
            } else {
                debug!(target: TARGET_WEB_REQUEST, "Successfully extracted URL: {} ({} chars)", url, text.chars().count());
                Extraction::Text(text.to_string())
            }
        }
        Ok(Ok(Err(e))) => {
            warn!(target: TARGET_WEB_REQUEST, "Error extracting URL: {} ({})", url, e);
            Extraction::Empty
        }
        Ok(Err(e)) => {
            error!(target: TARGET_WEB_REQUEST, "Extraction task for {} failed: {}", url, e);
            Extraction::Empty
        }
        Err(_) => {
            warn!(target: TARGET_WEB_REQUEST, "Extraction of {} timed out after {:?}", url, limit);
            Extraction::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_longer_than() {
        let short = Extraction::Text(format!("  {}  ", "x".repeat(100)));
        let long = Extraction::Text("y".repeat(101));

        assert_eq!(short.text_longer_than(100), None);
        assert_eq!(long.text_longer_than(100).map(str::len), Some(101));
        assert_eq!(Extraction::Empty.text_longer_than(0), None);
    }

    #[tokio::test]
    async fn test_slow_scrape_times_out() {
        let started = std::time::Instant::now();

        let extraction = extract_blocking("https://slow.example.com", Duration::from_millis(50), || {
            std::thread::sleep(std::time::Duration::from_millis(500));
            Ok("late text".to_string())
        })
        .await;

        assert_eq!(extraction, Extraction::Empty);
        assert!(started.elapsed() < std::time::Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_blocking_outcomes() {
        let limit = Duration::from_secs(5);
        let url = "https://news.example.com/a";

        assert_eq!(
            extract_blocking(url, limit, || Ok("  body text \n".to_string())).await,
            Extraction::Text("body text".to_string())
        );
        assert_eq!(
            extract_blocking(url, limit, || Ok("   ".to_string())).await,
            Extraction::Empty
        );
        assert_eq!(
            extract_blocking(url, limit, || Err("404".to_string())).await,
            Extraction::Empty
        );
        assert_eq!(
            extract_blocking(url, limit, || -> Result<String, String> {
                panic!("parser crashed")
            })
            .await,
            Extraction::Empty
        );
    }

    #[tokio::test]
    async fn test_unparseable_url_extracts_empty() {
        let extractor = ReadabilityExtractor::new(Duration::from_secs(5));
        assert_eq!(extractor.extract("not a url").await, Extraction::Empty);
    }
}
