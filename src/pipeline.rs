//! End-to-end synthesis run: gather → cluster → analyze → synthesize.
//!
//! Everything runs sequentially on the caller's task. A failure inside one
//! cluster is logged and that cluster skipped; the run itself never fails.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::analysis::analyze_contents;
use crate::clustering::{cluster_titles, ClusterAssignment};
use crate::extract::ArticleExtractor;
use crate::feed::{FeedConfig, FeedSource};
use crate::llm::ModelClient;
use crate::report::{synthesize_with_quality_gate, ReportSettings, Synthesis, REPORT_FAILURE_MARKER};
use crate::{Article, Report, MIN_ARTICLE_CHARS};

pub const DEFAULT_ENTRIES_PER_FEED: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineSettings {
    /// Only the first this-many entries of each feed are extracted.
    pub entries_per_feed: usize,
    pub report: ReportSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            entries_per_feed: DEFAULT_ENTRIES_PER_FEED,
            report: ReportSettings::default(),
        }
    }
}

pub struct Pipeline {
    feeds: Vec<FeedConfig>,
    source: Arc<dyn FeedSource>,
    extractor: Arc<dyn ArticleExtractor>,
    client: ModelClient,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        feeds: Vec<FeedConfig>,
        source: Arc<dyn FeedSource>,
        extractor: Arc<dyn ArticleExtractor>,
        client: ModelClient,
        settings: PipelineSettings,
    ) -> Self {
        Pipeline {
            feeds,
            source,
            extractor,
            client,
            settings,
        }
    }

    pub fn feeds(&self) -> &[FeedConfig] {
        &self.feeds
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Runs one full synthesis pass and returns the reports in cluster order.
    ///
    /// No collected articles is a normal outcome and yields no reports.
    pub async fn run(&self) -> Vec<Report> {
        let started = Instant::now();

        let articles = self.gather_articles().await;
        if articles.is_empty() {
            warn!("No articles collected; check network connectivity, feed URLs and extraction errors");
            return Vec::new();
        }
        info!("Collected {} articles from {} feeds", articles.len(), self.feeds.len());

        let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
        let assignment = cluster_titles(&self.client, &titles).await;

        let reports = self.synthesize_clusters(&articles, &assignment).await;
        info!(
            "Pipeline completed - duration={:.2}s, articles={}, clusters={}, reports={}",
            started.elapsed().as_secs_f32(),
            articles.len(),
            assignment.len(),
            reports.len()
        );
        reports
    }

    /// Fetches every configured feed and extracts its leading entries.
    pub async fn gather_articles(&self) -> Vec<Article> {
        let mut articles = Vec::new();

        for feed in &self.feeds {
            info!("Processing {} feed", feed.name);
            let entries = match self.source.entries(feed).await {
                Ok(entries) => entries,
                Err(e) => {
                    error!("Error processing feed {} ({}): {}", feed.name, feed.url, e);
                    continue;
                }
            };

            for entry in entries.into_iter().take(self.settings.entries_per_feed) {
                let extraction = self.extractor.extract(&entry.link).await;
                match extraction.text_longer_than(MIN_ARTICLE_CHARS) {
                    Some(text) => {
                        debug!("Collected \"{}\" from {}", entry.title, feed.name);
                        articles.push(Article::new(entry.title, feed.name.clone(), text));
                    }
                    None => {
                        warn!("Skipping {}: extraction failed or returned too little text", entry.link);
                    }
                }
            }
        }

        articles
    }

    /// Processes each cluster in order, isolating failures per cluster.
    pub async fn synthesize_clusters(
        &self,
        articles: &[Article],
        assignment: &ClusterAssignment,
    ) -> Vec<Report> {
        let mut reports = Vec::new();

        for group in assignment.groups() {
            let outcome = AssertUnwindSafe(self.process_cluster(articles, group))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Some(report)) => {
                    info!("Report generated for \"{}\"", report.headline);
                    reports.push(report);
                }
                Ok(None) => {}
                Err(panic) => {
                    error!("Error processing cluster {:?}: {}", group, panic_message(panic.as_ref()));
                }
            }
        }

        reports
    }

    /// Analyzes and reports on one cluster.
    ///
    /// Indices past the end of `articles` are ignored. Returns `None` when no
    /// article remains or the report could not be generated.
    pub async fn process_cluster(&self, articles: &[Article], group: &[usize]) -> Option<Report> {
        let members: Vec<&Article> = group.iter().filter_map(|&i| articles.get(i)).collect();
        let Some(lead) = members.first() else {
            warn!("Cluster {:?} has no valid articles, skipping", group);
            return None;
        };
        info!("Processing cluster {:?}", group);

        let contents: Vec<String> = members.iter().map(|a| a.content.clone()).collect();
        let analysis = analyze_contents(&self.client, &contents).await;

        match synthesize_with_quality_gate(&self.client, &analysis, &self.settings.report).await {
            Synthesis::Report(body) => Some(Report {
                headline: lead.title.clone(),
                sources: members.iter().map(|a| a.source.clone()).collect(),
                body,
            }),
            Synthesis::Exhausted => {
                warn!("Dropping cluster {:?} (\"{}\"): {}", group, lead.title, REPORT_FAILURE_MARKER);
                None
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
