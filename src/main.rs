use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;

use newsweave::config::Config;
use newsweave::document::{render_document, write_document, DocumentMeta};
use newsweave::extract::ReadabilityExtractor;
use newsweave::feed::HttpFeedSource;
use newsweave::llm::{ModelClient, OllamaModel};
use newsweave::logging::configure_logging;
use newsweave::Pipeline;

#[derive(Parser, Debug)]
#[clap(about = "Cluster today's news across feeds and synthesize one report per story")]
struct Args {
    /// Ollama host (overrides OLLAMA_HOST)
    #[clap(long)]
    host: Option<String>,

    /// Ollama port (overrides OLLAMA_PORT)
    #[clap(long)]
    port: Option<u16>,

    /// Model to use (overrides OLLAMA_MODEL)
    #[clap(long)]
    model: Option<String>,

    /// Entries taken from each feed (overrides ENTRIES_PER_FEED)
    #[clap(long)]
    entries_per_feed: Option<usize>,

    /// Per-request model timeout in seconds (overrides LLM_TIMEOUT_SECS)
    #[clap(long)]
    timeout_secs: Option<u64>,

    /// Directory for the report document (overrides OUTPUT_DIR)
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// Print the document instead of writing it
    #[clap(long)]
    dry_run: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.ollama_host = host;
        }
        if let Some(port) = self.port {
            config.ollama_port = port;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(entries) = self.entries_per_feed {
            config.entries_per_feed = entries;
        }
        if let Some(secs) = self.timeout_secs {
            config.llm_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    configure_logging();

    let dry_run = args.dry_run;
    let mut config = Config::from_env();
    args.apply(&mut config);

    info!(
        "Using model {} at {}:{} with {} feeds",
        config.model,
        config.ollama_host,
        config.ollama_port,
        config.feeds.len()
    );

    let model = OllamaModel::new(&config.ollama_host, config.ollama_port, config.model.clone())?;
    let client = ModelClient::new(Arc::new(model)).with_request_timeout(config.llm_timeout);

    let pipeline = Pipeline::new(
        config.feeds.clone(),
        Arc::new(HttpFeedSource::new()?),
        Arc::new(ReadabilityExtractor::default()),
        client,
        config.pipeline_settings(),
    );

    let reports = pipeline.run().await;
    if reports.is_empty() {
        info!("No reports were produced, nothing to write");
        return Ok(());
    }

    let now = Local::now();
    let meta = DocumentMeta {
        generated_at: now,
        model: config.model.clone(),
        sources: config.feeds.iter().map(|feed| feed.name.clone()).collect(),
    };
    let document = render_document(&reports, &meta);

    if dry_run {
        println!("{}", document);
        return Ok(());
    }

    let path = write_document(&config.output_dir, &document, now)?;

    println!("Generated {} reports:", reports.len());
    for report in &reports {
        let sources: Vec<&str> = report.sources.iter().map(String::as_str).collect();
        println!(
            "  - {} ({} words; {})",
            report.headline,
            report.word_count(),
            sources.join(", ")
        );
    }
    println!("Saved to {}", path.display());

    Ok(())
}
