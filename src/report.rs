//! Report synthesis with structural validation.
//!
//! A report is accepted only when it contains every heading in
//! [`REQUIRED_SECTIONS`] verbatim. Generation is retried with backoff, and an
//! exhausted budget yields [`Synthesis::Exhausted`] rather than partial text.

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::analysis::Analysis;
use crate::llm::{ModelClient, ResponseFormat, RetryPolicy};
use crate::prompt::report_prompt;
use crate::TARGET_LLM_REQUEST;

/// Section headings every report must contain, matched as exact substrings.
pub const REQUIRED_SECTIONS: [&str; 4] = [
    "Verified Facts",
    "Conflict Analysis",
    "Further Research Needed",
    "Conclusion",
];

/// Requested in the prompt, never checked.
pub const CONCLUSION_MIN_WORDS: usize = 300;

/// Text form of [`Synthesis::Exhausted`]. Must never reach the final document.
pub const REPORT_FAILURE_MARKER: &str = "Could not generate complete report";

pub const DEFAULT_MIN_REPORT_CHARS: usize = 400;

#[derive(Clone, Debug, PartialEq)]
pub struct ReportSettings {
    pub policy: RetryPolicy,
    /// Ask for JSON output on the first attempt only.
    pub structured_first_attempt: bool,
    /// Valid reports shorter than this are regenerated once. Zero disables.
    pub min_report_chars: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            policy: RetryPolicy::REPORT,
            structured_first_attempt: false,
            min_report_chars: DEFAULT_MIN_REPORT_CHARS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Synthesis {
    Report(String),
    Exhausted,
}

impl Synthesis {
    pub fn report(&self) -> Option<&str> {
        match self {
            Synthesis::Report(body) => Some(body),
            Synthesis::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Synthesis::Exhausted)
    }

    /// The report body, or [`REPORT_FAILURE_MARKER`].
    pub fn as_str(&self) -> &str {
        self.report().unwrap_or(REPORT_FAILURE_MARKER)
    }
}

/// Required section headings absent from `text`.
pub fn missing_sections(text: &str) -> Vec<&'static str> {
    REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|section| !text.contains(section))
        .collect()
}

pub fn is_complete_report(text: &str) -> bool {
    missing_sections(text).is_empty()
}

/// Generates a report for `analysis`, making at most
/// `settings.policy.max_attempts` model calls.
pub async fn synthesize_report(
    client: &ModelClient,
    analysis: &Analysis,
    settings: &ReportSettings,
) -> Synthesis {
    let prompt = report_prompt(&analysis.to_prompt_text());
    let policy = &settings.policy;

    for attempt in 0..policy.max_attempts {
        let format = if attempt == 0 && settings.structured_first_attempt {
            ResponseFormat::Json
        } else {
            ResponseFormat::Text
        };

        match client.attempt(&prompt, format, attempt, policy).await {
            Ok(text) => {
                let missing = missing_sections(&text);
                if missing.is_empty() {
                    info!(target: TARGET_LLM_REQUEST, "Report generated on attempt {}/{}", attempt + 1, policy.max_attempts);
                    return Synthesis::Report(text.trim().to_string());
                }
                warn!(target: TARGET_LLM_REQUEST, "Report attempt {}/{} is missing sections: {}", attempt + 1, policy.max_attempts, missing.join(", "));
            }
            Err(e) => {
                warn!(target: TARGET_LLM_REQUEST, "Report attempt {}/{} failed: {}", attempt + 1, policy.max_attempts, e);
            }
        }

        if attempt + 1 < policy.max_attempts {
            let delay = policy.backoff(attempt);
            debug!(target: TARGET_LLM_REQUEST, "Backing off for {:.1}s before regenerating report", delay.as_secs_f64());
            sleep(delay).await;
        }
    }

    error!(target: TARGET_LLM_REQUEST, "Could not generate a complete report after {} attempts", policy.max_attempts);
    Synthesis::Exhausted
}

/// Runs [`synthesize_report`], regenerating once when the accepted report is
/// shorter than `settings.min_report_chars`.
///
/// The regenerated report wins only if it is itself valid.
pub async fn synthesize_with_quality_gate(
    client: &ModelClient,
    analysis: &Analysis,
    settings: &ReportSettings,
) -> Synthesis {
    let first = synthesize_report(client, analysis, settings).await;

    let length = match first.report() {
        Some(body) => body.chars().count(),
        None => return first,
    };
    if length >= settings.min_report_chars {
        return first;
    }

    warn!(target: TARGET_LLM_REQUEST, "Short report detected ({} chars), regenerating", length);
    match synthesize_report(client, analysis, settings).await {
        Synthesis::Exhausted => first,
        regenerated => regenerated,
    }
}
