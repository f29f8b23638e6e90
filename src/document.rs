//! Markdown assembly of the final synthesis document.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::report::REPORT_FAILURE_MARKER;
use crate::util::truncate_chars;
use crate::Report;

const MAX_KEY_CONCLUSION_CHARS: usize = 600;

static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})([ \t])").unwrap());

static CONCLUSION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:\d+\.[ \t]*)?(?:\*\*)?[ \t]*Conclusion\b[^\n]*$")
        .unwrap()
});

static NEXT_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*#").unwrap());

/// Header details for a rendered document.
#[derive(Clone, Debug)]
pub struct DocumentMeta {
    pub generated_at: DateTime<Local>,
    pub model: String,
    pub sources: Vec<String>,
}

/// Renders all reports into a single Markdown document.
///
/// Reports whose body is the failure marker are left out.
pub fn render_document(reports: &[Report], meta: &DocumentMeta) -> String {
    let reports: Vec<&Report> = reports
        .iter()
        .filter(|report| {
            let keep = report.body.trim() != REPORT_FAILURE_MARKER;
            if !keep {
                warn!("Leaving failed report \"{}\" out of the document", report.headline);
            }
            keep
        })
        .collect();

    let mut lines = vec![
        "# Daily News Synthesis Report".to_string(),
        format!("*Generated at {}*", meta.generated_at.format("%Y-%m-%d %H:%M:%S")),
        format!("**Model:** {}", meta.model),
        format!("**Sources:** {}", meta.sources.join(", ")),
        String::new(),
    ];

    let anchors: Vec<String> = reports
        .iter()
        .enumerate()
        .map(|(i, report)| slugify(&report_title(i, report)))
        .collect();

    if !reports.is_empty() {
        lines.push("## Table of Contents".to_string());
        for (i, report) in reports.iter().enumerate() {
            lines.push(format!("{}. [{}](#{})", i + 1, report.headline, anchors[i]));
        }
        lines.push(String::new());
    }

    let conclusions: Vec<String> = reports
        .iter()
        .enumerate()
        .filter_map(|(i, report)| {
            extract_conclusion(&report.body)
                .map(|text| format!("- **[{}](#{}):** {}", report.headline, anchors[i], text))
        })
        .collect();
    if !conclusions.is_empty() {
        lines.push("## Key Conclusions".to_string());
        lines.extend(conclusions);
        lines.push(String::new());
    }

    for (i, report) in reports.iter().enumerate() {
        let sources: Vec<&str> = report.sources.iter().map(String::as_str).collect();
        lines.extend([
            format!("<a id=\"{}\"></a>", anchors[i]),
            format!("## {}", report_title(i, report)),
            format!("**Sources:** {}", sources.join(", ")),
            format!("**Word Count:** {} words", report.word_count()),
            String::new(),
            demote_headings(&report.body),
            String::new(),
            "---".to_string(),
            String::new(),
        ]);
    }

    lines.join("\n")
}

fn report_title(index: usize, report: &Report) -> String {
    format!("Report {}: {}", index + 1, report.headline)
}

/// Writes `contents` to `news_report_<timestamp>.md` inside `dir`.
pub fn write_document(dir: &Path, contents: &str, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(format!("news_report_{}.md", now.format("%Y%m%d_%H%M%S")));
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote report document to {}", path.display());
    Ok(path)
}

/// GitHub-style anchor slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Pushes every Markdown heading two levels down, capped at level six.
pub fn demote_headings(body: &str) -> String {
    MARKDOWN_HEADING
        .replace_all(body, |caps: &Captures| {
            let level = (caps[1].len() + 2).min(6);
            format!("{}{}", "#".repeat(level), &caps[2])
        })
        .into_owned()
}

/// First paragraph of the report's Conclusion section, if there is one.
pub fn extract_conclusion(body: &str) -> Option<String> {
    let heading = CONCLUSION_HEADING.find(body)?;
    let rest = &body[heading.end()..];
    let section = match NEXT_HEADING.find(rest) {
        Some(next) => &rest[..next.start()],
        None => rest,
    };

    let paragraph = section
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())?
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if paragraph.chars().count() > MAX_KEY_CONCLUSION_CHARS {
        Some(format!("{}…", truncate_chars(&paragraph, MAX_KEY_CONCLUSION_CHARS).trim_end()))
    } else {
        Some(paragraph)
    }
}
