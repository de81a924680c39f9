//! Report rendering.
//!
//! Turns a [`SentimentDigest`] into a human-readable artifact: a plain
//! text table, a Markdown document, or a standalone HTML page. Every
//! artifact carries a title and a UTC generation timestamp; averages are
//! shown as percentages on a 0–100 scale. Posts that had no replies get
//! their own "insufficient data" section instead of a bogus zero row.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::aggregate::{PostSentimentSummary, SentimentDigest};

/// Longest label shown in full; anything longer is truncated.
const MAX_LABEL_CHARS: usize = 60;

const TITLE: &str = "Reply Sentiment Report";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text table (default).
    #[default]
    Text,
    /// Markdown document.
    Markdown,
    /// Standalone HTML page.
    Html,
}

impl ReportFormat {
    /// Parse a format name as given on the command line.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "markdown" | "md" => Some(Self::Markdown),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Report generator.
pub struct ReportRenderer;

impl ReportRenderer {
    /// Generate a report in the given format, timestamped now.
    pub fn generate(digest: &SentimentDigest, format: ReportFormat) -> Result<String, ReportError> {
        Self::generate_at(digest, format, Utc::now())
    }

    /// Generate with an explicit timestamp (deterministic for tests).
    pub fn generate_at(
        digest: &SentimentDigest,
        format: ReportFormat,
        generated: DateTime<Utc>,
    ) -> Result<String, ReportError> {
        match format {
            ReportFormat::Text => Self::to_text(digest, generated),
            ReportFormat::Markdown => Self::to_markdown(digest, generated),
            ReportFormat::Html => Self::to_html(digest, generated),
        }
    }

    /// Generate and write the report to a file. A write failure here is
    /// fatal to the pipeline.
    pub fn save(
        digest: &SentimentDigest,
        format: ReportFormat,
        path: &Path,
    ) -> Result<(), ReportError> {
        let content = Self::generate(digest, format)?;
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }

    fn to_text(digest: &SentimentDigest, generated: DateTime<Utc>) -> Result<String, ReportError> {
        let mut out = String::new();

        writeln!(out, "{TITLE}")?;
        writeln!(out, "Generated: {}", timestamp(generated))?;
        writeln!(out)?;

        let label_width = digest
            .summaries
            .keys()
            .map(|l| display_label(l).chars().count())
            .max()
            .unwrap_or(4)
            .max(4);

        writeln!(
            out,
            "{:<label_width$}  {:>10}  {:>9}  {:>10}  {:>7}",
            "post", "positive %", "neutral %", "negative %", "replies"
        )?;
        writeln!(out, "{}", "-".repeat(label_width + 2 + 10 + 2 + 9 + 2 + 10 + 2 + 7))?;

        for (label, summary) in &digest.summaries {
            writeln!(
                out,
                "{:<label_width$}  {:>10.1}  {:>9.1}  {:>10.1}  {:>7}",
                display_label(label),
                pct(summary.positive),
                pct(summary.neutral),
                pct(summary.negative),
                summary.reply_count
            )?;
        }

        if !digest.no_replies.is_empty() {
            writeln!(out)?;
            writeln!(out, "Insufficient data (no replies found):")?;
            for label in &digest.no_replies {
                writeln!(out, "  - {}", display_label(label))?;
            }
        }

        Ok(out)
    }

    fn to_markdown(
        digest: &SentimentDigest,
        generated: DateTime<Utc>,
    ) -> Result<String, ReportError> {
        let mut md = String::new();

        writeln!(md, "# {TITLE}\n")?;
        writeln!(md, "Generated: {}\n", timestamp(generated))?;

        writeln!(md, "| Post | Positive % | Neutral % | Negative % | Replies |")?;
        writeln!(md, "|------|-----------:|----------:|-----------:|--------:|")?;
        for (label, summary) in &digest.summaries {
            writeln!(
                md,
                "| {} | {:.1} | {:.1} | {:.1} | {} |",
                escape_pipes(&display_label(label)),
                pct(summary.positive),
                pct(summary.neutral),
                pct(summary.negative),
                summary.reply_count
            )?;
        }

        if !digest.no_replies.is_empty() {
            writeln!(md, "\n## Insufficient data\n")?;
            writeln!(md, "No replies were found for these posts:\n")?;
            for label in &digest.no_replies {
                writeln!(md, "- {}", escape_pipes(&display_label(label)))?;
            }
        }

        Ok(md)
    }

    fn to_html(digest: &SentimentDigest, generated: DateTime<Utc>) -> Result<String, ReportError> {
        let mut html = String::new();

        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"utf-8\">")?;
        writeln!(html, "<title>{TITLE}</title>")?;
        writeln!(
            html,
            "<style>table{{border-collapse:collapse}}th,td{{border:1px solid #999;padding:4px 8px}}td.num{{text-align:right}}</style>"
        )?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<h1>{TITLE}</h1>")?;
        writeln!(html, "<p>Generated: {}</p>", timestamp(generated))?;

        writeln!(html, "<table>")?;
        writeln!(
            html,
            "<tr><th>Post</th><th>Positive %</th><th>Neutral %</th><th>Negative %</th><th>Replies</th></tr>"
        )?;
        for (label, summary) in &digest.summaries {
            writeln!(html, "{}", summary_row(label, summary))?;
        }
        writeln!(html, "</table>")?;

        if !digest.no_replies.is_empty() {
            writeln!(html, "<h2>Insufficient data</h2>")?;
            writeln!(html, "<p>No replies were found for these posts:</p>")?;
            writeln!(html, "<ul>")?;
            for label in &digest.no_replies {
                writeln!(html, "<li>{}</li>", escape_html(&display_label(label)))?;
            }
            writeln!(html, "</ul>")?;
        }

        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;

        Ok(html)
    }
}

fn summary_row(label: &str, summary: &PostSentimentSummary) -> String {
    format!(
        "<tr><td>{}</td><td class=\"num\">{:.1}</td><td class=\"num\">{:.1}</td><td class=\"num\">{:.1}</td><td class=\"num\">{}</td></tr>",
        escape_html(&display_label(label)),
        pct(summary.positive),
        pct(summary.neutral),
        pct(summary.negative),
        summary.reply_count
    )
}

/// Average proportion to a 0–100 percentage.
fn pct(proportion: f64) -> f64 {
    proportion * 100.0
}

fn timestamp(generated: DateTime<Utc>) -> String {
    generated.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Truncate long labels for display; the digest keeps the full label.
fn display_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let truncated: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{truncated}…")
    }
}

fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
