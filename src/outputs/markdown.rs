//! Markdown rendering of a run's results.
//!
//! The report has four parts:
//! 1. A results table (title linked when a URL is present, sentiment marked
//!    with a coloured dot)
//! 2. Counts per sentiment category plus the total
//! 3. A proportion chart over the four categories, drawn with text bars
//! 4. Per-cell fetch warnings, if any

use crate::aggregator::RunReport;
use crate::models::RunParams;
use crate::sentiment::{SentimentLabel, TaggedArticle};
use crate::utils::truncate_chars;
use crate::view::SentimentSummary;

const BAR_WIDTH: usize = 30;
const DESCRIPTION_CHARS: usize = 160;

pub const EMPTY_NOTICE: &str = "No articles found for the selected filters.";
pub const IDLE_NOTICE: &str = "Select a day range and run a fetch.";

/// Everything the report needs to describe one run.
pub struct ReportInput<'r, 'a> {
    pub params: RunParams,
    pub has_fetched: bool,
    pub rows: &'r [TaggedArticle<'a>],
    pub summary: &'r SentimentSummary,
    pub report: Option<&'r RunReport>,
}

fn marker(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "🟢",
        SentimentLabel::Neutral => "⚪",
        SentimentLabel::Negative => "🔴",
        SentimentLabel::Non => "🔘",
    }
}

fn category_caption(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "Positive (EN)",
        SentimentLabel::Neutral => "Neutral (EN)",
        SentimentLabel::Negative => "Negative (EN)",
        SentimentLabel::Non => "Non (HI/MR)",
    }
}

/// Make text safe inside a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}

fn title_cell(row: &TaggedArticle<'_>) -> String {
    let title = cell(&row.article.title).replace('[', "\\[").replace(']', "\\]");
    if row.article.url.is_empty() {
        title
    } else {
        format!("[{}](<{}>)", title, link_target(&row.article.url))
    }
}

/// Percent-encode the characters that would end an angle-bracket link
/// target or break the table row.
fn link_target(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '|' => out.push_str("%7C"),
            ' ' => out.push_str("%20"),
            '\r' | '\n' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Text bar for a share in `[0, 1]`.
pub fn bar(share: f64) -> String {
    let filled = (share.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Render the full report.
pub fn render_report(input: &ReportInput<'_, '_>) -> String {
    let mut md = String::from("# News Search and Analysis\n\n");

    if !input.has_fetched {
        md.push_str(IDLE_NOTICE);
        md.push('\n');
        return md;
    }

    if input.rows.is_empty() {
        md.push_str(EMPTY_NOTICE);
        md.push('\n');
        push_warnings(&mut md, input.report);
        return md;
    }

    md.push_str(&format!(
        "Showing {} articles (past {} days).\n\n",
        input.rows.len(),
        input.params.window_days()
    ));

    md.push_str("## Search Results\n\n");
    md.push_str("| Title | Source | Published | Language | Matched Query | Description | Sentiment |\n");
    md.push_str("|---|---|---|---|---|---|---|\n");
    for row in input.rows {
        let a = row.article;
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} {} |\n",
            title_cell(row),
            cell(&a.publisher),
            cell(&a.published_at),
            cell(&a.language_label),
            cell(&a.matched_query),
            cell(&truncate_chars(&a.description, DESCRIPTION_CHARS)),
            marker(row.sentiment),
            row.sentiment
        ));
    }

    md.push_str("\n## Overall Tone Summary\n\n");
    md.push_str("| Category | Articles |\n|---|---:|\n");
    for label in SentimentLabel::ALL {
        md.push_str(&format!(
            "| {} {} | {} |\n",
            marker(label),
            category_caption(label),
            input.summary.count(label)
        ));
    }
    md.push_str(&format!("| Total Articles | {} |\n", input.summary.total()));

    md.push_str("\n## Overall Sentiment Distribution\n\n```text\n");
    for (label, share) in input.summary.proportions() {
        md.push_str(&format!("{:<8} {} {:>5.1}%\n", label.as_str(), bar(share), share * 100.0));
    }
    md.push_str("```\n");

    push_warnings(&mut md, input.report);
    md
}

fn push_warnings(md: &mut String, report: Option<&RunReport>) {
    let Some(report) = report.filter(|r| r.failure_count() > 0) else {
        return;
    };
    md.push_str(&format!(
        "\n## Fetch Warnings\n\n{} of {} searches failed:\n\n",
        report.failure_count(),
        report.total_steps
    ));
    for w in &report.warnings {
        md.push_str(&format!("- Failed for '{}' ({}): {}\n", w.query, w.language, w.error));
    }
}
