//! # News Digest
//!
//! Runs a fixed catalog of topic queries against Google News in several
//! languages, merges the results into one deduplicated collection, tags
//! English articles with a sentiment label, and reports and exports the
//! merged set.
//!
//! ## Usage
//!
//! ```sh
//! news_digest --days 7 --max-results 20 --export-dir ./exports
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: One search per topic × language, one attempt each
//! 2. **Aggregation**: Normalize, drop blank titles, deduplicate by
//!    title/publisher/url with first-seen-wins
//! 3. **Tagging**: Score English articles; everything else is `Non`
//! 4. **Output**: Markdown report, CSV export and optional JSON snapshot

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod models;
mod outputs;
mod pacing;
mod sentiment;
mod sources;
mod utils;
mod view;

use aggregator::{AggregationState, Aggregator};
use cli::Cli;
use models::RunParams;
use outputs::json::Snapshot;
use outputs::markdown::ReportInput;
use outputs::{csv, json, markdown};
use pacing::{JitterPacing, NoPacing, Pacing};
use sentiment::{LexiconScorer, SentimentTagger};
use sources::google_news::GoogleNewsSource;
use utils::ensure_writable_dir;
use view::{PublisherFilter, SentimentSummary, sorted_publishers};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let params = RunParams::new(args.days, args.max_results)?;
    let catalog = config::load_catalog(args.config.as_deref()).await?;

    // Early check: ensure export dir is writable
    if !args.no_export && !args.list_sources {
        if let Err(e) = ensure_writable_dir(Path::new(&args.export_dir)).await {
            error!(
                path = %args.export_dir,
                error = %e,
                "Export directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Fetch and aggregate ----
    let source = GoogleNewsSource::new()?;
    let pacing: Box<dyn Pacing> = if args.no_delay {
        Box::new(NoPacing)
    } else {
        Box::new(JitterPacing::default())
    };

    let mut state = AggregationState::new();
    let report = Aggregator::new(&catalog, &source, pacing.as_ref())
        .with_concurrency(args.concurrency as usize)
        .run(&mut state, params, |p| {
            info!(
                step = p.step,
                total = p.total,
                percent = (p.fraction() * 100.0).round() as u64,
                "[{}/{}] {}: {}",
                p.step,
                p.total,
                p.language,
                p.query
            );
        })
        .await;

    for w in &report.warnings {
        warn!(query = %w.query, language = %w.language, error = %w.error, "Failed for query");
    }
    if state.is_empty() {
        warn!("Run produced no articles");
    }
    info!(
        articles = state.len(),
        publishers = state.publishers().len(),
        failed = report.failure_count(),
        attempted = report.attempted,
        "Aggregation complete"
    );

    if args.list_sources {
        for publisher in sorted_publishers(state.publishers()) {
            println!("{publisher}");
        }
        return Ok(());
    }

    // ---- Filter and tag ----
    let filter = PublisherFilter::new(args.sources.iter().cloned());
    if !filter.is_empty() {
        info!(selected = args.sources.len(), "Applying publisher filter");
    }
    for unknown in filter.unknown(state.publishers()) {
        warn!(publisher = unknown, "Selected publisher not present in results");
    }
    let view = filter.apply(state.articles());
    let tagger = SentimentTagger::new(LexiconScorer::new());
    let rows = tagger.tag(&view);
    let summary = SentimentSummary::from_tagged(&rows);
    info!(
        shown = rows.len(),
        positive = summary.positive,
        neutral = summary.neutral,
        negative = summary.negative,
        non = summary.non,
        "Tagged effective view"
    );

    // ---- Markdown report ----
    let md = markdown::render_report(&ReportInput {
        params,
        has_fetched: state.has_fetched(),
        rows: &rows,
        summary: &summary,
        report: Some(&report),
    });
    match &args.markdown_output {
        Some(path) => {
            if let Err(e) = tokio::fs::write(path, &md).await {
                error!(%path, error = %e, "Failed writing Markdown");
            } else {
                info!(%path, "Wrote Markdown report");
            }
        }
        None => println!("{md}"),
    }

    let generated_at = Local::now();

    // ---- CSV export ----
    if rows.is_empty() {
        info!("Nothing to export");
    } else if !args.no_export {
        let filename = csv::export_filename(&catalog.export_prefix, params.window_days(), &generated_at);
        if let Err(e) = csv::write_csv(&rows, Path::new(&args.export_dir), &filename).await {
            error!(error = %e, "Failed to write CSV export");
        }
    }

    // ---- JSON snapshot ----
    if let Some(ref dir) = args.json_output_dir {
        let snapshot = Snapshot {
            generated_at: generated_at.to_rfc3339(),
            params,
            summary: &summary,
            report: &report,
            articles: &rows,
        };
        if let Err(e) = json::write_snapshot(&snapshot, Path::new(dir), &generated_at).await {
            error!(error = %e, "Failed to write JSON snapshot");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
