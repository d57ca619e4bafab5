//! Command-line interface definitions for News Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Paths can also be provided via environment variables.

use clap::Parser;

/// Command-line arguments for the News Digest application.
///
/// Each invocation is one run: the aggregation state starts empty, the full
/// query × language matrix is fetched, and the filtered result is reported
/// and exported.
///
/// # Examples
///
/// ```sh
/// # Past two days, ten results per query and language
/// news_digest
///
/// # Past week, only two publishers, no CSV file
/// news_digest --days 7 --source "The Hindu" --source "Mint" --no-export
///
/// # Custom catalog and a JSON snapshot
/// news_digest --config catalog.yaml --json-output-dir ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Day range: only articles from the past N days (1-30)
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub days: u32,

    /// Max results per query, per language (5-30, step 5)
    #[arg(short = 'n', long, default_value_t = 10, value_parser = parse_max_results)]
    pub max_results: u32,

    /// Only show and export articles from these publishers (repeatable)
    #[arg(short, long = "source", value_name = "PUBLISHER")]
    pub sources: Vec<String>,

    /// Optional path to a YAML query catalog
    #[arg(short, long, env = "NEWS_DIGEST_CONFIG")]
    pub config: Option<String>,

    /// Directory the CSV export is written to
    #[arg(short, long, env = "NEWS_DIGEST_EXPORT_DIR", default_value = ".")]
    pub export_dir: String,

    /// Skip writing the CSV export
    #[arg(long)]
    pub no_export: bool,

    /// Write the Markdown report to this file instead of stdout
    #[arg(short, long)]
    pub markdown_output: Option<String>,

    /// Also write a JSON snapshot below this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Print the publishers found by the run (sorted) and exit
    #[arg(long)]
    pub list_sources: bool,

    /// Number of searches kept in flight at once
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=8))]
    pub concurrency: u32,

    /// Disable the politeness pause between searches
    #[arg(long)]
    pub no_delay: bool,
}

fn parse_max_results(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|e| format!("{e}"))?;
    if (5..=30).contains(&n) && n % 5 == 0 {
        Ok(n)
    } else {
        Err(format!("{n} is not one of 5, 10, 15, 20, 25, 30"))
    }
}
