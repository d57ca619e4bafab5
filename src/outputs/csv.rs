//! CSV export of the effective view.
//!
//! The file is UTF-8 with a byte-order mark (so spreadsheet tools pick the
//! right encoding for Hindi and Marathi text) and has exactly these columns:
//!
//! ```text
//! Title, Source, Published, Language, Matched Query, Description, URL, Sentiment
//! ```
//!
//! Files are named `<prefix>_<N>d_<YYYYMMDD_HHMM>.csv`.

use crate::sentiment::TaggedArticle;
use chrono::{DateTime, TimeZone};
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const HEADERS: [&str; 8] = [
    "Title",
    "Source",
    "Published",
    "Language",
    "Matched Query",
    "Description",
    "URL",
    "Sentiment",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Export filename for a run over `window_days`, stamped with `at`.
pub fn export_filename<Tz>(prefix: &str, window_days: u32, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}_{}d_{}.csv", prefix, window_days, at.format("%Y%m%d_%H%M"))
}

/// Encode rows, in order, as BOM-prefixed CSV.
pub fn to_csv_bytes(rows: &[TaggedArticle<'_>]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = ::csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(HEADERS)?;
    for row in rows {
        let a = row.article;
        writer.write_record([
            a.title.as_str(),
            a.publisher.as_str(),
            a.published_at.as_str(),
            a.language_label.as_str(),
            a.matched_query.as_str(),
            a.description.as_str(),
            a.url.as_str(),
            row.sentiment.as_str(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(bytes)
}

/// Write the CSV into `dir` and return the path written.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), rows = rows.len()))]
pub async fn write_csv(rows: &[TaggedArticle<'_>], dir: &Path, filename: &str) -> Result<PathBuf, Box<dyn Error>> {
    let bytes = to_csv_bytes(rows)?;
    let path = dir.join(filename);
    fs::write(&path, bytes).await?;
    info!(path = %path.display(), "Wrote CSV export");
    Ok(path)
}
