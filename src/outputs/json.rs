//! JSON snapshot of a run for downstream tooling.
//!
//! # Output Structure
//!
//! Files are organized by date, named after the window and generation time:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 2d_0907.json
//!     └── 7d_1830.json
//! ```

use crate::aggregator::RunReport;
use crate::models::RunParams;
use crate::sentiment::TaggedArticle;
use crate::view::SentimentSummary;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialized form of one run's effective view.
#[derive(Debug, Serialize)]
pub struct Snapshot<'r, 'a> {
    pub generated_at: String,
    pub params: RunParams,
    pub summary: &'r SentimentSummary,
    pub report: &'r RunReport,
    pub articles: &'r [TaggedArticle<'a>],
}

/// Relative path of a snapshot generated at `at` for `window_days`.
pub fn snapshot_path(window_days: u32, at: &DateTime<Local>) -> PathBuf {
    Path::new(&at.format("%Y-%m-%d").to_string()).join(format!("{}d_{}.json", window_days, at.format("%H%M")))
}

/// Write a [`Snapshot`] below `json_output_dir`, creating the date directory.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_snapshot(
    snapshot: &Snapshot<'_, '_>,
    json_output_dir: &Path,
    at: &DateTime<Local>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let path = json_output_dir.join(snapshot_path(snapshot.params.window_days(), at));

    if let Some(parent) = path.parent() {
        info!(dir = %parent.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON snapshot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;
    use crate::sentiment::SentimentLabel;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_path() {
        let at = Local.with_ymd_and_hms(2025, 5, 6, 18, 30, 0).unwrap();
        assert_eq!(snapshot_path(7, &at), Path::new("2025-05-06").join("7d_1830.json"));
    }

    #[test]
    fn test_snapshot_serialization() {
        let article = Article {
            title: "Metro opens".into(),
            description: "great progress".into(),
            url: "https://example.in/m".into(),
            publisher: "Mint".into(),
            published_at: "Tue, 06 May 2025".into(),
            matched_query: "urban transport".into(),
            language_label: "English".into(),
        };
        let rows = vec![TaggedArticle {
            article: &article,
            polarity: Some(0.4),
            sentiment: SentimentLabel::Positive,
        }];
        let summary = SentimentSummary::from_tagged(&rows);
        let report = RunReport::default();
        let snapshot = Snapshot {
            generated_at: "2025-05-06T18:30:00+05:30".into(),
            params: RunParams::default(),
            summary: &summary,
            report: &report,
            articles: &rows,
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["params"]["window_days"], 2);
        assert_eq!(value["summary"]["positive"], 1);
        assert_eq!(value["articles"][0]["title"], "Metro opens");
        assert_eq!(value["articles"][0]["matched_query"], "urban transport");
        assert_eq!(value["articles"][0]["sentiment"], "Positive");
        assert_eq!(value["articles"][0]["polarity"], 0.4);
    }
}
