//! Data models for raw backend records and their normalized representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: A loosely-typed record as returned by a news backend
//! - [`RawPublisher`]: The publisher field, which arrives either as a plain name
//!   or as a nested structure
//! - [`Article`]: A normalized record with its provenance (query and language)
//! - [`RunParams`]: The validated window and result cap for one run
//!
//! Raw records are never trusted. Every field may be absent, empty or of the
//! wrong scalar type; normalization turns all of that into plain strings.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Separator used when building dedup keys (ASCII unit separator).
pub const KEY_SEPARATOR: char = '\u{1f}';

/// A raw article record as produced by a news backend.
///
/// Deserialization is lenient: missing fields become `None` and numeric or
/// boolean scalars are coerced to their textual form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawArticle {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default)]
    pub publisher: Option<RawPublisher>,
    #[serde(
        default,
        rename = "published date",
        deserialize_with = "lenient_string"
    )]
    pub published_date: Option<String>,
}

/// The publisher field of a raw record.
///
/// Some backends return a bare name, others a nested object with `title`
/// and/or `name` (plus fields we ignore, such as `href`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RawPublisher {
    PlainName(String),
    Structured {
        #[serde(default, deserialize_with = "lenient_string")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        name: Option<String>,
    },
    Other(serde_json::Value),
}

impl RawPublisher {
    /// Collapse the variant into a single display string.
    ///
    /// Structured publishers prefer a non-empty `title`, then a non-empty
    /// `name`, and otherwise yield an empty string.
    pub fn display_name(&self) -> String {
        match self {
            RawPublisher::PlainName(name) => name.clone(),
            RawPublisher::Structured { title, name } => title
                .as_deref()
                .filter(|t| !t.is_empty())
                .or(name.as_deref().filter(|n| !n.is_empty()))
                .unwrap_or_default()
                .to_string(),
            RawPublisher::Other(serde_json::Value::Null) => String::new(),
            RawPublisher::Other(serde_json::Value::String(s)) => s.clone(),
            RawPublisher::Other(value) => value.to_string(),
        }
    }
}

/// Accept strings, numbers, booleans or null; anything else is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A normalized article with the query and language that produced it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub publisher: String,
    /// Raw textual timestamp as the backend returned it; never parsed.
    pub published_at: String,
    pub matched_query: String,
    pub language_label: String,
}

impl Article {
    /// Normalize a raw record.
    ///
    /// Returns `None` when the title is empty after trimming; such records
    /// are never admitted regardless of their other fields.
    pub fn from_raw(raw: &RawArticle, matched_query: &str, language_label: &str) -> Option<Self> {
        let title = trimmed(raw.title.as_deref());
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title,
            description: trimmed(raw.description.as_deref()),
            url: trimmed(raw.url.as_deref()),
            publisher: raw
                .publisher
                .as_ref()
                .map(RawPublisher::display_name)
                .unwrap_or_default(),
            published_at: raw.published_date.clone().unwrap_or_default(),
            matched_query: matched_query.to_string(),
            language_label: language_label.to_string(),
        })
    }

    /// Identity of an article for deduplication: title, publisher and url.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.title,
            self.publisher,
            self.url,
            sep = KEY_SEPARATOR
        )
    }

    /// Text handed to the polarity scorer.
    pub fn scoring_text(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }
}

fn trimmed(s: Option<&str>) -> String {
    s.map(str::trim).unwrap_or_default().to_string()
}

/// Run parameters failed validation.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("window of {0} days is outside 1..=30")]
    WindowDays(u32),
    #[error("max results {0} must be a multiple of 5 within 5..=30")]
    MaxResults(u32),
}

/// Validated parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunParams {
    window_days: u32,
    max_results: u32,
}

impl RunParams {
    pub const DEFAULT_WINDOW_DAYS: u32 = 2;
    pub const DEFAULT_MAX_RESULTS: u32 = 10;

    pub fn new(window_days: u32, max_results: u32) -> Result<Self, ParamError> {
        if !(1..=30).contains(&window_days) {
            return Err(ParamError::WindowDays(window_days));
        }
        if !(5..=30).contains(&max_results) || max_results % 5 != 0 {
            return Err(ParamError::MaxResults(max_results));
        }
        Ok(Self {
            window_days,
            max_results,
        })
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            window_days: Self::DEFAULT_WINDOW_DAYS,
            max_results: Self::DEFAULT_MAX_RESULTS,
        }
    }
}
