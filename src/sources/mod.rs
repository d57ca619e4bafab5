//! News retrieval backends.
//!
//! A backend answers one [`FetchRequest`] (query, language, country, window,
//! result cap) with zero or more [`RawArticle`]s, or fails with a
//! [`FetchError`]. Backends make exactly one attempt per request; the
//! aggregator decides what to do with failures.
//!
//! # Supported Backends
//!
//! | Backend | Module | Method |
//! |---------|--------|--------|
//! | Google News | [`google_news`] | RSS search feed |

pub mod google_news;

use crate::models::RawArticle;
use thiserror::Error;

/// One cell of the query × language matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: String,
    pub language_code: String,
    pub country_code: String,
    pub window_days: u32,
    pub max_results: u32,
}

/// A single request against the backend failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status}")]
    Status { status: u16 },

    #[error("malformed feed: {0}")]
    Parse(String),

    #[error("{0}")]
    Backend(String),
}

/// A news retrieval capability.
pub trait ArticleSource {
    /// Fetch raw records for one request. No retries.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawArticle>, FetchError>;
}
