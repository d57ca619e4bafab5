//! Query catalog: the fixed topics, language variants and country scope.
//!
//! The built-in catalog covers urban-development topics for India in
//! English, Hindi and Marathi. A YAML file can override any part of it:
//!
//! ```yaml
//! queries:
//!   - urban development
//!   - affordable housing
//! languages:
//!   - { label: English, code: en }
//!   - { label: Hindi, code: hi }
//! country: IN
//! export_prefix: housing_news
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

pub const DEFAULT_QUERIES: &[&str] = &[
    "urban development",
    "city planning",
    "slum rehabilitation",
    "informal settlements",
    "affordable housing",
    "urban transport",
    "public transport",
    "transit oriented development",
    "infrastructure development India",
    "smart cities mission",
    "industrial corridor",
    "MOHUA",
    "15 minute city",
    "mixed use development",
    "urban logistics",
    "smart mobility",
    "sustainable cities",
    "climate resilient cities",
    "urban heat island",
    "Urban inequality",
    "Housing right",
];

pub const DEFAULT_LANGUAGES: &[(&str, &str)] = &[("English", "en"), ("Hindi", "hi"), ("Marathi", "mr")];

pub const DEFAULT_COUNTRY: &str = "IN";

pub const DEFAULT_EXPORT_PREFIX: &str = "dharavi_news";

/// A (display label, retrieval code) pair a topic is searched under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageVariant {
    pub label: String,
    pub code: String,
}

impl LanguageVariant {
    pub fn new(label: &str, code: &str) -> Self {
        Self {
            label: label.to_string(),
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("catalog has no queries")]
    NoQueries,
    #[error("catalog has no languages")]
    NoLanguages,
}

/// Topics × languages for one country.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryCatalog {
    pub queries: Vec<String>,
    pub languages: Vec<LanguageVariant>,
    pub country: String,
    pub export_prefix: String,
}

impl Default for QueryCatalog {
    fn default() -> Self {
        Self {
            queries: DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect(),
            languages: DEFAULT_LANGUAGES
                .iter()
                .map(|(label, code)| LanguageVariant::new(label, code))
                .collect(),
            country: DEFAULT_COUNTRY.to_string(),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }
}

impl QueryCatalog {
    /// Parse a YAML catalog; keys absent from the document keep their defaults.
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self, CatalogError> {
        let catalog: QueryCatalog =
            serde_yaml::from_str(yaml).map_err(|source| CatalogError::Parse {
                path: path.to_string(),
                source,
            })?;
        catalog.validate()
    }

    fn validate(mut self) -> Result<Self, CatalogError> {
        self.queries.retain(|q| !q.trim().is_empty());
        if self.queries.is_empty() {
            return Err(CatalogError::NoQueries);
        }
        if self.languages.is_empty() {
            return Err(CatalogError::NoLanguages);
        }
        Ok(self)
    }

    /// Number of fetch attempts in a full run.
    pub fn total_steps(&self) -> usize {
        self.queries.len() * self.languages.len()
    }

    /// Topic-major, language-minor traversal of the matrix.
    pub fn plan(&self) -> impl Iterator<Item = (&str, &LanguageVariant)> {
        self.queries
            .iter()
            .flat_map(move |q| self.languages.iter().map(move |l| (q.as_str(), l)))
    }
}

/// Load the catalog from `path`, or fall back to the built-in one.
#[instrument(level = "info")]
pub async fn load_catalog(path: Option<&str>) -> Result<QueryCatalog, CatalogError> {
    let Some(path) = path else {
        info!("Using built-in query catalog");
        return Ok(QueryCatalog::default());
    };
    let yaml = tokio::fs::read_to_string(Path::new(path))
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_string(),
            source,
        })?;
    let catalog = QueryCatalog::from_yaml(&yaml, path)?;
    info!(
        path,
        queries = catalog.queries.len(),
        languages = catalog.languages.len(),
        country = %catalog.country,
        "Loaded query catalog"
    );
    Ok(catalog)
}
