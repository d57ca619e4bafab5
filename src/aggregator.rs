//! Run driver: fetch the full query × language matrix, normalize, deduplicate.
//!
//! # Algorithm
//!
//! 1. Reset the [`AggregationState`] and mark it as fetched
//! 2. Walk the catalog topic-major, language-minor; fetch each cell once
//! 3. Normalize each record, drop blank titles and already-seen keys
//! 4. Record failures as warnings and keep going
//! 5. Run a safety-net sweep over `(title, publisher, url)`
//!
//! With `concurrency > 1` requests overlap, but responses are consumed in
//! plan order, so the resulting sequence is identical to a sequential run.
//! The pacing delay still separates consecutive request starts.

use crate::config::{LanguageVariant, QueryCatalog};
use crate::models::{Article, RawArticle, RunParams};
use crate::pacing::Pacing;
use crate::sources::{ArticleSource, FetchError, FetchRequest};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;
use std::pin::pin;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Articles accumulated by a run.
///
/// `seen_keys` always equals the set of dedup keys of `articles`, and
/// `publishers` always lists the distinct non-empty publishers of `articles`
/// in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct AggregationState {
    articles: Vec<Article>,
    seen_keys: HashSet<String>,
    publishers: Vec<String>,
    has_fetched: bool,
}

/// Outcome counts of ingesting one batch of raw records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub accepted: usize,
    pub duplicates: usize,
    pub blank_titles: usize,
}

impl IngestStats {
    fn absorb(&mut self, other: IngestStats) {
        self.accepted += other.accepted;
        self.duplicates += other.duplicates;
        self.blank_titles += other.blank_titles;
    }
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything, including the fetched flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start a fresh run: empty state, fetched flag set.
    pub fn begin_run(&mut self) {
        self.reset();
        self.has_fetched = true;
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn publishers(&self) -> &[String] {
        &self.publishers
    }

    pub fn has_fetched(&self) -> bool {
        self.has_fetched
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    #[cfg(test)]
    fn contains_key(&self, key: &str) -> bool {
        self.seen_keys.contains(key)
    }

    /// Normalize and admit a batch of raw records produced by `query` in
    /// `language_label`. The first record for a key wins.
    pub fn ingest(&mut self, records: &[RawArticle], query: &str, language_label: &str) -> IngestStats {
        let mut stats = IngestStats::default();
        for raw in records {
            let Some(article) = Article::from_raw(raw, query, language_label) else {
                stats.blank_titles += 1;
                continue;
            };
            if self.admit(article) {
                stats.accepted += 1;
            } else {
                stats.duplicates += 1;
            }
        }
        stats
    }

    fn admit(&mut self, article: Article) -> bool {
        if !self.seen_keys.insert(article.dedup_key()) {
            return false;
        }
        self.register_publisher(&article.publisher);
        self.articles.push(article);
        true
    }

    fn register_publisher(&mut self, publisher: &str) {
        if !publisher.is_empty() && !self.publishers.iter().any(|p| p == publisher) {
            self.publishers.push(publisher.to_string());
        }
    }

    /// Remove residual duplicates by `(title, publisher, url)`, keeping the
    /// first occurrence, and rebuild the derived sets. Returns how many
    /// articles were removed; idempotent.
    pub fn sweep_duplicates(&mut self) -> usize {
        let before = self.articles.len();
        let articles: Vec<Article> = std::mem::take(&mut self.articles)
            .into_iter()
            .unique_by(|a| (a.title.clone(), a.publisher.clone(), a.url.clone()))
            .collect();

        self.seen_keys = articles.iter().map(Article::dedup_key).collect();
        self.publishers.clear();
        for article in &articles {
            self.register_publisher(&article.publisher);
        }
        self.articles = articles;
        before - self.articles.len()
    }
}

/// Progress after one matrix cell has been attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    /// 1-based index of the attempt just finished.
    pub step: usize,
    pub total: usize,
    pub query: String,
    pub language: String,
}

impl RunProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.step as f64 / self.total as f64
        }
    }
}

/// A non-fatal failure of one query × language cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchWarning {
    pub query: String,
    pub language: String,
    pub error: String,
}

/// Summary of a completed run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunReport {
    pub total_steps: usize,
    pub attempted: usize,
    pub ingest: IngestStats,
    pub swept: usize,
    pub warnings: Vec<FetchWarning>,
}

impl RunReport {
    pub fn failure_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Drives a run over a [`QueryCatalog`] against an [`ArticleSource`].
pub struct Aggregator<'a, S, P: ?Sized> {
    catalog: &'a QueryCatalog,
    source: &'a S,
    pacing: &'a P,
    concurrency: usize,
}

impl<'a, S, P> Aggregator<'a, S, P>
where
    S: ArticleSource,
    P: Pacing + ?Sized,
{
    pub fn new(catalog: &'a QueryCatalog, source: &'a S, pacing: &'a P) -> Self {
        Self {
            catalog,
            source,
            pacing,
            concurrency: 1,
        }
    }

    /// Number of requests kept in flight; clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Execute a full run, replacing whatever `state` held before.
    ///
    /// `on_progress` is called once per matrix cell, after its attempt.
    #[instrument(level = "info", skip_all, fields(window_days = params.window_days(), max_results = params.max_results()))]
    pub async fn run<F>(&self, state: &mut AggregationState, params: RunParams, mut on_progress: F) -> RunReport
    where
        F: FnMut(&RunProgress),
    {
        let t0 = Instant::now();
        state.begin_run();

        let total = self.catalog.total_steps();
        let mut report = RunReport {
            total_steps: total,
            ..RunReport::default()
        };
        info!(total, concurrency = self.concurrency, "Starting run");

        // Pacing runs ahead of `buffered`, so start times stay spaced even
        // when several requests are in flight.
        let pacing = self.pacing;
        let mut attempts = pin!(
            stream::iter(self.catalog.plan().enumerate())
                .then(move |(attempt, cell)| async move {
                    let delay = pacing.delay(attempt);
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                    cell
                })
                .map(|(query, language)| self.attempt(query, language, params))
                .buffered(self.concurrency)
        );

        while let Some((query, language, result)) = attempts.next().await {
            report.attempted += 1;
            match result {
                Ok(records) => {
                    let stats = state.ingest(&records, query, &language.label);
                    debug!(
                        query,
                        language = %language.label,
                        received = records.len(),
                        accepted = stats.accepted,
                        duplicates = stats.duplicates,
                        blank_titles = stats.blank_titles,
                        "Ingested batch"
                    );
                    report.ingest.absorb(stats);
                }
                Err(e) => {
                    warn!(query, language = %language.label, error = %e, "Fetch failed; continuing");
                    report.warnings.push(FetchWarning {
                        query: query.to_string(),
                        language: language.label.clone(),
                        error: e.to_string(),
                    });
                }
            }
            on_progress(&RunProgress {
                step: report.attempted,
                total,
                query: query.to_string(),
                language: language.label.clone(),
            });
        }

        report.swept = state.sweep_duplicates();
        if report.swept > 0 {
            warn!(removed = report.swept, "Safety-net sweep removed residual duplicates");
        }

        let elapsed = t0.elapsed();
        info!(
            articles = state.len(),
            publishers = state.publishers().len(),
            failures = report.failure_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Run complete"
        );
        report
    }

    async fn attempt<'q>(
        &self,
        query: &'q str,
        language: &'q LanguageVariant,
        params: RunParams,
    ) -> (&'q str, &'q LanguageVariant, Result<Vec<RawArticle>, FetchError>) {
        let request = FetchRequest {
            query: query.to_string(),
            language_code: language.code.clone(),
            country_code: self.catalog.country.clone(),
            window_days: params.window_days(),
            max_results: params.max_results(),
        };
        let result = self.source.fetch(&request).await;
        (query, language, result)
    }
}
