//! Publisher filtering and sentiment summaries over the aggregated articles.

use crate::models::Article;
use crate::sentiment::{SentimentLabel, TaggedArticle};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;

/// A set of chosen publishers; empty means "show everything".
#[derive(Debug, Clone, Default)]
pub struct PublisherFilter {
    selected: HashSet<String>,
}

impl PublisherFilter {
    pub fn new<I, T>(publishers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            selected: publishers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The effective view, in the original article order.
    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles
            .iter()
            .filter(|a| self.selected.is_empty() || self.selected.contains(&a.publisher))
            .collect()
    }

    /// Chosen publishers that no article carries.
    pub fn unknown<'s>(&'s self, known: &[String]) -> Vec<&'s str> {
        self.selected
            .iter()
            .filter(|s| !known.contains(*s))
            .map(String::as_str)
            .sorted()
            .collect()
    }
}

/// Publisher names sorted for display.
pub fn sorted_publishers(publishers: &[String]) -> Vec<&str> {
    publishers.iter().map(String::as_str).sorted().collect()
}

/// Per-category counts over a tagged view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub non: usize,
}

impl SentimentSummary {
    pub fn from_tagged(tagged: &[TaggedArticle<'_>]) -> Self {
        let mut counts = [0usize; 4];
        for t in tagged {
            counts[t.sentiment.index()] += 1;
        }
        let [positive, neutral, negative, non] = counts;
        Self {
            positive,
            neutral,
            negative,
            non,
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Non => self.non,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative + self.non
    }

    /// Share of each category, in [`SentimentLabel::ALL`] order; all zero for an empty view.
    pub fn proportions(&self) -> [(SentimentLabel, f64); 4] {
        let total = self.total();
        SentimentLabel::ALL.map(|label| {
            let share = if total == 0 {
                0.0
            } else {
                self.count(label) as f64 / total as f64
            };
            (label, share)
        })
    }
}
