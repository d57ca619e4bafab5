//! Sentiment tagging for English articles.
//!
//! - [`PolarityScorer`]: Capability returning a polarity in `[-1, 1]` for text
//! - [`LexiconScorer`]: Rule-based scorer over a built-in English lexicon
//! - [`SentimentTagger`]: Applies a scorer to a view of articles
//!
//! Only articles whose language label is `"English"` are scored. Everything
//! else is labelled [`SentimentLabel::Non`] and the scorer is never consulted.

use crate::models::Article;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Language label whose articles get scored.
pub const SCORED_LANGUAGE: &str = "English";

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("valid regex"));

/// Sentiment category of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Non,
}

impl SentimentLabel {
    /// All categories, in display order.
    pub const ALL: [SentimentLabel; 4] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
        SentimentLabel::Non,
    ];

    /// Sign rule: above zero is positive, below is negative, zero is neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Non => "Non",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            SentimentLabel::Positive => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Negative => 2,
            SentimentLabel::Non => 3,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity-scoring capability.
pub trait PolarityScorer {
    /// Score `text`; implementations must return a value in `[-1, 1]`.
    fn score(&self, text: &str) -> f64;
}

impl<T: PolarityScorer + ?Sized> PolarityScorer for &T {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}

/// An article with its derived sentiment. Never stored back into the state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedArticle<'a> {
    #[serde(flatten)]
    pub article: &'a Article,
    pub polarity: Option<f64>,
    pub sentiment: SentimentLabel,
}

/// Applies a [`PolarityScorer`] to English articles.
pub struct SentimentTagger<S> {
    scorer: S,
}

impl<S: PolarityScorer> SentimentTagger<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn tag_one<'a>(&self, article: &'a Article) -> TaggedArticle<'a> {
        if article.language_label != SCORED_LANGUAGE {
            return TaggedArticle {
                article,
                polarity: None,
                sentiment: SentimentLabel::Non,
            };
        }
        let polarity = self.scorer.score(&article.scoring_text()).clamp(-1.0, 1.0);
        TaggedArticle {
            article,
            polarity: Some(polarity),
            sentiment: SentimentLabel::from_polarity(polarity),
        }
    }

    /// Tag every article of a view, preserving order.
    pub fn tag<'a>(&self, view: &[&'a Article]) -> Vec<TaggedArticle<'a>> {
        view.iter().map(|article| self.tag_one(article)).collect()
    }
}

/// Rule-based scorer over a small English news lexicon.
///
/// Each sentiment word contributes its polarity, scaled by a preceding
/// intensifier and multiplied by `-0.5` after a negator. The score is the
/// mean contribution, clamped to `[-1, 1]`; text without sentiment words
/// scores `0.0`.
pub struct LexiconScorer {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negations: &'static [&'static str],
}

const POSITIVE: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("positive", 0.23),
    ("progress", 0.4),
    ("success", 0.6),
    ("successful", 0.75),
    ("improve", 0.4),
    ("improved", 0.4),
    ("improvement", 0.4),
    ("growth", 0.3),
    ("boost", 0.4),
    ("benefit", 0.4),
    ("benefits", 0.4),
    ("affordable", 0.3),
    ("clean", 0.37),
    ("safe", 0.5),
    ("safer", 0.5),
    ("sustainable", 0.3),
    ("innovative", 0.5),
    ("efficient", 0.4),
    ("new", 0.14),
    ("modern", 0.2),
    ("smart", 0.21),
    ("green", 0.2),
    ("happy", 0.8),
    ("win", 0.8),
    ("wins", 0.8),
    ("welcome", 0.8),
    ("approve", 0.3),
    ("approved", 0.3),
    ("launch", 0.2),
    ("launched", 0.2),
    ("inaugurate", 0.3),
    ("inaugurated", 0.3),
    ("record", 0.2),
    ("strong", 0.43),
    ("easy", 0.43),
    ("resilient", 0.4),
    ("relief", 0.4),
    ("upgrade", 0.4),
    ("opportunity", 0.3),
    ("opportunities", 0.3),
    ("support", 0.2),
    ("historic", 0.3),
    ("landmark", 0.3),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("poor", -0.4),
    ("crisis", -0.5),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.5),
    ("delay", -0.3),
    ("delayed", -0.3),
    ("delays", -0.3),
    ("stalled", -0.4),
    ("protest", -0.3),
    ("protests", -0.3),
    ("demolition", -0.3),
    ("eviction", -0.5),
    ("evicted", -0.5),
    ("flood", -0.4),
    ("flooding", -0.4),
    ("collapse", -0.6),
    ("collapsed", -0.6),
    ("death", -0.6),
    ("dead", -0.6),
    ("killed", -0.7),
    ("accident", -0.5),
    ("pollution", -0.4),
    ("polluted", -0.4),
    ("congestion", -0.3),
    ("shortage", -0.4),
    ("unsafe", -0.5),
    ("illegal", -0.5),
    ("corruption", -0.6),
    ("scam", -0.7),
    ("inequality", -0.3),
    ("poverty", -0.4),
    ("homeless", -0.4),
    ("crowded", -0.2),
    ("overcrowded", -0.4),
    ("slow", -0.3),
    ("expensive", -0.4),
    ("costly", -0.3),
    ("risk", -0.2),
    ("threat", -0.4),
    ("damage", -0.4),
    ("damaged", -0.4),
    ("heat", -0.1),
    ("problem", -0.3),
    ("problems", -0.3),
    ("concern", -0.2),
    ("concerns", -0.2),
    ("angry", -0.5),
    ("sad", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("really", 1.2),
    ("most", 1.3),
    ("hugely", 1.4),
    ("severely", 1.4),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("fairly", 0.8),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't",
    "didn't", "won't", "can't", "cannot", "hardly",
];

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            words: POSITIVE.iter().chain(NEGATIVE).copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negations: NEGATIONS,
        }
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut total = 0.0;
        let mut matched = 0usize;
        let mut negate = false;
        let mut intensity = 1.0;

        for token in WORD.find_iter(&lowered).map(|m| m.as_str()) {
            if self.negations.contains(&token) {
                negate = true;
                continue;
            }
            if let Some(mult) = self.intensifiers.get(token) {
                intensity *= mult;
                continue;
            }
            match self.words.get(token) {
                Some(polarity) => {
                    let mut value = (polarity * intensity).clamp(-1.0, 1.0);
                    if negate {
                        value *= -0.5;
                    }
                    total += value;
                    matched += 1;
                    negate = false;
                    intensity = 1.0;
                }
                None => intensity = 1.0,
            }
        }

        if matched == 0 {
            0.0
        } else {
            (total / matched as f64).clamp(-1.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn article(title: &str, description: &str, language: &str) -> Article {
        Article {
            title: title.into(),
            description: description.into(),
            url: String::new(),
            publisher: String::new(),
            published_at: String::new(),
            matched_query: "q".into(),
            language_label: language.into(),
        }
    }

    /// Returns a fixed score and counts calls.
    struct FixedScorer {
        value: f64,
        calls: Cell<usize>,
        last_text: RefCell<String>,
    }

    impl FixedScorer {
        fn new(value: f64) -> Self {
            Self {
                value,
                calls: Cell::new(0),
                last_text: Default::default(),
            }
        }
    }

    impl PolarityScorer for FixedScorer {
        fn score(&self, text: &str) -> f64 {
            self.calls.set(self.calls.get() + 1);
            *self.last_text.borrow_mut() = text.to_string();
            self.value
        }
    }

    #[test]
    fn test_sign_rule() {
        assert_eq!(SentimentLabel::from_polarity(0.01), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(1.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(-0.01), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn test_english_articles_scored_on_title_and_description() {
        let scorer = FixedScorer::new(-0.4);
        let tagger = SentimentTagger::new(&scorer);
        let a = article("A", "great progress", "English");
        let tagged = tagger.tag_one(&a);

        assert_eq!(tagged.polarity, Some(-0.4));
        assert_eq!(tagged.sentiment, SentimentLabel::Negative);
        assert_eq!(*scorer.last_text.borrow(), "A. great progress");
    }

    #[test]
    fn test_non_english_never_consults_scorer() {
        let scorer = FixedScorer::new(0.9);
        let tagger = SentimentTagger::new(&scorer);
        let hindi = article("शहरी विकास", "", "Hindi");
        let marathi = article("नागरी विकास", "", "Marathi");
        let tagged = tagger.tag(&[&hindi, &marathi]);

        assert!(tagged.iter().all(|t| t.sentiment == SentimentLabel::Non && t.polarity.is_none()));
        assert_eq!(scorer.calls.get(), 0);
    }

    #[test]
    fn test_tagging_preserves_order_and_is_repeatable() {
        let tagger = SentimentTagger::new(LexiconScorer::new());
        let articles = [
            article("Metro is a great success", "", "English"),
            article("Bridge collapse", "", "English"),
            article("Budget", "", "Hindi"),
            article("Council meets", "", "English"),
        ];
        let view: Vec<&Article> = articles.iter().collect();
        let first = tagger.tag(&view);
        let second = tagger.tag(&view);

        let labels: Vec<SentimentLabel> = first.iter().map(|t| t.sentiment).collect();
        assert_eq!(
            labels,
            vec![
                SentimentLabel::Positive,
                SentimentLabel::Negative,
                SentimentLabel::Non,
                SentimentLabel::Neutral
            ]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let scorer = FixedScorer::new(3.0);
        let a = article("A", "", "English");
        let tagged = SentimentTagger::new(&scorer).tag_one(&a);
        assert_eq!(tagged.polarity, Some(1.0));
    }

    #[test]
    fn test_lexicon_basic_polarity() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("A. great progress") > 0.0);
        assert!(scorer.score("Flooding and congestion worsen the crisis") < 0.0);
        assert_eq!(scorer.score("The committee met on Tuesday"), 0.0);
        assert_eq!(scorer.score(""), 0.0);
    }

    #[test]
    fn test_lexicon_negation_flips_and_dampens() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("good");
        let negated = scorer.score("not good");
        assert!(negated < 0.0);
        assert!((negated - plain * -0.5).abs() < 1e-9);
    }

    #[test]
    fn test_lexicon_intensifier_scales() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("very good") > scorer.score("good"));
        assert!(scorer.score("slightly good") < scorer.score("good"));
        assert!(scorer.score("extremely excellent") <= 1.0);
    }

    #[test]
    fn test_lexicon_stays_in_range() {
        let scorer = LexiconScorer::new();
        for text in [
            "very very very extremely best best best",
            "worst worst extremely worst killed dead",
            "not not not bad",
        ] {
            let s = scorer.score(text);
            assert!((-1.0..=1.0).contains(&s), "{text}: {s}");
        }
    }

    #[test]
    fn test_label_display() {
        let names: Vec<String> = SentimentLabel::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(names, vec!["Positive", "Neutral", "Negative", "Non"]);
    }
}
