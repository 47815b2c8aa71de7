//! N-gram keys and the maximum-likelihood probability table.
//!
//! # Keys
//!
//! An [`NGram`] is a (context, token) pair. The context is either empty
//! (unconditional probability) or a single previous token. Keys only turn
//! into strings at the model file boundary, where an unconditional entry is
//! written as `token` and a conditional one as `prev token`.
//!
//! # Estimation
//!
//! `P(token | context) = count(context, token) / total(context)`, with no
//! smoothing. Smoothing is applied by the scorers. For every context the
//! probabilities of its tokens sum to one.
//!
//! Lookups of unseen pairs return `0.0` and never insert anything, so the
//! key set is always exactly the set of observed n-grams.

use crate::counts::CountTable;
use crate::error::{LmError, Result};
use ahash::AHashMap;
use std::fmt;

/// Composite (context, token) key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NGram {
    context: Option<String>,
    token: String,
}

impl NGram {
    pub fn unigram(token: &str) -> Self {
        Self {
            context: None,
            token: token.to_string(),
        }
    }

    pub fn bigram(prev: &str, token: &str) -> Self {
        Self {
            context: Some(prev.to_string()),
            token: token.to_string(),
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Parse a serialized key: `token` or `prev token`.
    ///
    /// Returns `None` for empty keys, empty halves, or more than one space.
    pub fn parse_key(key: &str) -> Option<Self> {
        let mut parts = key.split(' ');
        let first = parts.next().filter(|s| !s.is_empty())?;

        match (parts.next(), parts.next()) {
            (None, _) => Some(Self::unigram(first)),
            (Some(second), None) if !second.is_empty() => Some(Self::bigram(first, second)),
            _ => None,
        }
    }
}

impl fmt::Display for NGram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(prev) => write!(f, "{} {}", prev, self.token),
            None => f.write_str(&self.token),
        }
    }
}

/// Conditional probabilities keyed by [`NGram`].
#[derive(Debug, Clone, Default)]
pub struct ProbabilityTable {
    /// P(token) for the empty context.
    unigrams: AHashMap<String, f64>,
    /// P(token | prev): prev → (token → probability).
    bigrams: AHashMap<String, AHashMap<String, f64>>,
}

impl ProbabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn counts into maximum-likelihood probabilities.
    ///
    /// # Errors
    /// Returns [`LmError::EmptyContext`] when the corpus had no tokens or a
    /// context has a zero total.
    pub fn estimate(counts: &CountTable) -> Result<Self> {
        if counts.context_total(None) == 0 {
            return Err(LmError::EmptyContext {
                context: String::new(),
            });
        }

        let mut entries: Vec<(NGram, u64)> = counts.iter().collect();
        entries.sort_by_cached_key(|(ngram, _)| ngram.to_string());

        let mut table = Self::new();
        for (ngram, count) in entries {
            let total = counts.context_total(ngram.context());
            if total == 0 {
                return Err(LmError::EmptyContext {
                    context: ngram.context().unwrap_or_default().to_string(),
                });
            }
            table.insert(ngram, count as f64 / total as f64);
        }

        Ok(table)
    }

    /// Set the probability of `ngram`, replacing any previous value.
    pub fn insert(&mut self, ngram: NGram, probability: f64) {
        let NGram { context, token } = ngram;
        match context {
            None => {
                self.unigrams.insert(token, probability);
            }
            Some(prev) => {
                self.bigrams.entry(prev).or_default().insert(token, probability);
            }
        }
    }

    /// P(token | context), or `0.0` when the pair was never observed.
    pub fn probability(&self, context: Option<&str>, token: &str) -> f64 {
        self.lookup(context, token).unwrap_or(0.0)
    }

    pub fn contains(&self, context: Option<&str>, token: &str) -> bool {
        self.lookup(context, token).is_some()
    }

    fn lookup(&self, context: Option<&str>, token: &str) -> Option<f64> {
        match context {
            None => self.unigrams.get(token).copied(),
            Some(prev) => self.bigrams.get(prev)?.get(token).copied(),
        }
    }

    /// All entries sorted lexicographically by serialized key.
    pub fn entries(&self) -> Vec<(NGram, f64)> {
        let unigrams = self
            .unigrams
            .iter()
            .map(|(token, &p)| (NGram::unigram(token), p));
        let bigrams = self.bigrams.iter().flat_map(|(prev, tokens)| {
            tokens.iter().map(move |(token, &p)| (NGram::bigram(prev, token), p))
        });

        let mut entries: Vec<(NGram, f64)> = unigrams.chain(bigrams).collect();
        entries.sort_by_cached_key(|(ngram, _)| ngram.to_string());
        entries
    }

    /// Sum of the probabilities stored for `context`.
    pub fn context_mass(&self, context: Option<&str>) -> f64 {
        match context {
            None => self.unigrams.values().sum(),
            Some(prev) => self
                .bigrams
                .get(prev)
                .map(|tokens| tokens.values().sum::<f64>())
                .unwrap_or(0.0),
        }
    }

    /// Contexts that hold at least one conditional entry.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.bigrams.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.unigrams.len() + self.bigrams.values().map(|tokens| tokens.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, Order};

    fn fit(lines: &[&str], order: Order) -> ProbabilityTable {
        let corpus = Corpus::from_lines(lines, order);
        ProbabilityTable::estimate(&CountTable::count(&corpus)).unwrap()
    }

    #[test]
    fn test_unigram_estimate() {
        let table = fit(&["a b", "a"], Order::Unigram);

        assert!((table.probability(None, "a") - 0.4).abs() < 1e-12);
        assert!((table.probability(None, "b") - 0.2).abs() < 1e-12);
        assert!((table.probability(None, "</s>") - 0.4).abs() < 1e-12);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_bigram_estimate() {
        let table = fit(&["a b"], Order::Bigram);

        assert_eq!(table.probability(Some("<s>"), "a"), 1.0);
        assert_eq!(table.probability(Some("a"), "b"), 1.0);
        assert_eq!(table.probability(Some("b"), "</s>"), 1.0);
        assert!((table.probability(None, "a") - 1.0 / 3.0).abs() < 1e-12);
        assert!(!table.contains(None, "<s>"));
    }

    #[test]
    fn test_probability_mass_per_context() {
        let table = fit(
            &["the cat sat", "the dog sat down", "a cat ran", "the cat"],
            Order::Bigram,
        );

        assert!((table.context_mass(None) - 1.0).abs() < 1e-9);
        for context in table.contexts() {
            assert!((table.context_mass(Some(context)) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_corpus_fails() {
        let corpus = Corpus::from_lines(&["", "  "], Order::Unigram);
        let result = ProbabilityTable::estimate(&CountTable::count(&corpus));
        assert!(matches!(result, Err(LmError::EmptyContext { .. })));
    }

    #[test]
    fn test_lookup_does_not_insert() {
        let table = fit(&["a"], Order::Unigram);
        let before = table.len();

        assert_eq!(table.probability(None, "zzz"), 0.0);
        assert_eq!(table.probability(Some("a"), "zzz"), 0.0);
        assert_eq!(table.len(), before);
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let table = fit(&["b a"], Order::Bigram);
        let keys: Vec<String> = table.entries().iter().map(|(k, _)| k.to_string()).collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(keys.contains(&"<s> b".to_string()));
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(NGram::parse_key("a"), Some(NGram::unigram("a")));
        assert_eq!(NGram::parse_key("a b"), Some(NGram::bigram("a", "b")));
        assert_eq!(NGram::parse_key("a b c"), None);
        assert_eq!(NGram::parse_key(""), None);
        assert_eq!(NGram::parse_key("a "), None);
    }
}
