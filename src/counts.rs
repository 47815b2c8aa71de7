//! Frequency counting over a framed corpus.
//!
//! A [`CountTable`] is built in a single pass and never mutated afterwards.
//! In bigram mode every predicted token is also counted as an unconditional
//! observation, so unigram fallback probabilities come from the same pass.

use crate::corpus::Corpus;
use crate::table::NGram;
use ahash::AHashMap;

/// Occurrence counts keyed by (context, token), with per-context totals.
#[derive(Debug, Clone, Default)]
pub struct CountTable {
    /// Unconditional counts: token → count.
    unigrams: AHashMap<String, u64>,
    /// Conditional counts: previous token → (token → count).
    bigrams: AHashMap<String, AHashMap<String, u64>>,
    /// Number of unconditional observations.
    unigram_total: u64,
    /// Number of observations following each previous token.
    context_totals: AHashMap<String, u64>,
}

impl CountTable {
    /// Count every scored event of `corpus`.
    pub fn count(corpus: &Corpus) -> Self {
        let mut table = Self::default();

        for (prev, token) in corpus.events() {
            if let Some(prev) = prev {
                *table
                    .bigrams
                    .entry(prev.to_string())
                    .or_default()
                    .entry(token.to_string())
                    .or_insert(0) += 1;
                *table.context_totals.entry(prev.to_string()).or_insert(0) += 1;
            }

            *table.unigrams.entry(token.to_string()).or_insert(0) += 1;
            table.unigram_total += 1;
        }

        table
    }

    /// Count of `ngram`, zero when it was never observed.
    pub fn get(&self, ngram: &NGram) -> u64 {
        match ngram.context() {
            None => self.unigrams.get(ngram.token()).copied().unwrap_or(0),
            Some(prev) => self
                .bigrams
                .get(prev)
                .and_then(|tokens| tokens.get(ngram.token()))
                .copied()
                .unwrap_or(0),
        }
    }

    /// Total number of observations in `context` (`None` = unconditional).
    pub fn context_total(&self, context: Option<&str>) -> u64 {
        match context {
            None => self.unigram_total,
            Some(prev) => self.context_totals.get(prev).copied().unwrap_or(0),
        }
    }

    /// Every observed (n-gram, count) pair, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NGram, u64)> + '_ {
        let unigrams = self
            .unigrams
            .iter()
            .map(|(token, &count)| (NGram::unigram(token), count));
        let bigrams = self.bigrams.iter().flat_map(|(prev, tokens)| {
            tokens
                .iter()
                .map(move |(token, &count)| (NGram::bigram(prev, token), count))
        });
        unigrams.chain(bigrams)
    }

    /// Number of distinct n-grams.
    pub fn len(&self) -> usize {
        self.unigrams.len() + self.bigrams.values().map(|tokens| tokens.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
