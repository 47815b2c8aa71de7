//! Bigram language model with linear interpolation smoothing.
//!
//! # Scoring
//!
//! Test sentences are framed with `<s>` and `</s>`. For each token `w`
//! following `v`:
//!
//! ```text
//! p1 = λ1 · P(w)     + (1 - λ1) / V
//! p2 = λ2 · P(w | v) + (1 - λ2) · p1
//! ```
//!
//! Missing table entries count as probability zero. Entropy is the mean of
//! `-log2 p2` over all scored tokens.
//!
//! # Weight Selection
//!
//! [`BigramModel::search`] sweeps the (λ1, λ2) grid (see [`crate::search`])
//! and keeps the pair with the lowest test entropy.

use crate::config::Config;
use crate::corpus::{Corpus, Order};
use crate::counts::CountTable;
use crate::error::{LmError, Result};
use crate::persistence;
use crate::search::{self, EntropyScorer, SearchResult, Weights};
use crate::table::ProbabilityTable;
use log::info;
use std::path::Path;

/// A bigram language model interpolated with its unigram fallback and a uniform floor.
pub struct BigramModel {
    table: ProbabilityTable,
    vocabulary_size: u64,
}

impl BigramModel {
    pub fn new() -> Self {
        Self::new_with_settings(&Config::default())
    }

    /// Create an empty model with the vocabulary size of `config`.
    ///
    /// # Errors
    /// Returns an error if `config` fails [`Config::validate`].
    pub fn new_with_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new_with_settings(config))
    }

    fn new_with_settings(config: &Config) -> Self {
        Self {
            table: ProbabilityTable::new(),
            vocabulary_size: config.vocabulary_size,
        }
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    pub fn replace_table(&mut self, table: ProbabilityTable) {
        self.table = table;
    }

    /// Fit on in-memory lines.
    ///
    /// # Errors
    /// Returns [`LmError::EmptyContext`] if the lines hold no tokens.
    pub fn fit<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<&mut Self> {
        self.fit_corpus(&Corpus::from_lines(lines, Order::Bigram))
    }

    pub fn fit_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        self.fit_corpus(&Corpus::from_file(path, Order::Bigram)?)
    }

    fn fit_corpus(&mut self, corpus: &Corpus) -> Result<&mut Self> {
        let counts = CountTable::count(corpus);
        self.table = ProbabilityTable::estimate(&counts)?;
        info!(
            "Fitted bigram model: {} tokens, {} n-grams",
            counts.context_total(None),
            self.table.len()
        );
        Ok(self)
    }

    pub fn save_model_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::write_model(path, &self.table)?;
        Ok(())
    }

    /// Replace the table with the contents of a model file.
    pub fn load_model_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        self.replace_table(persistence::read_model(path)?);
        Ok(self)
    }

    /// Test entropy of `lines` under fixed weights.
    ///
    /// # Errors
    /// Returns [`LmError::InvalidWeight`] for weights outside (0, 1) and
    /// [`LmError::EmptyCorpus`] if the lines hold no tokens.
    pub fn entropy<S: AsRef<str>>(&self, lines: &[S], weights: Weights) -> Result<f64> {
        let weights = Weights::new(weights.lambda_1, weights.lambda_2)?;
        self.scorer(&Corpus::from_lines(lines, Order::Bigram))
            .entropy(weights)
    }

    /// Score `test_file` under fixed weights, first reloading the table from
    /// `model_file` when one is given.
    pub fn predict<P: AsRef<Path>>(
        &mut self,
        test_file: P,
        model_file: Option<&Path>,
        weights: Weights,
    ) -> Result<f64> {
        let weights = Weights::new(weights.lambda_1, weights.lambda_2)?;
        if let Some(model_file) = model_file {
            self.load_model_file(model_file)?;
        }
        self.scorer(&Corpus::from_file(test_file, Order::Bigram)?)
            .entropy(weights)
    }

    /// Grid-search the interpolation weights on in-memory test lines.
    pub fn search<S: AsRef<str>>(&self, lines: &[S], step: f64, threads: usize) -> Result<SearchResult> {
        let scorer = self.scorer(&Corpus::from_lines(lines, Order::Bigram));
        search::grid_search(&scorer, step, threads)
    }

    /// Grid-search the interpolation weights on `test_file`, first reloading
    /// the table from `model_file` when one is given.
    pub fn search_file<P: AsRef<Path>>(
        &mut self,
        test_file: P,
        model_file: Option<&Path>,
        step: f64,
        threads: usize,
    ) -> Result<SearchResult> {
        search::candidate_weights(step)?;
        if let Some(model_file) = model_file {
            self.load_model_file(model_file)?;
        }
        let scorer = self.scorer(&Corpus::from_file(test_file, Order::Bigram)?);
        search::grid_search(&scorer, step, threads)
    }

    /// Resolve the table lookups for `corpus` once.
    pub fn scorer(&self, corpus: &Corpus) -> BigramScorer {
        let events = corpus
            .events()
            .map(|(prev, token)| Event {
                unigram: self.table.probability(None, token),
                bigram: prev.map_or(0.0, |prev| self.table.probability(Some(prev), token)),
            })
            .collect();

        BigramScorer {
            events,
            vocabulary_size: self.vocabulary_size,
        }
    }
}

impl Default for BigramModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Table probabilities needed for one scored token.
#[derive(Debug, Clone, Copy)]
struct Event {
    unigram: f64,
    bigram: f64,
}

/// A test corpus bound to a fitted table.
///
/// The table lookups do not depend on the weights, so they are resolved
/// when the scorer is built and each grid cell is plain arithmetic.
#[derive(Debug, Clone)]
pub struct BigramScorer {
    events: Vec<Event>,
    vocabulary_size: u64,
}

impl EntropyScorer for BigramScorer {
    fn entropy(&self, weights: Weights) -> Result<f64> {
        if self.events.is_empty() {
            return Err(LmError::EmptyCorpus);
        }

        let Weights { lambda_1, lambda_2 } = weights;
        let uniform = (1.0 - lambda_1) / self.vocabulary_size as f64;

        let mut log_loss = 0.0;
        for event in &self.events {
            let p1 = lambda_1 * event.unigram + uniform;
            let p2 = lambda_2 * event.bigram + (1.0 - lambda_2) * p1;
            log_loss -= p2.log2();
        }

        Ok(log_loss / self.events.len() as f64)
    }
}
