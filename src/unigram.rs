//! Unigram language model with a fixed unknown-word mass.
//!
//! # Scoring
//!
//! Each test token `w` (sentences framed with `</s>` only) gets
//!
//! ```text
//! p(w) = (1 - λ_known) / V + λ_known · P(w)   if w is known
//! p(w) = (1 - λ_known) / V                    otherwise
//! ```
//!
//! Entropy is the mean of `-log2 p(w)` over all test tokens. Coverage is
//! the fraction of test tokens present in the table.

use crate::config::Config;
use crate::corpus::{Corpus, Order};
use crate::counts::CountTable;
use crate::error::{LmError, Result};
use crate::persistence;
use crate::persistence::Summary;
use crate::table::ProbabilityTable;
use log::info;
use std::path::Path;

/// Result of scoring a held-out corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnigramEvaluation {
    /// Bits per token.
    pub entropy: f64,
    /// Fraction of test tokens found in the model, in `[0, 1]`.
    pub coverage: f64,
}

impl From<UnigramEvaluation> for Summary {
    fn from(eval: UnigramEvaluation) -> Self {
        Summary {
            entropy: eval.entropy,
            coverage: Some(eval.coverage),
        }
    }
}

/// A unigram language model that reserves a fixed share of mass for unknown words.
pub struct UnigramModel {
    table: ProbabilityTable,
    known_weight: f64,
    vocabulary_size: u64,
}

impl UnigramModel {
    /// Create an empty model with the default smoothing constants.
    pub fn new() -> Self {
        Self::new_with_settings(&Config::default())
    }

    /// Create an empty model with the smoothing constants of `config`.
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
            known_weight: config.known_weight,
            vocabulary_size: config.vocabulary_size,
        }
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    /// Swap in a new probability table, keeping the smoothing constants.
    pub fn replace_table(&mut self, table: ProbabilityTable) {
        self.table = table;
    }

    /// Fit on in-memory lines.
    ///
    /// # Errors
    /// Returns [`LmError::EmptyContext`] if the lines hold no tokens.
    pub fn fit<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<&mut Self> {
        self.fit_corpus(&Corpus::from_lines(lines, Order::Unigram))
    }

    pub fn fit_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let corpus = Corpus::from_file(path, Order::Unigram)?;
        self.fit_corpus(&corpus)
    }

    fn fit_corpus(&mut self, corpus: &Corpus) -> Result<&mut Self> {
        let counts = CountTable::count(corpus);
        self.table = ProbabilityTable::estimate(&counts)?;
        info!(
            "Fitted unigram model: {} tokens, {} types",
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

    /// Score in-memory test lines.
    ///
    /// # Errors
    /// Returns [`LmError::EmptyCorpus`] if the lines hold no tokens.
    pub fn evaluate<S: AsRef<str>>(&self, lines: &[S]) -> Result<UnigramEvaluation> {
        self.evaluate_corpus(&Corpus::from_lines(lines, Order::Unigram))
    }

    pub fn evaluate_file<P: AsRef<Path>>(&self, path: P) -> Result<UnigramEvaluation> {
        self.evaluate_corpus(&Corpus::from_file(path, Order::Unigram)?)
    }

    fn evaluate_corpus(&self, corpus: &Corpus) -> Result<UnigramEvaluation> {
        let unknown_mass = (1.0 - self.known_weight) / self.vocabulary_size as f64;

        let mut token_count = 0usize;
        let mut unknown_count = 0usize;
        let mut log_loss = 0.0;

        for (_, token) in corpus.events() {
            token_count += 1;
            let mut p = unknown_mass;
            if self.table.contains(None, token) {
                p += self.known_weight * self.table.probability(None, token);
            } else {
                unknown_count += 1;
            }
            log_loss -= p.log2();
        }

        if token_count == 0 {
            return Err(LmError::EmptyCorpus);
        }

        let evaluation = UnigramEvaluation {
            entropy: log_loss / token_count as f64,
            coverage: (token_count - unknown_count) as f64 / token_count as f64,
        };
        info!(
            "Unigram evaluation: entropy = {:.6}, coverage = {:.6} over {} tokens",
            evaluation.entropy, evaluation.coverage, token_count
        );
        Ok(evaluation)
    }
}

impl Default for UnigramModel {
    fn default() -> Self {
        Self::new()
    }
}
