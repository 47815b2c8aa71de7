//! Unigram and bigram language models evaluated by entropy and coverage.
//!
//! # Overview
//!
//! ```text
//! ┌─────────────────┐
//! │ Training Corpus │
//! └────────┬────────┘
//!          │  frame (corpus.rs)
//!          ▼
//! ┌─────────────────┐
//! │  Count Table    │ ← Single counting pass (counts.rs)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Probability     │ ← count / context total (table.rs)
//! │ Table           │ ⇄ model file (persistence.rs)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Scorers       │ ← unigram.rs / bigram.rs
//! └────────┬────────┘
//!          │  bigram only
//!          ▼
//! ┌─────────────────┐
//! │  Grid Search    │ ← (λ1, λ2) sweep (search.rs)
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - `corpus`: line reading and `<s>` / `</s>` framing
//! - `counts`: frequency counting
//! - `table`: n-gram keys and maximum-likelihood estimation
//! - `unigram`: unigram model, entropy and coverage
//! - `bigram`: bigram model with linear interpolation
//! - `search`: interpolation weight grid search
//! - `persistence`: model and summary files
//! - `word_count`: raw word frequencies
//! - `config`: smoothing constants and search settings
//!
//! # Preconditions
//!
//! Training corpora must contain at least one token and test corpora must
//! contain at least one token; violations surface as [`LmError`] values.

pub mod bigram;
pub mod config;
pub mod corpus;
pub mod counts;
pub mod error;
pub mod persistence;
pub mod search;
pub mod table;
pub mod unigram;
pub mod word_count;

pub use bigram::BigramModel;
pub use config::Config;
pub use error::{LmError, Result};
pub use persistence::Summary;
pub use search::{SearchResult, Weights};
pub use table::{NGram, ProbabilityTable};
pub use unigram::{UnigramEvaluation, UnigramModel};
pub use word_count::WordCounts;
