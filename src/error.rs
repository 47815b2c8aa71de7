//! Error type shared by every stage of the estimation pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LmError>;

#[derive(Debug, Error)]
pub enum LmError {
    /// File could not be opened, read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A context has no observations, so its probabilities are undefined.
    #[error("context {context:?} has a total count of zero")]
    EmptyContext { context: String },

    /// Scoring processed no tokens at all.
    #[error("test corpus contains no tokens")]
    EmptyCorpus,

    /// An interpolation weight outside the open interval (0, 1).
    #[error("{name} must lie strictly between 0 and 1, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    /// Grid step that leaves no candidate weight in (0, 1).
    #[error("grid step {0} yields no candidate weights")]
    InvalidStep(f64),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}
