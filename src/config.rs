use crate::error::{LmError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Assumed vocabulary size, unknown words included.
    pub vocabulary_size: u64,
    /// Weight of the trained unigram estimate in the unigram scorer.
    pub known_weight: f64,
    /// Spacing of the interpolation weight grid.
    pub grid_step: f64,
    /// Worker threads for the grid search; 0 uses all available cores.
    pub search_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vocabulary_size: 1_000_000,
            known_weight: 0.95,
            grid_step: 0.05,
            search_threads: 0,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        match confy::load("ngram-eval", Some("config")) {
            Ok(config) => config,
            Err(err) => {
                warn!("Failed to load config, using defaults: {err}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.vocabulary_size == 0 {
            return Err(LmError::InvalidSetting(
                "vocabulary_size must be positive".to_string(),
            ));
        }
        if !(self.known_weight > 0.0 && self.known_weight < 1.0) {
            return Err(LmError::InvalidWeight {
                name: "known_weight",
                value: self.known_weight,
            });
        }
        crate::search::candidate_weights(self.grid_step)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.vocabulary_size, 1_000_000);
        assert_eq!(config.known_weight, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_settings() {
        let config = Config {
            known_weight: 1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            grid_step: 0.75,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            vocabulary_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
