//! Model and summary files.
//!
//! # Model File Format
//!
//! One entry per line, sorted by key:
//! ```text
//! </s>	0.400000
//! a	0.400000
//! a b	1.000000
//! ```
//!
//! The key and the probability are separated by a single tab. A key with an
//! embedded space is a conditional (`prev token`) entry. Any malformed line
//! invalidates the whole file and the load yields an empty table.
//!
//! # Summary File Format
//!
//! ```text
//! entropy = 6.709899
//! coverage = 0.800000
//! ```
//!
//! Blank lines and lines starting with `#` are ignored on read-back.
//!
//! Output files are rendered in memory first and written in one call, so a
//! failed computation never leaves a half-written file behind.

use crate::table::{NGram, ProbabilityTable};
use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write `table` to `path` in the model file format.
pub fn write_model<P: AsRef<Path>>(path: P, table: &ProbabilityTable) -> io::Result<()> {
    let path = path.as_ref();
    let mut out = Vec::new();
    for (ngram, probability) in table.entries() {
        writeln!(out, "{}\t{:.6}", ngram, probability)?;
    }

    fs::write(path, out)?;
    info!("Wrote {} model entries to {}", table.len(), path.display());
    Ok(())
}

/// Read a model file written by [`write_model`].
///
/// # Errors
/// Only I/O failures are errors. A malformed file yields an empty table.
pub fn read_model<P: AsRef<Path>>(path: P) -> io::Result<ProbabilityTable> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    match parse_model(&contents) {
        Some(table) => {
            info!("Loaded {} model entries from {}", table.len(), path.display());
            Ok(table)
        }
        None => {
            warn!("Malformed model file {}; using an empty table", path.display());
            Ok(ProbabilityTable::new())
        }
    }
}

/// Parse model file contents; `None` if any non-blank line is malformed.
pub fn parse_model(contents: &str) -> Option<ProbabilityTable> {
    let mut table = ProbabilityTable::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let (key, value) = match (fields.next(), fields.next(), fields.next()) {
            (Some(key), Some(value), None) => (key, value),
            _ => return None,
        };

        let ngram = NGram::parse_key(key)?;
        let probability = value.trim().parse::<f64>().ok()?;
        table.insert(ngram, probability);
    }

    Some(table)
}

/// Evaluation summary written after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub entropy: f64,
    /// Only unigram evaluations report coverage.
    pub coverage: Option<f64>,
}

impl Summary {
    /// Render the summary, preceded by `comments` as `#` lines.
    pub fn render(&self, comments: &[String]) -> String {
        let mut out = String::new();
        for comment in comments {
            out.push_str(&format!("# {}\n", comment));
        }
        out.push_str(&format!("entropy = {:.6}\n", self.entropy));
        if let Some(coverage) = self.coverage {
            out.push_str(&format!("coverage = {:.6}\n", coverage));
        }
        out
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P, comments: &[String]) -> io::Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render(comments))?;
        info!("Wrote summary to {}", path.display());
        Ok(())
    }

    /// Parse `key = value` lines. Unknown keys and bad values are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut summary = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(" = ") else {
                continue;
            };
            let Ok(value) = value.trim().parse::<f64>() else {
                continue;
            };

            match key.trim() {
                "entropy" => summary.entropy = value,
                "coverage" => summary.coverage = Some(value),
                _ => {}
            }
        }

        summary
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, Order};
    use crate::counts::CountTable;

    fn fitted(lines: &[&str], order: Order) -> ProbabilityTable {
        let corpus = Corpus::from_lines(lines, order);
        ProbabilityTable::estimate(&CountTable::count(&corpus)).unwrap()
    }

    #[test]
    fn test_model_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.txt");

        write_model(&path, &fitted(&["a b", "a"], Order::Unigram)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "</s>\t0.400000\na\t0.400000\nb\t0.200000\n");
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.txt");
        let table = fitted(&["the cat sat", "the dog sat down", "a cat"], Order::Bigram);

        write_model(&path, &table).unwrap();
        let loaded = read_model(&path).unwrap();

        assert_eq!(loaded.len(), table.len());
        for (ngram, probability) in table.entries() {
            let restored = loaded.probability(ngram.context(), ngram.token());
            assert!((restored - probability).abs() <= 5e-7, "{ngram}");
        }
    }

    #[test]
    fn test_identical_fits_write_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        let lines = ["x y z", "z y x", "y y y", "x"];

        write_model(&first, &fitted(&lines, Order::Bigram)).unwrap();
        write_model(&second, &fitted(&lines, Order::Bigram)).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_malformed_line_resets_table() {
        let contents = "a\t0.500000\nb\t0.250000\nbroken line\n</s>\t0.250000\n";
        assert!(parse_model(contents).is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.txt");
        fs::write(&path, contents).unwrap();
        assert!(read_model(&path).unwrap().is_empty());
    }

    #[test]
    fn test_extra_field_resets_table() {
        assert!(parse_model("a\t0.5\t0.5\n").is_none());
        assert!(parse_model("a\tnot-a-number\n").is_none());
        assert!(parse_model("a b c\t0.5\n").is_none());
    }

    #[test]
    fn test_missing_model_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_model(dir.path().join("absent.txt")).is_err());
    }

    #[test]
    fn test_summary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        let summary = Summary {
            entropy: 10.527337,
            coverage: Some(0.8),
        };

        summary.to_file(&path, &["trained on test data".to_string()]).unwrap();
        let loaded = Summary::read_file(&path).unwrap();

        assert!((loaded.entropy - summary.entropy).abs() < 1e-6);
        assert_eq!(loaded.coverage, Some(0.8));
    }

    #[test]
    fn test_summary_render_format() {
        let summary = Summary {
            entropy: 6.7098994,
            coverage: None,
        };
        let comments = ["lambda_1 = 0.050000".to_string()];
        assert_eq!(
            summary.render(&comments),
            "# lambda_1 = 0.050000\nentropy = 6.709899\n"
        );

        let summary = Summary {
            coverage: Some(0.8),
            ..summary
        };
        assert_eq!(summary.render(&[]), "entropy = 6.709899\ncoverage = 0.800000\n");
    }

    #[test]
    fn test_summary_parse_ignores_comments() {
        let summary = Summary::parse("# entropy = 99\n\nentropy = 1.5\nother = 3\n");
        assert_eq!(summary.entropy, 1.5);
        assert_eq!(summary.coverage, None);
    }
}
