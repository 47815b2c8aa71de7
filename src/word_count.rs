//! Raw word frequencies.
//!
//! Counts whitespace-separated words with no sentence markers. The count
//! file holds one `word<TAB>count` line per word, sorted by word. As with
//! model files, a single malformed line makes the whole file read back as
//! empty.

use crate::corpus::read_lines;
use ahash::AHashMap;
use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Frequencies of raw whitespace-separated words.
#[derive(Debug, Clone, Default)]
pub struct WordCounts {
    counts: AHashMap<String, u64>,
}

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the words of every line to the counts.
    pub fn count<S: AsRef<str>>(&mut self, lines: &[S]) -> &mut Self {
        for line in lines {
            for word in line.as_ref().split_whitespace() {
                *self.counts.entry(word.to_string()).or_insert(0) += 1;
            }
        }
        self
    }

    pub fn count_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<&mut Self> {
        let lines = read_lines(path)?;
        Ok(self.count(&lines))
    }

    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// (word, count) pairs sorted by word.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let mut out = Vec::new();
        for (word, count) in self.sorted() {
            writeln!(out, "{}\t{}", word, count)?;
        }

        fs::write(path, out)?;
        info!("Wrote {} word counts to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a count file written by [`WordCounts::to_file`].
    pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        match Self::parse(&contents) {
            Some(counts) => Ok(counts),
            None => {
                warn!("Malformed count file {}; using empty counts", path.display());
                Ok(Self::new())
            }
        }
    }

    fn parse(contents: &str) -> Option<Self> {
        let mut counts = Self::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let [word, count] = fields.as_slice() else {
                return None;
            };
            counts.counts.insert(word.to_string(), count.parse().ok()?);
        }

        Some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        let mut counts = WordCounts::new();
        counts.count(&["a b a", "", "c  a"]);

        assert_eq!(counts.get("a"), 3);
        assert_eq!(counts.get("b"), 1);
        assert_eq!(counts.get("c"), 1);
        assert_eq!(counts.get("</s>"), 0);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("counts.txt");
        fs::write(&input, "b a\n\na c\n").unwrap();

        let mut counts = WordCounts::new();
        counts.count_file(&input).unwrap().to_file(&output).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "a\t2\nb\t1\nc\t1\n");
        let loaded = WordCounts::read_file(&output).unwrap();
        assert_eq!(loaded.sorted(), counts.sorted());
    }

    #[test]
    fn test_malformed_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.txt");
        fs::write(&path, "a\t2\nb\n").unwrap();
        assert!(WordCounts::read_file(&path).unwrap().is_empty());

        fs::write(&path, "a\tmany\n").unwrap();
        assert!(WordCounts::read_file(&path).unwrap().is_empty());
    }
}
