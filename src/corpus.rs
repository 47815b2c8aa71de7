//! Line-oriented corpus reading and sentence framing.
//!
//! # Corpus Format
//!
//! One sentence per line, tokens separated by spaces:
//! ```text
//! the quick brown fox
//! the lazy dog
//! ```
//!
//! Blank lines are ignored. Each surviving line is framed before it is
//! counted or scored: `</s>` is appended for both model orders and `<s>`
//! is prepended for bigrams.
//!
//! Tokens are produced by splitting on whitespace, so a token can never
//! contain a space or a tab. The model file format relies on this.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Sentence-start marker (bigram framing only).
pub const BOS: &str = "<s>";
/// Sentence-end marker.
pub const EOS: &str = "</s>";

/// N-gram order of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Unigram,
    Bigram,
}

/// Read a text file and return its non-blank lines, trimmed.
pub fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    Ok(lines)
}

/// Split a line into tokens and add the sentence markers for `order`.
///
/// Returns `None` for empty or whitespace-only lines, which contribute
/// nothing to counts or scores.
pub fn frame(line: &str, order: Order) -> Option<Vec<String>> {
    let mut tokens: Vec<String> = Vec::new();
    if order == Order::Bigram {
        tokens.push(BOS.to_string());
    }

    let start = tokens.len();
    tokens.extend(line.split_whitespace().map(str::to_string));
    if tokens.len() == start {
        return None;
    }

    tokens.push(EOS.to_string());
    Some(tokens)
}

/// A corpus held in memory as framed sentences.
#[derive(Debug, Clone)]
pub struct Corpus {
    order: Order,
    sentences: Vec<Vec<String>>,
}

impl Corpus {
    /// Frame every line of `lines` for `order`, dropping blank ones.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], order: Order) -> Self {
        let sentences = lines
            .iter()
            .filter_map(|line| frame(line.as_ref(), order))
            .collect();

        Self { order, sentences }
    }

    pub fn from_file<P: AsRef<Path>>(path: P, order: Order) -> io::Result<Self> {
        Ok(Self::from_lines(&read_lines(path)?, order))
    }

    /// Iterate over the tokens that receive a probability.
    ///
    /// For unigrams that is every framed token. For bigrams it is every
    /// token after `<s>`, paired with its predecessor.
    pub fn events(&self) -> impl Iterator<Item = (Option<&str>, &str)> + '_ {
        let order = self.order;
        self.sentences.iter().flat_map(move |sentence| {
            let skip = if order == Order::Bigram { 1 } else { 0 };
            (skip..sentence.len()).map(move |i| {
                let prev = if order == Order::Bigram {
                    Some(sentence[i - 1].as_str())
                } else {
                    None
                };
                (prev, sentence[i].as_str())
            })
        })
    }

    /// Number of scored tokens (see [`Corpus::events`]).
    pub fn token_count(&self) -> usize {
        self.events().count()
    }
}
