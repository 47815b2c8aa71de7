//! Exhaustive grid search over the bigram interpolation weights.
//!
//! # Grid
//!
//! A step `s` gives `n = ⌊1/s⌋` and the candidate weights `i/n` for
//! `i = 1..n-1`; both ends of the interval are excluded. With the default
//! `s = 0.05` that is 19 candidates per axis and 361 cells.
//!
//! # Order and Ties
//!
//! Cells are numbered with λ2 in the outer loop and λ1 in the inner loop.
//! The cell with the lowest entropy wins, and among equal entropies the one
//! with the lowest number wins. Cells may be evaluated on several threads;
//! the winner is picked only after every cell has finished, by walking the
//! results in cell order.

use crate::error::{LmError, Result};
use log::{debug, info};
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::thread;

/// Interpolation weights of the bigram scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Unigram vs. uniform mix.
    pub lambda_1: f64,
    /// Bigram vs. smoothed unigram mix.
    pub lambda_2: f64,
}

impl Weights {
    pub fn new(lambda_1: f64, lambda_2: f64) -> Result<Self> {
        for (name, value) in [("lambda_1", lambda_1), ("lambda_2", lambda_2)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(LmError::InvalidWeight { name, value });
            }
        }
        Ok(Self { lambda_1, lambda_2 })
    }
}

/// Anything that can report the test entropy for a pair of weights.
pub trait EntropyScorer: Sync {
    fn entropy(&self, weights: Weights) -> Result<f64>;
}

impl<F> EntropyScorer for F
where
    F: Fn(Weights) -> Result<f64> + Sync,
{
    fn entropy(&self, weights: Weights) -> Result<f64> {
        self(weights)
    }
}

/// Winning cell of a grid search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub lambda_1: f64,
    pub lambda_2: f64,
    pub entropy: f64,
}

impl SearchResult {
    pub fn weights(&self) -> Weights {
        Weights {
            lambda_1: self.lambda_1,
            lambda_2: self.lambda_2,
        }
    }
}

/// Candidate weights for `step`, in increasing order.
///
/// # Errors
/// Returns [`LmError::InvalidStep`] unless at least one candidate exists.
pub fn candidate_weights(step: f64) -> Result<Vec<f64>> {
    if !(step > 0.0 && step < 1.0) {
        return Err(LmError::InvalidStep(step));
    }

    // 1/0.05 is not exactly 20 in every rounding mode; nudge before flooring.
    let iterations = (1.0 / step + 1e-9).floor() as usize;
    if iterations < 2 {
        return Err(LmError::InvalidStep(step));
    }

    Ok((1..iterations)
        .map(|i| i as f64 / iterations as f64)
        .collect())
}

/// Evaluate every cell of the grid and return the minimizing weights.
///
/// `threads == 0` uses the available parallelism. The result does not
/// depend on the thread count.
pub fn grid_search<S: EntropyScorer>(scorer: &S, step: f64, threads: usize) -> Result<SearchResult> {
    let candidates = candidate_weights(step)?;

    let cells: Vec<Weights> = candidates
        .iter()
        .flat_map(|&lambda_2| {
            candidates
                .iter()
                .map(move |&lambda_1| Weights { lambda_1, lambda_2 })
        })
        .collect();

    let threads = match threads {
        0 => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        n => n,
    }
    .min(cells.len());

    info!(
        "Grid search: {} cells (step {}) on {} thread(s)",
        cells.len(),
        step,
        threads
    );

    let entropies = evaluate_cells(scorer, &cells, threads)?;
    let result = select_minimum(&cells, &entropies);

    info!(
        "Selected lambda_1 = {:.6}, lambda_2 = {:.6}, entropy = {:.6}",
        result.lambda_1, result.lambda_2, result.entropy
    );
    Ok(result)
}

fn evaluate_cells<S: EntropyScorer>(scorer: &S, cells: &[Weights], threads: usize) -> Result<Vec<f64>> {
    if threads <= 1 {
        return cells.iter().map(|&weights| score_cell(scorer, weights)).collect();
    }

    let chunk_size = cells.len().div_ceil(threads);
    let finished: Mutex<Vec<(usize, Result<Vec<f64>>)>> = Mutex::new(Vec::with_capacity(threads));

    thread::scope(|scope| {
        for (chunk_index, chunk) in cells.chunks(chunk_size).enumerate() {
            let finished = &finished;
            scope.spawn(move || {
                let entropies = chunk
                    .iter()
                    .map(|&weights| score_cell(scorer, weights))
                    .collect::<Result<Vec<f64>>>();
                finished.lock().push((chunk_index, entropies));
            });
        }
    });

    let mut finished = finished.into_inner();
    finished.sort_by_key(|(chunk_index, _)| *chunk_index);

    let mut entropies = Vec::with_capacity(cells.len());
    for (_, chunk) in finished {
        entropies.extend(chunk?);
    }
    Ok(entropies)
}

fn score_cell<S: EntropyScorer>(scorer: &S, weights: Weights) -> Result<f64> {
    let entropy = scorer.entropy(weights)?;
    debug!(
        "lambda_1 = {:.2}, lambda_2 = {:.2}: entropy = {:.6}",
        weights.lambda_1, weights.lambda_2, entropy
    );
    Ok(entropy)
}

/// First cell (in grid order) holding the lowest entropy.
fn select_minimum(cells: &[Weights], entropies: &[f64]) -> SearchResult {
    let mut best = 0;
    for (index, &entropy) in entropies.iter().enumerate() {
        if entropy < entropies[best] {
            best = index;
        }
    }

    SearchResult {
        lambda_1: cells[best].lambda_1,
        lambda_2: cells[best].lambda_2,
        entropy: entropies[best],
    }
}
