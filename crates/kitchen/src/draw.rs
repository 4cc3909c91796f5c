//! Weighted winner selection.
//!
//! A cookoff resolves with one uniform draw in [0,1) walked across the
//! participants' cumulative skill shares. The walk is a pure function so
//! it can be tested exhaustively without a kitchen or a store; the draw
//! itself comes from a pluggable [`RandomSource`] so resolutions can be
//! replayed deterministically.

/// Supplies one uniform draw in [0,1) per cookoff.
pub trait RandomSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Thread-local PRNG source used in production.
///
/// Not cryptographically strong, and does not need to be: the draw only
/// decides a game outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn draw(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// Source that always returns the same value.
///
/// Lets a cookoff be replayed: fix the draw, feed the same roster, and
/// the same winner falls out.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Pick an index from `weights` with probability proportional to weight.
///
/// Walks the weights in order, accumulating `weight / total`; the first
/// index whose cumulative share exceeds `draw` wins. Returns `None` when
/// there are no weights or the total is not positive, since no
/// distribution exists to draw from.
///
/// The last index is a guaranteed fallback: cumulative floating-point
/// sums can land just short of 1.0, and a draw in that sliver must still
/// name a winner.
pub fn pick_weighted(weights: &[f64], draw: f64) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let mut progress = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        progress += weight / total;
        if draw < progress {
            return Some(index);
        }
    }

    Some(weights.len() - 1)
}
