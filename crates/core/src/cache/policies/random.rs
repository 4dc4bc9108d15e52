//! Random Replacement Policy.
//!
//! Picks a uniformly random way. Every line is a candidate, including valid
//! lines when an invalid one exists. The random source is supplied by the
//! caller so runs can be replayed from a seed.

use rand::{Rng, RngCore};

/// Returns a uniformly random way in `0..ways`; 0 when `ways` is 0.
pub fn victim<R: RngCore>(ways: usize, rng: &mut R) -> usize {
    if ways == 0 {
        return 0;
    }
    rng.random_range(0..ways)
}
