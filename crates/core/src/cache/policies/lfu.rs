//! Least Frequently Used (LFU) Replacement Policy.
//!
//! Evicts the line with the fewest hits since it was loaded. Use counts reset
//! on every fill, so a new block starts at zero.

use super::first_min_by_key;
use crate::cache::line::CacheLine;

/// Returns the way with the smallest use count (lowest way on ties).
pub fn victim(set: &[CacheLine]) -> usize {
    first_min_by_key(set, CacheLine::frequency)
}
