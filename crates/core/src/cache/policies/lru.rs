//! Least Recently Used (LRU) Replacement Policy.
//!
//! Evicts the line whose recency stamp is oldest. Stamps come from the
//! engine's logical clock, bumped once per operation, so two accesses never
//! share a stamp and the order is fully deterministic.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per selection, W = associativity
//! - **Space Complexity:** One `u64` stamp per line

use super::first_min_by_key;
use crate::cache::line::CacheLine;

/// Returns the way with the smallest recency stamp (lowest way on ties).
pub fn victim(set: &[CacheLine]) -> usize {
    first_min_by_key(set, CacheLine::recency)
}
