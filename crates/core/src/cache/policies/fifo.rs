//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! Evicts the line that was loaded longest ago. The insertion stamp is set
//! when a block is installed and hits never move it, so a heavily reused
//! line still leaves in arrival order.

use super::first_min_by_key;
use crate::cache::line::CacheLine;

/// Returns the way with the smallest insertion stamp (lowest way on ties).
pub fn victim(set: &[CacheLine]) -> usize {
    first_min_by_key(set, CacheLine::inserted)
}
