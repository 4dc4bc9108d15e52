//! Cache Replacement Policies.
//!
//! Victim selection for a single set. Each policy is a pure function of the
//! set's lines (and, for `Rand`, an injected random source); the engine owns
//! all state and passes the target set in.
//!
//! # Policies
//!
//! - `Rand`: Uniform choice over every line of the set.
//! - `Lru`: Smallest recency stamp.
//! - `Fifo`: Smallest insertion stamp.
//! - `Lfu`: Smallest use count.
//!
//! Validity is never consulted. Cold lines carry zeroed metadata, so the
//! counter-based policies fill them first; ties go to the lowest way.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Frequently Used replacement policy.
pub mod lfu;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

use rand::RngCore;

use super::line::CacheLine;
use crate::config::ReplacementPolicy;

/// Selects the way to reuse within `set`.
///
/// # Arguments
///
/// * `policy` - The replacement algorithm.
/// * `set` - The lines of the target set, indexed by way. Must be non-empty.
/// * `rng` - Random source consulted only by `ReplacementPolicy::Rand`.
///
/// # Returns
///
/// The victim's way index, always `< set.len()`.
pub fn select_victim<R: RngCore>(
    policy: ReplacementPolicy,
    set: &[CacheLine],
    rng: &mut R,
) -> usize {
    match policy {
        ReplacementPolicy::Rand => random::victim(set.len(), rng),
        ReplacementPolicy::Lru => lru::victim(set),
        ReplacementPolicy::Fifo => fifo::victim(set),
        ReplacementPolicy::Lfu => lfu::victim(set),
    }
}

/// Index of the first line minimizing `key`; 0 for an empty set.
fn first_min_by_key(set: &[CacheLine], key: impl Fn(&CacheLine) -> u64) -> usize {
    set.iter()
        .enumerate()
        .min_by_key(|(_, line)| key(line))
        .map_or(0, |(way, _)| way)
}
