//! Replacement Policy Tests.
//!
//! Uses a single two-way set (16-byte cache of 8-byte blocks), where block
//! `n` lives at address `8 * n` and carries tag `n`.

use cachesim_core::cache::policies::select_victim;
use cachesim_core::cache::{CacheGeometry, CacheLine, CacheSim};
use cachesim_core::config::{CacheConfig, Mapping, ReplacementPolicy, WritePolicy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::common::{ZeroRng, store, two_way, zero_rng_cache};

fn tags<R: rand::RngCore>(cache: &CacheSim<R>) -> Vec<Option<u64>> {
    cache
        .set_lines(0)
        .unwrap()
        .iter()
        .map(CacheLine::tag)
        .collect()
}

fn read_all<R: rand::RngCore>(cache: &mut CacheSim<R>, addresses: &[u64]) {
    let mut memory = store();
    for &address in addresses {
        let _ = cache.read(address, &mut memory).unwrap();
    }
}

// ══════════════════════════════════════════════════════════
// 1. Cold Fill
// ══════════════════════════════════════════════════════════

#[test]
fn cold_lines_fill_in_way_order() {
    for policy in [ReplacementPolicy::Lru, ReplacementPolicy::Fifo] {
        let mut cache = two_way(policy, WritePolicy::Wb);
        read_all(&mut cache, &[0, 8]);
        assert_eq!(tags(&cache), vec![Some(0), Some(1)], "{policy}");
        assert_eq!(cache.stats().evictions, 0);
    }
}

// ══════════════════════════════════════════════════════════
// 2. LRU
// ══════════════════════════════════════════════════════════

#[test]
fn lru_evicts_least_recently_used() {
    let mut cache = two_way(ReplacementPolicy::Lru, WritePolicy::Wb);
    read_all(&mut cache, &[0, 8, 0, 16]);

    assert!(cache.contains(0));
    assert!(!cache.contains(8));
    assert!(cache.contains(16));
    assert_eq!(tags(&cache), vec![Some(0), Some(2)]);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn lru_counts_writes_as_uses() {
    let mut cache = two_way(ReplacementPolicy::Lru, WritePolicy::Wb);
    let mut memory = store();
    let _ = cache.read(0, &mut memory).unwrap();
    let _ = cache.read(8, &mut memory).unwrap();
    cache.write(1, 5, &mut memory).unwrap();
    let _ = cache.read(16, &mut memory).unwrap();

    assert!(cache.contains(0));
    assert!(!cache.contains(8));
}

// ══════════════════════════════════════════════════════════
// 3. FIFO
// ══════════════════════════════════════════════════════════

#[test]
fn fifo_ignores_hits() {
    let mut cache = two_way(ReplacementPolicy::Fifo, WritePolicy::Wb);
    read_all(&mut cache, &[0, 8, 0, 16]);

    assert!(!cache.contains(0));
    assert!(cache.contains(8));
    assert!(cache.contains(16));
    assert_eq!(tags(&cache), vec![Some(2), Some(1)]);
}

#[test]
fn fifo_cycles_through_ways() {
    let mut cache = two_way(ReplacementPolicy::Fifo, WritePolicy::Wb);
    read_all(&mut cache, &[0, 8, 16, 24]);
    assert_eq!(tags(&cache), vec![Some(2), Some(3)]);
}

// ══════════════════════════════════════════════════════════
// 4. LFU
// ══════════════════════════════════════════════════════════

#[test]
fn lfu_evicts_least_used() {
    let mut cache = two_way(ReplacementPolicy::Lfu, WritePolicy::Wb);
    read_all(&mut cache, &[0, 0, 8, 8, 8, 16]);

    assert!(!cache.contains(0));
    assert!(cache.contains(8));
    assert!(cache.contains(16));
    let lines = cache.set_lines(0).unwrap();
    assert_eq!(lines[0].frequency(), 0);
    assert_eq!(lines[1].frequency(), 2);
}

#[test]
fn lfu_fresh_line_ties_with_cold_line() {
    // A new block starts with zero uses, the same as an empty way, and ties go
    // to the lowest way.
    let mut cache = two_way(ReplacementPolicy::Lfu, WritePolicy::Wb);
    read_all(&mut cache, &[0, 8]);

    assert!(!cache.contains(0));
    assert!(cache.contains(8));
    assert!(!cache.set_lines(0).unwrap()[1].is_valid());
    assert_eq!(cache.stats().evictions, 1);
}

// ══════════════════════════════════════════════════════════
// 5. RAND
// ══════════════════════════════════════════════════════════

#[test]
fn rand_follows_injected_source() {
    let mut cache = zero_rng_cache();
    read_all(&mut cache, &[0, 8, 16]);

    assert_eq!(tags(&cache), vec![Some(2), None]);
    assert_eq!(cache.misses(), 3);
}

#[test]
fn rand_is_reproducible_from_seed() {
    let config = CacheConfig {
        mapping: Mapping::Full,
        replacement: ReplacementPolicy::Rand,
        seed: 42,
        ..CacheConfig::default()
    };
    let mut a = CacheSim::from_config(&config).unwrap();
    let mut b = CacheSim::with_rng(
        CacheGeometry::new(64, 8, 8).unwrap(),
        ReplacementPolicy::Rand,
        WritePolicy::Wb,
        ChaCha8Rng::seed_from_u64(42),
    );
    let addresses: Vec<u64> = (0..40).map(|n| (n * 37 % 128) * 8).collect();
    read_all(&mut a, &addresses);
    read_all(&mut b, &addresses);

    assert_eq!(tags(&a), tags(&b));
    assert_eq!(a.stats(), b.stats());
}

// ══════════════════════════════════════════════════════════
// 6. Victim Selection
// ══════════════════════════════════════════════════════════

#[test]
fn select_victim_prefers_lowest_way_on_ties() {
    let set = vec![CacheLine::new(8); 4];
    for policy in [
        ReplacementPolicy::Lru,
        ReplacementPolicy::Fifo,
        ReplacementPolicy::Lfu,
    ] {
        assert_eq!(select_victim(policy, &set, &mut ZeroRng), 0, "{policy}");
    }
}

#[test]
fn select_victim_uses_insertion_stamp() {
    let mut set = vec![CacheLine::new(1); 3];
    set[0].load(0, &[0], 5);
    set[1].load(1, &[0], 2);
    set[2].load(2, &[0], 9);
    assert_eq!(
        select_victim(ReplacementPolicy::Fifo, &set, &mut ZeroRng),
        1
    );
}

#[test]
fn select_victim_rand_stays_in_range() {
    let set = vec![CacheLine::new(8); 4];
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..100 {
        assert!(select_victim(ReplacementPolicy::Rand, &set, &mut rng) < 4);
    }
}
