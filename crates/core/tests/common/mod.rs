//! Shared test fixtures.

use cachesim_core::cache::{CacheGeometry, CacheSim};
use cachesim_core::config::{ReplacementPolicy, WritePolicy};
use cachesim_core::memory::ByteStore;
use rand::RngCore;
use tracing_subscriber::EnvFilter;

/// Memory size used by the reference demos.
pub const MEMORY_SIZE: usize = 1024;

/// Routes library `tracing` output to the test writer; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Zero-filled 1 KiB store.
pub fn store() -> ByteStore {
    ByteStore::new(MEMORY_SIZE)
}

/// The reference geometry: 64-byte cache of 8-byte blocks.
///
/// With `ways = 1` there are 8 sets: set = (addr / 8) % 8, tag = addr / 64.
pub fn cache(ways: usize, replacement: ReplacementPolicy, write: WritePolicy) -> CacheSim {
    init_tracing();
    CacheSim::new(64, 8, ways, replacement, write).unwrap()
}

/// A single fully associative set of two 8-byte lines.
///
/// Every block maps to set 0 and its tag equals its block number.
pub fn two_way(replacement: ReplacementPolicy, write: WritePolicy) -> CacheSim {
    init_tracing();
    CacheSim::new(16, 8, 2, replacement, write).unwrap()
}

/// Random source that always yields zero bits, pinning `RAND` to way 0.
#[derive(Debug, Default)]
pub struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

/// Two-way single-set RAND cache driven by `ZeroRng`.
pub fn zero_rng_cache() -> CacheSim<ZeroRng> {
    let geometry = CacheGeometry::new(16, 8, 2).unwrap();
    CacheSim::with_rng(geometry, ReplacementPolicy::Rand, WritePolicy::Wb, ZeroRng)
}
