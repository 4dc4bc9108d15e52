//! Simulation driver.
//!
//! Couples one `CacheSim` with its `ByteStore` and replays access traces,
//! recording for each step whether it hit and what the counters read after it.

/// Access trace parsing and the reference trace.
pub mod trace;

pub use trace::{Access, parse_trace, reference_trace, trace_lines};

use tracing::info;

use crate::cache::CacheSim;
use crate::common::Result;
use crate::config::Config;
use crate::memory::ByteStore;

/// Outcome of one executed access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// The access performed.
    pub access: Access,
    /// Byte returned, for reads.
    pub value: Option<u8>,
    /// Whether the access hit.
    pub hit: bool,
    /// Hit counter after the step.
    pub hits: u64,
    /// Miss counter after the step.
    pub misses: u64,
}

/// A cache in front of a main memory, built from one configuration.
#[derive(Debug)]
pub struct Simulator {
    cache: CacheSim,
    memory: ByteStore,
}

impl Simulator {
    /// Validates `config` and builds a cold cache over zeroed memory.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = CacheSim::from_config(&config.cache)?;
        info!(
            memory = config.memory.size_bytes,
            cache = config.cache.size_bytes,
            block = config.cache.block_bytes,
            sets = cache.num_sets(),
            ways = cache.associativity(),
            replacement = %config.cache.replacement,
            write = %config.cache.write_policy,
            "simulator ready"
        );
        Ok(Self {
            cache,
            memory: ByteStore::new(config.memory.size_bytes),
        })
    }

    /// Executes one access.
    ///
    /// A hit is detected by comparing the hit counter before and after.
    /// On error the cache and memory are unchanged.
    pub fn step(&mut self, access: Access) -> Result<StepRecord> {
        let hits_before = self.cache.hits();
        let value = match access {
            Access::Read { address } => Some(self.cache.read(address, &mut self.memory)?),
            Access::Write { address, value } => {
                self.cache.write(address, value, &mut self.memory)?;
                None
            }
        };
        Ok(StepRecord {
            access,
            value,
            hit: self.cache.hits() > hits_before,
            hits: self.cache.hits(),
            misses: self.cache.misses(),
        })
    }

    /// Executes every access in order, stopping at the first error.
    pub fn run(&mut self, trace: &[Access]) -> Result<Vec<StepRecord>> {
        trace.iter().map(|&access| self.step(access)).collect()
    }

    /// The cache engine.
    pub const fn cache(&self) -> &CacheSim {
        &self.cache
    }

    /// Main memory.
    pub const fn memory(&self) -> &ByteStore {
        &self.memory
    }

    /// Mutable main memory, for preloading.
    pub const fn memory_mut(&mut self) -> &mut ByteStore {
        &mut self.memory
    }

    /// Writes all dirty lines back to memory.
    pub fn flush(&mut self) -> Result<usize> {
        self.cache.flush(&mut self.memory)
    }
}
