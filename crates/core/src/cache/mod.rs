//! Set-Associative Cache Engine.
//!
//! This module implements the cache that sits in front of a `ByteStore`.
//! It supports four replacement policies (RAND, LRU, FIFO, LFU) and three
//! write policies (write-through, write-back, write-around), and it moves real
//! data: reads return the cached byte, write-backs copy dirty blocks to memory.
//!
//! Lines live in one flat arena of `num_sets * associativity` slots allocated
//! at construction; set `s`, way `w` is slot `s * associativity + w`.

/// Validated cache dimensions.
pub mod geometry;

/// Cache line slot.
pub mod line;

/// Cache replacement policy implementations (RAND, LRU, FIFO, LFU).
pub mod policies;

pub use geometry::CacheGeometry;
pub use line::CacheLine;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::common::{Decomposed, Result, SimError};
use crate::config::{CacheConfig, ReplacementPolicy, WritePolicy};
use crate::memory::ByteStore;
use crate::stats::CacheStats;

/// Seed used when the caller does not supply a random source.
pub const DEFAULT_SEED: u64 = 0;

/// Cache simulator implementing a set-associative cache with configurable policies.
///
/// The random source `R` is only consulted by `ReplacementPolicy::Rand`; it is
/// injected so that runs are reproducible and tests can control it.
#[derive(Debug)]
pub struct CacheSim<R = ChaCha8Rng> {
    geometry: CacheGeometry,
    replacement: ReplacementPolicy,
    write_policy: WritePolicy,
    lines: Vec<CacheLine>,
    /// Logical clock, advanced once per operation.
    clock: u64,
    stats: CacheStats,
    rng: R,
}

impl CacheSim<ChaCha8Rng> {
    /// Creates a cache with a `ChaCha8Rng` seeded from [`DEFAULT_SEED`].
    ///
    /// # Arguments
    ///
    /// * `cache_size` - Total capacity in bytes.
    /// * `block_size` - Bytes per line.
    /// * `associativity` - Lines per set.
    /// * `replacement` - Victim selection policy.
    /// * `write_policy` - Write handling policy.
    ///
    /// # Returns
    ///
    /// The cache, or `InvalidConfiguration` if the geometry is inconsistent.
    pub fn new(
        cache_size: usize,
        block_size: usize,
        associativity: usize,
        replacement: ReplacementPolicy,
        write_policy: WritePolicy,
    ) -> Result<Self> {
        let geometry = CacheGeometry::new(cache_size, block_size, associativity)?;
        Ok(Self::with_rng(
            geometry,
            replacement,
            write_policy,
            ChaCha8Rng::seed_from_u64(DEFAULT_SEED),
        ))
    }

    /// Creates a cache from its configuration section, seeding the random source from `config.seed`.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::with_rng(
            config.geometry()?,
            config.replacement,
            config.write_policy,
            ChaCha8Rng::seed_from_u64(config.seed),
        ))
    }
}

impl<R: RngCore> CacheSim<R> {
    /// Creates a cache with an explicit random source.
    ///
    /// All lines start invalid, clean, and with zeroed replacement metadata.
    pub fn with_rng(
        geometry: CacheGeometry,
        replacement: ReplacementPolicy,
        write_policy: WritePolicy,
        rng: R,
    ) -> Self {
        Self {
            lines: vec![CacheLine::new(geometry.block_size()); geometry.num_lines()],
            geometry,
            replacement,
            write_policy,
            clock: 0,
            stats: CacheStats::default(),
            rng,
        }
    }

    /// Reads the byte at `address` through the cache.
    ///
    /// On a hit the line's recency and use count are bumped. On a miss the
    /// block is fetched from `store`, a victim is chosen in the target set, a
    /// dirty victim is written back, and the block is installed. Reads always
    /// allocate, whatever the write policy.
    ///
    /// # Returns
    ///
    /// The byte value, `InvalidConfiguration` if `store` is not a whole number
    /// of blocks, or `AddressOutOfRange` if `address` is outside `store`.
    /// A failed read changes no counter and no line.
    pub fn read(&mut self, address: u64, store: &mut ByteStore) -> Result<u8> {
        self.check_store(store)?;
        let _ = store.check_address(address)?;
        let d = self.geometry.decompose(address);

        if let Some(way) = self.find(d.set_index, d.tag) {
            self.clock += 1;
            self.stats.reads += 1;
            self.stats.hits += 1;
            let clock = self.clock;
            let line = self.line_mut(d.set_index, way);
            line.touch(clock);
            trace!(address, set = d.set_index, way, "read hit");
            return Ok(line.data()[d.offset]);
        }

        let block = store.read_block(d.block_num, self.geometry.block_size())?;
        self.clock += 1;
        self.stats.reads += 1;
        self.stats.misses += 1;
        debug!(address, block_num = d.block_num, set = d.set_index, "read miss");
        let way = self.allocate(d, &block, store)?;
        Ok(self.line(d.set_index, way).data()[d.offset])
    }

    /// Writes `value` to `address` through the cache.
    ///
    /// | policy | hit                               | miss                          |
    /// |--------|-----------------------------------|-------------------------------|
    /// | WT     | update line and memory            | update memory only            |
    /// | WB     | update line, mark dirty           | fetch, install, update, dirty |
    /// | WA     | update line and memory            | update memory only            |
    ///
    /// # Returns
    ///
    /// `InvalidValue` if `value > 255`, `InvalidConfiguration` if `store` is
    /// not a whole number of blocks, `AddressOutOfRange` if `address` is
    /// outside `store`. A failed write changes no counter, line, or memory byte.
    pub fn write(&mut self, address: u64, value: u64, store: &mut ByteStore) -> Result<()> {
        let byte = u8::try_from(value).map_err(|_| SimError::InvalidValue(value))?;
        self.check_store(store)?;
        let _ = store.check_address(address)?;
        let d = self.geometry.decompose(address);

        if let Some(way) = self.find(d.set_index, d.tag) {
            if self.write_policy != WritePolicy::Wb {
                store.write_byte(address, value)?;
            }
            self.clock += 1;
            self.stats.writes += 1;
            self.stats.hits += 1;
            let clock = self.clock;
            let write_back = self.write_policy == WritePolicy::Wb;
            let line = self.line_mut(d.set_index, way);
            line.write_byte(d.offset, byte);
            line.touch(clock);
            if write_back {
                line.set_dirty(true);
            }
            trace!(address, value, set = d.set_index, way, "write hit");
            return Ok(());
        }

        if !self.write_policy.allocates_on_write() {
            store.write_byte(address, value)?;
            self.clock += 1;
            self.stats.writes += 1;
            self.stats.misses += 1;
            debug!(address, value, policy = %self.write_policy, "write miss, bypassing cache");
            return Ok(());
        }

        let block = store.read_block(d.block_num, self.geometry.block_size())?;
        self.clock += 1;
        self.stats.writes += 1;
        self.stats.misses += 1;
        debug!(address, value, block_num = d.block_num, set = d.set_index, "write miss, allocating");
        let way = self.allocate(d, &block, store)?;
        let line = self.line_mut(d.set_index, way);
        line.write_byte(d.offset, byte);
        line.set_dirty(true);
        Ok(())
    }

    /// Returns `true` if the block containing `address` is resident.
    ///
    /// Pure lookup: no counter, stamp, or line changes.
    pub fn contains(&self, address: u64) -> bool {
        let d = self.geometry.decompose(address);
        self.find(d.set_index, d.tag).is_some()
    }

    /// Writes every dirty line back to `store`, leaving lines valid and clean.
    ///
    /// # Returns
    ///
    /// The number of lines written back.
    pub fn flush(&mut self, store: &mut ByteStore) -> Result<usize> {
        let ways = self.geometry.associativity();
        let mut flushed = 0;
        for (idx, line) in self.lines.iter_mut().enumerate() {
            let Some(tag) = line.tag().filter(|_| line.is_dirty()) else {
                continue;
            };
            let block_num = self.geometry.block_number(tag, idx / ways);
            store.write_block(block_num, line.data())?;
            line.set_dirty(false);
            self.stats.write_backs += 1;
            flushed += 1;
        }
        debug!(flushed, "cache flushed");
        Ok(flushed)
    }

    /// Returns every line to the cold state without writing anything back.
    ///
    /// Dirty data is discarded; call [`CacheSim::flush`] first to keep it.
    pub fn invalidate_all(&mut self) {
        for line in &mut self.lines {
            line.invalidate();
        }
    }

    /// Splits `address` under this cache's geometry.
    pub const fn decompose(&self, address: u64) -> Decomposed {
        self.geometry.decompose(address)
    }

    /// The lines of set `set_index`, indexed by way.
    pub fn set_lines(&self, set_index: usize) -> Option<&[CacheLine]> {
        let ways = self.geometry.associativity();
        let base = set_index.checked_mul(ways)?;
        self.lines.get(base..base + ways)
    }

    /// Validated dimensions.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.geometry.num_sets()
    }

    /// Total number of lines.
    pub const fn num_lines(&self) -> usize {
        self.geometry.num_lines()
    }

    /// Lines per set.
    pub const fn associativity(&self) -> usize {
        self.geometry.associativity()
    }

    /// Bytes per line.
    pub const fn block_size(&self) -> usize {
        self.geometry.block_size()
    }

    /// Total capacity in bytes.
    pub const fn cache_size(&self) -> usize {
        self.geometry.cache_size()
    }

    /// Replacement policy in use.
    pub const fn replacement_policy(&self) -> ReplacementPolicy {
        self.replacement
    }

    /// Write policy in use.
    pub const fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    /// All counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of hits so far.
    pub const fn hits(&self) -> u64 {
        self.stats.hits
    }

    /// Number of misses so far.
    pub const fn misses(&self) -> u64 {
        self.stats.misses
    }

    /// `hits / (hits + misses)`, or 0.0 before any access.
    pub fn hit_ratio(&self) -> f64 {
        self.stats.hit_ratio()
    }

    /// Fails unless `store` splits into whole blocks of this cache's size.
    ///
    /// A trailing partial block could never be fetched, so it is reported
    /// for every access rather than only for addresses inside it.
    fn check_store(&self, store: &ByteStore) -> Result<()> {
        let block_size = self.geometry.block_size();
        if store.len() % block_size == 0 {
            Ok(())
        } else {
            Err(SimError::InvalidConfiguration(format!(
                "memory size {} is not a multiple of block size {block_size}",
                store.len()
            )))
        }
    }

    /// Way of the valid line holding `tag` in `set_index`, if any.
    fn find(&self, set_index: usize, tag: u64) -> Option<usize> {
        let base = set_index * self.geometry.associativity();
        self.lines[base..base + self.geometry.associativity()]
            .iter()
            .position(|line| line.matches(tag))
    }

    fn line(&self, set_index: usize, way: usize) -> &CacheLine {
        &self.lines[set_index * self.geometry.associativity() + way]
    }

    fn line_mut(&mut self, set_index: usize, way: usize) -> &mut CacheLine {
        &mut self.lines[set_index * self.geometry.associativity() + way]
    }

    /// Installs `block` in the target set of `d` and returns its way.
    ///
    /// Chooses a victim with the replacement policy, writes it back if dirty,
    /// then loads the block and stamps the line with the current clock.
    fn allocate(&mut self, d: Decomposed, block: &[u8], store: &mut ByteStore) -> Result<usize> {
        let ways = self.geometry.associativity();
        let base = d.set_index * ways;
        let way = policies::select_victim(
            self.replacement,
            &self.lines[base..base + ways],
            &mut self.rng,
        );
        let victim = &self.lines[base + way];

        if let Some(old_tag) = victim.tag() {
            self.stats.evictions += 1;
            if victim.is_dirty() {
                let victim_block = self.geometry.block_number(old_tag, d.set_index);
                debug!(
                    set = d.set_index,
                    way,
                    block_num = victim_block,
                    "writing back dirty victim"
                );
                store.write_block(victim_block, victim.data())?;
                self.stats.write_backs += 1;
            } else {
                trace!(set = d.set_index, way, old_tag, "evicting clean line");
            }
        }

        let clock = self.clock;
        let line = &mut self.lines[base + way];
        line.load(d.tag, block, clock);
        line.stamp(clock);
        Ok(way)
    }
}
