//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a simulation run. It provides:
//! 1. **Defaults:** Baseline memory and cache geometry.
//! 2. **Structures:** `Config` with its memory and cache sections.
//! 3. **Enums:** Mapping, replacement policy, and write policy selectors.
//! 4. **Presets:** The four reference demonstrations.
//!
//! Configuration is deserialized from JSON or built in code; `Config::default()`
//! reproduces the first reference demo.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::cache::CacheGeometry;
use crate::common::{Result, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Main memory size in bytes (1 KiB).
    pub const MEMORY_SIZE: usize = 1024;

    /// Total cache capacity in bytes.
    pub const CACHE_SIZE: usize = 64;

    /// Block (line) size in bytes.
    pub const BLOCK_SIZE: usize = 8;

    /// Seed for the random replacement source.
    pub const SEED: u64 = 0;
}

/// How memory blocks map onto cache lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Mapping {
    /// Direct-mapped: one line per set.
    #[default]
    Direct,
    /// Fully associative: a single set holding every line.
    Full,
    /// N-way set associative.
    Set(usize),
}

impl Mapping {
    /// Resolves the mapping to an associativity for a cache of `num_lines` lines.
    pub const fn associativity(self, num_lines: usize) -> usize {
        match self {
            Self::Direct => 1,
            Self::Full => num_lines,
            Self::Set(n) => n,
        }
    }
}

impl FromStr for Mapping {
    type Err = SimError;

    /// Parses `direct`, `full`, or `set:N` (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "direct" => Ok(Self::Direct),
            "full" => Ok(Self::Full),
            other => {
                let ways = other
                    .strip_prefix("set:")
                    .and_then(|n| n.trim().parse::<usize>().ok())
                    .ok_or_else(|| {
                        SimError::InvalidConfiguration(format!(
                            "mapping `{s}` must be direct, full, or set:N"
                        ))
                    })?;
                if ways == 0 {
                    return Err(SimError::InvalidConfiguration(
                        "set associativity must be > 0".into(),
                    ));
                }
                Ok(Self::Set(ways))
            }
        }
    }
}

impl TryFrom<String> for Mapping {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Full => f.write_str("full"),
            Self::Set(n) => write!(f, "set:{n}"),
        }
    }
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which line of a set is reused
/// when a new block must be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Uniformly random line of the set.
    #[serde(alias = "Rand", alias = "rand", alias = "Random")]
    Rand,
    /// Least Recently Used.
    ///
    /// Evicts the line with the oldest access stamp.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// First In First Out.
    ///
    /// Evicts the line loaded longest ago, regardless of later hits.
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Least Frequently Used.
    ///
    /// Evicts the line with the fewest hits since it was loaded.
    #[serde(alias = "Lfu", alias = "lfu")]
    Lfu,
}

impl ReplacementPolicy {
    /// Every policy, in menu order.
    pub const ALL: [Self; 4] = [Self::Rand, Self::Lru, Self::Fifo, Self::Lfu];
}

impl FromStr for ReplacementPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RAND" | "RANDOM" => Ok(Self::Rand),
            "LRU" => Ok(Self::Lru),
            "FIFO" => Ok(Self::Fifo),
            "LFU" => Ok(Self::Lfu),
            _ => Err(SimError::InvalidConfiguration(format!(
                "replacement policy `{s}` must be one of RAND, LRU, FIFO, LFU"
            ))),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rand => "RAND",
            Self::Lru => "LRU",
            Self::Fifo => "FIFO",
            Self::Lfu => "LFU",
        })
    }
}

/// Write handling policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WritePolicy {
    /// Write-through, no-write-allocate.
    ///
    /// Every write reaches memory immediately; write misses bypass the cache.
    #[serde(alias = "Wt", alias = "wt")]
    Wt,
    /// Write-back, write-allocate.
    ///
    /// Writes mark the line dirty; memory is updated when the line is evicted.
    #[default]
    #[serde(alias = "Wb", alias = "wb")]
    Wb,
    /// Write-around.
    ///
    /// Hits update the line and memory; misses go straight to memory and never allocate.
    #[serde(alias = "Wa", alias = "wa")]
    Wa,
}

impl WritePolicy {
    /// Every policy, in menu order.
    pub const ALL: [Self; 3] = [Self::Wt, Self::Wb, Self::Wa];

    /// Returns `true` if a write miss installs the block in the cache.
    pub const fn allocates_on_write(self) -> bool {
        matches!(self, Self::Wb)
    }
}

impl FromStr for WritePolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WT" => Ok(Self::Wt),
            "WB" => Ok(Self::Wb),
            "WA" => Ok(Self::Wa),
            _ => Err(SimError::InvalidConfiguration(format!(
                "write policy `{s}` must be one of WT, WB, WA"
            ))),
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wt => "WT",
            Self::Wb => "WB",
            Self::Wa => "WA",
        })
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use cachesim_core::config::{Config, Mapping, ReplacementPolicy, WritePolicy};
///
/// let json = r#"{
///     "memory": { "size_bytes": 4096 },
///     "cache": {
///         "size_bytes": 256,
///         "block_bytes": 16,
///         "mapping": "set:4",
///         "replacement": "LFU",
///         "write_policy": "WT"
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.size_bytes, 4096);
/// assert_eq!(config.cache.mapping, Mapping::Set(4));
/// assert_eq!(config.cache.replacement, ReplacementPolicy::Lfu);
/// assert_eq!(config.cache.write_policy, WritePolicy::Wt);
/// assert_eq!(config.cache.seed, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Main memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that memory and cache geometry are mutually consistent.
    ///
    /// The memory must be non-empty and a whole number of blocks, and the
    /// cache geometry must pass `CacheGeometry` validation.
    pub fn validate(&self) -> Result<()> {
        let geometry = self.cache.geometry()?;
        if self.memory.size_bytes == 0 {
            return Err(SimError::InvalidConfiguration(
                "memory size must be > 0".into(),
            ));
        }
        if self.memory.size_bytes % geometry.block_size() != 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "memory size {} is not a multiple of block size {}",
                self.memory.size_bytes,
                geometry.block_size()
            )));
        }
        Ok(())
    }

    /// Builds a configuration from power-of-two exponents.
    ///
    /// Sizes are `2^mem_exp`, `2^cache_exp`, and `2^block_exp` bytes.
    pub fn from_exponents(
        mem_exp: u32,
        cache_exp: u32,
        block_exp: u32,
        mapping: Mapping,
        replacement: ReplacementPolicy,
        write_policy: WritePolicy,
    ) -> Result<Self> {
        let pow = |exp: u32| {
            1usize
                .checked_shl(exp)
                .ok_or_else(|| SimError::InvalidConfiguration(format!("exponent {exp} is too large")))
        };
        let config = Self {
            memory: MemoryConfig {
                size_bytes: pow(mem_exp)?,
            },
            cache: CacheConfig {
                size_bytes: pow(cache_exp)?,
                block_bytes: pow(block_exp)?,
                mapping,
                replacement,
                write_policy,
                seed: defaults::SEED,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Memory size in bytes
    #[serde(default = "MemoryConfig::default_size")]
    pub size_bytes: usize,
}

impl MemoryConfig {
    /// Returns the default memory size in bytes.
    const fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::MEMORY_SIZE,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Block (line) size in bytes
    #[serde(default = "CacheConfig::default_block")]
    pub block_bytes: usize,

    /// Mapping: direct, full, or set:N
    #[serde(default)]
    pub mapping: Mapping,

    /// Replacement policy
    #[serde(default)]
    pub replacement: ReplacementPolicy,

    /// Write policy
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// Seed for the random replacement source
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,
}

impl CacheConfig {
    /// Returns the default cache size in bytes.
    const fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default block size in bytes.
    const fn default_block() -> usize {
        defaults::BLOCK_SIZE
    }

    /// Returns the default random seed.
    const fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Resolves the mapping and validates the resulting geometry.
    pub fn geometry(&self) -> Result<CacheGeometry> {
        let num_lines = if self.block_bytes == 0 {
            0
        } else {
            self.size_bytes / self.block_bytes
        };
        CacheGeometry::new(
            self.size_bytes,
            self.block_bytes,
            self.mapping.associativity(num_lines),
        )
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            block_bytes: defaults::BLOCK_SIZE,
            mapping: Mapping::default(),
            replacement: ReplacementPolicy::default(),
            write_policy: WritePolicy::default(),
            seed: defaults::SEED,
        }
    }
}

/// The built-in demonstration configurations.
///
/// All presets use 1024 bytes of memory, a 64-byte cache, and 8-byte blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// LRU, direct-mapped, write-back.
    LruDirectWb,
    /// FIFO, fully associative, write-back.
    FifoFullWb,
    /// LRU, 2-way set associative, write-through.
    Lru2WayWt,
    /// Random, direct-mapped, write-back.
    RandDirectWb,
}

impl Preset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 4] = [
        Self::LruDirectWb,
        Self::FifoFullWb,
        Self::Lru2WayWt,
        Self::RandDirectWb,
    ];

    /// Human-readable title.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LruDirectWb => "LRU Direct-Mapped WB",
            Self::FifoFullWb => "FIFO Fully Associative WB",
            Self::Lru2WayWt => "LRU 2-Way Set Associative WT",
            Self::RandDirectWb => "RAND Direct-Mapped WB",
        }
    }

    /// Returns the configuration this preset runs with.
    pub fn config(self) -> Config {
        let (mapping, replacement, write_policy) = match self {
            Self::LruDirectWb => (Mapping::Direct, ReplacementPolicy::Lru, WritePolicy::Wb),
            Self::FifoFullWb => (Mapping::Full, ReplacementPolicy::Fifo, WritePolicy::Wb),
            Self::Lru2WayWt => (Mapping::Set(2), ReplacementPolicy::Lru, WritePolicy::Wt),
            Self::RandDirectWb => (Mapping::Direct, ReplacementPolicy::Rand, WritePolicy::Wb),
        };
        Config {
            memory: MemoryConfig::default(),
            cache: CacheConfig {
                mapping,
                replacement,
                write_policy,
                ..CacheConfig::default()
            },
        }
    }
}

impl FromStr for Preset {
    type Err = SimError;

    /// Accepts the menu number (`1`-`4`) or a slug such as `lru-direct-wb`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "lru-direct-wb" => Ok(Self::LruDirectWb),
            "2" | "fifo-full-wb" => Ok(Self::FifoFullWb),
            "3" | "lru-2way-wt" => Ok(Self::Lru2WayWt),
            "4" | "rand-direct-wb" => Ok(Self::RandDirectWb),
            _ => Err(SimError::InvalidConfiguration(format!(
                "unknown preset `{s}` (expected 1-4, lru-direct-wb, fifo-full-wb, lru-2way-wt, rand-direct-wb)"
            ))),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
