//! Set-associative cache simulator library.
//!
//! This crate models a single cache in front of a byte-addressable main memory:
//! 1. **Cache:** Address decomposition, set lookup, victim selection (RAND, LRU, FIFO, LFU),
//!    and the write-through / write-back / write-around state machine.
//! 2. **Memory:** A flat byte store with block and byte access.
//! 3. **Simulation:** Configuration, access traces, a driver, and statistics.
//!
//! ```
//! use cachesim_core::config::{ReplacementPolicy, WritePolicy};
//! use cachesim_core::{ByteStore, CacheSim};
//!
//! let mut memory = ByteStore::new(1024);
//! let mut cache = CacheSim::new(64, 8, 1, ReplacementPolicy::Lru, WritePolicy::Wb).unwrap();
//!
//! cache.write(18, 7, &mut memory).unwrap();
//! assert_eq!(cache.read(18, &mut memory).unwrap(), 7);
//! assert_eq!((cache.hits(), cache.misses()), (1, 1));
//! ```

/// Set-associative cache engine, lines, geometry, and replacement policies.
pub mod cache;
/// Common types (address decomposition, errors).
pub mod common;
/// Simulator configuration (defaults, enums, presets).
pub mod config;
/// Main memory byte store.
pub mod memory;
/// Trace parsing and the simulation driver.
pub mod sim;
/// Cache statistics.
pub mod stats;

/// Cache engine; construct with `CacheSim::new` or `CacheSim::from_config`.
pub use crate::cache::CacheSim;
/// Crate error type and result alias.
pub use crate::common::{Result, SimError};
/// Root configuration type.
pub use crate::config::Config;
/// Main memory.
pub use crate::memory::ByteStore;
/// Trace-driven simulator.
pub use crate::sim::Simulator;
