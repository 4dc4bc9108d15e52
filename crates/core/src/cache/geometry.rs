//! Cache geometry.
//!
//! Validates the size/block/associativity triple once at construction and
//! caches the derived line and set counts used by every access.

use crate::common::{Decomposed, Result, SimError, block_number};

/// Validated cache dimensions.
///
/// Invariant: `num_sets * associativity * block_size == cache_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheGeometry {
    cache_size: usize,
    block_size: usize,
    associativity: usize,
    num_lines: usize,
    num_sets: usize,
}

impl CacheGeometry {
    /// Validates and builds a geometry.
    ///
    /// # Arguments
    ///
    /// * `cache_size` - Total capacity in bytes.
    /// * `block_size` - Bytes per line.
    /// * `associativity` - Lines per set.
    ///
    /// # Returns
    ///
    /// `InvalidConfiguration` unless all three are positive, the cache holds a
    /// whole number of blocks, and the line count divides evenly into sets.
    pub fn new(cache_size: usize, block_size: usize, associativity: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(SimError::InvalidConfiguration(
                "block size must be > 0".into(),
            ));
        }
        if associativity == 0 {
            return Err(SimError::InvalidConfiguration(
                "associativity must be > 0".into(),
            ));
        }
        if cache_size == 0 {
            return Err(SimError::InvalidConfiguration(
                "cache size must be > 0".into(),
            ));
        }
        if cache_size % block_size != 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "cache size {cache_size} is not a multiple of block size {block_size}"
            )));
        }
        let num_lines = cache_size / block_size;
        if num_lines % associativity != 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "associativity {associativity} does not divide the {num_lines} cache lines"
            )));
        }
        Ok(Self {
            cache_size,
            block_size,
            associativity,
            num_lines,
            num_sets: num_lines / associativity,
        })
    }

    /// Total capacity in bytes.
    pub const fn cache_size(&self) -> usize {
        self.cache_size
    }

    /// Bytes per line.
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Lines per set.
    pub const fn associativity(&self) -> usize {
        self.associativity
    }

    /// Total number of lines.
    pub const fn num_lines(&self) -> usize {
        self.num_lines
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Splits `address` into block number, tag, set index, and offset.
    #[inline]
    pub const fn decompose(&self, address: u64) -> Decomposed {
        Decomposed::new(address, self.block_size, self.num_sets)
    }

    /// Memory block number of the line holding `tag` in set `set_index`.
    #[inline]
    pub const fn block_number(&self, tag: u64, set_index: usize) -> u64 {
        block_number(tag, set_index, self.num_sets)
    }
}
