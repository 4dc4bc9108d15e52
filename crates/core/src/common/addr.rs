//! Address decomposition.
//!
//! A byte address seen by the cache splits into four derived fields:
//! 1. **Block Number:** `address / block_size`, the unit of transfer to and from the store.
//! 2. **Tag:** `block_num / num_sets`, identifying which block occupies a line.
//! 3. **Set Index:** `block_num % num_sets`, selecting the set the block may live in.
//! 4. **Offset:** `address % block_size`, the byte within the block.
//!
//! The fields are never stored; they are recomputed from the address on every access.

/// The fields of a byte address as interpreted by one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decomposed {
    /// Memory block number containing the address.
    pub block_num: u64,
    /// Tag stored in the cache line that holds this block.
    pub tag: u64,
    /// Index of the set the block maps to.
    pub set_index: usize,
    /// Byte offset within the block.
    pub offset: usize,
}

impl Decomposed {
    /// Splits `address` for a cache with `block_size`-byte blocks and `num_sets` sets.
    ///
    /// # Arguments
    ///
    /// * `address` - Byte address into main memory.
    /// * `block_size` - Block size in bytes (non-zero).
    /// * `num_sets` - Number of sets in the cache (non-zero).
    #[inline]
    pub const fn new(address: u64, block_size: usize, num_sets: usize) -> Self {
        let block_num = address / block_size as u64;
        Self {
            block_num,
            tag: block_num / num_sets as u64,
            set_index: (block_num % num_sets as u64) as usize,
            offset: (address % block_size as u64) as usize,
        }
    }
}

/// Rebuilds the memory block number of a line from its tag and set.
///
/// Inverse of the tag/set split: `tag * num_sets + set_index`. Used to locate
/// the store range a dirty victim must be written back to.
#[inline]
pub const fn block_number(tag: u64, set_index: usize, num_sets: usize) -> u64 {
    tag * num_sets as u64 + set_index as u64
}
