//! Main Memory (Byte Store).
//!
//! This module implements the flat, byte-addressable backing store that sits
//! behind the cache. It provides:
//! 1. **Block Transfers:** Whole-block reads and writes used for fills and write-backs.
//! 2. **Byte Access:** Single-byte reads and writes used by write-through paths.
//! 3. **Preloading:** Bulk copies for seeding memory before a run.
//!
//! The store is allocated once, zero-filled, and never resized. Every accessor
//! bounds-checks and reports `SimError::AddressOutOfRange` instead of panicking.

use std::fmt::Write as _;
use std::ops::Range;

use tracing::trace;

use crate::common::{Result, SimError};

/// Flat main memory of fixed length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteStore {
    bytes: Vec<u8>,
}

impl ByteStore {
    /// Creates a zero-filled store of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Returns the size of the store in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the store holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the whole store contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Fails with `AddressOutOfRange` unless `address` names a byte of this store.
    pub fn check_address(&self, address: u64) -> Result<usize> {
        match usize::try_from(address) {
            Ok(index) if index < self.bytes.len() => Ok(index),
            _ => Err(self.out_of_range(address)),
        }
    }

    /// Reads a copy of block `block_num`.
    ///
    /// # Arguments
    ///
    /// * `block_num` - Block number; the block starts at `block_num * block_size`.
    /// * `block_size` - Number of bytes per block.
    ///
    /// # Returns
    ///
    /// The `block_size` bytes of the block, or `AddressOutOfRange` if any of
    /// them lies past the end of the store.
    pub fn read_block(&self, block_num: u64, block_size: usize) -> Result<Vec<u8>> {
        let range = self.block_range(block_num, block_size)?;
        trace!(block_num, block_size, "store block read");
        Ok(self.bytes[range].to_vec())
    }

    /// Overwrites block `block_num` with `data`; the block size is `data.len()`.
    pub fn write_block(&mut self, block_num: u64, data: &[u8]) -> Result<()> {
        let range = self.block_range(block_num, data.len())?;
        trace!(block_num, block_size = data.len(), "store block write");
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Reads the byte at `address`.
    pub fn read_byte(&self, address: u64) -> Result<u8> {
        let index = self.check_address(address)?;
        Ok(self.bytes[index])
    }

    /// Writes `value` at `address`.
    ///
    /// Values above 255 are rejected with `InvalidValue` rather than masked.
    pub fn write_byte(&mut self, address: u64, value: u64) -> Result<()> {
        let byte = u8::try_from(value).map_err(|_| SimError::InvalidValue(value))?;
        let index = self.check_address(address)?;
        trace!(address, value, "store byte write");
        self.bytes[index] = byte;
        Ok(())
    }

    /// Copies `data` into the store starting at `offset`.
    ///
    /// Used to seed memory before a run. Fails without writing anything if the
    /// data does not fit.
    pub fn load(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        let start = self.check_address(offset)?;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.out_of_range(offset))?;
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    fn block_range(&self, block_num: u64, block_size: usize) -> Result<Range<usize>> {
        let start = usize::try_from(block_num)
            .ok()
            .and_then(|b| b.checked_mul(block_size));
        let Some(start) = start else {
            return Err(self.out_of_range(block_num.saturating_mul(block_size as u64)));
        };
        match start.checked_add(block_size) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(self.out_of_range(start as u64)),
        }
    }

    fn out_of_range(&self, address: u64) -> SimError {
        SimError::AddressOutOfRange {
            address,
            len: self.bytes.len(),
        }
    }
}

/// Formats bytes as uppercase two-digit hex separated by spaces.
///
/// ```
/// use cachesim_core::memory::hexdump;
///
/// assert_eq!(hexdump(&[0x00, 0x1f, 0xab]), "00 1F AB");
/// ```
pub fn hexdump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02X}");
    }
    out
}
