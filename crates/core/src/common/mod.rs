//! Common types shared by the cache engine, the byte store, and the driver.
//!
//! 1. **Address Decomposition:** Block number, tag, set index, and offset of a byte address.
//! 2. **Error Handling:** The `SimError` taxonomy and crate-wide `Result` alias.

/// Address decomposition helpers.
pub mod addr;

/// Error types.
pub mod error;

pub use addr::{Decomposed, block_number};
pub use error::{Result, SimError};
