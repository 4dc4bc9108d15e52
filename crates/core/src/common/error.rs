//! Simulator error definitions.
//!
//! This module defines the failure taxonomy shared by every component. It provides:
//! 1. **Construction Errors:** Cache or memory geometries that cannot be built.
//! 2. **Access Errors:** Out-of-range addresses and byte values that do not fit in a byte.
//! 3. **Input Errors:** Malformed trace lines and configuration documents.
//!
//! Construction errors are terminal for the configuration that produced them;
//! access errors are recoverable and leave the simulator state untouched.

use thiserror::Error;

/// Errors produced by the cache engine, the byte store, and their front-ends.
#[derive(Debug, Error)]
pub enum SimError {
    /// The requested cache or memory geometry is inconsistent.
    ///
    /// Raised at construction time; the caller must rebuild with valid parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An address (or the block containing it) lies outside the byte store.
    #[error("address {address} is out of range for a {len}-byte store")]
    AddressOutOfRange {
        /// The first byte address that could not be accessed.
        address: u64,
        /// Length of the byte store in bytes.
        len: usize,
    },

    /// A value written to memory does not fit in a single byte.
    #[error("value {0} does not fit in a byte (0-255)")]
    InvalidValue(u64),

    /// A trace line could not be parsed into an access.
    #[error("invalid access `{line}`: {reason}")]
    InvalidAccess {
        /// The offending line, trimmed.
        line: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A JSON configuration document failed to deserialize.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Returns `true` when the simulation can continue after this error.
    ///
    /// Access-level failures reject only the offending operation; configuration
    /// failures require a new engine.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AddressOutOfRange { .. } | Self::InvalidValue(_) | Self::InvalidAccess { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;
