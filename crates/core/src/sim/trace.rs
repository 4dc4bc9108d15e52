//! Access traces.
//!
//! A trace is a sequence of reads and writes. The textual form is one access
//! per line:
//!
//! ```text
//! # comment
//! read 10
//! write 20 5
//! done
//! ```
//!
//! Keywords are case-insensitive, blank and `#` lines are skipped, and `done`
//! ends the trace early.

use std::fmt;

use crate::common::{Result, SimError};

/// One memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Read the byte at `address`.
    Read {
        /// Byte address.
        address: u64,
    },
    /// Write `value` to `address`.
    Write {
        /// Byte address.
        address: u64,
        /// Value to store; must fit in a byte when executed.
        value: u64,
    },
}

impl Access {
    /// Target address of the access.
    pub const fn address(&self) -> u64 {
        match *self {
            Self::Read { address } | Self::Write { address, .. } => address,
        }
    }

    /// Parses `read <address>` or `write <address> <value>`.
    ///
    /// Numbers are unsigned decimal. The value range is not checked here; an
    /// out-of-range value is rejected when the write executes.
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        let invalid = |reason: &str| SimError::InvalidAccess {
            line: trimmed.to_string(),
            reason: reason.to_string(),
        };
        let number = |field: &str, what: &str| {
            field
                .parse::<u64>()
                .map_err(|_| invalid(&format!("{what} `{field}` is not an unsigned integer")))
        };

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        match parts.as_slice() {
            [op, address] if op.eq_ignore_ascii_case("read") => Ok(Self::Read {
                address: number(*address, "address")?,
            }),
            [op, ..] if op.eq_ignore_ascii_case("read") => Err(invalid("format: read <address>")),
            [op, address, value] if op.eq_ignore_ascii_case("write") => Ok(Self::Write {
                address: number(*address, "address")?,
                value: number(*value, "value")?,
            }),
            [op, ..] if op.eq_ignore_ascii_case("write") => {
                Err(invalid("format: write <address> <value>"))
            }
            [] => Err(invalid("empty line")),
            _ => Err(invalid("unknown command, use read or write")),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { address } => write!(f, "read {address}"),
            Self::Write { address, value } => write!(f, "write {address} {value}"),
        }
    }
}

/// Parses a trace line by line without giving up on malformed lines.
///
/// Yields the 1-based line number and the parse result for every access line.
/// Blank and `#` lines are skipped; iteration ends at `done`.
pub fn trace_lines(text: &str) -> impl Iterator<Item = (usize, Result<Access>)> + '_ {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .take_while(|(_, line)| !line.eq_ignore_ascii_case("done"))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(lineno, line)| (lineno, Access::parse(line)))
}

/// Parses a whole trace, stopping at the first malformed line.
pub fn parse_trace(text: &str) -> Result<Vec<Access>> {
    trace_lines(text).map(|(_, access)| access).collect()
}

/// The ten-step sequence every demo runs.
pub fn reference_trace() -> Vec<Access> {
    vec![
        Access::Read { address: 10 },
        Access::Read { address: 14 },
        Access::Read { address: 10 },
        Access::Write {
            address: 18,
            value: 7,
        },
        Access::Read { address: 18 },
        Access::Read { address: 50 },
        Access::Read { address: 58 },
        Access::Write {
            address: 90,
            value: 33,
        },
        Access::Read { address: 90 },
        Access::Read { address: 10 },
    ]
}
