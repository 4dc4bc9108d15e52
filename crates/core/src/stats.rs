//! Cache statistics collection and reporting.
//!
//! This module tracks the counters a cache run exposes. It provides:
//! 1. **Hit/Miss:** One of the two is incremented per successful operation.
//! 2. **Operation Mix:** Reads versus writes.
//! 3. **Replacement Traffic:** Evictions of valid lines and dirty write-backs.
//!
//! All counters are monotonically non-decreasing for the lifetime of the engine.

use std::fmt;

/// Counters for one cache engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that did not.
    pub misses: u64,
    /// Read operations completed.
    pub reads: u64,
    /// Write operations completed.
    pub writes: u64,
    /// Fills that replaced a valid line.
    pub evictions: u64,
    /// Dirty lines written back to memory (eviction or flush).
    pub write_backs: u64,
}

impl CacheStats {
    /// Total completed operations (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit; 0.0 before any access.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fraction of accesses that missed; 0.0 before any access.
    pub fn miss_ratio(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        }
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for CacheStats {
    /// Formats the counters as a multi-line report.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================")?;
        writeln!(f, "CACHE STATISTICS")?;
        writeln!(f, "==========================================")?;
        writeln!(f, "accesses                 {}", self.accesses())?;
        writeln!(f, "  reads                  {}", self.reads)?;
        writeln!(f, "  writes                 {}", self.writes)?;
        writeln!(f, "hits                     {}", self.hits)?;
        writeln!(f, "misses                   {}", self.misses)?;
        writeln!(f, "hit_ratio                {:.2}", self.hit_ratio())?;
        writeln!(f, "evictions                {}", self.evictions)?;
        writeln!(f, "write_backs              {}", self.write_backs)?;
        write!(f, "==========================================")
    }
}
