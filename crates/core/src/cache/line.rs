//! Cache line slot.
//!
//! A line holds one block of data plus the state the engine needs to decide
//! hits, write-backs, and replacement:
//! 1. **Identity:** Valid bit and tag.
//! 2. **Data:** One block of bytes and the dirty bit.
//! 3. **Replacement Metadata:** Recency stamp (LRU), use count (LFU), and
//!    insertion stamp (FIFO), all taken from the engine's logical clock.

/// A single cache line.
///
/// Invariant: an invalid line is clean and carries no tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheLine {
    valid: bool,
    tag: Option<u64>,
    data: Box<[u8]>,
    dirty: bool,
    recency: u64,
    frequency: u64,
    inserted: u64,
}

impl CacheLine {
    /// Creates an invalid, zero-filled line of `block_size` bytes.
    pub fn new(block_size: usize) -> Self {
        Self {
            valid: false,
            tag: None,
            data: vec![0; block_size].into_boxed_slice(),
            dirty: false,
            recency: 0,
            frequency: 0,
            inserted: 0,
        }
    }

    /// Installs a block in this line.
    ///
    /// Marks the line valid with `tag`, copies `data`, clears the dirty bit,
    /// resets the use count, and records `sequence` as the insertion stamp.
    /// Flushing a dirty previous occupant is the caller's job.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly one block long.
    pub fn load(&mut self, tag: u64, data: &[u8], sequence: u64) {
        self.valid = true;
        self.tag = Some(tag);
        self.data.copy_from_slice(data);
        self.dirty = false;
        self.frequency = 0;
        self.inserted = sequence;
    }

    /// Returns the line to the cold state.
    ///
    /// Clears validity, tag, and dirty bit, and zeroes the replacement
    /// metadata so the slot is preferred again by the counter-based policies.
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.tag = None;
        self.dirty = false;
        self.recency = 0;
        self.frequency = 0;
        self.inserted = 0;
    }

    /// Returns `true` if the line holds a block.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Tag of the resident block, if any.
    pub const fn tag(&self) -> Option<u64> {
        self.tag
    }

    /// Returns `true` if the line holds `tag`.
    #[inline]
    pub fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == Some(tag)
    }

    /// Block contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns `true` if the data differs from memory and needs a write-back.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Logical time of the last access.
    pub const fn recency(&self) -> u64 {
        self.recency
    }

    /// Hits since the block was loaded.
    pub const fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Logical time the block was loaded.
    pub const fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Records a hit at logical time `clock`.
    pub(crate) const fn touch(&mut self, clock: u64) {
        self.recency = clock;
        self.frequency += 1;
    }

    /// Stamps the recency without counting a use (fills).
    pub(crate) const fn stamp(&mut self, clock: u64) {
        self.recency = clock;
    }

    pub(crate) fn write_byte(&mut self, offset: usize, value: u8) {
        self.data[offset] = value;
    }

    pub(crate) const fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
