//! Byte-range partitioning for chunked downloads.
//!
//! A recording of known size is split into consecutive fixed-size
//! [`ByteRange`]s. The partition is computed once, before any request is
//! issued, and its order is the reassembly order regardless of the order in
//! which chunks complete.

use std::fmt;

/// One contiguous byte range, inclusive on both ends.
///
/// `start..=end` in offsets; the wire form is `Range: bytes=start-end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset of the range.
    pub start: u64,
    /// Last byte offset of the range (inclusive), `end >= start`.
    pub end: u64,
}

impl ByteRange {
    /// Create a range covering `start..=end`.
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(end >= start);
        Self { start, end }
    }

    /// Number of bytes in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false; a range spans at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Partition `[0, total_size)` into consecutive ranges of `chunk_size` bytes.
///
/// The final range is truncated to the remaining byte count. A zero
/// `total_size` yields no ranges at all.
pub fn partition(total_size: u64, chunk_size: u64) -> Vec<ByteRange> {
    debug_assert!(chunk_size > 0);

    let mut ranges = Vec::new();
    let mut start = 0u64;
    while start < total_size {
        let end = (start + chunk_size - 1).min(total_size - 1);
        ranges.push(ByteRange::new(start, end));
        start = end + 1;
    }
    ranges
}
