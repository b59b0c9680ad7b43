//! Progress reporting for downloads.
//!
//! The ranged path reports chunk-granular progress: one callback per
//! completed chunk, in completion order, carrying
//! `completed / total_chunks * 100`. The fallback path reports byte-granular
//! progress and only when the total size is known. Both are monotonically
//! non-decreasing.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress callback invoked with a percentage in `0.0..=100.0`.
pub type ProgressCallback = Box<dyn Fn(f64) + Send + Sync>;

/// Shared completed-chunk counter for one ranged download.
///
/// Chunk futures within a batch share this counter; each successful chunk
/// increments it exactly once, so reported percentages never decrease.
#[derive(Debug)]
pub struct ProgressCounter {
    completed: AtomicUsize,
    total_chunks: usize,
}

impl ProgressCounter {
    /// Create a counter for the given number of chunks.
    pub fn new(total_chunks: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total_chunks,
        }
    }

    /// Record one completed chunk and return the resulting percentage.
    pub fn record_completion(&self) -> f64 {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        (done as f64 / self.total_chunks as f64) * 100.0
    }

    /// Number of chunks completed so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Current percentage. A zero-chunk download counts as complete.
    pub fn percent(&self) -> f64 {
        if self.total_chunks == 0 {
            return 100.0;
        }
        (self.completed() as f64 / self.total_chunks as f64) * 100.0
    }
}
