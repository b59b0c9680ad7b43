//! Download configuration.

/// Default chunk size for ranged downloads: 5 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Default maximum number of chunk requests in flight.
pub const DEFAULT_MAX_PARALLEL: usize = 5;

/// Configuration for the ranged chunk downloader.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Size of each byte range, in bytes (minimum 1).
    pub chunk_size: u64,
    /// Maximum concurrent chunk requests per batch (minimum 1).
    pub max_parallel: usize,
}

impl DownloadConfig {
    /// Create a configuration with explicit chunk size and parallelism.
    ///
    /// Both values are clamped to a minimum of 1.
    pub fn new(chunk_size: u64, max_parallel: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            max_parallel: max_parallel.max(1),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }
}
