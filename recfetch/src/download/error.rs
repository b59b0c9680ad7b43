//! Error types for recording downloads.
//!
//! Every leaf network failure propagates unmodified to the caller; no
//! component retries or suppresses errors. Retry policy belongs to the
//! caller, wrapped around the whole operation.

use thiserror::Error;

use super::chunks::ByteRange;
use crate::transport::TransportError;

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur while downloading a recording.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The probe or fallback request returned a non-2xx status.
    #[error("download request failed with HTTP status {status}")]
    Transport {
        /// HTTP status code of the failed response.
        status: u16,
    },

    /// Network-level failure before any response was received.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// A single ranged chunk request failed; terminal for the whole
    /// download, already-fetched chunks are discarded.
    #[error("chunk bytes={range} failed: {reason}")]
    ChunkFetch {
        /// The byte range whose fetch failed.
        range: ByteRange,
        /// What went wrong for this chunk.
        reason: String,
    },

    /// The response body could not be read as a stream.
    #[error("response body is not streamable: {reason}")]
    Stream {
        /// Why the body was unreadable.
        reason: String,
    },
}
