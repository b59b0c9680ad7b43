//! Streamed fallback download.
//!
//! Used when the probe found no range support. The probe response's own body
//! is consumed to completion; no second request is issued. Progress is
//! byte-granular and reported only when the server declared a positive
//! `Content-Length`, since a percentage is meaningless without a total.

use futures::StreamExt;
use tracing::{debug, info};

use super::error::{DownloadError, DownloadResult};
use super::progress::ProgressCallback;
use crate::transport::TransportResponse;

/// Read the probe response's body to completion.
///
/// Accumulates every body frame in arrival order. A body that cannot be
/// streamed, or an error partway through, fails with
/// [`DownloadError::Stream`] and discards everything read so far.
pub async fn download_stream(
    mut response: TransportResponse,
    on_progress: Option<&ProgressCallback>,
) -> DownloadResult<Vec<u8>> {
    let total = response.content_length;

    let mut body = response.take_body().ok_or_else(|| DownloadError::Stream {
        reason: "response body is not readable".to_string(),
    })?;

    debug!(content_length = ?total, "streaming fallback download");

    let mut buffer = Vec::new();
    while let Some(frame) = body.next().await {
        let bytes = frame.map_err(|e| DownloadError::Stream {
            reason: e.to_string(),
        })?;
        buffer.extend_from_slice(&bytes);

        if let (Some(callback), Some(total)) = (on_progress, total) {
            if total > 0 {
                callback(buffer.len() as f64 / total as f64 * 100.0);
            }
        }
    }

    info!(bytes = buffer.len(), "streamed download complete");
    Ok(buffer)
}
