//! Range-capability probe.
//!
//! One unconditional GET decides how the recording will be fetched. The
//! decision is made purely from the `Accept-Ranges` and `Content-Length`
//! response headers; in fallback mode the probe response itself becomes the
//! data source and is never refetched.

use tracing::{debug, info};

use super::error::{DownloadError, DownloadResult};
use crate::target::{DownloadTarget, Endpoint};
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Header token a server must advertise for ranged downloads.
const RANGE_UNIT_BYTES: &str = "bytes";

/// Outcome of probing the download endpoint.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The server honors `Range` requests; fetch in parallel chunks.
    Ranged {
        /// Total recording size from `Content-Length`.
        total_size: u64,
    },
    /// No range support advertised; stream this response's body instead.
    Fallback {
        /// The already-open probe response.
        response: TransportResponse,
    },
}

/// Probe the endpoint for range support.
///
/// Issues a single GET without a `Range` header. A non-2xx status fails with
/// [`DownloadError::Transport`]; retrying, if any, is the caller's concern.
pub async fn probe<T>(
    transport: &T,
    endpoint: &Endpoint,
    target: &DownloadTarget,
) -> DownloadResult<ProbeOutcome>
where
    T: Transport + ?Sized,
{
    let url = endpoint.download_url(target);
    debug!(%url, "probing download endpoint");

    let response = transport
        .fetch(TransportRequest {
            url,
            credential: target.credential.clone(),
            range: None,
        })
        .await?;

    if !response.is_success() {
        return Err(DownloadError::Transport {
            status: response.status,
        });
    }

    let supports_ranges = response.accept_ranges.as_deref() == Some(RANGE_UNIT_BYTES);

    match (supports_ranges, response.content_length) {
        (true, Some(total_size)) if total_size > 0 => {
            info!(total_size, "server supports range requests");
            Ok(ProbeOutcome::Ranged { total_size })
        }
        _ => {
            info!(
                accept_ranges = response.accept_ranges.as_deref().unwrap_or("<absent>"),
                content_length = ?response.content_length,
                "range requests unavailable, falling back to streamed download"
            );
            Ok(ProbeOutcome::Fallback { response })
        }
    }
}
