//! Download orchestration.
//!
//! [`Downloader`] ties the pieces together: probe once, then either fetch
//! parallel ranged chunks or stream the probe response, and hand back the
//! complete recording. One `download` call maps to exactly one recording;
//! there is no session state between calls.

use tracing::{debug, info};

use super::error::DownloadResult;
use super::probe::{probe, ProbeOutcome};
use super::progress::ProgressCallback;
use super::ranged::download_ranged;
use super::stream::download_stream;
use crate::config::DownloadConfig;
use crate::disposition::attachment_filename;
use crate::target::{DownloadTarget, Endpoint};
use crate::transport::Transport;

/// A fully downloaded recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    /// Complete file content.
    pub bytes: Vec<u8>,
    /// Filename the server suggested via `Content-Disposition`, when the
    /// fallback path saw one. The ranged path never inspects it.
    pub file_name: Option<String>,
}

/// Downloads recordings from a media gateway.
///
/// Generic over [`Transport`] so tests can script responses without a
/// network.
pub struct Downloader<T> {
    transport: T,
    endpoint: Endpoint,
    config: DownloadConfig,
}

impl<T: Transport> Downloader<T> {
    /// Create a downloader with the default chunking configuration.
    pub fn new(transport: T, endpoint: Endpoint) -> Self {
        Self::with_config(transport, endpoint, DownloadConfig::default())
    }

    /// Create a downloader with an explicit configuration.
    pub fn with_config(transport: T, endpoint: Endpoint, config: DownloadConfig) -> Self {
        Self {
            transport,
            endpoint,
            config,
        }
    }

    /// The chunking configuration in effect.
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Download one recording to completion.
    ///
    /// Probes the endpoint, then downloads via parallel ranged chunks when
    /// the server supports them, or by streaming the probe response
    /// otherwise. Fails without partial results; the caller may retry the
    /// whole call.
    pub async fn download(
        &self,
        target: &DownloadTarget,
        on_progress: Option<ProgressCallback>,
    ) -> DownloadResult<Recording> {
        info!(
            device_id = %target.device_id,
            file_id = %target.file_id,
            "downloading recording"
        );

        match probe(&self.transport, &self.endpoint, target).await? {
            ProbeOutcome::Ranged { total_size } => {
                let bytes = download_ranged(
                    &self.transport,
                    &self.endpoint,
                    target,
                    total_size,
                    &self.config,
                    on_progress.as_ref(),
                )
                .await?;
                Ok(Recording {
                    bytes,
                    file_name: None,
                })
            }
            ProbeOutcome::Fallback { response } => {
                let file_name = response
                    .content_disposition
                    .as_deref()
                    .and_then(attachment_filename);
                debug!(file_name = ?file_name, "server-suggested filename");

                let bytes = download_stream(response, on_progress.as_ref()).await?;
                Ok(Recording { bytes, file_name })
            }
        }
    }
}
