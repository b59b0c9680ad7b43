//! # recfetch
//!
//! Downloads surveillance recordings from edge devices through a media
//! gateway, using parallel HTTP range requests when the gateway supports
//! them and a streamed single-request fallback when it does not.
//!
//! ## How a download proceeds
//!
//! 1. **Probe.** One unconditional GET to the recording URL. The
//!    `Accept-Ranges` and `Content-Length` headers decide the mode.
//! 2. **Ranged mode.** The file is partitioned into fixed-size byte ranges
//!    (5 MiB by default) and fetched with bounded parallelism (5 requests by
//!    default), then reassembled by offset into one buffer.
//! 3. **Fallback mode.** The probe response's body is streamed to
//!    completion; no second request is made.
//!
//! Progress callbacks fire per chunk in ranged mode and per body frame in
//! fallback mode (only when the total size is known). Any failure aborts
//! the whole download; partial data is never returned.
//!
//! ## Quick start
//!
//! ```ignore
//! use recfetch::{Credential, Downloader, DownloadTarget, Endpoint, ReqwestTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new()?;
//!     let endpoint = Endpoint::new("https://vms.example.com");
//!     let downloader = Downloader::new(transport, endpoint);
//!
//!     let target = DownloadTarget::new("PU-0042", "rec-20260812-0700", Credential::new("token"));
//!     let recording = downloader
//!         .download(&target, Some(Box::new(|p| println!("{p:.1}%"))))
//!         .await?;
//!
//!     std::fs::write("recording.mp4", &recording.bytes)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod disposition;
pub mod download;
pub mod target;
pub mod transport;

pub use config::{DownloadConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_PARALLEL};
pub use download::{
    DownloadError, DownloadResult, Downloader, ProbeOutcome, ProgressCallback, Recording,
};
pub use target::{Credential, DownloadTarget, Endpoint};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};
