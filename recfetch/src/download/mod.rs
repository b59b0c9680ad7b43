//! Recording download pipeline: probe, chunked fetch, streamed fallback.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Downloader                        │
//! │                     (orchestrator)                      │
//! └────────────┬────────────────────────────────────────────┘
//!              │ probe: one unconditional GET
//!              ▼
//!      ┌──────────────┐
//!      │ ProbeOutcome │
//!      └──────┬───────┘
//!     Ranged  │  Fallback
//!    ┌────────┴──────────┐
//!    ▼                   ▼
//! ┌──────────────┐  ┌───────────────┐
//! │ ranged       │  │ stream        │
//! │ partition +  │  │ consume probe │
//! │ batched GETs │  │ response body │
//! └──────┬───────┘  └──────┬────────┘
//!        └────────┬────────┘
//!                 ▼
//!            Recording
//! ```
//!
//! The probe reads `Accept-Ranges` and `Content-Length` from a single GET.
//! When the server advertises byte ranges and a positive length, the
//! recording is fetched as fixed-size chunks with bounded parallelism and
//! reassembled by offset. Otherwise the probe response's own body is
//! streamed to completion; it is never refetched.
//!
//! Failure is all-or-nothing at every level: any chunk or stream error
//! aborts the download and discards partial data. Nothing here retries; a
//! caller that wants retries wraps the whole `download` call.
//!
//! # Example
//!
//! ```ignore
//! use recfetch::{Credential, Downloader, DownloadTarget, Endpoint, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new()?;
//! let downloader = Downloader::new(transport, Endpoint::new("https://vms.example.com"));
//! let target = DownloadTarget::new("PU-0042", "rec-20260812-0700", Credential::new(token));
//! let recording = downloader.download(&target, None).await?;
//! ```

mod chunks;
mod error;
mod orchestrator;
mod probe;
mod progress;
mod ranged;
mod stream;

pub use chunks::{partition, ByteRange};
pub use error::{DownloadError, DownloadResult};
pub use orchestrator::{Downloader, Recording};
pub use probe::{probe, ProbeOutcome};
pub use progress::{ProgressCallback, ProgressCounter};
pub use ranged::download_ranged;
pub use stream::download_stream;
