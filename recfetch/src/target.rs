//! Download target identification.
//!
//! A [`DownloadTarget`] names one recording on one edge device, together with
//! the session credential the platform issued for it. The credential is
//! threaded explicitly through every request rather than read from ambient
//! state, which keeps the download core free of side effects with respect to
//! authentication storage.

use std::fmt;

/// Default path template for recording downloads on the media gateway.
///
/// Pattern: `{base}/bvcsp/v1/pu/download/{device_id}/{file_id}`
const DOWNLOAD_PATH: &str = "bvcsp/v1/pu/download";

/// Opaque bearer/session credential attached to every request.
///
/// The token is redacted from `Debug` output so request structs can be logged
/// without leaking it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a credential from a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value, for transports building request headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(****)")
    }
}

/// Identifies one remote recording for the duration of a download.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    /// Edge device (peripheral unit) identifier.
    pub device_id: String,
    /// Recording file identifier on that device.
    pub file_id: String,
    /// Session credential for the platform.
    pub credential: Credential,
}

impl DownloadTarget {
    /// Create a new download target.
    pub fn new(
        device_id: impl Into<String>,
        file_id: impl Into<String>,
        credential: Credential,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            file_id: file_id.into(),
            credential,
        }
    }
}

/// Download endpoint template.
///
/// Expands a [`DownloadTarget`] into the concrete URL the transport fetches.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    /// Create an endpoint rooted at the given base URL.
    ///
    /// A trailing slash on the base URL is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// The base URL this endpoint is rooted at.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the download URL for a target.
    pub fn download_url(&self, target: &DownloadTarget) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url, DOWNLOAD_PATH, target.device_id, target.file_id
        )
    }
}
