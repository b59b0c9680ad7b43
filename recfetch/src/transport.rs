//! HTTP transport abstraction for testability.
//!
//! The download core never talks to `reqwest` directly. It goes through the
//! [`Transport`] trait, which resolves with a [`TransportResponse`] for *any*
//! HTTP status and errors only on network-level failure. Status policy (which
//! statuses abort a probe or a chunk) belongs to the download components, not
//! the transport.
//!
//! The trait is dyn-compatible: it returns `BoxFuture` rather than using
//! `async fn`, so callers may hold `Arc<dyn Transport>` if they need to.

use std::fmt;
use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::{ACCEPT_RANGES, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_LENGTH, RANGE};
use thiserror::Error;

use crate::download::ByteRange;
use crate::target::Credential;

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Incremental response body: a stream of byte chunks in receipt order.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Network-level failure (connect, TLS, timeout). Carries no HTTP status
/// because no response was received.
#[derive(Debug, Clone, Error)]
#[error("request to {url} failed: {reason}")]
pub struct TransportError {
    /// URL the request was addressed to.
    pub url: String,
    /// Human-readable failure description from the underlying client.
    pub reason: String,
}

/// One outgoing GET request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Fully expanded download URL.
    pub url: String,
    /// Credential attached as the `Authorization` header.
    pub credential: Credential,
    /// Byte range to request, or `None` for an unconditional GET.
    pub range: Option<ByteRange>,
}

/// A received response: pre-parsed headers plus the (not yet consumed) body.
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Accept-Ranges` header value, if present.
    pub accept_ranges: Option<String>,
    /// Parsed `Content-Length` header value, if present and numeric.
    pub content_length: Option<u64>,
    /// Raw `Content-Disposition` header value, if present.
    pub content_disposition: Option<String>,
    body: Option<ByteStream>,
}

impl TransportResponse {
    /// Create a response with the given status and no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            accept_ranges: None,
            content_length: None,
            content_disposition: None,
            body: None,
        }
    }

    /// Set the `Accept-Ranges` header value.
    pub fn with_accept_ranges(mut self, value: impl Into<String>) -> Self {
        self.accept_ranges = Some(value.into());
        self
    }

    /// Set the parsed `Content-Length` value.
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Set the `Content-Disposition` header value.
    pub fn with_content_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    /// Attach a body stream.
    pub fn with_body(mut self, body: ByteStream) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether the status is in the 2xx range. 200 and 206 are not
    /// distinguished.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Take the body stream, leaving `None` behind.
    ///
    /// Returns `None` when the response never had a body or it was already
    /// consumed.
    pub fn take_body(&mut self) -> Option<ByteStream> {
        self.body.take()
    }

    /// Read the entire body into one buffer.
    pub async fn into_bytes(mut self) -> io::Result<Bytes> {
        let mut stream = self.body.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "response body already consumed")
        })?;

        let mut buffer = Vec::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buffer))
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("accept_ranges", &self.accept_ranges)
            .field("content_length", &self.content_length)
            .field("content_disposition", &self.content_disposition)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Trait for issuing recording download requests.
///
/// This abstraction allows dependency injection and easier testing by
/// enabling scripted transports in tests.
pub trait Transport: Send + Sync {
    /// Perform an HTTP GET, optionally carrying a `Range` header.
    ///
    /// Resolves with the response for any HTTP status; errors only when no
    /// response could be obtained at all.
    fn fetch(&self, request: TransportRequest)
        -> BoxFuture<'_, Result<TransportResponse, TransportError>>;
}

/// Real transport implementation using the async `reqwest` client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with a custom whole-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError {
                url: String::new(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn fetch(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'_, Result<TransportResponse, TransportError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .header(AUTHORIZATION, request.credential.as_str());

            if let Some(range) = request.range {
                builder = builder.header(RANGE, format!("bytes={}", range));
            }

            let response = builder.send().await.map_err(|e| TransportError {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;

            let status = response.status().as_u16();
            let headers = response.headers();
            let accept_ranges = headers
                .get(ACCEPT_RANGES)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let content_length = headers
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let content_disposition = headers
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            let body = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(io::Error::other))
                .boxed();

            let mut parsed = TransportResponse::new(status).with_body(body);
            parsed.accept_ranges = accept_ranges;
            parsed.content_length = content_length;
            parsed.content_disposition = content_disposition;
            Ok(parsed)
        })
    }
}
