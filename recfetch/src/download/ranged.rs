//! Parallel ranged-chunk downloader.
//!
//! Fetches a recording of known size as fixed-size byte ranges with bounded
//! parallelism and reassembles the chunks into one contiguous buffer in range
//! order.
//!
//! # Concurrency
//!
//! Chunks are processed in batches of at most `max_parallel` requests. A
//! batch is awaited as a whole before the next one starts, so peak in-flight
//! requests never exceed `max_parallel` and an in-flight batch always runs to
//! completion before a failure is observed. Later batches are never started
//! once a failure is known.
//!
//! # Failure semantics
//!
//! Any single chunk failure (network error, non-2xx status, or a body whose
//! length does not match its range) aborts the whole download; partial
//! results are discarded. No chunk is retried here.

use bytes::Bytes;
use tracing::{debug, info, warn};

use super::chunks::{partition, ByteRange};
use super::error::{DownloadError, DownloadResult};
use super::progress::{ProgressCallback, ProgressCounter};
use crate::config::DownloadConfig;
use crate::target::{Credential, DownloadTarget, Endpoint};
use crate::transport::{Transport, TransportRequest};

/// Download `total_size` bytes as parallel ranged chunks.
///
/// `total_size` comes from a prior [`probe`](super::probe::probe) that
/// confirmed range support. The progress callback, when supplied, fires once
/// per completed chunk with `completed / total_chunks * 100`, in completion
/// order.
pub async fn download_ranged<T>(
    transport: &T,
    endpoint: &Endpoint,
    target: &DownloadTarget,
    total_size: u64,
    config: &DownloadConfig,
    on_progress: Option<&ProgressCallback>,
) -> DownloadResult<Vec<u8>>
where
    T: Transport + ?Sized,
{
    let ranges = partition(total_size, config.chunk_size);
    let total_chunks = ranges.len();
    let url = endpoint.download_url(target);
    let progress = ProgressCounter::new(total_chunks);

    debug!(total_size, total_chunks, max_parallel = config.max_parallel, "starting ranged download");

    let mut chunks: Vec<Option<Bytes>> = Vec::with_capacity(total_chunks);
    chunks.resize_with(total_chunks, || None);

    let mut failure: Option<DownloadError> = None;

    for (batch_index, batch) in ranges.chunks(config.max_parallel).enumerate() {
        let base = batch_index * config.max_parallel;

        let fetches = batch.iter().map(|range| {
            fetch_chunk(
                transport,
                &url,
                &target.credential,
                *range,
                &progress,
                on_progress,
            )
        });

        // Barrier: every member of the batch settles before results are
        // inspected or the next batch starts.
        let results = futures::future::join_all(fetches).await;

        for (offset, result) in results.into_iter().enumerate() {
            match result {
                Ok(bytes) => chunks[base + offset] = Some(bytes),
                Err(error) => {
                    if failure.is_none() {
                        failure = Some(error);
                    }
                }
            }
        }

        if failure.is_some() {
            break;
        }
    }

    if let Some(error) = failure {
        warn!(%error, "chunk failed, aborting ranged download");
        return Err(error);
    }

    // Reassemble in range order. Each chunk lands at its own byte offset, so
    // the order in which chunks completed has no bearing on the result.
    let mut buffer = vec![0u8; total_size as usize];
    for (range, slot) in ranges.iter().zip(chunks) {
        let Some(bytes) = slot else {
            return Err(DownloadError::ChunkFetch {
                range: *range,
                reason: "chunk missing after batch completion".to_string(),
            });
        };
        let start = range.start as usize;
        buffer[start..start + bytes.len()].copy_from_slice(&bytes);
    }

    info!(total_size, total_chunks, "ranged download complete");
    Ok(buffer)
}

/// Fetch one chunk and report its completion.
async fn fetch_chunk<T>(
    transport: &T,
    url: &str,
    credential: &Credential,
    range: ByteRange,
    progress: &ProgressCounter,
    on_progress: Option<&ProgressCallback>,
) -> DownloadResult<Bytes>
where
    T: Transport + ?Sized,
{
    let response = transport
        .fetch(TransportRequest {
            url: url.to_string(),
            credential: credential.clone(),
            range: Some(range),
        })
        .await
        .map_err(|e| DownloadError::ChunkFetch {
            range,
            reason: e.to_string(),
        })?;

    if !response.is_success() {
        return Err(DownloadError::ChunkFetch {
            range,
            reason: format!("HTTP status {}", response.status),
        });
    }

    let bytes = response
        .into_bytes()
        .await
        .map_err(|e| DownloadError::ChunkFetch {
            range,
            reason: format!("body read failed: {}", e),
        })?;

    // A wrong-sized body would corrupt offset-based reassembly.
    if bytes.len() as u64 != range.len() {
        return Err(DownloadError::ChunkFetch {
            range,
            reason: format!("expected {} bytes, got {}", range.len(), bytes.len()),
        });
    }

    let percent = progress.record_completion();
    debug!(range = %range, percent, "chunk complete");
    if let Some(callback) = on_progress {
        callback(percent);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use rand::Rng;

    use super::*;
    use crate::target::{Credential, DownloadTarget, Endpoint};
    use crate::transport::tests::{body_from_chunks, MockTransport};
    use crate::transport::TransportResponse;

    fn target() -> DownloadTarget {
        DownloadTarget::new("PU-7", "rec-1", Credential::new("tok"))
    }

    fn endpoint() -> Endpoint {
        Endpoint::new("http://gw.local")
    }

    /// Deterministic synthetic recording content.
    fn source_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    /// Transport that serves slices of `source`, sleeping `0..max_delay_ms`
    /// milliseconds per request so chunks complete out of order.
    fn slicing_transport(
        source: Vec<u8>,
        max_delay_ms: u64,
    ) -> MockTransport<
        impl Fn(
                crate::transport::TransportRequest,
            ) -> futures::future::BoxFuture<
                'static,
                Result<TransportResponse, crate::transport::TransportError>,
            > + Send
            + Sync,
    > {
        let source = Arc::new(source);
        MockTransport::new(move |request| {
            let source = Arc::clone(&source);
            let delay = if max_delay_ms > 0 {
                rand::rng().random_range(0..max_delay_ms)
            } else {
                0
            };
            Box::pin(async move {
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                let range = request.range.expect("chunk request must carry a range");
                let slice = source[range.start as usize..=range.end as usize].to_vec();
                Ok(TransportResponse::new(206).with_body(body_from_chunks(vec![slice])))
            })
        })
    }

    #[tokio::test]
    async fn test_download_reassembles_in_range_order() {
        let source = source_bytes(105);
        let transport = slicing_transport(source.clone(), 0);
        let config = DownloadConfig::new(10, 3);

        let buffer = download_ranged(&transport, &endpoint(), &target(), 105, &config, None)
            .await
            .unwrap();

        assert_eq!(buffer, source);
    }

    #[tokio::test]
    async fn test_reassembly_is_independent_of_completion_order() {
        // Randomized per-chunk latency shuffles completion order; the
        // assembled buffer must be byte-identical every run.
        let source = source_bytes(1000);
        let config = DownloadConfig::new(64, 4);

        for _ in 0..5 {
            let transport = slicing_transport(source.clone(), 15);
            let buffer = download_ranged(&transport, &endpoint(), &target(), 1000, &config, None)
                .await
                .unwrap();
            assert_eq!(buffer, source);
        }
    }

    #[tokio::test]
    async fn test_final_buffer_length_equals_total_size() {
        let source = source_bytes(777);
        let transport = slicing_transport(source, 0);
        let config = DownloadConfig::new(100, 5);

        let buffer = download_ranged(&transport, &endpoint(), &target(), 777, &config, None)
            .await
            .unwrap();

        assert_eq!(buffer.len(), 777);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_max_parallel() {
        const CHUNK: u64 = 100;
        const MAX_PARALLEL: usize = 5;
        // 12 chunks forces multiple batches.
        let total = 12 * CHUNK;
        let source = source_bytes(total as usize);

        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let source = Arc::new(source);
        let transport = {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            MockTransport::new(move |request| {
                let source = Arc::clone(&source);
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                Box::pin(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);

                    let range = request.range.unwrap();
                    let slice = source[range.start as usize..=range.end as usize].to_vec();
                    Ok(TransportResponse::new(206).with_body(body_from_chunks(vec![slice])))
                })
            })
        };

        let config = DownloadConfig::new(CHUNK, MAX_PARALLEL);
        let buffer = download_ranged(&transport, &endpoint(), &target(), total, &config, None)
            .await
            .unwrap();

        assert_eq!(buffer.len(), total as usize);
        assert!(peak.load(Ordering::SeqCst) <= MAX_PARALLEL);
        assert!(peak.load(Ordering::SeqCst) >= 2, "batches should overlap requests");
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_at_100() {
        let source = source_bytes(1000);
        let transport = slicing_transport(source, 10);
        let config = DownloadConfig::new(100, 4);

        let recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&recorded);
        let callback: ProgressCallback = Box::new(move |percent| {
            sink.lock().unwrap().push(percent);
        });

        download_ranged(&transport, &endpoint(), &target(), 1000, &config, Some(&callback))
            .await
            .unwrap();

        let values = recorded.lock().unwrap();
        assert_eq!(values.len(), 10); // one event per chunk
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!((values.last().unwrap() - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_single_chunk_failure_aborts_everything() {
        // 20 chunks of 50 bytes; the 7th (index 6) returns a 500.
        let total = 1000u64;
        let source = Arc::new(source_bytes(total as usize));

        let transport = MockTransport::new(move |request| {
            let source = Arc::clone(&source);
            Box::pin(async move {
                let range = request.range.unwrap();
                if range.start == 300 {
                    return Ok(TransportResponse::new(500));
                }
                let slice = source[range.start as usize..=range.end as usize].to_vec();
                Ok(TransportResponse::new(206).with_body(body_from_chunks(vec![slice])))
            })
        });

        let config = DownloadConfig::new(50, 5);
        let err = download_ranged(&transport, &endpoint(), &target(), total, &config, None)
            .await
            .unwrap_err();

        match err {
            DownloadError::ChunkFetch { range, reason } => {
                assert_eq!(range, ByteRange::new(300, 349));
                assert!(reason.contains("500"));
            }
            other => panic!("expected ChunkFetch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_batch_starts_after_failure() {
        // Failure lands in the first batch; the second batch must never be
        // issued because batches are awaited sequentially.
        let issued = Arc::new(AtomicUsize::new(0));

        let transport = {
            let issued = Arc::clone(&issued);
            MockTransport::new(move |request| {
                let issued = Arc::clone(&issued);
                Box::pin(async move {
                    issued.fetch_add(1, Ordering::SeqCst);
                    let range = request.range.unwrap();
                    if range.start == 0 {
                        return Ok(TransportResponse::new(500));
                    }
                    let len = range.len() as usize;
                    Ok(TransportResponse::new(206).with_body(body_from_chunks(vec![vec![0; len]])))
                })
            })
        };

        let config = DownloadConfig::new(50, 5);
        // 20 chunks => 4 batches of 5.
        let result = download_ranged(&transport, &endpoint(), &target(), 1000, &config, None).await;

        assert!(result.is_err());
        assert_eq!(issued.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_wrong_sized_chunk_body_fails() {
        let transport = MockTransport::new(|request| {
            Box::pin(async move {
                let range = request.range.unwrap();
                // One byte short of the requested range.
                let len = range.len() as usize - 1;
                Ok(TransportResponse::new(206).with_body(body_from_chunks(vec![vec![0; len]])))
            })
        });

        let config = DownloadConfig::new(100, 2);
        let err = download_ranged(&transport, &endpoint(), &target(), 200, &config, None)
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::ChunkFetch { .. }));
        assert!(err.to_string().contains("expected 100 bytes, got 99"));
    }

    #[tokio::test]
    async fn test_zero_size_download_is_empty() {
        let issued = Arc::new(AtomicUsize::new(0));
        let transport = {
            let issued = Arc::clone(&issued);
            MockTransport::new(move |_request| {
                let issued = Arc::clone(&issued);
                Box::pin(async move {
                    issued.fetch_add(1, Ordering::SeqCst);
                    Ok(TransportResponse::new(206))
                })
            })
        };

        let config = DownloadConfig::default();
        let buffer = download_ranged(&transport, &endpoint(), &target(), 0, &config, None)
            .await
            .unwrap();

        assert!(buffer.is_empty());
        assert_eq!(issued.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_requests_carry_expected_ranges() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = {
            let seen = Arc::clone(&seen);
            MockTransport::new(move |request| {
                let seen = Arc::clone(&seen);
                Box::pin(async move {
                    let range = request.range.unwrap();
                    seen.lock().unwrap().push(range);
                    let len = range.len() as usize;
                    Ok(TransportResponse::new(206).with_body(body_from_chunks(vec![vec![7; len]])))
                })
            })
        };

        let config = DownloadConfig::new(40, 2);
        download_ranged(&transport, &endpoint(), &target(), 100, &config, None)
            .await
            .unwrap();

        let mut ranges = seen.lock().unwrap().clone();
        ranges.sort_by_key(|r| r.start);
        assert_eq!(
            ranges,
            vec![
                ByteRange::new(0, 39),
                ByteRange::new(40, 79),
                ByteRange::new(80, 99),
            ]
        );
    }
}
