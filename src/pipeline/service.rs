//! Memoized, single-flight page recognition.
//!
//! The service answers "blocks for page `key`" from its store when it can. Otherwise
//! it fetches the page image, runs the pipeline on the blocking pool under a timeout,
//! and stores the result. Concurrent requests for the same key share one computation:
//! it runs as its own task, registered under the key before the registry lock is
//! released, and every waiter receives the same outcome. The task finishes, stores
//! its blocks and leaves the registry even when every waiter has gone away.
//! Failures are never stored.

use super::ocr::RecognitionPipeline;
use super::stats::{ServiceStats, StatsSnapshot};
use crate::core::config::ParallelPolicy;
use crate::core::errors::{OCRError, ProcessingStage};
use crate::domain::Block;
use crate::store::{MemoStore, PageBlocks};
use futures::future::{BoxFuture, FutureExt, Shared};
use image::RgbImage;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

type FlightResult = Result<PageBlocks, Arc<OCRError>>;
type Flight = Shared<BoxFuture<'static, FlightResult>>;

/// Recognition front door shared by every request handler.
pub struct RecognitionService {
    pipeline: Arc<RecognitionPipeline>,
    store: Arc<dyn MemoStore>,
    in_flight: Arc<Mutex<HashMap<String, Flight>>>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    stats: Arc<ServiceStats>,
}

impl std::fmt::Debug for RecognitionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionService")
            .field("pipeline", &self.pipeline)
            .field("stored_pages", &self.store.len())
            .field("timeout", &self.timeout)
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}

impl RecognitionService {
    /// Creates a service bounded by `policy`'s timeout and concurrency limit.
    pub fn new(
        pipeline: RecognitionPipeline,
        store: Arc<dyn MemoStore>,
        policy: &ParallelPolicy,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            permits: Arc::new(Semaphore::new(policy.recognition_permits())),
            timeout: policy.recognition_timeout(),
            stats: Arc::new(ServiceStats::new()),
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn store(&self) -> &Arc<dyn MemoStore> {
        &self.store
    }

    /// Drops every stored page. Returns how many were removed.
    pub fn purge(&self) -> Result<usize, OCRError> {
        self.store.clear()
    }

    /// Returns the blocks for `key`, recognizing the page if it is not stored yet.
    ///
    /// `fetch` produces the page image and is only called when this request starts a
    /// new computation.
    ///
    /// # Errors
    ///
    /// Fetch, recognizer and timeout failures, wrapped in [`OCRError::Shared`] since
    /// every concurrent waiter receives the same error.
    pub async fn get_or_recognize<F, Fut>(&self, key: &str, fetch: F) -> Result<PageBlocks, OCRError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RgbImage, OCRError>> + Send + 'static,
    {
        self.stats.record_request();
        if let Some(blocks) = self.cached(key) {
            return Ok(blocks);
        }

        let flight = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            // A computation may have finished between the first lookup and taking the lock.
            if let Some(blocks) = self.cached(key) {
                return Ok(blocks);
            }
            match in_flight.get(key) {
                Some(existing) => {
                    tracing::debug!(key, "joining in-flight recognition");
                    existing.clone()
                }
                None => {
                    let flight = self.start_flight(key.to_string(), fetch());
                    in_flight.insert(key.to_string(), flight.clone());
                    flight
                }
            }
        };

        flight.await.map_err(OCRError::Shared)
    }

    fn cached(&self, key: &str) -> Option<PageBlocks> {
        let blocks = self.store.get(key)?;
        self.stats.record_cache_hit();
        tracing::debug!(key, blocks = blocks.len(), "store hit");
        Some(blocks)
    }

    fn start_flight<Fut>(&self, key: String, fetch: Fut) -> Flight
    where
        Fut: Future<Output = Result<RgbImage, OCRError>> + Send + 'static,
    {
        let pipeline = Arc::clone(&self.pipeline);
        let store = Arc::clone(&self.store);
        let in_flight = Arc::clone(&self.in_flight);
        let permits = Arc::clone(&self.permits);
        let stats = Arc::clone(&self.stats);
        let timeout = self.timeout;

        let task = tokio::spawn(async move {
            let outcome = match recognize(pipeline, permits, &stats, timeout, fetch).await {
                Ok(blocks) => {
                    let blocks = PageBlocks::from(blocks);
                    if let Err(err) = store.put(&key, Arc::clone(&blocks)) {
                        tracing::warn!(key = %key, error = %err, "could not store recognized page");
                    }
                    stats.record_completion();
                    tracing::info!(key = %key, blocks = blocks.len(), "recognized page");
                    Ok(blocks)
                }
                Err(err) => {
                    stats.record_failure();
                    tracing::warn!(key = %key, error = %err, "recognition failed");
                    Err(Arc::new(err))
                }
            };
            // Removal happens after the store write, so a later request sees one or the other.
            in_flight
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&key);
            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(Arc::new(OCRError::processing_error(
                    ProcessingStage::PipelineExecution,
                    "recognition flight",
                    join_error,
                ))),
            }
        }
        .boxed()
        .shared()
    }

    #[cfg(test)]
    fn pending_flights(&self) -> usize {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

async fn recognize<Fut>(
    pipeline: Arc<RecognitionPipeline>,
    permits: Arc<Semaphore>,
    stats: &ServiceStats,
    timeout: Duration,
    fetch: Fut,
) -> Result<Vec<Block>, OCRError>
where
    Fut: Future<Output = Result<RgbImage, OCRError>>,
{
    let image = fetch.await?;
    let permit = permits.acquire_owned().await.map_err(|e| {
        OCRError::processing_error(
            ProcessingStage::PipelineExecution,
            "acquiring a recognition permit",
            e,
        )
    })?;
    let _running = stats.start_recognition();
    let engine = pipeline.recognizer_name().to_string();

    // The permit moves into the task, so a timed-out recognition still holds it
    // until the engine actually returns.
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        pipeline.run(&image)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(OCRError::processing_error(
            ProcessingStage::PipelineExecution,
            "recognition task",
            join_error,
        )),
        Err(_) => Err(OCRError::timeout(engine, timeout.as_millis() as u64)),
    }
}
