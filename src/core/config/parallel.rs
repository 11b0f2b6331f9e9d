//! Shared concurrency configuration types.

use super::errors::{ConfigError, ConfigValidator};
use crate::core::constants::{DEFAULT_PARALLEL_CHUNK_THRESHOLD, DEFAULT_RECOGNITION_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Concurrency settings for the recognition service and the layout merger.
///
/// Recognition requests run as tasks on a bounded pool; clustering itself is
/// synchronous and only fans out across clustering chunks when a page has many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads for rayon. None keeps rayon's default pool.
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Maximum number of recognitions running at the same time.
    /// If None, the available parallelism of the machine is used.
    #[serde(default)]
    pub max_concurrent_recognitions: Option<usize>,

    /// Upper bound on one page recognition, in milliseconds.
    #[serde(default = "ParallelPolicy::default_recognition_timeout_ms")]
    pub recognition_timeout_ms: u64,

    /// Clustering chunks of one page are merged in parallel only when there are
    /// more than this many (<= this uses sequential).
    #[serde(default = "ParallelPolicy::default_parallel_chunk_threshold")]
    pub parallel_chunk_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the maximum number of concurrent recognitions.
    pub fn with_max_concurrent_recognitions(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_recognitions = limit;
        self
    }

    /// Set the recognition timeout.
    pub fn with_recognition_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.recognition_timeout_ms = timeout_ms;
        self
    }

    /// Set the parallel chunk threshold.
    pub fn with_parallel_chunk_threshold(mut self, threshold: usize) -> Self {
        self.parallel_chunk_threshold = threshold;
        self
    }

    /// The recognition timeout as a [`Duration`].
    pub fn recognition_timeout(&self) -> Duration {
        Duration::from_millis(self.recognition_timeout_ms)
    }

    /// Number of recognition permits to hand out.
    pub fn recognition_permits(&self) -> usize {
        self.max_concurrent_recognitions
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    /// Install the global rayon thread pool with the configured number of threads.
    ///
    /// This method should be called once at application startup before any parallel
    /// processing occurs. If `max_threads` is None, this method does nothing.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the thread pool was successfully configured
    /// - `Ok(false)` if `max_threads` is None (no configuration needed)
    /// - `Err` if the thread pool has already been initialized
    pub fn install_global_thread_pool(&self) -> Result<bool, rayon::ThreadPoolBuildError> {
        if let Some(num_threads) = self.max_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn default_recognition_timeout_ms() -> u64 {
        DEFAULT_RECOGNITION_TIMEOUT_MS
    }

    fn default_parallel_chunk_threshold() -> usize {
        DEFAULT_PARALLEL_CHUNK_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            max_concurrent_recognitions: None,
            recognition_timeout_ms: Self::default_recognition_timeout_ms(),
            parallel_chunk_threshold: Self::default_parallel_chunk_threshold(),
        }
    }
}

impl ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.recognition_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "recognition_timeout_ms must be greater than 0".to_string(),
            });
        }
        if self.max_concurrent_recognitions == Some(0) || self.max_threads == Some(0) {
            return Err(ConfigError::InvalidConfig {
                message: "thread and recognition limits must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
