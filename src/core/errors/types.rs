//! Core error types for the layout pipeline.
//!
//! This module defines the fundamental error types used throughout the crate,
//! including the main OCRError enum and ProcessingStage enum.
//! Only failures of the external recognizer are expected to reach callers; malformed
//! detections, degenerate geometry and empty statistics are absorbed locally.

use std::sync::Arc;
use thiserror::Error;

/// Enum representing different stages of processing in the layout pipeline.
///
/// This enum is used to identify which stage an error occurred in,
/// providing context for debugging and error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while slicing an image into recognition bands.
    Tiling,
    /// Error occurred while reading or writing the memo store.
    Storage,
    /// Error occurred during pipeline execution.
    PipelineExecution,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Tiling => write!(f, "tiling"),
            ProcessingStage::Storage => write!(f, "storage"),
            ProcessingStage::PipelineExecution => write!(f, "pipeline execution"),
        }
    }
}

/// Enum representing various errors that can occur in the layout pipeline.
#[derive(Error, Debug)]
pub enum OCRError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The external recognizer reported a failure.
    #[error("recognition failed in engine '{engine}': {context}")]
    Recognition {
        /// Name of the recognizer that failed.
        engine: String,
        /// Additional context about the failure (band index, image size).
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Recognition did not finish within the configured bound.
    #[error("recognition in engine '{engine}' timed out after {timeout_ms} ms")]
    Timeout {
        /// Name of the recognizer that timed out.
        engine: String,
        /// The timeout that was exceeded.
        timeout_ms: u64,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("serialization")]
    Serialization(#[from] serde_json::Error),

    /// Failure of a computation shared between concurrent callers.
    #[error(transparent)]
    Shared(Arc<OCRError>),
}

// From trait implementations for automatic error conversions

impl From<image::ImageError> for OCRError {
    /// Converts an image::ImageError to OCRError::ImageLoad.
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<crate::core::config::ConfigError> for OCRError {
    /// Converts a ConfigError to OCRError::ConfigError.
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

impl From<Arc<OCRError>> for OCRError {
    fn from(error: Arc<OCRError>) -> Self {
        Self::Shared(error)
    }
}

impl OCRError {
    /// Creates an OCRError for a failure inside a processing stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Wraps an error reported by an external recognizer.
    ///
    /// # Arguments
    ///
    /// * `engine` - Name of the recognizer.
    /// * `context` - Where in the pipeline the call was made.
    /// * `error` - The error reported by the engine.
    pub fn recognition_error(
        engine: impl Into<String>,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Recognition {
            engine: engine.into(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a timeout error for the given engine.
    pub fn timeout(engine: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            engine: engine.into(),
            timeout_ms,
        }
    }

    /// Creates an OCRError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns true if this error came from the external recognizer, either directly,
    /// through a timeout, or through a shared single-flight computation.
    pub fn is_recognition_failure(&self) -> bool {
        match self {
            Self::Recognition { .. } | Self::Timeout { .. } => true,
            Self::Shared(inner) => inner.is_recognition_failure(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(ProcessingStage::Tiling.to_string(), "tiling");
        assert_eq!(
            ProcessingStage::PipelineExecution.to_string(),
            "pipeline execution"
        );
    }

    #[test]
    fn test_shared_error_is_transparent() {
        let inner = Arc::new(OCRError::timeout("fake", 100));
        let shared = OCRError::from(inner);
        assert_eq!(
            shared.to_string(),
            "recognition in engine 'fake' timed out after 100 ms"
        );
        assert!(shared.is_recognition_failure());
    }

    #[test]
    fn test_invalid_input_is_not_recognition_failure() {
        let err = OCRError::invalid_input("empty key");
        assert!(!err.is_recognition_failure());
        assert_eq!(err.to_string(), "invalid input: empty key");
    }
}
