//! Error types for the layout pipeline.
//!
//! # Usage
//!
//! ```rust
//! use oar_ocr_layout::core::errors::{OCRError, ProcessingStage};
//!
//! let error = OCRError::processing_error(
//!     ProcessingStage::Tiling,
//!     "band 2 of 4",
//!     std::io::Error::new(std::io::ErrorKind::InvalidData, "empty band"),
//! );
//! assert!(!error.is_recognition_failure());
//! ```

pub mod types;

pub use types::{OCRError, ProcessingStage};

/// Convenient result alias for layout operations.
pub type OcrResult<T> = Result<T, OCRError>;
