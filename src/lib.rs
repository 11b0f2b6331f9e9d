//! # OAR OCR Layout
//!
//! Reconstructs readable text blocks from per-line OCR output.
//!
//! A recognizer returns one entry per detected text line. This crate normalizes those
//! lines to page-relative boxes, clusters lines that belong to the same speech bubble
//! or paragraph, and emits blocks whose text follows the reading order of their
//! orientation: vertical columns right to left, horizontal rows top to bottom.
//! Tall pages are recognized in bands and clustered in bounded chunks.
//!
//! ## Modules
//!
//! * [`core`] - Configuration, constants and error handling
//! * [`domain`] - Raw recognizer output, normalized lines and blocks
//! * [`processors`] - Geometry, font statistics, clustering and block merging
//! * [`pipeline`] - Page tiling, recognition and the memoized recognition service
//! * [`store`] - Memo stores for recognized pages
//! * [`utils`] - Image helpers and tracing setup
//!
//! ## Example
//!
//! ```no_run
//! use oar_ocr_layout::prelude::*;
//!
//! let raw: Vec<RawLine> = serde_json::from_str(&std::fs::read_to_string("lines.json")?)?;
//! let lines = normalize_lines(&raw, 1200, 1800);
//! let blocks = LayoutMerger::new(&LayoutConfig::default()).merge_page(lines, 1200, 1800);
//! for block in &blocks {
//!     println!("{} {}", block.orientation(), block.text);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod store;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error Handling
    pub use crate::core::{OCRError, OcrResult};

    // Configuration
    pub use crate::core::{LayoutConfig, MergeConfig, ParallelPolicy, TilingConfig};

    // Domain types
    pub use crate::domain::{Block, LineRecord, NormalizedBox, Orientation, RawLine, RawWord};

    // Geometry types
    pub use crate::processors::{BoundingBox, Point};

    // Pipeline
    pub use crate::pipeline::{
        LayoutMerger, RecognitionPipeline, RecognitionPipelineBuilder, RecognitionService,
        Recognizer, normalize_lines,
    };

    // Stores
    pub use crate::store::{InMemoryStore, JsonFileStore, MemoStore, PageBlocks};

    // Image Utilities
    pub use crate::utils::{crop_band, image_dimensions};
}
