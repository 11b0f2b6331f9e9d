//! The core module of the layout pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling

pub mod config;
pub mod constants;
pub mod errors;

pub use config::{
    ConfigError, ConfigValidator, ConfigValidatorExt, LayoutConfig, MergeConfig, ParallelPolicy,
    TilingConfig,
};
pub use constants::*;
pub use errors::{OCRError, OcrResult, ProcessingStage};
