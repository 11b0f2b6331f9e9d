//! Configuration management for the layout pipeline.
//!
//! This module provides configuration types, validation traits, and utilities
//! for tuning clustering thresholds, page tiling and recognition concurrency.

pub mod errors;
pub mod layout;
pub mod parallel;

// Re-export commonly used types
pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use layout::{LayoutConfig, MergeConfig, TilingConfig};
pub use parallel::ParallelPolicy;
