//! Configuration for line clustering, block merging and page tiling.

use super::errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
use crate::core::constants::{
    DEFAULT_BAND_HEIGHT, DEFAULT_CLUSTERING_CHUNK_HEIGHT, DEFAULT_MAX_UNSLICED_HEIGHT,
    ZERO_WIDTH_JOINER,
};
use crate::core::errors::OCRError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds that decide whether two detected lines belong to the same block.
///
/// Distances are multiples of the robust median font metric of the chunk, so the
/// same configuration works for small and large pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// When false, every line is emitted as its own block.
    #[serde(default = "MergeConfig::default_enabled")]
    pub enabled: bool,

    /// Maximum reading-axis gap, in multiples of the robust median font metric.
    #[serde(default = "MergeConfig::default_dist_k")]
    pub dist_k: f32,

    /// Maximum font metric ratio for two lines of the same primary/secondary class.
    #[serde(default = "MergeConfig::default_font_ratio")]
    pub font_ratio: f32,

    /// Maximum font metric ratio for a primary line paired with a secondary one.
    #[serde(default = "MergeConfig::default_font_ratio_for_mixed")]
    pub font_ratio_for_mixed: f32,

    /// Minimum perpendicular overlap, relative to the smaller line.
    #[serde(default = "MergeConfig::default_overlap_min")]
    pub overlap_min: f32,

    /// Minimum perpendicular overlap for mixed primary/secondary pairs.
    #[serde(default = "MergeConfig::default_mixed_min_overlap_ratio")]
    pub mixed_min_overlap_ratio: f32,

    /// Lines whose font metric is below `median * min_line_ratio` are secondary.
    #[serde(default = "MergeConfig::default_min_line_ratio")]
    pub min_line_ratio: f32,

    /// Text placed between member lines of a merged block.
    #[serde(default = "MergeConfig::default_separator")]
    pub separator: String,
}

impl MergeConfig {
    /// Create a new MergeConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable merging.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the reading-axis gap multiplier.
    pub fn with_dist_k(mut self, dist_k: f32) -> Self {
        self.dist_k = dist_k;
        self
    }

    /// Set the same-class font ratio.
    pub fn with_font_ratio(mut self, ratio: f32) -> Self {
        self.font_ratio = ratio;
        self
    }

    /// Set the mixed-class font ratio.
    pub fn with_font_ratio_for_mixed(mut self, ratio: f32) -> Self {
        self.font_ratio_for_mixed = ratio;
        self
    }

    /// Set the minimum perpendicular overlap ratio.
    pub fn with_overlap_min(mut self, ratio: f32) -> Self {
        self.overlap_min = ratio;
        self
    }

    /// Set the minimum perpendicular overlap ratio for mixed pairs.
    pub fn with_mixed_min_overlap_ratio(mut self, ratio: f32) -> Self {
        self.mixed_min_overlap_ratio = ratio;
        self
    }

    /// Set the primary line ratio.
    pub fn with_min_line_ratio(mut self, ratio: f32) -> Self {
        self.min_line_ratio = ratio;
        self
    }

    /// Set the text placed between merged lines.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Join merged lines with a plain space instead of the zero-width joiner.
    pub fn with_space_separator(self) -> Self {
        self.with_separator(" ")
    }

    fn default_enabled() -> bool {
        true
    }

    fn default_dist_k() -> f32 {
        1.2
    }

    fn default_font_ratio() -> f32 {
        1.3
    }

    fn default_font_ratio_for_mixed() -> f32 {
        1.1
    }

    fn default_overlap_min() -> f32 {
        0.1
    }

    fn default_mixed_min_overlap_ratio() -> f32 {
        0.5
    }

    fn default_min_line_ratio() -> f32 {
        0.5
    }

    fn default_separator() -> String {
        ZERO_WIDTH_JOINER.to_string()
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            dist_k: Self::default_dist_k(),
            font_ratio: Self::default_font_ratio(),
            font_ratio_for_mixed: Self::default_font_ratio_for_mixed(),
            overlap_min: Self::default_overlap_min(),
            mixed_min_overlap_ratio: Self::default_mixed_min_overlap_ratio(),
            min_line_ratio: Self::default_min_line_ratio(),
            separator: Self::default_separator(),
        }
    }
}

impl ConfigValidator for MergeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_ratio("dist_k", self.dist_k)?;
        self.validate_positive_ratio("font_ratio", self.font_ratio)?;
        self.validate_positive_ratio("font_ratio_for_mixed", self.font_ratio_for_mixed)?;
        self.validate_positive_ratio("min_line_ratio", self.min_line_ratio)?;
        self.validate_unit_ratio("overlap_min", self.overlap_min)?;
        self.validate_unit_ratio("mixed_min_overlap_ratio", self.mixed_min_overlap_ratio)?;

        if self.font_ratio < 1.0 || self.font_ratio_for_mixed < 1.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "font ratios must be at least 1.0, got font_ratio={} font_ratio_for_mixed={}",
                    self.font_ratio, self.font_ratio_for_mixed
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Pixel bounds for slicing pages before recognition and for bounding clustering cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Pages up to this height are recognized in one call.
    #[serde(default = "TilingConfig::default_max_unsliced_height")]
    pub max_unsliced_height: u32,

    /// Height of each recognition band.
    #[serde(default = "TilingConfig::default_band_height")]
    pub band_height: u32,

    /// Pixels shared by consecutive bands. Zero gives contiguous bands.
    #[serde(default)]
    pub overlap: u32,

    /// Pixel height bound for one clustering chunk.
    #[serde(default = "TilingConfig::default_clustering_chunk_height")]
    pub clustering_chunk_height: u32,
}

impl TilingConfig {
    /// Create a new TilingConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tallest page recognized without slicing.
    pub fn with_max_unsliced_height(mut self, height: u32) -> Self {
        self.max_unsliced_height = height;
        self
    }

    /// Set the recognition band height.
    pub fn with_band_height(mut self, height: u32) -> Self {
        self.band_height = height;
        self
    }

    /// Set the overlap between consecutive bands.
    pub fn with_overlap(mut self, overlap: u32) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the clustering chunk height bound.
    pub fn with_clustering_chunk_height(mut self, height: u32) -> Self {
        self.clustering_chunk_height = height;
        self
    }

    /// Distance between the tops of consecutive bands.
    pub fn stride(&self) -> u32 {
        self.band_height.saturating_sub(self.overlap).max(1)
    }

    fn default_max_unsliced_height() -> u32 {
        DEFAULT_MAX_UNSLICED_HEIGHT
    }

    fn default_band_height() -> u32 {
        DEFAULT_BAND_HEIGHT
    }

    fn default_clustering_chunk_height() -> u32 {
        DEFAULT_CLUSTERING_CHUNK_HEIGHT
    }
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_unsliced_height: Self::default_max_unsliced_height(),
            band_height: Self::default_band_height(),
            overlap: 0,
            clustering_chunk_height: Self::default_clustering_chunk_height(),
        }
    }
}

impl ConfigValidator for TilingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_pixels("max_unsliced_height", self.max_unsliced_height)?;
        self.validate_pixels("band_height", self.band_height)?;
        self.validate_pixels("clustering_chunk_height", self.clustering_chunk_height)?;
        if self.overlap >= self.band_height {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "overlap ({}) must be smaller than band_height ({})",
                    self.overlap, self.band_height
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Complete configuration of the layout reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub tiling: TilingConfig,
}

impl LayoutConfig {
    /// Reads and validates a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OCRError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: LayoutConfig = serde_json::from_str(&contents)?;
        Ok(config.validated()?)
    }
}

impl ConfigValidator for LayoutConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.merge.validate()?;
        self.tiling.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_config_defaults() {
        let config = MergeConfig::default();
        assert!(config.enabled);
        assert_eq!(config.dist_k, 1.2);
        assert_eq!(config.font_ratio, 1.3);
        assert_eq!(config.font_ratio_for_mixed, 1.1);
        assert_eq!(config.overlap_min, 0.1);
        assert_eq!(config.mixed_min_overlap_ratio, 0.5);
        assert_eq!(config.min_line_ratio, 0.5);
        assert_eq!(config.separator, "\u{200D}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_config_rejects_bad_ratios() {
        assert!(MergeConfig::new().with_font_ratio(0.9).validate().is_err());
        assert!(MergeConfig::new().with_overlap_min(1.5).validate().is_err());
        assert!(MergeConfig::new().with_dist_k(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_tiling_config_overlap_must_fit_band() {
        let config = TilingConfig::new().with_band_height(100).with_overlap(100);
        assert!(config.validate().is_err());

        let config = TilingConfig::new().with_band_height(100).with_overlap(20);
        assert!(config.validate().is_ok());
        assert_eq!(config.stride(), 80);
    }

    #[test]
    fn test_layout_config_partial_json_uses_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "merge": { "dist_k": 2.0 }, "tiling": { "overlap": 150 } }"#)
                .unwrap();
        assert_eq!(config.merge.dist_k, 2.0);
        assert_eq!(config.merge.font_ratio, 1.3);
        assert_eq!(config.tiling.overlap, 150);
        assert_eq!(config.tiling.band_height, DEFAULT_BAND_HEIGHT);
    }

    #[test]
    fn test_layout_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{ "merge": { "separator": " " } }"#).unwrap();

        let config = LayoutConfig::from_json_file(&path).unwrap();
        assert_eq!(config.merge.separator, " ");

        std::fs::write(&path, r#"{ "tiling": { "band_height": 0 } }"#).unwrap();
        assert!(matches!(
            LayoutConfig::from_json_file(&path),
            Err(OCRError::ConfigError { .. })
        ));
    }
}
