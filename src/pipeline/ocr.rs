//! Page recognition with layout reconstruction.
//!
//! This module provides `RecognitionPipelineBuilder` for wiring a recognizer to the
//! layout merger. Pages taller than the tiling cap are recognized band by band and
//! each band is clustered on its own; shorter pages are recognized and clustered whole.

use super::chunking::{Chunk, ChunkPlanner};
use super::layout::{LayoutMerger, normalize_lines};
use super::recognizer::{Recognizer, SharedRecognizer};
use crate::core::config::{ConfigValidator, LayoutConfig, ParallelPolicy};
use crate::core::errors::{OCRError, ProcessingStage};
use crate::domain::Block;
use crate::utils::crop_band;
use image::RgbImage;
use std::sync::Arc;

/// Builder for constructing recognition pipelines.
///
/// # Example
///
/// ```no_run
/// use oar_ocr_layout::core::LayoutConfig;
/// use oar_ocr_layout::pipeline::{RecognitionPipelineBuilder, SharedRecognizer};
///
/// # fn build(recognizer: SharedRecognizer) -> Result<(), oar_ocr_layout::core::OCRError> {
/// let pipeline = RecognitionPipelineBuilder::new(recognizer)
///     .layout_config(LayoutConfig::default())
///     .build()?;
/// let blocks = pipeline.run(&image::RgbImage::new(800, 1200))?;
/// println!("{} blocks", blocks.len());
/// # Ok(())
/// # }
/// ```
pub struct RecognitionPipelineBuilder {
    recognizer: SharedRecognizer,
    layout_config: LayoutConfig,
    parallel_policy: ParallelPolicy,
}

impl RecognitionPipelineBuilder {
    /// Creates a builder around the recognizer every page is sent to.
    pub fn new(recognizer: impl Recognizer + 'static) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            layout_config: LayoutConfig::default(),
            parallel_policy: ParallelPolicy::default(),
        }
    }

    /// Sets clustering thresholds and tiling.
    pub fn layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout_config = config;
        self
    }

    /// Sets the concurrency policy; only the parallel chunk threshold is used here.
    pub fn parallel_policy(mut self, policy: ParallelPolicy) -> Self {
        self.parallel_policy = policy;
        self
    }

    /// Validates the configuration and builds the pipeline.
    pub fn build(self) -> Result<RecognitionPipeline, OCRError> {
        self.layout_config.validate()?;
        self.parallel_policy.validate()?;
        let merger = LayoutMerger::new(&self.layout_config)
            .with_parallel_chunk_threshold(self.parallel_policy.parallel_chunk_threshold);
        Ok(RecognitionPipeline {
            recognizer: self.recognizer,
            merger,
        })
    }
}

/// A recognizer plus the layout reconstruction applied to its output.
pub struct RecognitionPipeline {
    recognizer: SharedRecognizer,
    merger: LayoutMerger,
}

impl std::fmt::Debug for RecognitionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionPipeline")
            .field("recognizer", &self.recognizer.name())
            .field("merger", &self.merger)
            .finish()
    }
}

impl RecognitionPipeline {
    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    pub fn merger(&self) -> &LayoutMerger {
        &self.merger
    }

    /// Recognizes a page and returns its blocks.
    ///
    /// A zero-sized image yields no blocks. Block order is discovery order; reading
    /// order is only guaranteed inside a merged block.
    ///
    /// # Errors
    ///
    /// Recognizer failures are returned as they are, without retrying.
    pub fn run(&self, image: &RgbImage) -> Result<Vec<Block>, OCRError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "zero-sized page, skipping recognition");
            return Ok(Vec::new());
        }

        let planner = self.merger.planner();
        if !planner.needs_slicing(height) {
            let raw = self.recognizer.recognize(image)?;
            let lines = normalize_lines(&raw, width, height);
            let blocks = self.merger.merge_page(lines, width, height);
            tracing::info!(
                engine = self.recognizer.name(),
                lines = raw.len(),
                blocks = blocks.len(),
                "recognized page"
            );
            return Ok(blocks);
        }

        let bands = planner.plan_recognition_bands(width, height);
        let mut blocks = Vec::new();
        for (index, band) in bands.iter().enumerate() {
            let band_blocks = self.run_band(image, band)?;
            tracing::debug!(
                band = index,
                top = band.pixel_top,
                bottom = band.pixel_bottom,
                blocks = band_blocks.len(),
                "recognized band"
            );
            blocks.extend(band_blocks);
        }
        tracing::info!(
            engine = self.recognizer.name(),
            height,
            bands = bands.len(),
            blocks = blocks.len(),
            "recognized tall page"
        );
        Ok(blocks)
    }

    /// Recognizes one band and clusters its lines as one chunk in page coordinates.
    fn run_band(&self, image: &RgbImage, band: &Chunk) -> Result<Vec<Block>, OCRError> {
        let band_image = crop_band(image, band).map_err(|e| {
            OCRError::processing_error(
                ProcessingStage::Tiling,
                format!("slicing band {}..{}", band.pixel_top, band.pixel_bottom),
                e,
            )
        })?;
        let raw = self.recognizer.recognize(&band_image)?;
        let lines: Vec<_> = normalize_lines(&raw, band_image.width(), band_image.height())
            .iter()
            .map(|line| ChunkPlanner::remap_line(line, band))
            .collect();
        Ok(self.merger.merge_lines(&lines))
    }
}
