//! Page tiling for recognition and for clustering.
//!
//! Two independent tilings exist. Recognition bands bound the size of the image handed
//! to a recognizer; their results are remapped into page coordinates. Clustering chunks
//! bound the quadratic pair test over the lines of a tall page. Lines in different
//! clustering chunks are never merged, so a block cut exactly by a chunk boundary
//! comes out as two blocks.

use crate::core::config::TilingConfig;
use crate::domain::{LineRecord, NormalizedBox};

/// A horizontal slice of a page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// First pixel row of the slice.
    pub pixel_top: u32,
    /// One past the last pixel row of the slice.
    pub pixel_bottom: u32,
    pub width: u32,
    pub height: u32,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl Chunk {
    fn new(pixel_top: u32, pixel_bottom: u32, natural_width: u32, natural_height: u32) -> Self {
        Self {
            pixel_top,
            pixel_bottom,
            width: natural_width,
            height: pixel_bottom.saturating_sub(pixel_top),
            natural_width,
            natural_height,
        }
    }

    /// Whether the chunk spans the whole page.
    pub fn is_full_page(&self) -> bool {
        self.pixel_top == 0 && self.pixel_bottom >= self.natural_height
    }
}

/// Lines assigned to one clustering chunk, in pixel-top order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringChunk {
    pub chunk: Chunk,
    pub lines: Vec<LineRecord>,
}

/// Plans recognition bands and clustering chunks for a page.
#[derive(Debug, Clone, Default)]
pub struct ChunkPlanner {
    config: TilingConfig,
}

impl ChunkPlanner {
    pub fn new(config: TilingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// Whether a page of this height is recognized in bands.
    pub fn needs_slicing(&self, height: u32) -> bool {
        height > self.config.max_unsliced_height
    }

    /// Bands to recognize for a page of the given pixel size.
    ///
    /// A page no taller than `max_unsliced_height` is a single band. Taller pages are
    /// cut into bands of `band_height`, each starting `stride` rows below the last;
    /// the final band is clipped to the page. A zero-sized page has no bands.
    pub fn plan_recognition_bands(&self, width: u32, height: u32) -> Vec<Chunk> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        if !self.needs_slicing(height) {
            return vec![Chunk::new(0, height, width, height)];
        }

        let band_height = self.config.band_height.max(1);
        let stride = self.config.stride();
        let mut bands = Vec::new();
        let mut top = 0u32;
        loop {
            let bottom = top.saturating_add(band_height).min(height);
            bands.push(Chunk::new(top, bottom, width, height));
            if bottom >= height {
                break;
            }
            top = top.saturating_add(stride);
        }
        tracing::debug!(height, bands = bands.len(), stride, "planned recognition bands");
        bands
    }

    /// Rewrites a band-normalized box into page-normalized coordinates.
    ///
    /// Slicing is horizontal only, so `x` and `width` carry over unchanged.
    pub fn remap_box(bbox: &NormalizedBox, band: &Chunk) -> NormalizedBox {
        if band.natural_height == 0 {
            return *bbox;
        }
        let band_height = band.height as f32;
        let full_height = band.natural_height as f32;
        NormalizedBox::new(
            bbox.x,
            (bbox.y * band_height + band.pixel_top as f32) / full_height,
            bbox.width,
            bbox.height * band_height / full_height,
        )
    }

    /// Remaps a line recognized on `band` into page coordinates.
    ///
    /// Orientation is derived again from the page-normalized box.
    pub fn remap_line(line: &LineRecord, band: &Chunk) -> LineRecord {
        line.with_box(Self::remap_box(line.bbox(), band))
    }

    /// Splits page lines into clustering chunks of bounded pixel height.
    ///
    /// Lines are taken in order of their top edge. A new chunk starts at the first line
    /// whose bottom lies more than `clustering_chunk_height` pixels below the top of the
    /// current chunk's first line.
    pub fn plan_clustering_chunks(
        &self,
        lines: Vec<LineRecord>,
        natural_width: u32,
        natural_height: u32,
    ) -> Vec<ClusteringChunk> {
        if lines.is_empty() {
            return Vec::new();
        }
        let page_height = natural_height as f32;
        let cap = self.config.clustering_chunk_height as f32;
        let top_px = |line: &LineRecord| line.bbox().y * page_height;
        let bottom_px = |line: &LineRecord| line.bbox().bottom() * page_height;

        let mut ordered = lines;
        ordered.sort_by(|a, b| top_px(a).total_cmp(&top_px(b)));

        let mut chunks = Vec::new();
        let mut current: Vec<LineRecord> = Vec::new();
        let mut chunk_top = 0.0f32;
        let mut chunk_bottom = 0.0f32;

        let close = |lines: Vec<LineRecord>, top: f32, bottom: f32| ClusteringChunk {
            chunk: Chunk::new(
                top.max(0.0).floor() as u32,
                bottom.max(0.0).ceil() as u32,
                natural_width,
                natural_height,
            ),
            lines,
        };

        for line in ordered {
            let (top, bottom) = (top_px(&line), bottom_px(&line));
            if current.is_empty() {
                chunk_top = top;
                chunk_bottom = bottom;
            } else if bottom - chunk_top > cap {
                chunks.push(close(std::mem::take(&mut current), chunk_top, chunk_bottom));
                chunk_top = top;
                chunk_bottom = bottom;
            }
            chunk_bottom = chunk_bottom.max(bottom);
            current.push(line);
        }
        chunks.push(close(current, chunk_top, chunk_bottom));

        tracing::debug!(
            natural_height,
            chunks = chunks.len(),
            "planned clustering chunks"
        );
        chunks
    }
}
