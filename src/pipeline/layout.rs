//! Layout reconstruction over the lines of one page.

use super::chunking::ChunkPlanner;
use crate::core::config::{LayoutConfig, MergeConfig};
use crate::core::constants::DEFAULT_PARALLEL_CHUNK_THRESHOLD;
use crate::domain::{Block, LineRecord, RawLine};
use crate::processors::{BlockMerger, ClusterEngine};
use rayon::prelude::*;

/// Normalizes recognizer lines against an image of the given pixel size.
///
/// Lines without text, geometry or words are dropped.
pub fn normalize_lines(raw: &[RawLine], image_width: u32, image_height: u32) -> Vec<LineRecord> {
    let lines: Vec<LineRecord> = raw
        .iter()
        .filter_map(|line| LineRecord::from_raw(line, image_width, image_height))
        .collect();
    let dropped = raw.len() - lines.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = lines.len(), "dropped unusable lines");
    }
    lines
}

/// Clusters lines into blocks and merges each cluster.
///
/// Holds no per-call state, so one merger can serve concurrent pages.
#[derive(Debug, Clone)]
pub struct LayoutMerger {
    enabled: bool,
    engine: ClusterEngine,
    merger: BlockMerger,
    planner: ChunkPlanner,
    parallel_chunk_threshold: usize,
}

impl LayoutMerger {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            enabled: config.merge.enabled,
            engine: ClusterEngine::new(&config.merge),
            merger: BlockMerger::new(&config.merge),
            planner: ChunkPlanner::new(config.tiling.clone()),
            parallel_chunk_threshold: DEFAULT_PARALLEL_CHUNK_THRESHOLD,
        }
    }

    /// Only pages yielding more clustering chunks than this are merged in parallel.
    pub fn with_parallel_chunk_threshold(mut self, threshold: usize) -> Self {
        self.parallel_chunk_threshold = threshold;
        self
    }

    pub fn planner(&self) -> &ChunkPlanner {
        &self.planner
    }

    /// Clusters and merges `lines` as one clustering chunk.
    ///
    /// With merging disabled every line becomes its own block.
    pub fn merge_lines(&self, lines: &[LineRecord]) -> Vec<Block> {
        if !self.enabled || lines.len() < 2 {
            return lines.iter().map(Block::passthrough).collect();
        }
        let groups = self.engine.cluster(lines);
        self.merger.merge_groups(lines, &groups)
    }

    /// Merges all lines of a page, bounding the pair test with clustering chunks.
    ///
    /// Blocks are returned chunk by chunk, in discovery order within each chunk.
    pub fn merge_page(
        &self,
        lines: Vec<LineRecord>,
        natural_width: u32,
        natural_height: u32,
    ) -> Vec<Block> {
        if natural_width == 0 || natural_height == 0 {
            return Vec::new();
        }
        let chunks = self
            .planner
            .plan_clustering_chunks(lines, natural_width, natural_height);

        let per_chunk: Vec<Vec<Block>> = if chunks.len() > self.parallel_chunk_threshold {
            chunks
                .par_iter()
                .map(|chunk| self.merge_lines(&chunk.lines))
                .collect()
        } else {
            chunks
                .iter()
                .map(|chunk| self.merge_lines(&chunk.lines))
                .collect()
        };
        per_chunk.into_iter().flatten().collect()
    }
}

impl Default for LayoutMerger {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl From<&MergeConfig> for LayoutMerger {
    fn from(merge: &MergeConfig) -> Self {
        Self::new(&LayoutConfig {
            merge: merge.clone(),
            ..LayoutConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TilingConfig;
    use crate::domain::{NormalizedBox, Orientation, RawWord};
    use crate::processors::BoundingBox;

    fn line(text: &str, x: f32, y: f32, w: f32, h: f32) -> LineRecord {
        LineRecord::new(text, NormalizedBox::new(x, y, w, h), 0.95)
    }

    #[test]
    fn test_three_stacked_lines_merge_in_order() {
        let merger = LayoutMerger::default();
        let lines = vec![
            line("line2", 0.1, 0.13, 0.4, 0.02),
            line("line3", 0.1, 0.16, 0.4, 0.02),
            line("line1", 0.1, 0.10, 0.4, 0.02),
        ];
        let blocks = merger.merge_lines(&lines);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "line1\u{200D}line2\u{200D}line3");
        assert_eq!(blocks[0].forced_orientation, Some(Orientation::Horizontal));
    }

    #[test]
    fn test_far_line_stays_separate() {
        let merger = LayoutMerger::default();
        let lines = vec![
            line("a", 0.1, 0.10, 0.4, 0.02),
            line("b", 0.1, 0.13, 0.4, 0.02),
            line("c", 0.1, 0.16, 0.4, 0.02),
            line("far", 0.1, 0.30, 0.4, 0.02),
        ];
        let blocks = merger.merge_lines(&lines);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text, "far");
        assert!(!blocks[1].is_merged);
    }

    #[test]
    fn test_vertical_column_reads_right_to_left() {
        let merger = LayoutMerger::default();
        // Centers at x = 0.1, 0.2, 0.3 on a 1000 px wide page.
        let lines = vec![
            line("left", 0.09, 0.1, 0.02, 0.3),
            line("right", 0.29, 0.1, 0.02, 0.3),
            line("middle", 0.19, 0.1, 0.02, 0.3),
        ];
        let strict = LayoutMerger::from(&MergeConfig::default().with_dist_k(5.0));
        let blocks = strict.merge_lines(&lines);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "right\u{200D}middle\u{200D}left");
        // With the default gap limit the columns are too far apart.
        assert_eq!(merger.merge_lines(&lines).len(), 3);
    }

    #[test]
    fn test_disabled_merge_passes_lines_through() {
        let merger = LayoutMerger::from(&MergeConfig::default().with_enabled(false));
        let lines = vec![
            line("a", 0.1, 0.10, 0.4, 0.02),
            line("b", 0.1, 0.12, 0.4, 0.02),
        ];
        let blocks = merger.merge_lines(&lines);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| !b.is_merged));
    }

    #[test]
    fn test_no_merge_across_clustering_chunks() {
        // 4000 px page, 3000 px chunks: two touching lines straddle the cut.
        let page = 4000.0;
        let px = |top: f32, h: f32, text: &str| line(text, 0.1, top / page, 0.4, h / page);
        let lines = vec![
            px(0.0, 80.0, "top"),
            px(2900.0, 80.0, "before cut"),
            px(2985.0, 80.0, "after cut"),
        ];
        let merger = LayoutMerger::default();
        let blocks = merger.merge_page(lines.clone(), 1000, 4000);
        assert_eq!(blocks.len(), 3);

        // The same lines on one chunk do merge.
        let single = LayoutMerger::new(&LayoutConfig {
            tiling: TilingConfig::default().with_clustering_chunk_height(5000),
            ..LayoutConfig::default()
        });
        assert_eq!(single.merge_page(lines, 1000, 4000).len(), 2);
    }

    #[test]
    fn test_every_line_lands_in_exactly_one_block() {
        let merger = LayoutMerger::default().with_parallel_chunk_threshold(0);
        let lines: Vec<LineRecord> = (0..12)
            .map(|i| {
                let x = 0.1 + (i % 3) as f32 * 0.3;
                line(&format!("t{i}"), x, 0.05 + i as f32 * 0.07, 0.2, 0.02)
            })
            .collect();
        let blocks = merger.merge_page(lines.clone(), 1000, 1000);
        assert!(blocks.len() <= lines.len());
        for l in &lines {
            let holders = blocks
                .iter()
                .filter(|b| b.text.split('\u{200D}').any(|t| t == l.text()))
                .count();
            assert_eq!(holders, 1, "{} should be in one block", l.text());
        }
        for block in &blocks {
            let members = lines
                .iter()
                .filter(|l| block.text.split('\u{200D}').any(|t| t == l.text()));
            for member in members {
                assert!(block.bbox.contains(member.bbox()));
            }
        }
    }

    #[test]
    fn test_zero_sized_page_is_empty() {
        let merger = LayoutMerger::default();
        assert!(merger.merge_page(vec![line("a", 0.0, 0.0, 0.1, 0.1)], 0, 100).is_empty());
    }

    #[test]
    fn test_normalize_lines_drops_defects() {
        let raw = vec![
            RawLine::new(
                "ok",
                BoundingBox::from_coords(0.0, 0.0, 50.0, 10.0),
                vec![RawWord::new("ok", None)],
            ),
            RawLine::new("", BoundingBox::from_coords(0.0, 0.0, 50.0, 10.0), vec![]),
        ];
        let lines = normalize_lines(&raw, 100, 100);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "ok");
    }
}
