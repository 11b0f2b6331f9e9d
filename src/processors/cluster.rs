//! Pairwise grouping of detected lines into text blocks.
//!
//! Every pair of lines in a clustering chunk is tested against size and geometry
//! rules; pairs that pass are joined in a [`UnionFind`]. The rules are symmetric in
//! the two lines, so the resulting partition does not depend on pair order.

use super::statistics::FontStatistics;
use super::union_find::UnionFind;
use crate::core::config::MergeConfig;
use crate::domain::{LineRecord, NormalizedBox, Orientation};

/// Outcome of testing one pair of lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairDecision {
    /// The lines belong to the same block.
    Join,
    /// One line is vertical and the other horizontal.
    OrientationMismatch,
    /// Font metrics differ by more than the applicable ratio.
    FontSizeMismatch { ratio: f32, limit: f32 },
    /// The gap along the reading axis is too wide.
    TooFar { gap: f32, limit: f32 },
    /// The lines do not line up across the reading axis.
    InsufficientOverlap { ratio: f32, limit: f32 },
}

impl PairDecision {
    pub fn is_join(&self) -> bool {
        matches!(self, PairDecision::Join)
    }
}

/// Extent of a box along one axis as `(start, end)`.
fn span(bbox: &NormalizedBox, horizontal_axis: bool) -> (f32, f32) {
    if horizontal_axis {
        (bbox.x, bbox.right())
    } else {
        (bbox.y, bbox.bottom())
    }
}

/// Distance between two spans, zero when they touch or overlap.
fn gap_between(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0.max(b.0) - a.1.min(b.1)).max(0.0)
}

/// Length shared by two spans, zero when disjoint.
fn overlap_between(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.1.min(b.1) - a.0.max(b.0)).max(0.0)
}

fn font_ratio(a: f32, b: f32) -> f32 {
    if a > 0.0 && b > 0.0 {
        (a / b).max(b / a)
    } else if a == b {
        1.0
    } else {
        f32::INFINITY
    }
}

/// Groups lines of one clustering chunk.
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    dist_k: f32,
    font_ratio: f32,
    font_ratio_for_mixed: f32,
    overlap_min: f32,
    mixed_min_overlap_ratio: f32,
    min_line_ratio: f32,
}

impl ClusterEngine {
    pub fn new(config: &MergeConfig) -> Self {
        Self {
            dist_k: config.dist_k,
            font_ratio: config.font_ratio,
            font_ratio_for_mixed: config.font_ratio_for_mixed,
            overlap_min: config.overlap_min,
            mixed_min_overlap_ratio: config.mixed_min_overlap_ratio,
            min_line_ratio: config.min_line_ratio,
        }
    }

    /// Partitions `lines` into groups of indices.
    ///
    /// Groups are ordered by their first member and members by index.
    pub fn cluster(&self, lines: &[LineRecord]) -> Vec<Vec<usize>> {
        let stats = FontStatistics::from_lines(lines, self.min_line_ratio);
        let mut uf = UnionFind::new(lines.len());
        let mut joined = 0usize;

        for i in 0..lines.len() {
            for j in (i + 1)..lines.len() {
                if self.evaluate_pair(&lines[i], &lines[j], &stats).is_join() && uf.union(i, j) {
                    joined += 1;
                }
            }
        }

        let groups = uf.groups();
        tracing::debug!(
            lines = lines.len(),
            unions = joined,
            groups = groups.len(),
            vertical_median = stats.vertical.robust_median,
            horizontal_median = stats.horizontal.robust_median,
            "clustered chunk"
        );
        groups
    }

    /// Tests whether two lines belong to the same block.
    pub fn evaluate_pair(
        &self,
        a: &LineRecord,
        b: &LineRecord,
        stats: &FontStatistics,
    ) -> PairDecision {
        if a.orientation() != b.orientation() {
            return PairDecision::OrientationMismatch;
        }
        let orientation = a.orientation();
        let orientation_stats = stats.for_orientation(orientation);
        let (metric_a, metric_b) = (a.font_metric(), b.font_metric());
        let mixed = orientation_stats.is_primary(metric_a) != orientation_stats.is_primary(metric_b);

        let ratio = font_ratio(metric_a, metric_b);
        let ratio_limit = if mixed {
            self.font_ratio_for_mixed
        } else {
            self.font_ratio
        };
        if ratio > ratio_limit {
            return PairDecision::FontSizeMismatch {
                ratio,
                limit: ratio_limit,
            };
        }

        // Vertical text flows along x, horizontal text along y.
        let reading_on_x = orientation == Orientation::Vertical;
        let (box_a, box_b) = (a.working_box(), b.working_box());

        let gap = gap_between(span(&box_a, reading_on_x), span(&box_b, reading_on_x));
        let gap_limit = orientation_stats.robust_median * self.dist_k;
        if gap > gap_limit {
            return PairDecision::TooFar {
                gap,
                limit: gap_limit,
            };
        }

        let (perp_a, perp_b) = (span(&box_a, !reading_on_x), span(&box_b, !reading_on_x));
        let smaller = (perp_a.1 - perp_a.0).min(perp_b.1 - perp_b.0);
        let overlap_ratio = if smaller > 0.0 {
            overlap_between(perp_a, perp_b) / smaller
        } else {
            0.0
        };
        let overlap_limit = if mixed {
            self.overlap_min.max(self.mixed_min_overlap_ratio)
        } else {
            self.overlap_min
        };
        if overlap_ratio < overlap_limit {
            return PairDecision::InsufficientOverlap {
                ratio: overlap_ratio,
                limit: overlap_limit,
            };
        }

        PairDecision::Join
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, x: f32, y: f32, w: f32, h: f32) -> LineRecord {
        LineRecord::new(text, NormalizedBox::new(x, y, w, h), 0.95)
    }

    fn engine() -> ClusterEngine {
        ClusterEngine::new(&MergeConfig::default())
    }

    fn decide(a: &LineRecord, b: &LineRecord) -> PairDecision {
        let lines = vec![a.clone(), b.clone()];
        let stats = FontStatistics::from_lines(&lines, 0.5);
        engine().evaluate_pair(a, b, &stats)
    }

    #[test]
    fn test_identical_adjacent_lines_join() {
        let a = line("a", 0.1, 0.10, 0.4, 0.02);
        let b = line("b", 0.1, 0.12, 0.4, 0.02);
        assert_eq!(decide(&a, &b), PairDecision::Join);
        assert_eq!(decide(&b, &a), PairDecision::Join);
    }

    #[test]
    fn test_opposite_orientations_never_join() {
        let horizontal = line("h", 0.1, 0.1, 0.4, 0.02);
        let vertical = line("v", 0.1, 0.1, 0.02, 0.4);
        assert_eq!(
            decide(&horizontal, &vertical),
            PairDecision::OrientationMismatch
        );
    }

    #[test]
    fn test_font_ratio_rejects_mismatched_sizes() {
        let small = line("s", 0.1, 0.10, 0.4, 0.02);
        let large = line("l", 0.1, 0.12, 0.4, 0.03);
        assert!(matches!(
            decide(&small, &large),
            PairDecision::FontSizeMismatch { .. }
        ));
    }

    #[test]
    fn test_distant_lines_are_too_far() {
        // Median height is 20 in working scale, so the gap limit is 24.
        let a = line("a", 0.1, 0.10, 0.4, 0.02);
        let b = line("b", 0.1, 0.20, 0.4, 0.02);
        assert!(matches!(decide(&a, &b), PairDecision::TooFar { .. }));
    }

    #[test]
    fn test_side_by_side_columns_without_overlap_rejected() {
        // Vertical lines read along x; these share no y extent.
        let a = line("a", 0.50, 0.1, 0.02, 0.2);
        let b = line("b", 0.48, 0.4, 0.02, 0.2);
        assert!(matches!(
            decide(&a, &b),
            PairDecision::InsufficientOverlap { .. }
        ));
    }

    #[test]
    fn test_mixed_pair_needs_stricter_overlap() {
        // Large body text puts the primary cutoff at 20, splitting two similar lines.
        let mut lines = vec![
            line("big1", 0.1, 0.300, 0.4, 0.040),
            line("big2", 0.1, 0.500, 0.4, 0.040),
            line("big3", 0.1, 0.700, 0.4, 0.040),
            line("primary", 0.1, 0.100, 0.4, 0.0205),
            line("secondary", 0.47, 0.121, 0.1, 0.0195),
        ];
        let stats = FontStatistics::from_lines(&lines, 0.5);
        assert!(stats.horizontal.is_primary(lines[3].font_metric()));
        assert!(!stats.horizontal.is_primary(lines[4].font_metric()));

        // Overlap of 0.3 passes overlap_min but not the mixed minimum.
        let decision = engine().evaluate_pair(&lines[3], &lines[4], &stats);
        assert!(matches!(
            decision,
            PairDecision::InsufficientOverlap { limit, .. } if limit == 0.5
        ));

        lines[4] = line("secondary", 0.42, 0.121, 0.1, 0.0195);
        let stats = FontStatistics::from_lines(&lines, 0.5);
        assert_eq!(
            engine().evaluate_pair(&lines[3], &lines[4], &stats),
            PairDecision::Join
        );
    }

    #[test]
    fn test_mixed_pair_uses_tighter_font_ratio() {
        let lines = vec![
            line("p1", 0.1, 0.100, 0.4, 0.020),
            line("p2", 0.1, 0.300, 0.4, 0.020),
            line("p3", 0.1, 0.500, 0.4, 0.020),
            line("s", 0.45, 0.121, 0.1, 0.009),
        ];
        let stats = FontStatistics::from_lines(&lines, 0.5);
        assert!(matches!(
            engine().evaluate_pair(&lines[0], &lines[3], &stats),
            PairDecision::FontSizeMismatch { limit, .. } if limit == 1.1
        ));
    }

    #[test]
    fn test_cluster_is_deterministic() {
        let lines = vec![
            line("a", 0.1, 0.10, 0.4, 0.02),
            line("far", 0.1, 0.60, 0.4, 0.02),
            line("b", 0.1, 0.12, 0.4, 0.02),
            line("c", 0.1, 0.14, 0.4, 0.02),
        ];
        let first = engine().cluster(&lines);
        let second = engine().cluster(&lines);
        assert_eq!(first, second);
        assert_eq!(first, vec![vec![0, 2, 3], vec![1]]);
    }

    #[test]
    fn test_zero_width_lines_compare_as_equal_size() {
        let a = line("a", 0.1, 0.1, 0.0, 0.02);
        let b = line("b", 0.1, 0.1, 0.0, 0.02);
        // Zero-width lines have no font metric; equal metrics still compare as ratio 1.
        assert_eq!(decide(&a, &b), PairDecision::Join);
    }

    #[test]
    fn test_point_boxes_have_no_overlap() {
        let a = line("a", 0.3, 0.3, 0.0, 0.0);
        let b = line("b", 0.3, 0.3, 0.0, 0.0);
        assert_eq!(
            decide(&a, &b),
            PairDecision::InsufficientOverlap {
                ratio: 0.0,
                limit: 0.1
            }
        );
    }
}
