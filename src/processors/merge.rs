//! Turns clustered lines into output blocks.

use crate::core::config::MergeConfig;
use crate::domain::{Block, LineRecord, NormalizedBox, Orientation};
use itertools::Itertools;
use std::cmp::Ordering;

/// Builds one [`Block`] per group of lines.
#[derive(Debug, Clone)]
pub struct BlockMerger {
    separator: String,
}

impl BlockMerger {
    pub fn new(config: &MergeConfig) -> Self {
        Self {
            separator: config.separator.clone(),
        }
    }

    /// Merges every group of indices into `lines`, preserving group order.
    pub fn merge_groups(&self, lines: &[LineRecord], groups: &[Vec<usize>]) -> Vec<Block> {
        groups
            .iter()
            .filter_map(|group| {
                let members: Vec<&LineRecord> =
                    group.iter().filter_map(|&i| lines.get(i)).collect();
                self.merge_group(members)
            })
            .collect()
    }

    /// Merges one group. Returns `None` for an empty group.
    ///
    /// A single line passes through untouched. Larger groups are ordered for
    /// reading, joined with the separator and given the union of their boxes.
    pub fn merge_group(&self, mut members: Vec<&LineRecord>) -> Option<Block> {
        match members.len() {
            0 => return None,
            1 => return Some(Block::passthrough(members[0])),
            _ => {}
        }

        let orientation = vote_orientation(&members);
        sort_for_reading(&mut members, orientation);

        let text = members.iter().map(|line| line.text()).join(&self.separator);
        let bbox = members
            .iter()
            .map(|line| *line.bbox())
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();

        tracing::debug!(
            members = members.len(),
            orientation = %orientation,
            "merged block"
        );
        Some(Block::merged(text, bbox, orientation))
    }
}

/// Majority vote over member boxes. Taller-than-wide votes vertical, wider-than-tall
/// votes horizontal; a tie is horizontal.
pub fn vote_orientation(members: &[&LineRecord]) -> Orientation {
    let mut vertical = 0usize;
    let mut horizontal = 0usize;
    for line in members {
        let bbox: &NormalizedBox = line.bbox();
        if bbox.height > bbox.width {
            vertical += 1;
        } else if bbox.width > bbox.height {
            horizontal += 1;
        }
    }
    if vertical > horizontal {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

/// Vertical text reads right-to-left then top-to-bottom; horizontal text reads
/// top-to-bottom then left-to-right.
fn sort_for_reading(members: &mut [&LineRecord], orientation: Orientation) {
    members.sort_by(|a, b| {
        let (ca, cb) = (a.bbox(), b.bbox());
        let ordering = match orientation {
            Orientation::Vertical => cb
                .center_x()
                .total_cmp(&ca.center_x())
                .then_with(|| ca.center_y().total_cmp(&cb.center_y())),
            Orientation::Horizontal => ca
                .center_y()
                .total_cmp(&cb.center_y())
                .then_with(|| ca.center_x().total_cmp(&cb.center_x())),
        };
        if ordering == Ordering::Equal {
            a.text().cmp(b.text())
        } else {
            ordering
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, x: f32, y: f32, w: f32, h: f32) -> LineRecord {
        LineRecord::new(text, NormalizedBox::new(x, y, w, h), 0.9)
    }

    #[test]
    fn test_singleton_passes_through() {
        let merger = BlockMerger::new(&MergeConfig::default());
        let only = line("solo", 0.1, 0.1, 0.3, 0.02);
        let block = merger.merge_group(vec![&only]).unwrap();
        assert_eq!(block, Block::passthrough(&only));
        assert!(!block.is_merged);
        assert!(merger.merge_group(Vec::new()).is_none());
    }

    #[test]
    fn test_vertical_group_reads_right_to_left() {
        let merger = BlockMerger::new(&MergeConfig::default());
        let left = line("third", 0.09, 0.1, 0.02, 0.3);
        let middle = line("second", 0.19, 0.1, 0.02, 0.3);
        let right = line("first", 0.29, 0.1, 0.02, 0.3);
        let block = merger.merge_group(vec![&left, &right, &middle]).unwrap();
        assert_eq!(block.text, "first\u{200D}second\u{200D}third");
        assert!(block.is_merged);
        assert_eq!(block.forced_orientation, Some(Orientation::Vertical));
    }

    #[test]
    fn test_horizontal_group_with_space_separator() {
        let config = MergeConfig::default().with_space_separator();
        let merger = BlockMerger::new(&config);
        let bottom = line("world", 0.1, 0.14, 0.3, 0.02);
        let top = line("hello", 0.1, 0.11, 0.3, 0.02);
        let block = merger.merge_group(vec![&bottom, &top]).unwrap();
        assert_eq!(block.text, "hello world");
        assert_eq!(block.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn test_union_box_contains_members() {
        let merger = BlockMerger::new(&MergeConfig::default());
        let a = line("a", 0.10, 0.10, 0.30, 0.02);
        let b = line("b", 0.05, 0.13, 0.20, 0.02);
        let c = line("c", 0.12, 0.16, 0.35, 0.03);
        let block = merger.merge_group(vec![&a, &b, &c]).unwrap();
        for member in [&a, &b, &c] {
            assert!(block.bbox.contains(member.bbox()));
        }
        assert!((block.bbox.x - 0.05).abs() < 1e-6);
        assert!((block.bbox.bottom() - 0.19).abs() < 1e-6);
    }

    #[test]
    fn test_vote_ties_default_to_horizontal() {
        let tall = line("t", 0.1, 0.1, 0.02, 0.3);
        let wide = line("w", 0.1, 0.1, 0.3, 0.02);
        assert_eq!(vote_orientation(&[&tall, &wide]), Orientation::Horizontal);

        let tall2 = line("t2", 0.2, 0.1, 0.02, 0.3);
        assert_eq!(
            vote_orientation(&[&tall, &wide, &tall2]),
            Orientation::Vertical
        );
    }

    #[test]
    fn test_merge_groups_keeps_group_order() {
        let merger = BlockMerger::new(&MergeConfig::default());
        let lines = vec![
            line("a", 0.1, 0.10, 0.3, 0.02),
            line("x", 0.1, 0.80, 0.3, 0.02),
            line("b", 0.1, 0.12, 0.3, 0.02),
        ];
        let blocks = merger.merge_groups(&lines, &[vec![0, 2], vec![1]]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "a\u{200D}b");
        assert_eq!(blocks[1].text, "x");
    }
}
