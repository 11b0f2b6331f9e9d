//! Outlier-resistant font size statistics.
//!
//! Stray dots and furigana produce lines whose font metric is far below the body
//! text. The robust median drops those before settling on a typical size, and is
//! computed per orientation because the font axis differs between the two.

use crate::core::constants::DEFAULT_FONT_METRIC;
use crate::domain::{LineRecord, Orientation};

/// Median of `values`; the mean of the two middle values for an even count.
///
/// Returns `None` for an empty slice. NaN values sort last.
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn usable(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Typical font metric of one orientation within one clustering chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustStatistics {
    /// Median over every line, if there were any.
    pub initial_median: Option<f32>,
    /// Median over primary lines, after fallbacks.
    pub robust_median: f32,
    /// Ratio of the initial median a line must reach to count as primary.
    pub min_line_ratio: f32,
}

impl RobustStatistics {
    /// Computes the robust median of `metrics`.
    ///
    /// Falls back to the initial median when no line is primary, then to
    /// [`DEFAULT_FONT_METRIC`] when there is no positive median at all.
    pub fn compute(metrics: &[f32], min_line_ratio: f32) -> Self {
        let initial_median = median(metrics);
        let robust_median = match usable(initial_median) {
            Some(initial) => {
                let cutoff = initial * min_line_ratio;
                let primary: Vec<f32> = metrics.iter().copied().filter(|m| *m >= cutoff).collect();
                usable(median(&primary)).unwrap_or(initial)
            }
            None => DEFAULT_FONT_METRIC,
        };
        Self {
            initial_median,
            robust_median,
            min_line_ratio,
        }
    }

    /// Whether a line of this metric is main text rather than an annotation.
    pub fn is_primary(&self, font_metric: f32) -> bool {
        font_metric >= self.robust_median * self.min_line_ratio
    }
}

/// Robust statistics for both orientations of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStatistics {
    pub vertical: RobustStatistics,
    pub horizontal: RobustStatistics,
}

impl FontStatistics {
    pub fn from_lines(lines: &[LineRecord], min_line_ratio: f32) -> Self {
        let (vertical, horizontal): (Vec<&LineRecord>, Vec<&LineRecord>) = lines
            .iter()
            .partition(|line| line.orientation().is_vertical());
        let metrics = |group: &[&LineRecord]| -> Vec<f32> {
            group.iter().map(|line| line.font_metric()).collect()
        };
        Self {
            vertical: RobustStatistics::compute(&metrics(&vertical), min_line_ratio),
            horizontal: RobustStatistics::compute(&metrics(&horizontal), min_line_ratio),
        }
    }

    pub fn for_orientation(&self, orientation: Orientation) -> &RobustStatistics {
        match orientation {
            Orientation::Vertical => &self.vertical,
            Orientation::Horizontal => &self.horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NormalizedBox;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_robust_median_ignores_small_noise() {
        // Two stray dots pull the plain median down; the robust one recovers.
        let metrics = [2.0, 3.0, 20.0, 21.0, 22.0];
        let stats = RobustStatistics::compute(&metrics, 0.5);
        assert_eq!(stats.initial_median, Some(20.0));
        assert_eq!(stats.robust_median, 21.0);
        assert!(stats.is_primary(20.0));
        assert!(!stats.is_primary(3.0));
    }

    #[test]
    fn test_robust_median_fallbacks() {
        let empty = RobustStatistics::compute(&[], 0.5);
        assert_eq!(empty.initial_median, None);
        assert_eq!(empty.robust_median, DEFAULT_FONT_METRIC);

        let zeros = RobustStatistics::compute(&[0.0, 0.0], 0.5);
        assert_eq!(zeros.robust_median, DEFAULT_FONT_METRIC);
    }

    #[test]
    fn test_orientations_are_independent() {
        let lines = vec![
            LineRecord::new("v", NormalizedBox::new(0.5, 0.1, 0.03, 0.2), 0.9),
            LineRecord::new("h", NormalizedBox::new(0.1, 0.1, 0.3, 0.01), 0.9),
        ];
        let stats = FontStatistics::from_lines(&lines, 0.5);
        assert!((stats.for_orientation(Orientation::Vertical).robust_median - 30.0).abs() < 1e-3);
        assert!((stats.for_orientation(Orientation::Horizontal).robust_median - 10.0).abs() < 1e-3);
    }
}
