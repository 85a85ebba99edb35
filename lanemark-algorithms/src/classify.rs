//! Slope-extreme clustering of lane segments.
//!
//! 1. Vertical segments have no slope and are set aside.
//! 2. Bail out with empty clusters below `2 * n_lines` usable segments.
//! 3. Stable sort by slope, then take the mean slope.
//! 4. From each end of the sorted buffer, keep the longest prefix whose
//!    distance to the mean stays at least `cluster_thresh_ratio` times the
//!    distance of the end element, without crossing the mean.
//!
//! In image coordinates y grows downward, so the most negative slopes belong
//! to the left lane marking.
#![allow(clippy::cast_precision_loss, clippy::must_use_candidate)]

use std::cmp::Ordering;

use lanemark_core::seq::{accumulate, find_index, map_collect, sort_by};
use lanemark_core::{reversed, LaneConfig, LineSegment, Traversal};
use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of classifying one frame's segments.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneClusters {
    /// Most negative slopes, ordered from the most extreme inward.
    pub left: Vec<LineSegment>,
    /// Most positive slopes, ordered from the most extreme inward.
    pub right: Vec<LineSegment>,
    /// Mean slope of the usable segments, `None` when clustering was skipped.
    pub mean_slope: Option<f64>,
    /// Vertical segments left out of the statistics.
    pub vertical: usize,
}

impl LaneClusters {
    fn skipped(vertical: usize) -> Self {
        Self {
            vertical,
            ..Self::default()
        }
    }

    /// Returns true if neither side found a cluster.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Splits into `(left, right)`.
    pub fn into_pair(self) -> (Vec<LineSegment>, Vec<LineSegment>) {
        (self.left, self.right)
    }
}

#[derive(Debug, Clone, Copy)]
struct Sloped {
    segment: LineSegment,
    slope: f64,
}

impl Sloped {
    fn new(segment: &LineSegment) -> Option<Self> {
        segment.slope().map(|slope| Self {
            segment: *segment,
            slope,
        })
    }
}

/// Splits `lines` into left and right lane clusters.
///
/// Pure: the same input always yields the same output, and every returned
/// segment is one of `lines`. Too few usable segments is not an error; it
/// yields empty clusters.
pub fn classify_lanes(config: &LaneConfig, lines: &[LineSegment]) -> LaneClusters {
    let vertical = lines.iter().filter(|s| s.is_vertical()).count();
    if let Some(first) = lines.iter().find(|s| s.is_vertical()) {
        warn!("excluding {vertical} vertical segment(s) from lane statistics, first: {first}");
    }

    let mut sloped: Vec<Sloped> = lines.iter().filter_map(Sloped::new).collect();
    let required = config.n_lines.saturating_mul(2);
    if sloped.is_empty() || sloped.len() < required {
        debug!(
            "{} usable segment(s), {required} required; skipping classification",
            sloped.len()
        );
        return LaneClusters::skipped(vertical);
    }

    // Slopes are finite, so partial_cmp never fails; -0.0 and 0.0 tie.
    sort_by(&mut sloped, |a, b| {
        a.slope.partial_cmp(&b.slope).unwrap_or(Ordering::Equal)
    });

    let mean = accumulate(&sloped, 0.0, |sum, s| sum + s.slope) / sloped.len() as f64;
    let ratio = config.cluster_thresh_ratio;

    let left = extreme_cluster(sloped.as_slice(), mean, ratio);
    let right = extreme_cluster(reversed(&sloped), mean, ratio);

    debug!(
        "classified {} segment(s): mean slope {mean:.4}, left {}, right {}",
        sloped.len(),
        left.len(),
        right.len()
    );

    LaneClusters {
        left,
        right,
        mean_slope: Some(mean),
        vertical,
    }
}

/// Longest prefix of `view` that stays far from `mean` on the pivot's side.
///
/// When the pivot itself sits on the mean the threshold is zero and every
/// segment qualifies.
fn extreme_cluster<'a, V>(view: V, mean: f64, ratio: f64) -> Vec<LineSegment>
where
    V: Traversal<'a, Sloped>,
{
    let Some(pivot) = view.front() else {
        return Vec::new();
    };
    let pivot_offset = pivot.slope - mean;
    let threshold = pivot_offset.abs() * ratio;

    let len = find_index(view.traverse(), |s| {
        let offset = s.slope - mean;
        offset.abs() < threshold || offset * pivot_offset < 0.0
    })
    .unwrap_or(usize::MAX);

    map_collect(view.traverse().take(len), |s| s.segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Segment starting at `(x, 0)` with slope `dy / 100`.
    fn seg(x: i32, dy: i32) -> LineSegment {
        LineSegment::new(x, 0, x + 100, dy)
    }

    fn config(n_lines: usize, ratio: f64) -> LaneConfig {
        LaneConfig::new()
            .with_n_lines(n_lines)
            .with_cluster_thresh_ratio(ratio)
    }

    #[test]
    fn test_guard_uses_twice_n_lines() {
        let lines: Vec<_> = (0..5).map(|i| seg(i, -70 + i * 35)).collect();
        let result = classify_lanes(&config(3, 0.85), &lines);
        assert!(result.is_empty());
        assert_eq!(result.mean_slope, None);

        let result = classify_lanes(&config(2, 0.85), &lines[..4]);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let result = classify_lanes(&config(1, 0.5), &[]);
        assert_eq!(result, LaneClusters::default());
    }

    #[test]
    fn test_clusters_are_ordered_from_the_extremes() {
        let lines = vec![
            seg(0, -60),
            seg(1, 75),
            seg(2, -90),
            seg(3, 60),
            seg(4, -75),
            seg(5, 90),
        ];
        let result = classify_lanes(&config(3, 0.5), &lines);

        assert_eq!(result.left, vec![seg(2, -90), seg(4, -75), seg(0, -60)]);
        assert_eq!(result.right, vec![seg(5, 90), seg(1, 75), seg(3, 60)]);
        assert_relative_eq!(result.mean_slope.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stops_at_first_failing_segment() {
        // mean is -1/12, so the left threshold is ~0.458 and the right ~0.542
        let lines = vec![
            seg(0, -100),
            seg(1, -60),
            seg(2, -20),
            seg(3, 10),
            seg(4, 20),
            seg(5, 100),
        ];
        let result = classify_lanes(&config(3, 0.5), &lines);

        assert_eq!(result.left, vec![seg(0, -100), seg(1, -60)]);
        assert_eq!(result.right, vec![seg(5, 100)]);
    }

    #[test]
    fn test_does_not_cross_the_mean() {
        // Without the crossing check +0.95 would pass the left test (|0.95| >= 0.5)
        let lines = vec![seg(0, -100), seg(1, -95), seg(2, 95), seg(3, 100)];
        let result = classify_lanes(&config(2, 0.5), &lines);

        assert_eq!(result.left, vec![seg(0, -100), seg(1, -95)]);
        assert_eq!(result.right, vec![seg(3, 100), seg(2, 95)]);
    }

    #[test]
    fn test_ratio_one_keeps_only_pivot_ties() {
        let lines = vec![
            seg(0, -80),
            seg(1, -80),
            seg(2, -40),
            seg(3, 40),
            seg(4, 80),
            seg(5, 70),
        ];
        let result = classify_lanes(&config(3, 1.0), &lines);
        assert_eq!(result.left, vec![seg(0, -80), seg(1, -80)]);
        assert_eq!(result.right.len(), 1);
    }

    #[test]
    fn test_equal_slopes_keep_input_order() {
        let lines = vec![seg(7, 50), seg(3, 50), seg(9, 50), seg(1, 50)];
        let result = classify_lanes(&config(2, 0.85), &lines);

        // Zero spread: every segment qualifies from both ends.
        assert_eq!(result.left, lines);
        let mut reversed_input = lines.clone();
        reversed_input.reverse();
        assert_eq!(result.right, reversed_input);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        // 0 / -100 is -0.0
        let flat_backward = LineSegment::new(100, 5, 0, 5);
        let flat_forward = LineSegment::new(0, 5, 100, 5);
        let lines = vec![flat_forward, flat_backward];
        let result = classify_lanes(&config(1, 0.5), &lines);
        assert_eq!(result.left, lines);
    }

    #[test]
    fn test_vertical_segments_are_reported_not_clustered() {
        let mut lines = vec![seg(0, -70), seg(1, -72), seg(2, 70), seg(3, 72)];
        lines.insert(2, LineSegment::new(50, 0, 50, 100));
        let result = classify_lanes(&config(2, 0.85), &lines);

        assert_eq!(result.vertical, 1);
        assert_eq!(result.left.len(), 2);
        assert_eq!(result.right.len(), 2);
        assert!(result
            .left
            .iter()
            .chain(&result.right)
            .all(|s| !s.is_vertical()));
    }

    #[test]
    fn test_every_vertical_segment_is_counted() {
        let lines = vec![
            LineSegment::new(5, 0, 5, 40),
            seg(0, -70),
            LineSegment::new(9, 9, 9, 9),
            seg(1, 70),
            LineSegment::new(60, 10, 60, 90),
        ];

        let result = classify_lanes(&config(1, 0.85), &lines);
        assert_eq!(result.vertical, 3);
        assert_eq!(result.left, vec![seg(0, -70)]);

        let skipped = classify_lanes(&config(2, 0.85), &lines);
        assert!(skipped.is_empty());
        assert_eq!(skipped.vertical, 3);
    }

    #[test]
    fn test_into_pair() {
        let lines = vec![seg(0, -70), seg(1, 70)];
        let (left, right) = classify_lanes(&config(1, 0.85), &lines).into_pair();
        assert_eq!(left, vec![seg(0, -70)]);
        assert_eq!(right, vec![seg(1, 70)]);
    }
}
