//! Line segment types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer pixel position in image coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A candidate lane-boundary segment between two endpoints.
///
/// Segments are plain values: two segments with the same endpoints are
/// indistinguishable, and duplicates are kept wherever they occur.
///
/// With the `serde` feature a segment serializes as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "[i32; 4]", into = "[i32; 4]")
)]
pub struct LineSegment {
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
}

impl LineSegment {
    /// Creates a segment from `(x1, y1)` to `(x2, y2)`.
    #[inline]
    #[must_use]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    /// Returns true if both endpoints share the same column.
    ///
    /// Zero-length segments are vertical too.
    #[inline]
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// Slope `dy / dx`, or `None` for a vertical segment.
    ///
    /// The value does not depend on endpoint order.
    #[inline]
    #[must_use]
    pub fn slope(&self) -> Option<f64> {
        if self.is_vertical() {
            return None;
        }
        let dx = f64::from(self.end.x) - f64::from(self.start.x);
        let dy = f64::from(self.end.y) - f64::from(self.start.y);
        Some(dy / dx)
    }

    /// Endpoints as `[x1, y1, x2, y2]`.
    #[inline]
    #[must_use]
    pub fn to_array(self) -> [i32; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }
}

impl From<[i32; 4]> for LineSegment {
    fn from([x1, y1, x2, y2]: [i32; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<LineSegment> for [i32; 4] {
    fn from(segment: LineSegment) -> Self {
        segment.to_array()
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}
