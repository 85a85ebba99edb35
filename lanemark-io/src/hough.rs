//! Progressive probabilistic Hough transform.
//!
//! Edge pixels vote one at a time. As soon as some `(rho, theta)` bin reaches
//! the vote threshold, the line through the current pixel is traced in both
//! directions across the edge mask, bridging at most `hough_max_gap` missing
//! pixels. Pixels on the traced run are removed from the mask; if the run is
//! long enough it becomes a segment and its votes are withdrawn.
//!
//! Pixels are visited in row-major order, so the output is fully
//! deterministic for a given edge map and configuration.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::needless_pass_by_value,
    clippy::similar_names
)]

use std::f64::consts::PI;

use image::GrayImage;
use lanemark_core::{LaneConfig, LineSegment};
use log::debug;

/// Fixed-point fraction bits used while stepping along a line.
const SHIFT: u32 = 16;

/// Hough accumulator over `(angle, rho)` bins.
struct Accumulator {
    /// `(cos, sin)` of every angle, pre-divided by the distance resolution.
    trig: Vec<(f64, f64)>,
    num_rho: usize,
    rho_offset: i64,
    votes: Vec<u32>,
}

impl Accumulator {
    fn new(width: u32, height: u32, rho: f64, theta: f64) -> Self {
        let num_angle = ((PI / theta).round() as usize).max(1);
        let span = 2 * (u64::from(width) + u64::from(height)) + 1;
        let num_rho = ((span as f64 / rho).round() as usize).max(1);
        let trig = (0..num_angle)
            .map(|n| {
                let angle = n as f64 * theta;
                (angle.cos() / rho, angle.sin() / rho)
            })
            .collect();

        Self {
            trig,
            num_rho,
            rho_offset: (num_rho as i64 - 1) / 2,
            votes: vec![0; num_angle * num_rho],
        }
    }

    fn bin(&self, n: usize, x: i64, y: i64) -> Option<usize> {
        let (cos, sin) = self.trig[n];
        let r = (x as f64 * cos + y as f64 * sin).round() as i64 + self.rho_offset;
        let r = usize::try_from(r).ok().filter(|&r| r < self.num_rho)?;
        Some(n * self.num_rho + r)
    }

    /// Adds the pixel's votes and returns the first strongest angle.
    fn vote(&mut self, x: i64, y: i64) -> (usize, u32) {
        let mut best = (0, 0);
        for n in 0..self.trig.len() {
            if let Some(idx) = self.bin(n, x, y) {
                self.votes[idx] += 1;
                if self.votes[idx] > best.1 {
                    best = (n, self.votes[idx]);
                }
            }
        }
        best
    }

    fn withdraw(&mut self, x: i64, y: i64) {
        for n in 0..self.trig.len() {
            if let Some(idx) = self.bin(n, x, y) {
                self.votes[idx] = self.votes[idx].saturating_sub(1);
            }
        }
    }
}

/// Fixed-point walker along the line of angle `n` through a pixel.
#[derive(Clone, Copy)]
struct Walker {
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
    /// Steps are whole pixels in x (and fixed-point in y) when set.
    x_major: bool,
}

impl Walker {
    fn new(px: i64, py: i64, cos: f64, sin: f64) -> Self {
        let (a, b) = (-sin, cos);
        let one = (1_i64 << SHIFT) as f64;
        let half = 1_i64 << (SHIFT - 1);

        if a.abs() > b.abs() {
            Self {
                x0: px,
                y0: (py << SHIFT) + half,
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * one / a.abs()).round() as i64,
                x_major: true,
            }
        } else {
            Self {
                x0: (px << SHIFT) + half,
                y0: py,
                dx: (a * one / b.abs()).round() as i64,
                dy: if b > 0.0 { 1 } else { -1 },
                x_major: false,
            }
        }
    }

    /// Pixels visited walking forward (`direction == 0`) or backward.
    fn pixels(self, direction: usize) -> impl Iterator<Item = (i64, i64)> {
        let sign = if direction == 0 { 1 } else { -1 };
        (0_i64..).map(move |step| {
            let x = self.x0 + step * sign * self.dx;
            let y = self.y0 + step * sign * self.dy;
            if self.x_major {
                (x, y >> SHIFT)
            } else {
                (x >> SHIFT, y)
            }
        })
    }
}

/// Extracts line segments from a binary edge map.
///
/// A segment is kept when its extent along x or y reaches
/// `hough_min_length`. Endpoints are pixel coordinates of `edges`.
#[must_use]
pub fn extract_lines(config: &LaneConfig, edges: GrayImage) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    let (rho, theta) = (config.hough_dist_resol, config.hough_angle_resol);
    if width == 0 || height == 0 || !(rho > 0.0 && theta > 0.0) {
        return Vec::new();
    }
    let (w, h) = (i64::from(width), i64::from(height));
    let inside = |(x, y): (i64, i64)| x >= 0 && x < w && y >= 0 && y < h;
    let index = |(x, y): (i64, i64)| (y * w + x) as usize;

    let mut acc = Accumulator::new(width, height, rho, theta);
    let mut mask: Vec<bool> = edges.pixels().map(|p| p[0] != 0).collect();
    let points: Vec<(i64, i64)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] != 0)
        .map(|(x, y, _)| (i64::from(x), i64::from(y)))
        .collect();

    let threshold = config.hough_vote_thresh.max(1);
    let min_length = i64::from(config.hough_min_length);
    let max_gap = i64::from(config.hough_max_gap);
    let mut lines = Vec::new();

    for &(px, py) in &points {
        if !mask[index((px, py))] {
            continue;
        }

        let (best, votes) = acc.vote(px, py);
        if votes < threshold {
            continue;
        }

        let (cos, sin) = acc.trig[best];
        let walker = Walker::new(px, py, cos, sin);

        let mut ends = [(px, py); 2];
        for (direction, end) in ends.iter_mut().enumerate() {
            let mut gap = 0;
            for pixel in walker.pixels(direction).take_while(|&p| inside(p)) {
                if mask[index(pixel)] {
                    gap = 0;
                    *end = pixel;
                } else {
                    gap += 1;
                    if gap > max_gap {
                        break;
                    }
                }
            }
        }

        let good = (ends[1].0 - ends[0].0).abs() >= min_length
            || (ends[1].1 - ends[0].1).abs() >= min_length;

        for (direction, &end) in ends.iter().enumerate() {
            for pixel in walker.pixels(direction).take_while(|&p| inside(p)) {
                let idx = index(pixel);
                if mask[idx] {
                    if good {
                        acc.withdraw(pixel.0, pixel.1);
                    }
                    mask[idx] = false;
                }
                if pixel == end {
                    break;
                }
            }
        }

        if good {
            lines.push(LineSegment::new(
                ends[0].0 as i32,
                ends[0].1 as i32,
                ends[1].0 as i32,
                ends[1].1 as i32,
            ));
        }
    }

    debug!(
        "hough: {} edge pixel(s) -> {} segment(s)",
        points.len(),
        lines.len()
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn config() -> LaneConfig {
        LaneConfig::default()
            .with_hough_resolution(1.0, PI / 180.0)
            .with_hough_vote_thresh(20)
            .with_hough_segment_limits(30, 0)
    }

    #[test]
    fn test_blank_image_has_no_lines() {
        let edges = GrayImage::new(64, 64);
        assert!(extract_lines(&config(), edges).is_empty());
        assert!(extract_lines(&config(), GrayImage::new(0, 0)).is_empty());
    }

    #[test]
    fn test_horizontal_run() {
        let mut edges = GrayImage::new(100, 100);
        for x in 10..60 {
            edges.put_pixel(x, 50, Luma([255]));
        }

        let lines = extract_lines(&config(), edges);

        assert_eq!(lines.len(), 1, "{lines:?}");
        let line = lines[0];
        assert_eq!(line.start.y, 50);
        assert_eq!(line.end.y, 50);
        assert_eq!(line.start.x.min(line.end.x), 10);
        assert!(line.start.x.max(line.end.x) >= 57);
    }

    #[test]
    fn test_vertical_run() {
        let mut edges = GrayImage::new(100, 100);
        for y in 10..60 {
            edges.put_pixel(30, y, Luma([255]));
        }

        let lines = extract_lines(&config(), edges);

        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].is_vertical());
        assert_eq!(lines[0].start.x, 30);
        assert_eq!(lines[0].start.y.min(lines[0].end.y), 10);
        assert_eq!(lines[0].start.y.max(lines[0].end.y), 59);
    }

    #[test]
    fn test_short_run_is_not_a_segment() {
        let mut edges = GrayImage::new(100, 100);
        for x in 10..35 {
            edges.put_pixel(x, 20, Luma([255]));
        }
        // Enough votes to trace, but the run spans fewer than 30 pixels.
        assert!(extract_lines(&config(), edges).is_empty());
    }

    #[test]
    fn test_gap_splits_or_bridges() {
        let mut edges = GrayImage::new(120, 40);
        for x in (5..45).chain(48..100) {
            edges.put_pixel(x, 20, Luma([255]));
        }

        let split = extract_lines(&config(), edges.clone());
        assert!(split
            .iter()
            .all(|l| l.start.x.max(l.end.x) < 45 || l.start.x.min(l.end.x) >= 48));

        let bridged = extract_lines(&config().with_hough_segment_limits(30, 3), edges);
        assert!(bridged
            .iter()
            .any(|l| l.start.x.min(l.end.x) < 45 && l.start.x.max(l.end.x) >= 48));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mut edges = GrayImage::new(80, 80);
        for i in 0..60 {
            edges.put_pixel(10 + i, 70 - i, Luma([255]));
            edges.put_pixel(10 + i, 10 + i, Luma([255]));
        }
        let first = extract_lines(&config(), edges.clone());
        let second = extract_lines(&config(), edges);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
