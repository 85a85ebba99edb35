//! Run configuration shared by every pipeline stage.
#![allow(clippy::doc_markdown)]

use std::f64::consts::PI;

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Finest accepted Hough distance resolution, in pixels.
pub const MIN_HOUGH_DIST_RESOL: f64 = 0.5;

/// Most angle bins the Hough accumulator may span over `[0, pi)`.
pub const MAX_HOUGH_ANGLE_BINS: u32 = 1800;

/// Parameters for one lane detection run.
///
/// The configuration is built once, validated, and then only ever borrowed
/// by the stages of a run. The clustering fields drive the classifier; the
/// rest are consumed by the image stages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LaneConfig {
    /// Expected segments per lane. Fewer than `2 * n_lines` usable segments
    /// yields empty clusters.
    pub n_lines: usize,
    /// Fraction of the pivot's deviation from the mean slope a segment must
    /// keep to join the pivot's cluster. In (0, 1].
    pub cluster_thresh_ratio: f64,
    /// Top of the region of interest, as a fraction of image height.
    pub y_crop_min: f64,
    /// Bottom of the region of interest, as a fraction of image height.
    pub y_crop_max: f64,
    /// Gaussian blur radius; the kernel is `2 * blur_radius + 1` wide.
    pub blur_radius: u32,
    /// Canny hysteresis low threshold.
    pub canny_min_thresh: f32,
    /// Canny hysteresis high threshold.
    pub canny_max_thresh: f32,
    /// Hough distance resolution in pixels.
    pub hough_dist_resol: f64,
    /// Hough angle resolution in radians.
    pub hough_angle_resol: f64,
    /// Accumulator votes needed before a line is traced.
    pub hough_vote_thresh: u32,
    /// Minimum segment extent along either axis, in pixels.
    pub hough_min_length: u32,
    /// Largest run of missing edge pixels bridged inside one segment.
    pub hough_max_gap: u32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            n_lines: 5,
            cluster_thresh_ratio: 0.85,
            y_crop_min: 0.5,
            y_crop_max: 0.9,
            blur_radius: 8,
            canny_min_thresh: 60.0,
            canny_max_thresh: 190.0,
            hough_dist_resol: 2.0,
            hough_angle_resol: PI / 90.0,
            hough_vote_thresh: 20,
            hough_min_length: 8,
            hough_max_gap: 0,
        }
    }
}

impl LaneConfig {
    /// Creates a configuration with the default workshop values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected number of segments per lane.
    #[must_use]
    pub fn with_n_lines(mut self, n_lines: usize) -> Self {
        self.n_lines = n_lines;
        self
    }

    /// Sets the cluster threshold ratio.
    #[must_use]
    pub fn with_cluster_thresh_ratio(mut self, ratio: f64) -> Self {
        self.cluster_thresh_ratio = ratio;
        self
    }

    /// Sets the vertical crop bounds (fractions of image height).
    #[must_use]
    pub fn with_crop(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_crop_min = y_min;
        self.y_crop_max = y_max;
        self
    }

    /// Sets the blur radius.
    #[must_use]
    pub fn with_blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = radius;
        self
    }

    /// Sets both Canny thresholds.
    #[must_use]
    pub fn with_canny_thresholds(mut self, low: f32, high: f32) -> Self {
        self.canny_min_thresh = low;
        self.canny_max_thresh = high;
        self
    }

    /// Sets the Hough accumulator resolutions.
    #[must_use]
    pub fn with_hough_resolution(mut self, dist: f64, angle: f64) -> Self {
        self.hough_dist_resol = dist;
        self.hough_angle_resol = angle;
        self
    }

    /// Sets the Hough vote threshold.
    #[must_use]
    pub fn with_hough_vote_thresh(mut self, votes: u32) -> Self {
        self.hough_vote_thresh = votes;
        self
    }

    /// Sets the Hough minimum segment length and maximum gap.
    #[must_use]
    pub fn with_hough_segment_limits(mut self, min_length: u32, max_gap: u32) -> Self {
        self.hough_min_length = min_length;
        self.hough_max_gap = max_gap;
        self
    }

    /// Checks every parameter range.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.n_lines == 0 {
            return Err(Error::invalid_config("n_lines", "must be at least 1"));
        }

        let ratio = self.cluster_thresh_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(Error::invalid_config(
                "cluster_thresh_ratio",
                format!("{ratio} is outside (0, 1]"),
            ));
        }

        if !(0.0..=1.0).contains(&self.y_crop_min) {
            return Err(Error::invalid_config(
                "y_crop_min",
                format!("{} is outside [0, 1]", self.y_crop_min),
            ));
        }
        if !(0.0..=1.0).contains(&self.y_crop_max) {
            return Err(Error::invalid_config(
                "y_crop_max",
                format!("{} is outside [0, 1]", self.y_crop_max),
            ));
        }
        if self.y_crop_min >= self.y_crop_max {
            return Err(Error::invalid_config(
                "y_crop_min",
                format!(
                    "{} must be below y_crop_max ({})",
                    self.y_crop_min, self.y_crop_max
                ),
            ));
        }

        if !(self.canny_min_thresh >= 0.0) {
            return Err(Error::invalid_config(
                "canny_min_thresh",
                format!("{} must be non-negative", self.canny_min_thresh),
            ));
        }
        if !(self.canny_max_thresh >= self.canny_min_thresh) {
            return Err(Error::invalid_config(
                "canny_max_thresh",
                format!(
                    "{} must not be below canny_min_thresh ({})",
                    self.canny_max_thresh, self.canny_min_thresh
                ),
            ));
        }

        let dist = self.hough_dist_resol;
        if !(dist >= MIN_HOUGH_DIST_RESOL && dist.is_finite()) {
            return Err(Error::invalid_config(
                "hough_dist_resol",
                format!("{dist} must be a finite value of at least {MIN_HOUGH_DIST_RESOL}"),
            ));
        }
        if !(self.hough_angle_resol > 0.0 && self.hough_angle_resol <= PI) {
            return Err(Error::invalid_config(
                "hough_angle_resol",
                format!("{} is outside (0, pi]", self.hough_angle_resol),
            ));
        }
        // Same bin count the accumulator allocates.
        let angle_bins = (PI / self.hough_angle_resol).round();
        if angle_bins > f64::from(MAX_HOUGH_ANGLE_BINS) {
            return Err(Error::invalid_config(
                "hough_angle_resol",
                format!(
                    "{} needs {angle_bins} angle bins, more than {MAX_HOUGH_ANGLE_BINS}",
                    self.hough_angle_resol
                ),
            ));
        }

        Ok(())
    }

    /// Consumes the configuration, returning it if valid.
    ///
    /// # Errors
    /// See [`LaneConfig::validate`].
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}
