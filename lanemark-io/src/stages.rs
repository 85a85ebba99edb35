//! Image pre-processing stages.
//!
//! Every stage takes the run configuration and the previous stage's image by
//! value and returns a new owned image, so they slot straight into
//! [`lanemark_core::Context::then`].
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::needless_pass_by_value
)]

use image::{imageops, GrayImage, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use lanemark_core::LaneConfig;
use log::debug;

use crate::{Error, Result};

/// Keeps the full-width band between `y_crop_min` and `y_crop_max`.
///
/// The band starts at row `height * y_crop_min` and is
/// `height * (y_crop_max - y_crop_min)` rows tall, both truncated.
///
/// # Errors
/// Returns [`Error::CropOutOfBounds`] if the band is empty or runs past the
/// bottom of the image.
pub fn crop(config: &LaneConfig, image: RgbImage) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let top = (f64::from(height) * config.y_crop_min) as u32;
    let rows = (f64::from(height) * (config.y_crop_max - config.y_crop_min)) as u32;
    let bottom = top.saturating_add(rows);

    if rows == 0 || width == 0 || bottom > height {
        return Err(Error::CropOutOfBounds {
            top,
            bottom,
            height,
        });
    }

    debug!("crop: {width}x{height} -> rows {top}..{bottom}");
    Ok(imageops::crop_imm(&image, 0, top, width, rows).to_image())
}

/// Converts an RGB image to 8-bit luma.
#[must_use]
pub fn grayscale(image: RgbImage) -> GrayImage {
    imageops::grayscale(&image)
}

/// Gaussian smoothing with a `2 * blur_radius + 1` kernel.
///
/// Sigma follows the kernel size the usual way,
/// `0.3 * ((ksize - 1) / 2 - 1) + 0.8`. A zero radius is the identity.
#[must_use]
pub fn blur(config: &LaneConfig, image: GrayImage) -> GrayImage {
    if config.blur_radius == 0 {
        return image;
    }
    let sigma = kernel_sigma(config.blur_radius);
    debug!("blur: radius {} (sigma {sigma:.2})", config.blur_radius);
    gaussian_blur_f32(&image, sigma)
}

fn kernel_sigma(radius: u32) -> f32 {
    0.3 * (radius as f32 - 1.0) + 0.8
}

/// Binary Canny edge map (edges are 255, background 0).
#[must_use]
pub fn detect_edges(config: &LaneConfig, image: GrayImage) -> GrayImage {
    let edges = canny(&image, config.canny_min_thresh, config.canny_max_thresh);
    debug!(
        "edges: {} edge pixel(s)",
        edges.pixels().filter(|p| p[0] != 0).count()
    );
    edges
}
