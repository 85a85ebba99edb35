//! The full lane detection pipeline.
//!
//! ```text
//! image -> crop -> grayscale -> blur -> detect_edges -> extract_lines -> classify_lanes
//! ```
//!
//! Segment coordinates are relative to the cropped band.

use std::path::Path;

use image::RgbImage;
use lanemark_algorithms::{classify_lanes, LaneClusters};
use lanemark_core::{Context, LaneConfig};
use log::info;

use crate::{blur, crop, detect_edges, extract_lines, grayscale, Result};

/// Decodes an image file into 8-bit RGB.
///
/// # Errors
/// Returns [`crate::Error::Image`] if the file cannot be read or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let image = image::open(path)?.to_rgb8();
    Ok(image)
}

/// Runs every stage on the context's image.
///
/// The first failing stage aborts the rest of the chain and its error is
/// returned as is.
///
/// # Errors
/// Returns [`crate::Error::CropOutOfBounds`] if the crop band does not fit.
pub fn detect_lanes(ctx: Context<'_, RgbImage>) -> Result<Context<'_, LaneClusters>> {
    let ctx = ctx
        .try_then(crop)?
        .map(grayscale)
        .then(blur)
        .then(detect_edges)
        .then(extract_lines)
        .then(|config, lines| classify_lanes(config, &lines));

    let clusters = ctx.value();
    info!(
        "lanes: {} left, {} right segment(s)",
        clusters.left.len(),
        clusters.right.len()
    );
    Ok(ctx)
}

/// Validates `config`, loads `path` and runs [`detect_lanes`].
///
/// # Errors
/// Returns [`crate::Error::CoreError`] for an invalid configuration before
/// touching the file, otherwise any loading or stage error.
pub fn detect_lanes_from_path<P: AsRef<Path>>(
    config: &LaneConfig,
    path: P,
) -> Result<LaneClusters> {
    config.validate()?;
    let image = load_image(path)?;
    let ctx = detect_lanes(Context::new(config, image))?;
    Ok(ctx.into_value())
}
