//! I/O error types.

use thiserror::Error;

/// Result type for image and file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed segment or parameter file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Crop region does not fit inside the image.
    #[error("crop rows {top}..{bottom} do not fit an image of height {height}")]
    CropOutOfBounds {
        /// First row of the region.
        top: u32,
        /// One past the last row of the region.
        bottom: u32,
        /// Image height.
        height: u32,
    },

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] lanemark_core::Error),
}
