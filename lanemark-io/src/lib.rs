//! lanemark-io: Image side of the lane detection pipeline.
//!
//! This crate decodes road images, runs the pre-processing stages
//! (crop, grayscale, blur, Canny edges), extracts line segments with a
//! probabilistic Hough transform and hands them to the classifier.
//!

mod error;
pub mod hough;
pub mod pipeline;
pub mod stages;
mod writer;

pub use error::{Error, Result};
pub use hough::extract_lines;
pub use pipeline::{detect_lanes, detect_lanes_from_path, load_image};
pub use stages::{blur, crop, detect_edges, grayscale};
pub use writer::{read_segments, LaneWriter};
