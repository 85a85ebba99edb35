//! lanemark-algorithms: Lane segment classification.
//!
//! Candidate segments from line extraction are split into a left and a
//! right cluster by looking at how far each slope sits from the mean slope.
//!
#![warn(missing_docs)]

mod classify;

pub use classify::{classify_lanes, LaneClusters};

// Re-export the types a caller needs to drive the classifier
pub use lanemark_core::{LaneConfig, LineSegment};
