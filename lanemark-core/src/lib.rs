//! lanemark-core: Core types for lane-boundary segment detection.
//!
//! This crate provides the line segment model, the run configuration,
//! the configuration-threading pipeline context and the small sequence
//! helpers used by the lane classifier.
//!

pub mod config;
pub mod context;
pub mod error;
pub mod segment;
pub mod seq;

pub use config::LaneConfig;
pub use context::{Context, Pipe};
pub use error::{Error, Result};
pub use segment::{LineSegment, Point};
pub use seq::{reversed, ReverseView, Traversal};
