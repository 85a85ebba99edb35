//! Error types for lanemark-core.

use thiserror::Error;

/// Result type alias for lanemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for lanemark operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration parameter is out of its valid range.
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending parameter.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
