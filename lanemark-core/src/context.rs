//! Stage chaining with a shared, read-only configuration.
//!
//! A [`Context`] pairs a borrowed [`LaneConfig`] with the value currently
//! flowing through a pipeline. Each stage receives both and returns the next
//! value; the context rewraps it with the very same configuration reference:
//!
//! ```
//! use lanemark_core::{Context, LaneConfig};
//!
//! let config = LaneConfig::default();
//! let lines = Context::new(&config, 3_usize)
//!     .then(|cfg, n| n * cfg.n_lines)
//!     .then(|_, n| vec![0_u8; n])
//!     .into_value();
//! assert_eq!(lines.len(), 15);
//! ```
//!
//! Stages that need no configuration chain through [`Pipe`] instead.

use crate::LaneConfig;

/// A pipeline value together with the configuration of its run.
#[derive(Debug, Clone, Copy)]
#[must_use = "a context does nothing until its value is taken out"]
pub struct Context<'a, T> {
    config: &'a LaneConfig,
    value: T,
}

impl<'a, T> Context<'a, T> {
    /// Starts a pipeline with `value` as its input.
    pub fn new(config: &'a LaneConfig, value: T) -> Self {
        Self { config, value }
    }

    /// Applies `stage` to the current value.
    pub fn then<U, F>(self, stage: F) -> Context<'a, U>
    where
        F: FnOnce(&LaneConfig, T) -> U,
    {
        let value = stage(self.config, self.value);
        Context {
            config: self.config,
            value,
        }
    }

    /// Applies a fallible `stage`, handing its error back unchanged.
    ///
    /// # Errors
    /// Whatever `stage` returns.
    pub fn try_then<U, E, F>(self, stage: F) -> Result<Context<'a, U>, E>
    where
        F: FnOnce(&LaneConfig, T) -> Result<U, E>,
    {
        let value = stage(self.config, self.value)?;
        Ok(Context {
            config: self.config,
            value,
        })
    }

    /// Applies a step that ignores the configuration.
    pub fn map<U, F>(self, f: F) -> Context<'a, U>
    where
        F: FnOnce(T) -> U,
    {
        Context {
            config: self.config,
            value: f(self.value),
        }
    }

    /// The configuration shared by every stage of this run.
    #[must_use]
    pub fn config(&self) -> &'a LaneConfig {
        self.config
    }

    /// Borrows the current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Ends the pipeline, returning the current value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Configuration-free chaining: `value.pipe(stage1).pipe(stage2)`.
pub trait Pipe: Sized {
    /// Feeds `self` into `stage`.
    #[inline]
    fn pipe<U, F>(self, stage: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        stage(self)
    }
}

impl<T> Pipe for T {}
