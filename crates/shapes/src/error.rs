//! The error type shared by the shape constructors.

use thiserror::Error;

/// An error raised while building a shape, a measured outline or a morph.
///
/// Only construction is fallible. Queries on built values (sampling,
/// interpolation, bounds) are total and never report errors.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// The caller provided inputs the builders cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal post-condition did not hold. This indicates a bug in the
    /// library rather than a problem with the caller's inputs.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl ShapeError {
    pub(crate) fn argument(reason: impl Into<String>) -> Self {
        ShapeError::InvalidArgument(reason.into())
    }

    pub(crate) fn state(reason: impl Into<String>) -> Self {
        ShapeError::InvalidState(reason.into())
    }
}

/// Shorthand for results produced by the shape builders.
pub type ShapeResult<T> = core::result::Result<T, ShapeError>;
