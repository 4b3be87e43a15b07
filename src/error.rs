// src/error.rs
//! Error type for the fallible, slice based constructors.

use thiserror::Error;

/// Result type for yama operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned when a scalar buffer can't be viewed or read as a value type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The buffer must hold exactly one value
    #[error("buffer size mismatch: expected {expected} scalars, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// The buffer must hold a whole number of values
    #[error("buffer of {len} scalars is not a multiple of {stride}")]
    BufferStride { len: usize, stride: usize },
}
