//! Error types for pixview-core
//!
//! Provides a unified error type for geometry, buffer and rasterization
//! operations. Each variant captures enough context for diagnostics.

use thiserror::Error;

/// pixview-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid buffer dimensions
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimension { width: i32, height: i32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A raw buffer does not have the length its metadata declares
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Matrix cannot be inverted
    #[error("matrix is singular")]
    SingularMatrix,

    /// Geometry contains non-finite coordinates
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Requested font family is not available
    #[error("font family not found: {0}")]
    FontNotFound(String),
}

/// Result type alias for pixview-core operations
pub type Result<T> = std::result::Result<T, Error>;
