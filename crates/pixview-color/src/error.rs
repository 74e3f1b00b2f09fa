//! Error types for pixview-color

use thiserror::Error;

/// Errors raised while building lookup tables
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixview_core::Error),

    /// VOI window width below one
    #[error("invalid VOI window: center {center}, width {width}")]
    InvalidWindow { center: f64, width: f64 },

    /// Bits stored outside 1..=16
    #[error("unsupported bits stored: {0}")]
    InvalidBitDepth(u8),

    /// Output range is inverted
    #[error("invalid output range: {min}..={max}")]
    InvalidRange { min: i32, max: i32 },

    /// A palette color map needs at least one entry
    #[error("color map has no entries")]
    EmptyColorMap,
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
