//! Error types for pixview-scene

use thiserror::Error;

/// Errors that can occur while building scene graph content
#[derive(Debug, Error)]
pub enum SceneError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixview_core::Error),

    /// LUT or color map error
    #[error("color error: {0}")]
    Color(#[from] pixview_color::ColorError),

    /// Pixel data length does not match the image dimensions
    #[error(
        "pixel data length mismatch for {rows}x{columns} image: expected {expected} bytes, got {actual}"
    )]
    PixelDataLength {
        rows: i32,
        columns: i32,
        expected: usize,
        actual: usize,
    },

    /// Pixel layout not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
