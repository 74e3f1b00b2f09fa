//! Error types for pixview-render

use crate::surface::{ContextId, RenderingSurface, WindowId};
use crate::walker::DrawMode;
use pixview_core::Rect;
use thiserror::Error;

/// Errors raised while rendering one scene
#[derive(Debug, Error)]
pub enum Error {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixview_core::Error),

    /// LUT or color map error
    #[error("color error: {0}")]
    Color(#[from] pixview_color::ColorError),

    /// Interpolation error
    #[error("transform error: {0}")]
    Transform(#[from] pixview_transform::TransformError),

    /// Scene content error
    #[error("scene error: {0}")]
    Scene(#[from] pixview_scene::SceneError),

    /// Images can only be drawn rotated by multiples of 90 degrees
    #[error("unsupported image rotation: transform {0:?} is not axis aligned")]
    UnsupportedRotation(pixview_core::Matrix),

    /// The surface was used after being disposed
    #[error("rendering surface for window {0} has been disposed")]
    SurfaceDisposed(WindowId),
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// A failed draw, with the state of the surface it targeted
#[derive(Debug, Error)]
#[error(
    "{mode:?} failed on window {window_id} (context {context_id}), client {client_rectangle}, clip {clip_rectangle}: {source}"
)]
pub struct RenderError {
    pub mode: DrawMode,
    pub window_id: WindowId,
    pub context_id: ContextId,
    pub client_rectangle: Rect,
    pub clip_rectangle: Rect,
    #[source]
    pub source: Error,
}

impl RenderError {
    /// Attach the surface state to a failed draw
    pub fn new(mode: DrawMode, surface: &RenderingSurface, source: Error) -> Self {
        Self {
            mode,
            window_id: surface.window_id(),
            context_id: surface.context_id(),
            client_rectangle: surface.client_rectangle(),
            clip_rectangle: surface.clip_rectangle(),
            source,
        }
    }
}
