//! pixview-render - Scene rendering
//!
//! This crate turns a [`PresentationImage`](pixview_scene::PresentationImage)
//! into pixels:
//!
//! - [`walker`] - Scene graph traversal and the [`Renderer`] contract
//! - [`SoftwareRenderer`] - Renderer drawing into in-memory buffers
//! - [`image_renderer`] - Image graphic rasterization through LUTs
//! - [`RenderingSurface`] - Per-window double buffer and presented frame
//! - [`FontFactory`] - Font flyweight cache
//! - [`RendererPool`] - Reusable renderers handed out by lease
//!
//! # Example
//!
//! ```
//! use pixview_render::{DrawArgs, DrawMode, Renderer, SoftwareRenderer, WindowId};
//! use pixview_scene::{Graphic, ImageGraphic, PresentationImage};
//!
//! let image = ImageGraphic::grayscale8(2, 2, vec![10, 20, 30, 40]).unwrap();
//! let scene = PresentationImage::new(Graphic::image(image));
//!
//! let mut renderer = SoftwareRenderer::new();
//! let mut surface = renderer.get_rendering_surface(WindowId(1), 2, 2);
//! renderer
//!     .draw(&mut DrawArgs::new(&mut surface, &scene, DrawMode::Render))
//!     .unwrap();
//! renderer
//!     .draw(&mut DrawArgs::new(&mut surface, &scene, DrawMode::Refresh))
//!     .unwrap();
//! assert!(surface.screen().is_some());
//! ```

mod config;
mod error;
pub mod font_factory;
pub mod image_renderer;
mod pool;
mod software;
pub mod surface;
pub mod walker;

pub use config::RendererConfig;
pub use error::{Error, RenderError, Result};
pub use font_factory::FontFactory;
pub use image_renderer::{VisibleRectangles, calculate_visible_rectangles};
pub use pool::{RendererLease, RendererPool};
pub use software::SoftwareRenderer;
pub use surface::{ContextId, RenderingSurface, WindowId};
pub use walker::{
    DrawArgs, DrawMode, Renderer, SceneRenderer, draw_scene_graph, draw_text_overlay,
};
