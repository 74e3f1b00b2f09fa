//! pixview - Image presentation pipeline for Rust
//!
//! # Overview
//!
//! pixview draws medical-style images and their overlays into software
//! buffers:
//!
//! - Modality, VOI and presentation LUTs composed into one output table
//! - Bilinear resampling with flips, 90 degree rotations and zoom
//! - A scene graph of images, vector primitives and invariant text
//! - Annotation text boxes laid out on the client area
//! - A double-buffered per-window surface with a presented frame
//!
//! # Example
//!
//! ```
//! use pixview::render::{DrawArgs, DrawMode, Renderer, SoftwareRenderer, WindowId};
//! use pixview::scene::{Graphic, ImageGraphic, PresentationImage};
//!
//! let image = ImageGraphic::grayscale8(2, 2, vec![10, 20, 30, 40]).unwrap();
//! let scene = PresentationImage::new(Graphic::image(image));
//!
//! let mut renderer = SoftwareRenderer::new();
//! let mut surface = renderer.get_rendering_surface(WindowId(1), 2, 2);
//! let mut args = DrawArgs::new(&mut surface, &scene, DrawMode::Render);
//! renderer.draw(&mut args).unwrap();
//!
//! let pixels = surface.final_buffer().unwrap().pixels();
//! assert_eq!(pixview::color::blue(pixels.get_pixel(1, 1).unwrap()), 40);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixview_core::*;

// Re-export pipeline crates as modules to avoid name conflicts
pub use pixview_color as lut;
pub use pixview_render as render;
pub use pixview_scene as scene;
pub use pixview_transform as transform;
