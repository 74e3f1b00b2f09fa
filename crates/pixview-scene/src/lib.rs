//! pixview-scene - Scene graph data model
//!
//! This crate provides:
//!
//! - [`Graphic`] / [`GraphicKind`] - Scene graph nodes and primitives
//! - [`ImageGraphic`] - Raw grayscale or color pixels with display settings
//! - [`CoordinateSystemGuard`] - Scoped switch between source and
//!   destination coordinates
//! - [`Placement`] - Cumulative transform and scale passed down a walk
//! - [`AnnotationLayout`] / [`AnnotationBox`] - Text overlay description
//! - [`PresentationImage`] - A scene graph plus its overlay

pub mod annotation;
mod error;
pub mod graphic;
pub mod image;
mod presentation;

pub use annotation::{
    AnnotationBox, AnnotationItem, AnnotationLayout, AnnotationLayoutProvider, Justification,
    Truncation, VerticalAlignment,
};
pub use error::{SceneError, SceneResult};
pub use graphic::{
    ArcPrimitive, BoundedPrimitive, CoordinateSystem, CoordinateSystemGuard, CurvePrimitive,
    Graphic, GraphicKind, LinePrimitive, LineStyle, Placement, PointPrimitive, TextPrimitive,
};
pub use image::{ColorSettings, GrayscaleSettings, ImageGraphic, ImageKind};
pub use presentation::PresentationImage;
