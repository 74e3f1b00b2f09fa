//! pixview-transform - Resampling and spatial transforms
//!
//! This crate provides:
//!
//! - Fixed-point bilinear interpolation of grayscale (8/16-bit, signed or
//!   unsigned) and RGB (packed or planar) pixel data into 8-bit or ARGB
//!   destinations, with an optional flattened LUT applied per sample
//! - [`SpatialTransform`]: scale, flips, rotation, translation and centre
//!   of rotation of one scene graph node relative to its parent

pub mod bilinear;
mod error;
pub mod spatial;

pub use bilinear::{
    DestinationPixels, LutRef, PixelFormat, SourcePixels, interpolate_bilinear,
};
pub use error::{TransformError, TransformResult};
pub use spatial::SpatialTransform;
