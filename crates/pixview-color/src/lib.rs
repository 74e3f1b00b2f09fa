//! pixview-color - Lookup tables for display of grayscale and color images
//!
//! The pipeline from stored pixel value to displayed color:
//!
//! 1. [`ModalityLut`] rescales stored values (slope/intercept)
//! 2. [`VoiWindow`] windows the rescaled range onto the output range
//! 3. [`LutComposer`] composes both into one [`OutputLut`]
//! 4. [`ColorMap`] maps output values to ARGB (or the invert flag mirrors them)
//! 5. [`LutCompositor`] flattens 3 and 4 into a single integer table
//!
//! The flattened table is indexed directly by an (interpolated) stored
//! pixel value offset by the LUT's first input value.

mod colormap;
mod compose;
mod error;
mod lut;

pub use colormap::{ColorMap, RebasedColorMap};
pub use compose::{LutCompositor, with_flattened_lut};
pub use error::{ColorError, ColorResult};
pub use lut::{LutComposer, ModalityLut, OutputLut, VoiWindow, stored_range};
