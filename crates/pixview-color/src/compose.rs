//! Flattened LUT composition
//!
//! Combines an [`OutputLut`] with either a color map or the invert flag
//! into one integer table, so the interpolator performs a single lookup
//! per pixel.
//!
//! The table lives in a scratch buffer that is reused while the
//! requested length stays the same and reallocated when it changes.

use std::cell::RefCell;

use crate::colormap::ColorMap;
use crate::lut::OutputLut;

/// Owns the scratch buffer for flattened tables
#[derive(Debug, Default)]
pub struct LutCompositor {
    buffer: Vec<i32>,
}

impl LutCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the scratch buffer
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Flatten `output` through `color_map`, or through the invert flag
    /// when there is no color map.
    ///
    /// With a color map the entries are ARGB values (as `i32` bit
    /// patterns); without one they are output values shifted to start at
    /// zero.
    pub fn compose(
        &mut self,
        output: &OutputLut,
        color_map: Option<&ColorMap>,
        invert: bool,
    ) -> &[i32] {
        let n = output.len();
        if self.buffer.len() != n {
            log::trace!("reallocating flattened LUT: {} -> {} entries", self.buffer.len(), n);
            self.buffer = vec![0; n];
        }

        match color_map {
            Some(map) => {
                let map = map.rebased(output.min_output(), output.max_output());
                let first = map.first_mapped_pixel_value();
                let last = map.last_mapped_pixel_value();
                let colors = map.data();
                let max_index = colors.len() as i32 - 1;
                for (dst, &value) in self.buffer.iter_mut().zip(output.data()) {
                    let index = if invert { last - value } else { value - first };
                    *dst = colors[index.clamp(0, max_index) as usize] as i32;
                }
            }
            None => {
                let min = output.min_output();
                let max = output.max_output();
                for (dst, &value) in self.buffer.iter_mut().zip(output.data()) {
                    *dst = if invert { max - value } else { value - min };
                }
            }
        }

        &self.buffer
    }
}

thread_local! {
    static COMPOSITOR: RefCell<LutCompositor> = RefCell::new(LutCompositor::new());
}

/// Compose a flattened LUT in this thread's scratch buffer and pass it to `f`.
///
/// A nested call made from inside `f` composes into a temporary buffer
/// instead of the shared one.
pub fn with_flattened_lut<R>(
    output: &OutputLut,
    color_map: Option<&ColorMap>,
    invert: bool,
    f: impl FnOnce(&[i32]) -> R,
) -> R {
    COMPOSITOR.with(|cell| match cell.try_borrow_mut() {
        Ok(mut compositor) => f(compositor.compose(output, color_map, invert)),
        Err(_) => f(LutCompositor::new().compose(output, color_map, invert)),
    })
}
