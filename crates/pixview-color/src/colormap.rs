//! Color maps
//!
//! A [`ColorMap`] describes how output values become ARGB pixels. It is
//! immutable: binding it to a concrete input range produces a separate
//! [`RebasedColorMap`], so two renders sharing one map never observe each
//! other's ranges.

use pixview_core::color;

use crate::error::{ColorError, ColorResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Grayscale,
    Palette(Vec<u32>),
}

/// A scalar-to-ARGB mapping independent of any input range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    kind: Kind,
}

impl ColorMap {
    /// Linear opaque gray ramp from black to white
    pub fn grayscale() -> Self {
        Self {
            kind: Kind::Grayscale,
        }
    }

    /// A palette of ARGB entries stretched evenly over the input range
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::EmptyColorMap`] if `entries` is empty.
    pub fn palette(entries: Vec<u32>) -> ColorResult<Self> {
        if entries.is_empty() {
            return Err(ColorError::EmptyColorMap);
        }
        Ok(Self {
            kind: Kind::Palette(entries),
        })
    }

    /// Check for the grayscale ramp
    pub fn is_grayscale(&self) -> bool {
        self.kind == Kind::Grayscale
    }

    /// Bind the map to `[min_input, max_input]`
    ///
    /// An inverted range is treated as the single value `min_input`.
    pub fn rebased(&self, min_input: i32, max_input: i32) -> RebasedColorMap {
        let max_input = max_input.max(min_input);
        let len = (max_input - min_input) as usize + 1;
        let data = match &self.kind {
            Kind::Grayscale => {
                if len == 1 {
                    vec![color::gray(255)]
                } else {
                    let span = (len - 1) as f64;
                    (0..len)
                        .map(|i| color::gray((i as f64 * 255.0 / span).round() as u8))
                        .collect()
                }
            }
            Kind::Palette(entries) => (0..len)
                .map(|i| entries[i * entries.len() / len])
                .collect(),
        };
        RebasedColorMap {
            first_mapped_pixel_value: min_input,
            data,
        }
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::grayscale()
    }
}

/// A color map bound to a concrete input range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebasedColorMap {
    first_mapped_pixel_value: i32,
    data: Vec<u32>,
}

impl RebasedColorMap {
    /// Input value mapped by `data()[0]`
    pub fn first_mapped_pixel_value(&self) -> i32 {
        self.first_mapped_pixel_value
    }

    /// Input value mapped by the last entry
    pub fn last_mapped_pixel_value(&self) -> i32 {
        self.first_mapped_pixel_value + self.data.len() as i32 - 1
    }

    /// ARGB entries
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Color of an input value, clamped to the mapped range
    pub fn get(&self, value: i32) -> u32 {
        let last = self.last_mapped_pixel_value();
        self.data[(value.clamp(self.first_mapped_pixel_value, last)
            - self.first_mapped_pixel_value) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_endpoints() {
        let map = ColorMap::grayscale().rebased(0, 255);
        assert_eq!(map.len(), 256);
        assert_eq!(map.get(0), 0xFF000000);
        assert_eq!(map.get(255), 0xFFFFFFFF);
        assert_eq!(map.get(10), color::gray(10));
    }

    #[test]
    fn test_grayscale_offset_range() {
        let map = ColorMap::grayscale().rebased(-10, 10);
        assert_eq!(map.first_mapped_pixel_value(), -10);
        assert_eq!(map.last_mapped_pixel_value(), 10);
        assert_eq!(map.get(-10), color::gray(0));
        assert_eq!(map.get(10), color::gray(255));
    }

    #[test]
    fn test_rebase_does_not_alter_original() {
        let map = ColorMap::grayscale();
        let a = map.rebased(0, 15);
        let b = map.rebased(0, 255);
        assert_eq!(map, ColorMap::grayscale());
        assert_ne!(a.len(), b.len());
    }

    #[test]
    fn test_palette_stretch() {
        let map = ColorMap::palette(vec![0xFFFF0000, 0xFF0000FF]).unwrap();
        let rebased = map.rebased(0, 3);
        assert_eq!(rebased.data(), &[0xFFFF0000, 0xFFFF0000, 0xFF0000FF, 0xFF0000FF]);
        assert!(ColorMap::palette(vec![]).is_err());
    }
}
