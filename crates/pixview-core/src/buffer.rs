//! PixelBuffer - 32-bit ARGB raster
//!
//! Pixels are `0xAARRGGBB` values stored little-endian, so the byte
//! order in memory is B, G, R, A. Rendering code that writes raw bytes
//! (the interpolator) and code that works on whole pixels both address
//! the same storage.

use crate::color;
use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Bytes per pixel of every [`PixelBuffer`]
pub const BYTES_PER_PIXEL: usize = 4;

/// An owned ARGB raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: i32,
    height: i32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer filled with transparent black
    ///
    /// Zero-sized buffers are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is negative.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        })
    }

    /// Get the width in pixels
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Get the height in pixels
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Row stride in bytes
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// The rectangle covered by this buffer
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Raw pixel bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    /// Get a pixel, or `None` outside the buffer
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        let i = self.offset(x, y)?;
        let bytes: [u8; 4] = self.data[i..i + BYTES_PER_PIXEL].try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    /// Set a pixel; coordinates outside the buffer are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, argb: u32) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&argb.to_le_bytes());
        }
    }

    /// Composite a pixel over the existing one (source-over)
    pub fn blend_pixel(&mut self, x: i32, y: i32, argb: u32) {
        if let Some(dst) = self.get_pixel(x, y) {
            self.set_pixel(x, y, color::blend_over(argb, dst));
        }
    }

    /// Fill the whole buffer with one value
    pub fn clear(&mut self, argb: u32) {
        let bytes = argb.to_le_bytes();
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Blend a color over every pixel of a rectangle (clipped to the buffer)
    pub fn fill_rect(&mut self, rect: &Rect, argb: u32) {
        let Some(r) = rect.clip(self.width, self.height) else {
            return;
        };
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.blend_pixel(x, y, argb);
            }
        }
    }

    /// Composite another buffer onto this one, unscaled, at `(x, y)`
    pub fn draw_buffer(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let target = Rect::new(x, y, src.width, src.height);
        let Some(r) = target.clip(self.width, self.height) else {
            return;
        };
        for dy in r.y..r.bottom() {
            for dx in r.x..r.right() {
                if let Some(p) = src.get_pixel(dx - x, dy - y) {
                    self.blend_pixel(dx, dy, p);
                }
            }
        }
    }

    /// Copy a region of another buffer into the same region of this one
    ///
    /// No blending; the region is clipped to both buffers.
    pub fn copy_region(&mut self, src: &PixelBuffer, region: &Rect) {
        let Some(r) = region
            .clip(self.width, self.height)
            .and_then(|r| r.clip(src.width, src.height))
        else {
            return;
        };
        let len = r.w as usize * BYTES_PER_PIXEL;
        for y in r.y..r.bottom() {
            if let (Some(s), Some(d)) = (src.offset(r.x, y), self.offset(r.x, y)) {
                self.data[d..d + len].copy_from_slice(&src.data[s..s + len]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zero_size() {
        let buf = PixelBuffer::new(0, 0).unwrap();
        assert!(buf.as_bytes().is_empty());
        assert!(buf.get_pixel(0, 0).is_none());
    }

    #[test]
    fn test_new_negative() {
        assert!(PixelBuffer::new(-1, 4).is_err());
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buf = PixelBuffer::new(1, 1).unwrap();
        buf.set_pixel(0, 0, 0xFF112233);
        assert_eq!(buf.as_bytes(), &[0x33, 0x22, 0x11, 0xFF]);
    }

    #[test]
    fn test_draw_buffer_transparent_skipped() {
        let mut dst = PixelBuffer::new(2, 1).unwrap();
        dst.clear(0xFF000000);
        let mut src = PixelBuffer::new(2, 1).unwrap();
        src.clear(0x00FFFFFF);
        src.set_pixel(1, 0, 0xFF808080);
        dst.draw_buffer(&src, 0, 0);
        assert_eq!(dst.get_pixel(0, 0), Some(0xFF000000));
        assert_eq!(dst.get_pixel(1, 0), Some(0xFF808080));
    }

    #[test]
    fn test_copy_region_clipped() {
        let mut src = PixelBuffer::new(3, 3).unwrap();
        src.clear(0xFFABCDEF);
        let mut dst = PixelBuffer::new(2, 2).unwrap();
        dst.copy_region(&src, &Rect::new(1, 1, 5, 5));
        assert_eq!(dst.get_pixel(0, 0), Some(0));
        assert_eq!(dst.get_pixel(1, 1), Some(0xFFABCDEF));
    }
}
