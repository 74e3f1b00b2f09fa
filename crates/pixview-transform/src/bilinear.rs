//! Fixed-point bilinear interpolation
//!
//! Resamples a rectangular region of source pixels onto a rectangular
//! region of a destination buffer. Sample positions and weights use 7 bits
//! of fractional precision (1/128).
//!
//! # Sampling
//!
//! Destination pixel centres are mapped into the source region, then
//! shifted by half a pixel into sample space and clamped to the image. The
//! right and lower neighbours are clamped to the last row/column, so edge
//! pixels are reproduced exactly. A region mapped 1:1 returns the source
//! pixels unchanged.
//!
//! A negative source width or height walks the source backwards, which is
//! how horizontal and vertical flips are expressed. With `swap_xy` the
//! destination rows drive the source x axis (90/270 degree rotations).

use crate::error::{TransformError, TransformResult};
use pixview_core::{Rect, RectF, color};

/// Fractional bits of the fixed-point weights
const FIXED_SHIFT: i32 = 7;
/// Fixed-point one
const FIXED_ONE: f32 = (1 << FIXED_SHIFT) as f32;

/// Layout of source pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One sample per pixel, little-endian when 16 bits are allocated
    Gray {
        bits_allocated: u8,
        bits_stored: u8,
        signed: bool,
    },
    /// Three color channels per pixel
    ///
    /// Packed data is 4 bytes per pixel in B, G, R, A order. Planar data
    /// is three full planes in R, G, B order.
    Rgb { planar: bool },
}

impl PixelFormat {
    /// Bytes per pixel (summed over planes for planar data)
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray { bits_allocated, .. } => (*bits_allocated as usize) / 8,
            PixelFormat::Rgb { planar: true } => 3,
            PixelFormat::Rgb { planar: false } => 4,
        }
    }

    fn validate(&self) -> TransformResult<()> {
        if let PixelFormat::Gray {
            bits_allocated,
            bits_stored,
            ..
        } = *self
        {
            if bits_allocated != 8 && bits_allocated != 16 {
                return Err(TransformError::InvalidParameters(format!(
                    "bits allocated must be 8 or 16, got {}",
                    bits_allocated
                )));
            }
            if bits_stored == 0 || bits_stored > bits_allocated {
                return Err(TransformError::InvalidParameters(format!(
                    "bits stored {} out of range for {} bits allocated",
                    bits_stored, bits_allocated
                )));
            }
        }
        Ok(())
    }
}

/// Borrowed source pixel data with its dimensions and layout
#[derive(Debug, Clone, Copy)]
pub struct SourcePixels<'a> {
    data: &'a [u8],
    width: i32,
    height: i32,
    format: PixelFormat,
}

impl<'a> SourcePixels<'a> {
    /// Wrap source data
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::BufferSizeMismatch`] if `data` is not
    /// exactly `width * height * bytes_per_pixel` long, and
    /// [`TransformError::InvalidParameters`] for empty dimensions or an
    /// unsupported bit layout.
    pub fn new(
        data: &'a [u8],
        width: i32,
        height: i32,
        format: PixelFormat,
    ) -> TransformResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(TransformError::InvalidParameters(format!(
                "source dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        format.validate()?;
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(TransformError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Read one gray sample as a signed value
    #[inline]
    fn gray(&self, index: usize, bits_allocated: u8, bits_stored: u8, signed: bool) -> i32 {
        let raw = if bits_allocated == 16 {
            u16::from_le_bytes([self.data[index * 2], self.data[index * 2 + 1]]) as i32
        } else {
            self.data[index] as i32
        };
        if signed {
            let shift = 32 - bits_stored as i32;
            (raw << shift) >> shift
        } else {
            raw & ((1i32 << bits_stored) - 1)
        }
    }

    /// Read R, G, B and A of one pixel
    #[inline]
    fn rgba(&self, index: usize, planar: bool) -> [i32; 4] {
        if planar {
            let plane = self.width as usize * self.height as usize;
            [
                self.data[index] as i32,
                self.data[plane + index] as i32,
                self.data[2 * plane + index] as i32,
                0xff,
            ]
        } else {
            let p = &self.data[index * 4..index * 4 + 4];
            [p[2] as i32, p[1] as i32, p[0] as i32, p[3] as i32]
        }
    }
}

/// Mutable destination buffer
///
/// One byte per pixel, or four bytes holding a little-endian ARGB word
/// (B, G, R, A in memory).
#[derive(Debug)]
pub struct DestinationPixels<'a> {
    data: &'a mut [u8],
    width: i32,
    height: i32,
    bytes_per_pixel: usize,
}

impl<'a> DestinationPixels<'a> {
    /// Wrap a destination buffer
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::BufferSizeMismatch`] if `data` does not
    /// hold exactly `width * height` pixels, and
    /// [`TransformError::InvalidParameters`] for negative dimensions or a
    /// pixel size other than 1 or 4 bytes.
    pub fn new(
        data: &'a mut [u8],
        width: i32,
        height: i32,
        bytes_per_pixel: usize,
    ) -> TransformResult<Self> {
        if width < 0 || height < 0 {
            return Err(TransformError::InvalidParameters(format!(
                "destination dimensions must not be negative, got {}x{}",
                width, height
            )));
        }
        if bytes_per_pixel != 1 && bytes_per_pixel != 4 {
            return Err(TransformError::InvalidParameters(format!(
                "destination must have 1 or 4 bytes per pixel, got {}",
                bytes_per_pixel
            )));
        }
        let expected = width as usize * height as usize * bytes_per_pixel;
        if data.len() != expected {
            return Err(TransformError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            bytes_per_pixel,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    #[inline]
    fn write(&mut self, x: i32, y: i32, value: u32) {
        let offset = (y as usize * self.width as usize + x as usize) * self.bytes_per_pixel;
        debug_assert!(offset + self.bytes_per_pixel <= self.data.len());
        if self.bytes_per_pixel == 4 {
            self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        } else {
            self.data[offset] = value as u8;
        }
    }
}

/// A flattened lookup table indexed by interpolated source value
#[derive(Debug, Clone, Copy)]
pub struct LutRef<'a> {
    pub data: &'a [i32],
    /// Source value mapped by `data[0]`
    pub first_mapped_value: i32,
}

impl LutRef<'_> {
    #[inline]
    fn get(&self, value: i32) -> i32 {
        let last = self.data.len() as i32 - 1;
        self.data[(value - self.first_mapped_value).clamp(0, last) as usize]
    }
}

/// Sample position along one source axis
#[derive(Debug, Clone, Copy)]
struct AxisSample {
    i0: usize,
    i1: usize,
    /// Fixed-point fraction between `i0` and `i1`
    frac: i32,
}

/// Sample positions for `steps` destination pixels spanning `extent`
/// source pixels from `origin`
fn axis_samples(origin: f32, extent: f32, steps: i32, size: i32) -> Vec<AxisSample> {
    let ratio = extent / steps as f32;
    let max = (size - 1) as f32;
    (0..steps)
        .map(|k| {
            let coord = (origin + (k as f32 + 0.5) * ratio - 0.5).clamp(0.0, max);
            let i0 = coord.floor() as i32;
            let frac = ((coord - i0 as f32) * FIXED_ONE) as i32;
            let i1 = (i0 + 1).min(size - 1);
            AxisSample {
                i0: i0 as usize,
                i1: i1 as usize,
                frac: frac.clamp(0, FIXED_ONE as i32 - 1),
            }
        })
        .collect()
}

/// Bilinear blend of four samples with 7-bit fractions
///
/// `p00`/`p01` are the upper and lower samples of the left column,
/// `p10`/`p11` of the right column.
#[inline]
fn blend(p00: i32, p10: i32, p01: i32, p11: i32, dx: i32, dy: i32) -> i32 {
    let y_i1 = (p00 << FIXED_SHIFT) + ((dy * ((p01 - p00) << FIXED_SHIFT)) >> FIXED_SHIFT);
    let y_i2 = (p10 << FIXED_SHIFT) + ((dy * ((p11 - p10) << FIXED_SHIFT)) >> FIXED_SHIFT);
    (y_i1 + ((dx * (y_i2 - y_i1)) >> FIXED_SHIFT)) >> FIXED_SHIFT
}

/// Resample `src_region` of `src` into `dst_region` of `dst`
///
/// Gray values go through `lut` when given (an ARGB table for 4-byte
/// destinations, a byte table for 1-byte ones); otherwise they are
/// clamped to `0..=255` and written as opaque gray. RGB channels go
/// through `lut` individually; alpha is interpolated for packed data and
/// opaque for planar data.
///
/// An empty `dst_region` is a no-op. Destination pixels falling outside
/// `dst` are skipped.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] for a non-finite source
/// region, an empty LUT, or RGB data written to a 1-byte destination.
pub fn interpolate_bilinear(
    src: &SourcePixels<'_>,
    src_region: RectF,
    dst: &mut DestinationPixels<'_>,
    dst_region: Rect,
    swap_xy: bool,
    lut: Option<LutRef<'_>>,
) -> TransformResult<()> {
    if dst_region.is_empty() {
        return Ok(());
    }
    let finite = [src_region.x, src_region.y, src_region.w, src_region.h]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(TransformError::InvalidParameters(format!(
            "source region is not finite: {:?}",
            src_region
        )));
    }
    if lut.is_some_and(|l| l.data.is_empty()) {
        return Err(TransformError::InvalidParameters(
            "lookup table is empty".to_string(),
        ));
    }
    if matches!(src.format, PixelFormat::Rgb { .. }) && dst.bytes_per_pixel == 1 {
        return Err(TransformError::InvalidParameters(
            "RGB data requires a 4-byte destination".to_string(),
        ));
    }

    let (x_steps, y_steps) = if swap_xy {
        (dst_region.h, dst_region.w)
    } else {
        (dst_region.w, dst_region.h)
    };
    let xs = axis_samples(src_region.x, src_region.w, x_steps, src.width);
    let ys = axis_samples(src_region.y, src_region.h, y_steps, src.height);
    let stride = src.width as usize;

    for row in 0..dst_region.h {
        let dy = dst_region.y + row;
        if dy < 0 || dy >= dst.height {
            continue;
        }
        for col in 0..dst_region.w {
            let dx = dst_region.x + col;
            if dx < 0 || dx >= dst.width {
                continue;
            }
            let (sx, sy) = if swap_xy {
                (xs[row as usize], ys[col as usize])
            } else {
                (xs[col as usize], ys[row as usize])
            };
            debug_assert!(sx.i1 < stride && sy.i1 < src.height as usize);

            let i00 = sy.i0 * stride + sx.i0;
            let i10 = sy.i0 * stride + sx.i1;
            let i01 = sy.i1 * stride + sx.i0;
            let i11 = sy.i1 * stride + sx.i1;

            let value = match src.format {
                PixelFormat::Gray {
                    bits_allocated,
                    bits_stored,
                    signed,
                } => {
                    let fetch = |i| src.gray(i, bits_allocated, bits_stored, signed);
                    let v = blend(
                        fetch(i00),
                        fetch(i10),
                        fetch(i01),
                        fetch(i11),
                        sx.frac,
                        sy.frac,
                    );
                    match lut {
                        Some(lut) => lut.get(v) as u32,
                        None if dst.bytes_per_pixel == 4 => color::gray(v.clamp(0, 255) as u8),
                        None => v.clamp(0, 255) as u32,
                    }
                }
                PixelFormat::Rgb { planar } => {
                    let p00 = src.rgba(i00, planar);
                    let p10 = src.rgba(i10, planar);
                    let p01 = src.rgba(i01, planar);
                    let p11 = src.rgba(i11, planar);
                    let mut channels = [0u8; 4];
                    for (c, out) in channels.iter_mut().enumerate() {
                        let v = blend(p00[c], p10[c], p01[c], p11[c], sx.frac, sy.frac);
                        let v = match lut {
                            Some(lut) if c < 3 => lut.get(v),
                            _ => v,
                        };
                        *out = v.clamp(0, 255) as u8;
                    }
                    let [r, g, b, a] = channels;
                    color::compose_argb(a, r, g, b)
                }
            };
            dst.write(dx, dy, value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY8: PixelFormat = PixelFormat::Gray {
        bits_allocated: 8,
        bits_stored: 8,
        signed: false,
    };

    fn gray_bytes(dst: &[u8]) -> Vec<u8> {
        dst.chunks(4).map(|p| p[0]).collect()
    }

    #[test]
    fn test_identity_copy() {
        let data = [10u8, 20, 30, 40];
        let src = SourcePixels::new(&data, 2, 2, GRAY8).unwrap();
        let mut out = vec![0u8; 16];
        let mut dst = DestinationPixels::new(&mut out, 2, 2, 4).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 2.0, 2.0),
            &mut dst,
            Rect::new(0, 0, 2, 2),
            false,
            None,
        )
        .unwrap();
        assert_eq!(gray_bytes(&out), vec![10, 20, 30, 40]);
        assert_eq!(out[3], 0xff);
    }

    #[test]
    fn test_downsample_to_single_pixel() {
        let data = [10u8, 20, 30, 40];
        let src = SourcePixels::new(&data, 2, 2, GRAY8).unwrap();
        let mut out = vec![0u8; 1];
        let mut dst = DestinationPixels::new(&mut out, 1, 1, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 2.0, 2.0),
            &mut dst,
            Rect::new(0, 0, 1, 1),
            false,
            None,
        )
        .unwrap();
        assert_eq!(out[0], 25);
    }

    #[test]
    fn test_bounds_with_sentinels() {
        let data: Vec<u8> = (0..16).map(|i| i * 10).collect();
        let src = SourcePixels::new(&data, 4, 4, GRAY8).unwrap();
        // 3x3 destination inside a 5x5 buffer filled with a sentinel
        let mut out = vec![0xAAu8; 25];
        let mut dst = DestinationPixels::new(&mut out, 5, 5, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 4.0, 4.0),
            &mut dst,
            Rect::new(1, 1, 3, 3),
            false,
            None,
        )
        .unwrap();
        for y in 0..5 {
            for x in 0..5 {
                let inside = (1..4).contains(&x) && (1..4).contains(&y);
                if !inside {
                    assert_eq!(out[y * 5 + x], 0xAA, "sentinel overwritten at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_source_region_beyond_extents() {
        let data = [10u8, 20, 30, 40];
        let src = SourcePixels::new(&data, 2, 2, GRAY8).unwrap();

        // Partly outside: every destination pixel is written from clamped edges
        let mut out = vec![0xAAu8; 16];
        let mut dst = DestinationPixels::new(&mut out, 4, 4, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(-3.0, -3.0, 8.0, 8.0),
            &mut dst,
            Rect::new(0, 0, 4, 4),
            false,
            None,
        )
        .unwrap();
        assert_eq!(
            out,
            vec![10, 10, 20, 20, 10, 10, 20, 20, 30, 30, 40, 40, 30, 30, 40, 40]
        );

        // Fully outside on either side: the nearest corner fills the region
        for (region, corner) in [
            (RectF::new(5.0, 5.0, 2.0, 2.0), 40u8),
            (RectF::new(-10.0, -10.0, 2.0, 2.0), 10),
        ] {
            let mut out = vec![0xAAu8; 4];
            let mut dst = DestinationPixels::new(&mut out, 2, 2, 1).unwrap();
            interpolate_bilinear(&src, region, &mut dst, Rect::new(0, 0, 2, 2), false, None)
                .unwrap();
            assert_eq!(out, vec![corner; 4]);
        }
    }

    #[test]
    fn test_region_partly_outside_destination() {
        let data = [50u8; 4];
        let src = SourcePixels::new(&data, 2, 2, GRAY8).unwrap();
        let mut out = vec![0u8; 4];
        let mut dst = DestinationPixels::new(&mut out, 2, 2, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 2.0, 2.0),
            &mut dst,
            Rect::new(-1, 1, 4, 4),
            false,
            None,
        )
        .unwrap();
        assert_eq!(out, vec![0, 0, 50, 50]);
    }

    #[test]
    fn test_empty_region_is_noop() {
        let data = [1u8, 2, 3, 4];
        let src = SourcePixels::new(&data, 2, 2, GRAY8).unwrap();
        let mut out = vec![7u8; 4];
        let mut dst = DestinationPixels::new(&mut out, 2, 2, 1).unwrap();
        for region in [Rect::new(0, 0, 0, 2), Rect::new(0, 0, 2, 0), Rect::new(0, 0, -1, 2)] {
            interpolate_bilinear(
                &src,
                RectF::new(0.0, 0.0, 2.0, 2.0),
                &mut dst,
                region,
                false,
                None,
            )
            .unwrap();
        }
        assert_eq!(out, vec![7; 4]);
    }

    #[test]
    fn test_horizontal_flip() {
        let data = [10u8, 20, 30, 40];
        let src = SourcePixels::new(&data, 2, 2, GRAY8).unwrap();
        let mut out = vec![0u8; 4];
        let mut dst = DestinationPixels::new(&mut out, 2, 2, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(2.0, 0.0, -2.0, 2.0),
            &mut dst,
            Rect::new(0, 0, 2, 2),
            false,
            None,
        )
        .unwrap();
        assert_eq!(out, vec![20, 10, 40, 30]);
    }

    #[test]
    fn test_swap_axes() {
        // 2x1 source, 1x2 destination: destination rows walk source x
        let data = [10u8, 20];
        let src = SourcePixels::new(&data, 2, 1, GRAY8).unwrap();
        let mut out = vec![0u8; 2];
        let mut dst = DestinationPixels::new(&mut out, 1, 2, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 2.0, 1.0),
            &mut dst,
            Rect::new(0, 0, 1, 2),
            true,
            None,
        )
        .unwrap();
        assert_eq!(out, vec![10, 20]);
    }

    #[test]
    fn test_signed_sign_extension_and_lut() {
        // 12 bits stored in 16: 0x0FFF is -1, 0x0800 is -2048
        let data = [0xFF, 0x0F, 0x00, 0x08];
        let format = PixelFormat::Gray {
            bits_allocated: 16,
            bits_stored: 12,
            signed: true,
        };
        let src = SourcePixels::new(&data, 2, 1, format).unwrap();
        let table: Vec<i32> = (0..4096).map(|i| i / 16).collect();
        let lut = LutRef {
            data: &table,
            first_mapped_value: -2048,
        };
        let mut out = vec![0u8; 2];
        let mut dst = DestinationPixels::new(&mut out, 2, 1, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 2.0, 1.0),
            &mut dst,
            Rect::new(0, 0, 2, 1),
            false,
            Some(lut),
        )
        .unwrap();
        assert_eq!(out, vec![127, 0]);
    }

    #[test]
    fn test_unsigned_masks_high_bits() {
        let data = [0xFF, 0xFF];
        let format = PixelFormat::Gray {
            bits_allocated: 16,
            bits_stored: 8,
            signed: false,
        };
        let src = SourcePixels::new(&data, 1, 1, format).unwrap();
        let mut out = vec![0u8; 1];
        let mut dst = DestinationPixels::new(&mut out, 1, 1, 1).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 1.0, 1.0),
            &mut dst,
            Rect::new(0, 0, 1, 1),
            false,
            None,
        )
        .unwrap();
        assert_eq!(out[0], 255);
    }

    #[test]
    fn test_packed_rgb_keeps_alpha() {
        // B, G, R, A
        let data = [1u8, 2, 3, 128];
        let src = SourcePixels::new(&data, 1, 1, PixelFormat::Rgb { planar: false }).unwrap();
        let mut out = vec![0u8; 4];
        let mut dst = DestinationPixels::new(&mut out, 1, 1, 4).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 1.0, 1.0),
            &mut dst,
            Rect::new(0, 0, 1, 1),
            false,
            None,
        )
        .unwrap();
        assert_eq!(out, vec![1, 2, 3, 128]);
    }

    #[test]
    fn test_planar_rgb_with_lut() {
        // R plane, G plane, B plane
        let data = [10u8, 20, 30];
        let src = SourcePixels::new(&data, 1, 1, PixelFormat::Rgb { planar: true }).unwrap();
        let table: Vec<i32> = (0..256).map(|i| 255 - i).collect();
        let mut out = vec![0u8; 4];
        let mut dst = DestinationPixels::new(&mut out, 1, 1, 4).unwrap();
        interpolate_bilinear(
            &src,
            RectF::new(0.0, 0.0, 1.0, 1.0),
            &mut dst,
            Rect::new(0, 0, 1, 1),
            false,
            Some(LutRef {
                data: &table,
                first_mapped_value: 0,
            }),
        )
        .unwrap();
        assert_eq!(out, vec![225, 235, 245, 255]);
    }

    #[test]
    fn test_buffer_length_checked() {
        let data = [0u8; 3];
        assert!(matches!(
            SourcePixels::new(&data, 2, 2, GRAY8),
            Err(TransformError::BufferSizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
        let mut out = vec![0u8; 5];
        assert!(DestinationPixels::new(&mut out, 1, 1, 4).is_err());
        assert!(DestinationPixels::new(&mut out, 5, 1, 2).is_err());
    }
}
