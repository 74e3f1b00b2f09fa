//! pixview Core - Basic data structures for the rendering pipeline
//!
//! This crate provides the fundamental types shared by every stage of
//! the pipeline:
//!
//! - [`Rect`] / [`RectF`] / [`PointF`] / [`SizeF`] - Plane geometry
//! - [`Matrix`] - 2D affine transforms
//! - [`PixelBuffer`] - 32-bit ARGB raster
//! - [`Canvas`] / [`Pen`] - Software drawing surface with a current transform
//! - [`Font`] / [`StringFormat`] - Built-in bitmap text
//! - [`raster`] - Integer point generation for lines, polylines and polygons

pub mod buffer;
pub mod canvas;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod text;

pub use buffer::{BYTES_PER_PIXEL, PixelBuffer};
pub use canvas::{Canvas, DashStyle, Pen, TransformGuard};
pub use color::Color;
pub use error::{Error, Result};
pub use geometry::{Matrix, PointF, Rect, RectF, SizeF};
pub use text::{
    BuiltinFontSource, Font, FontSource, FontStyle, FontUnit, StringAlignment, StringFormat,
    StringTrimming, TextLine,
};

/// ARGB pixel helpers.
///
/// # Pixel format
///
/// 32-bit pixels are `0xAARRGGBB` (alpha in MSB, blue in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const ALPHA_SHIFT: u32 = 24;
    pub const RED_SHIFT: u32 = 16;
    pub const GREEN_SHIFT: u32 = 8;
    pub const BLUE_SHIFT: u32 = 0;

    /// Extract alpha component from a pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Extract red component from a pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Compose a pixel from its channels.
    #[inline]
    pub fn compose_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
        ((a as u32) << ALPHA_SHIFT)
            | ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
    }

    /// Compose an opaque gray pixel.
    #[inline]
    pub fn gray(value: u8) -> u32 {
        compose_argb(255, value, value, value)
    }

    /// Composite `src` over `dst` (straight alpha).
    pub fn blend_over(src: u32, dst: u32) -> u32 {
        let sa = alpha(src) as u32;
        if sa == 255 {
            return src;
        }
        if sa == 0 {
            return dst;
        }
        let da = alpha(dst) as u32;
        let out_a = sa + da * (255 - sa) / 255;
        if out_a == 0 {
            return 0;
        }
        let mix = |s: u8, d: u8| -> u8 {
            let num = s as u32 * sa + d as u32 * da * (255 - sa) / 255;
            (num / out_a).min(255) as u8
        };
        compose_argb(
            out_a as u8,
            mix(red(src), red(dst)),
            mix(green(src), green(dst)),
            mix(blue(src), blue(dst)),
        )
    }

    /// An ARGB color
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Color {
        pub a: u8,
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }

    impl Color {
        /// Create an opaque color
        pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
            Self { a: 255, r, g, b }
        }

        /// Create a color with alpha
        pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
            Self { a, r, g, b }
        }

        pub const BLACK: Color = Color::rgb(0, 0, 0);
        pub const WHITE: Color = Color::rgb(255, 255, 255);
        pub const RED: Color = Color::rgb(255, 0, 0);
        pub const GREEN: Color = Color::rgb(0, 128, 0);
        pub const LIME: Color = Color::rgb(0, 255, 0);
        pub const BLUE: Color = Color::rgb(0, 0, 255);
        pub const YELLOW: Color = Color::rgb(255, 255, 0);
        pub const CYAN: Color = Color::rgb(0, 255, 255);
        pub const MAGENTA: Color = Color::rgb(255, 0, 255);
        pub const ORANGE: Color = Color::rgb(255, 165, 0);
        pub const ORANGE_RED: Color = Color::rgb(255, 69, 0);
        pub const GRAY: Color = Color::rgb(128, 128, 128);
        pub const WHITE_SMOKE: Color = Color::rgb(245, 245, 245);
        /// Transparent white, the background of freshly cleared image buffers
        pub const TRANSPARENT_WHITE: Color = Color::argb(0, 255, 255, 255);

        /// Pack as a `0xAARRGGBB` pixel
        pub fn to_argb(&self) -> u32 {
            compose_argb(self.a, self.r, self.g, self.b)
        }

        /// Unpack a `0xAARRGGBB` pixel
        pub fn from_argb(pixel: u32) -> Self {
            Self::argb(alpha(pixel), red(pixel), green(pixel), blue(pixel))
        }

        /// Look up a named color (case-insensitive)
        pub fn from_name(name: &str) -> Option<Color> {
            let color = match name.to_ascii_lowercase().as_str() {
                "black" => Self::BLACK,
                "white" => Self::WHITE,
                "red" => Self::RED,
                "green" => Self::GREEN,
                "lime" => Self::LIME,
                "blue" => Self::BLUE,
                "yellow" => Self::YELLOW,
                "cyan" | "aqua" => Self::CYAN,
                "magenta" | "fuchsia" => Self::MAGENTA,
                "orange" => Self::ORANGE,
                "orangered" => Self::ORANGE_RED,
                "gray" | "grey" => Self::GRAY,
                "whitesmoke" => Self::WHITE_SMOKE,
                _ => return None,
            };
            Some(color)
        }
    }

    impl Default for Color {
        fn default() -> Self {
            Self::BLACK
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_compose_extract() {
            let p = compose_argb(0x80, 1, 2, 3);
            assert_eq!(p, 0x80010203);
            assert_eq!((alpha(p), red(p), green(p), blue(p)), (0x80, 1, 2, 3));
        }

        #[test]
        fn test_blend_over_extremes() {
            assert_eq!(blend_over(0xFF102030, 0xFF000000), 0xFF102030);
            assert_eq!(blend_over(0x00102030, 0xFF000000), 0xFF000000);
        }

        #[test]
        fn test_blend_over_half() {
            let p = blend_over(compose_argb(128, 255, 255, 255), 0xFF000000);
            assert_eq!(alpha(p), 255);
            assert!((red(p) as i32 - 128).abs() <= 1);
        }

        #[test]
        fn test_from_name() {
            assert_eq!(Color::from_name("White"), Some(Color::WHITE));
            assert_eq!(Color::from_name("OrangeRed"), Some(Color::ORANGE_RED));
            assert_eq!(Color::from_name("Chartreuse"), None);
        }
    }
}
