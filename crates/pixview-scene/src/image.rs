//! Image graphics
//!
//! An [`ImageGraphic`] owns raw pixel data together with the header
//! fields needed to interpret it. The data length is checked when the
//! image is built and cannot change afterwards.

use crate::error::{SceneError, SceneResult};
use pixview_color::{ColorMap, VoiWindow};
use pixview_transform::PixelFormat;

/// Display settings of a grayscale image
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleSettings {
    /// Modality rescale slope
    pub rescale_slope: f64,
    /// Modality rescale intercept
    pub rescale_intercept: f64,
    /// VOI window; `None` shows the full rescaled range
    pub voi: Option<VoiWindow>,
    /// Show the image inverted (white is low)
    pub invert: bool,
    /// Color map applied after the VOI window
    pub color_map: ColorMap,
}

impl Default for GrayscaleSettings {
    fn default() -> Self {
        Self {
            rescale_slope: 1.0,
            rescale_intercept: 0.0,
            voi: None,
            invert: false,
            color_map: ColorMap::grayscale(),
        }
    }
}

impl GrayscaleSettings {
    pub fn with_rescale(mut self, slope: f64, intercept: f64) -> Self {
        self.rescale_slope = slope;
        self.rescale_intercept = intercept;
        self
    }

    pub fn with_voi(mut self, voi: VoiWindow) -> Self {
        self.voi = Some(voi);
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = color_map;
        self
    }
}

/// Display settings of a color image
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorSettings {
    /// VOI window applied to each channel
    pub voi: Option<VoiWindow>,
    /// Whether the VOI window is applied at all
    pub voi_lut_enabled: bool,
}

/// Grayscale or color interpretation of the pixel data
#[derive(Debug, Clone, PartialEq)]
pub enum ImageKind {
    Grayscale(GrayscaleSettings),
    Color(ColorSettings),
}

/// Raw image pixels and their header
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGraphic {
    rows: i32,
    columns: i32,
    bits_allocated: u8,
    bits_stored: u8,
    high_bit: u8,
    signed: bool,
    planar: bool,
    pixel_data: Vec<u8>,
    kind: ImageKind,
}

impl ImageGraphic {
    /// Create a grayscale image
    ///
    /// 16-bit samples are little-endian. The high bit is
    /// `bits_stored - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnsupportedFormat`] unless `bits_allocated` is
    /// 8 or 16 and `bits_stored` is in `1..=bits_allocated`, and
    /// [`SceneError::PixelDataLength`] if the data length does not equal
    /// `rows * columns * bits_allocated / 8`.
    pub fn grayscale(
        rows: i32,
        columns: i32,
        bits_allocated: u8,
        bits_stored: u8,
        signed: bool,
        pixel_data: Vec<u8>,
    ) -> SceneResult<Self> {
        if bits_allocated != 8 && bits_allocated != 16 {
            return Err(SceneError::UnsupportedFormat(format!(
                "grayscale images must allocate 8 or 16 bits, got {}",
                bits_allocated
            )));
        }
        if bits_stored == 0 || bits_stored > bits_allocated {
            return Err(SceneError::UnsupportedFormat(format!(
                "bits stored {} out of range for {} bits allocated",
                bits_stored, bits_allocated
            )));
        }
        Self::build(
            rows,
            columns,
            bits_allocated,
            bits_stored,
            signed,
            false,
            pixel_data,
            ImageKind::Grayscale(GrayscaleSettings::default()),
        )
    }

    /// Create an 8-bit unsigned grayscale image
    pub fn grayscale8(rows: i32, columns: i32, pixel_data: Vec<u8>) -> SceneResult<Self> {
        Self::grayscale(rows, columns, 8, 8, false, pixel_data)
    }

    /// Create a color image
    ///
    /// Packed data is 4 bytes per pixel (B, G, R, A); planar data is
    /// three planes (R, G, B).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::PixelDataLength`] if the data length does not
    /// match the dimensions.
    pub fn color(rows: i32, columns: i32, planar: bool, pixel_data: Vec<u8>) -> SceneResult<Self> {
        Self::build(
            rows,
            columns,
            32,
            8,
            false,
            planar,
            pixel_data,
            ImageKind::Color(ColorSettings::default()),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        rows: i32,
        columns: i32,
        bits_allocated: u8,
        bits_stored: u8,
        signed: bool,
        planar: bool,
        pixel_data: Vec<u8>,
        kind: ImageKind,
    ) -> SceneResult<Self> {
        if rows <= 0 || columns <= 0 {
            return Err(pixview_core::Error::InvalidDimension {
                width: columns,
                height: rows,
            }
            .into());
        }
        let mut image = Self {
            rows,
            columns,
            bits_allocated,
            bits_stored,
            high_bit: bits_stored - 1,
            signed,
            planar,
            pixel_data,
            kind,
        };
        let expected = image.expected_len();
        if image.pixel_data.len() != expected {
            return Err(SceneError::PixelDataLength {
                rows,
                columns,
                expected,
                actual: image.pixel_data.len(),
            });
        }
        image.pixel_data.shrink_to_fit();
        Ok(image)
    }

    pub fn with_grayscale_settings(mut self, settings: GrayscaleSettings) -> Self {
        if let ImageKind::Grayscale(s) = &mut self.kind {
            *s = settings;
        }
        self
    }

    pub fn with_color_settings(mut self, settings: ColorSettings) -> Self {
        if let ImageKind::Color(s) = &mut self.kind {
            *s = settings;
        }
        self
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn bits_allocated(&self) -> u8 {
        self.bits_allocated
    }

    pub fn bits_stored(&self) -> u8 {
        self.bits_stored
    }

    pub fn high_bit(&self) -> u8 {
        self.high_bit
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn is_planar(&self) -> bool {
        self.planar
    }

    pub fn is_grayscale(&self) -> bool {
        matches!(self.kind, ImageKind::Grayscale(_))
    }

    pub fn kind(&self) -> &ImageKind {
        &self.kind
    }

    pub fn grayscale_settings(&self) -> Option<&GrayscaleSettings> {
        match &self.kind {
            ImageKind::Grayscale(s) => Some(s),
            ImageKind::Color(_) => None,
        }
    }

    pub fn grayscale_settings_mut(&mut self) -> Option<&mut GrayscaleSettings> {
        match &mut self.kind {
            ImageKind::Grayscale(s) => Some(s),
            ImageKind::Color(_) => None,
        }
    }

    pub fn color_settings(&self) -> Option<&ColorSettings> {
        match &self.kind {
            ImageKind::Color(s) => Some(s),
            ImageKind::Grayscale(_) => None,
        }
    }

    pub fn color_settings_mut(&mut self) -> Option<&mut ColorSettings> {
        match &mut self.kind {
            ImageKind::Color(s) => Some(s),
            ImageKind::Grayscale(_) => None,
        }
    }

    pub fn pixel_data(&self) -> &[u8] {
        &self.pixel_data
    }

    /// Mutable pixel data; the length is fixed
    pub fn pixel_data_mut(&mut self) -> &mut [u8] {
        &mut self.pixel_data
    }

    /// Bytes per pixel summed over planes
    pub fn bytes_per_pixel(&self) -> usize {
        self.pixel_format().bytes_per_pixel()
    }

    /// Length the pixel data must have
    pub fn expected_len(&self) -> usize {
        self.rows as usize * self.columns as usize * self.bytes_per_pixel()
    }

    /// Sample layout for the interpolator
    pub fn pixel_format(&self) -> PixelFormat {
        match self.kind {
            ImageKind::Grayscale(_) => PixelFormat::Gray {
                bits_allocated: self.bits_allocated,
                bits_stored: self.bits_stored,
                signed: self.signed,
            },
            ImageKind::Color(_) => PixelFormat::Rgb {
                planar: self.planar,
            },
        }
    }
}
