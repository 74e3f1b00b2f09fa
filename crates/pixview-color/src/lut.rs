//! Modality and VOI lookup tables
//!
//! # See also
//!
//! DICOM PS3.3 C.11.1 (Modality LUT) and C.11.2.1.2 (linear window)

use crate::error::{ColorError, ColorResult};

/// Range of stored values for a bit depth and signedness.
///
/// # Errors
///
/// Returns [`ColorError::InvalidBitDepth`] unless `bits_stored` is in `1..=16`.
pub fn stored_range(bits_stored: u8, signed: bool) -> ColorResult<(i32, i32)> {
    if !(1..=16).contains(&bits_stored) {
        return Err(ColorError::InvalidBitDepth(bits_stored));
    }
    if signed {
        let half = 1i32 << (bits_stored - 1);
        Ok((-half, half - 1))
    } else {
        Ok((0, (1i32 << bits_stored) - 1))
    }
}

/// Linear rescale of stored values (`value * slope + intercept`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalityLut {
    min_input: i32,
    max_input: i32,
    slope: f64,
    intercept: f64,
}

impl ModalityLut {
    /// Create a modality LUT over the stored range of the pixel format
    pub fn new(bits_stored: u8, signed: bool, slope: f64, intercept: f64) -> ColorResult<Self> {
        let (min_input, max_input) = stored_range(bits_stored, signed)?;
        Ok(Self {
            min_input,
            max_input,
            slope,
            intercept,
        })
    }

    pub fn min_input(&self) -> i32 {
        self.min_input
    }

    pub fn max_input(&self) -> i32 {
        self.max_input
    }

    /// Rescaled value of a stored value
    #[inline]
    pub fn value(&self, stored: i32) -> f64 {
        stored as f64 * self.slope + self.intercept
    }

    /// Smallest rescaled value
    pub fn min_output(&self) -> f64 {
        self.value(self.min_input).min(self.value(self.max_input))
    }

    /// Largest rescaled value
    pub fn max_output(&self) -> f64 {
        self.value(self.min_input).max(self.value(self.max_input))
    }
}

/// Linear VOI window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiWindow {
    center: f64,
    width: f64,
}

impl VoiWindow {
    /// Create a window
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidWindow`] if `width < 1`.
    pub fn new(center: f64, width: f64) -> ColorResult<Self> {
        if !(width >= 1.0) || !center.is_finite() {
            return Err(ColorError::InvalidWindow { center, width });
        }
        Ok(Self { center, width })
    }

    /// A window covering `[min, max]` exactly
    pub fn full_range(min: f64, max: f64) -> Self {
        let width = (max - min + 1.0).max(1.0);
        Self {
            center: min + width / 2.0,
            width,
        }
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Map a value onto `[min_out, max_out]`
    pub fn apply(&self, value: f64, min_out: i32, max_out: i32) -> f64 {
        let c = self.center - 0.5;
        let half = (self.width - 1.0) / 2.0;
        if value <= c - half {
            min_out as f64
        } else if value > c + half {
            max_out as f64
        } else {
            ((value - c) / (self.width - 1.0) + 0.5) * (max_out - min_out) as f64 + min_out as f64
        }
    }
}

/// A composed lookup table from stored values to output values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLut {
    min_input: i32,
    max_input: i32,
    min_output: i32,
    max_output: i32,
    data: Vec<i32>,
}

impl OutputLut {
    /// Create a LUT from explicit data starting at `min_input`
    ///
    /// The output range is taken from the data.
    pub fn from_data(min_input: i32, data: Vec<i32>) -> ColorResult<Self> {
        let (Some(&min_output), Some(&max_output)) = (data.iter().min(), data.iter().max())
        else {
            return Err(ColorError::InvalidRange {
                min: min_input,
                max: min_input - 1,
            });
        };
        Ok(Self {
            min_input,
            max_input: min_input + data.len() as i32 - 1,
            min_output,
            max_output,
            data,
        })
    }

    pub fn min_input(&self) -> i32 {
        self.min_input
    }

    pub fn max_input(&self) -> i32 {
        self.max_input
    }

    pub fn min_output(&self) -> i32 {
        self.min_output
    }

    pub fn max_output(&self) -> i32 {
        self.max_output
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Look up an input value, clamped to the input range
    pub fn get(&self, input: i32) -> i32 {
        let index = (input.clamp(self.min_input, self.max_input) - self.min_input) as usize;
        self.data[index]
    }
}

/// Composes modality and VOI LUTs for one pixel format
#[derive(Debug, Clone, PartialEq)]
pub struct LutComposer {
    modality: ModalityLut,
    voi: Option<VoiWindow>,
}

impl LutComposer {
    /// Create a composer for stored values of the given format
    pub fn new(bits_stored: u8, signed: bool) -> ColorResult<Self> {
        Ok(Self {
            modality: ModalityLut::new(bits_stored, signed, 1.0, 0.0)?,
            voi: None,
        })
    }

    /// Use a modality rescale
    pub fn with_modality(mut self, modality: ModalityLut) -> Self {
        self.modality = modality;
        self
    }

    /// Use a VOI window; without one the full rescaled range is shown
    pub fn with_voi(mut self, voi: Option<VoiWindow>) -> Self {
        self.voi = voi;
        self
    }

    pub fn modality(&self) -> &ModalityLut {
        &self.modality
    }

    pub fn voi(&self) -> Option<&VoiWindow> {
        self.voi.as_ref()
    }

    /// Compose the LUT mapping every stored value onto `[min_out, max_out]`
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidRange`] if `min_out > max_out`.
    pub fn output_lut(&self, min_out: i32, max_out: i32) -> ColorResult<OutputLut> {
        if min_out > max_out {
            return Err(ColorError::InvalidRange {
                min: min_out,
                max: max_out,
            });
        }
        let window = self.voi.unwrap_or_else(|| {
            VoiWindow::full_range(self.modality.min_output(), self.modality.max_output())
        });
        let data: Vec<i32> = (self.modality.min_input()..=self.modality.max_input())
            .map(|stored| {
                let v = window.apply(self.modality.value(stored), min_out, max_out);
                (v.round() as i32).clamp(min_out, max_out)
            })
            .collect();
        Ok(OutputLut {
            min_input: self.modality.min_input(),
            max_input: self.modality.max_input(),
            min_output: min_out,
            max_output: max_out,
            data,
        })
    }
}
