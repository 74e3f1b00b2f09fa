//! Spatial transform of a scene graph node
//!
//! A node's local transform, relative to its parent, applies in this
//! order to a source point `p`:
//!
//! 1. shift so the centre of rotation is at the origin
//! 2. translate
//! 3. scale (negated on flipped axes)
//! 4. rotate clockwise
//! 5. shift the centre of rotation back
//!
//! The cumulative transform applies the parent's cumulative transform
//! after that.

use crate::error::{TransformError, TransformResult};
use pixview_core::{Matrix, PointF, SizeF};

/// Scale, flip, rotation and translation of one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTransform {
    scale_x: f32,
    scale_y: f32,
    flip_horizontal: bool,
    flip_vertical: bool,
    rotation: i32,
    translation: SizeF,
    center_of_rotation: PointF,
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            flip_horizontal: false,
            flip_vertical: false,
            rotation: 0,
            translation: SizeF::ZERO,
            center_of_rotation: PointF::new(0.0, 0.0),
        }
    }
}

impl SpatialTransform {
    /// The identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform scale
    pub fn with_scale(mut self, scale: f32) -> TransformResult<Self> {
        self.set_scale(scale)?;
        Ok(self)
    }

    pub fn with_translation(mut self, dx: f32, dy: f32) -> Self {
        self.translation = SizeF::new(dx, dy);
        self
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.set_rotation(degrees);
        self
    }

    pub fn with_center_of_rotation(mut self, center: PointF) -> Self {
        self.center_of_rotation = center;
        self
    }

    /// Uniform scale (the x scale when pixels are not square)
    pub fn scale(&self) -> f32 {
        self.scale_x
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    /// Set a uniform scale
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] unless the scale is
    /// finite and non-zero.
    pub fn set_scale(&mut self, scale: f32) -> TransformResult<()> {
        self.set_scale_xy(scale, scale)
    }

    /// Set independent axis scales (non-square pixels)
    pub fn set_scale_xy(&mut self, scale_x: f32, scale_y: f32) -> TransformResult<()> {
        for s in [scale_x, scale_y] {
            if s == 0.0 || !s.is_finite() {
                return Err(TransformError::InvalidParameters(format!(
                    "scale must be finite and non-zero, got {}",
                    s
                )));
            }
        }
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        Ok(())
    }

    /// Multiply the scale by `factor`
    pub fn zoom(&mut self, factor: f32) -> TransformResult<()> {
        if !(factor > 0.0) || !factor.is_finite() {
            return Err(TransformError::InvalidParameters(format!(
                "zoom factor must be positive, got {}",
                factor
            )));
        }
        self.set_scale_xy(self.scale_x * factor, self.scale_y * factor)
    }

    /// Mirrored left to right in the node's own frame
    pub fn is_flipped_horizontally(&self) -> bool {
        self.flip_horizontal
    }

    /// Mirrored top to bottom in the node's own frame
    pub fn is_flipped_vertically(&self) -> bool {
        self.flip_vertical
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    pub fn set_flip_vertical(&mut self, flip: bool) {
        self.flip_vertical = flip;
    }

    /// Flip as seen on screen: left to right after rotation
    pub fn flip_horizontal(&mut self) {
        if self.rotation % 180 == 0 {
            self.flip_horizontal = !self.flip_horizontal;
        } else {
            self.flip_vertical = !self.flip_vertical;
        }
    }

    /// Flip as seen on screen: top to bottom after rotation
    pub fn flip_vertical(&mut self) {
        if self.rotation % 180 == 0 {
            self.flip_vertical = !self.flip_vertical;
        } else {
            self.flip_horizontal = !self.flip_horizontal;
        }
    }

    /// Clockwise rotation in degrees, in `0..360`
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Set the rotation; any angle is normalised into `0..360`
    pub fn set_rotation(&mut self, degrees: i32) {
        self.rotation = degrees.rem_euclid(360);
    }

    /// Add to the rotation
    pub fn rotate(&mut self, degrees: i32) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Translation in parent (source) units
    pub fn translation(&self) -> SizeF {
        self.translation
    }

    pub fn set_translation(&mut self, dx: f32, dy: f32) {
        self.translation = SizeF::new(dx, dy);
    }

    /// Add to the translation
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.translation = SizeF::new(self.translation.w + dx, self.translation.h + dy);
    }

    /// Centre of rotation in parent (source) coordinates
    pub fn center_of_rotation(&self) -> PointF {
        self.center_of_rotation
    }

    pub fn set_center_of_rotation(&mut self, center: PointF) {
        self.center_of_rotation = center;
    }

    /// Reset to the identity transform
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Transform relative to the parent node
    pub fn matrix(&self) -> Matrix {
        let c = self.center_of_rotation;
        let sx = if self.flip_horizontal {
            -self.scale_x
        } else {
            self.scale_x
        };
        let sy = if self.flip_vertical {
            -self.scale_y
        } else {
            self.scale_y
        };
        Matrix::translation(-c.x, -c.y)
            .then(&Matrix::translation(self.translation.w, self.translation.h))
            .then(&Matrix::scaling(sx, sy))
            .then(&Matrix::rotation(self.rotation as f32))
            .then(&Matrix::translation(c.x, c.y))
    }

    /// Transform relative to the root, given the parent's cumulative transform
    pub fn cumulative(&self, parent: &Matrix) -> Matrix {
        self.matrix().then(parent)
    }

    /// Linear scale of this node alone
    pub fn local_scale(&self) -> f32 {
        (self.scale_x * self.scale_y).abs().sqrt()
    }

    /// Map a point from this node's source space to the root's destination space
    pub fn convert_to_destination(&self, parent: &Matrix, point: PointF) -> PointF {
        self.cumulative(parent).transform_point(point)
    }

    /// Map a point from the root's destination space to this node's source space
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Core`] if the cumulative transform is singular.
    pub fn convert_to_source(&self, parent: &Matrix, point: PointF) -> TransformResult<PointF> {
        Ok(self.cumulative(parent).invert()?.transform_point(point))
    }
}
