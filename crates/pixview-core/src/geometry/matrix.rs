//! 2D affine matrix
//!
//! Points are treated as column vectors:
//!
//! ```text
//! | x' |   | a  c  e |   | x |
//! | y' | = | b  d  f | * | y |
//! | 1  |   | 0  0  1 |   | 1 |
//! ```

use super::{PointF, RectF, SizeF};
use crate::error::{Error, Result};

/// Tolerance used when classifying matrix coefficients as zero
const EPSILON: f32 = 1e-6;

/// A 2D affine transformation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Create a matrix from its six coefficients
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Pure translation
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Pure scale
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Clockwise rotation in degrees (y axis pointing down)
    ///
    /// Multiples of 90 degrees produce exact coefficients.
    pub fn rotation(degrees: f32) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let (sin, cos) = match normalized {
            n if n == 0.0 => (0.0, 1.0),
            n if n == 90.0 => (1.0, 0.0),
            n if n == 180.0 => (0.0, -1.0),
            n if n == 270.0 => (-1.0, 0.0),
            n => n.to_radians().sin_cos(),
        };
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Compose: apply `self` first, then `next`
    pub fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Compute the inverse transform
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularMatrix`] if the determinant is zero.
    pub fn invert(&self) -> Result<Matrix> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON * f32::EPSILON || !det.is_finite() {
            return Err(Error::SingularMatrix);
        }
        let inv = 1.0 / det;
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Ok(Matrix {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }

    /// Transform a point
    #[inline]
    pub fn transform_point(&self, p: PointF) -> PointF {
        PointF::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Transform a direction vector (translation is ignored)
    #[inline]
    pub fn transform_vector(&self, s: SizeF) -> SizeF {
        SizeF::new(self.a * s.w + self.c * s.h, self.b * s.w + self.d * s.h)
    }

    /// Transform a rectangle by its top-left and bottom-right corners
    ///
    /// Orientation is preserved, so the result may have negative extents.
    pub fn transform_rect(&self, r: &RectF) -> RectF {
        let top_left = self.transform_point(r.location());
        let bottom_right = self.transform_point(PointF::new(r.right(), r.bottom()));
        RectF::from_points(top_left, bottom_right)
    }

    /// Check for the identity transform
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Check whether axes stay axis-aligned (rotation by a multiple of 90 degrees)
    pub fn is_axis_aligned(&self) -> bool {
        (self.b.abs() < EPSILON && self.c.abs() < EPSILON)
            || (self.a.abs() < EPSILON && self.d.abs() < EPSILON)
    }

    /// Check whether the source x axis maps onto the destination y axis
    pub fn swaps_axes(&self) -> bool {
        self.a.abs() < EPSILON && self.d.abs() < EPSILON
    }

    /// Average linear scale factor
    pub fn scale_factor(&self) -> f32 {
        self.determinant().abs().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: PointF, b: PointF) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_then_applies_in_order() {
        let m = Matrix::scaling(2.0, 2.0).then(&Matrix::translation(10.0, 0.0));
        assert!(close(m.transform_point(PointF::new(1.0, 1.0)), PointF::new(12.0, 2.0)));
    }

    #[test]
    fn test_rotation_90() {
        let m = Matrix::rotation(90.0);
        assert!(close(m.transform_point(PointF::new(1.0, 0.0)), PointF::new(0.0, 1.0)));
        assert!(m.swaps_axes());
        assert!(m.is_axis_aligned());
        assert!(!Matrix::rotation(45.0).is_axis_aligned());
    }

    #[test]
    fn test_invert_roundtrip() {
        let m = Matrix::rotation(90.0)
            .then(&Matrix::scaling(1.5, 1.5))
            .then(&Matrix::translation(3.0, -2.0));
        let inv = m.invert().unwrap();
        let p = PointF::new(7.0, 4.0);
        assert!(close(inv.transform_point(m.transform_point(p)), p));
    }

    #[test]
    fn test_invert_singular() {
        assert!(matches!(
            Matrix::scaling(0.0, 1.0).invert(),
            Err(Error::SingularMatrix)
        ));
    }

    #[test]
    fn test_transform_rect_keeps_orientation() {
        let flip = Matrix::scaling(-1.0, 1.0).then(&Matrix::translation(4.0, 0.0));
        let r = flip.transform_rect(&RectF::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(r, RectF::new(4.0, 0.0, -4.0, 2.0));
    }
}
