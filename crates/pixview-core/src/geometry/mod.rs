//! Rect, RectF, PointF, SizeF - Plane geometry
//!
//! Integer rectangles address pixels in a buffer; floating-point types
//! carry sub-pixel positions through spatial transforms.

mod matrix;

pub use matrix::Matrix;

/// An integer rectangle
///
/// Width and height are non-negative for rectangles built with
/// [`Rect::new`]. A zero-sized rectangle is legal and [`Rect::is_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle at the origin
    pub const fn from_size(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Create a rectangle from two corner points
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            w: (x2 - x1).abs(),
            h: (y2 - y1).abs(),
        }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Check if the rectangle is empty (zero or negative area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }

    /// Translate the rectangle
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Grow (positive) or shrink (negative) the rectangle on every side
    pub fn inflate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x - dx,
            y: self.y - dy,
            w: self.w + 2 * dx,
            h: self.h + 2 * dy,
        }
    }

    /// Clip the rectangle to a buffer of the given size
    pub fn clip(&self, width: i32, height: i32) -> Option<Rect> {
        self.intersect(&Rect::from_size(width, height))
    }

    /// Compute the sub-rectangle covering a normalized `[0, 1]` region
    ///
    /// Used to place annotation boxes, whose layout is expressed as
    /// fractions of the client area.
    pub fn sub_rectangle(&self, normalized: &RectF) -> Rect {
        let left = self.x + (normalized.x * self.w as f32) as i32;
        let top = self.y + (normalized.y * self.h as f32) as i32;
        let right = self.x + (normalized.right() * self.w as f32) as i32;
        let bottom = self.y + (normalized.bottom() * self.h as f32) as i32;
        Rect::from_corners(left, top, right, bottom)
    }

    /// Convert to a floating-point rectangle
    pub fn to_rect_f(&self) -> RectF {
        RectF::new(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{X={},Y={},Width={},Height={}}}", self.x, self.y, self.w, self.h)
    }
}

/// A floating-point point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    /// Create a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset the point by a size
    pub fn offset(&self, size: SizeF) -> PointF {
        PointF::new(self.x + size.w, self.y + size.h)
    }

    /// Check that both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A floating-point size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeF {
    pub w: f32,
    pub h: f32,
}

impl SizeF {
    /// Create a new size
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// A zero size
    pub const ZERO: SizeF = SizeF { w: 0.0, h: 0.0 };
}

/// A floating-point rectangle
///
/// Width and height may be negative: a rectangle converted through a
/// transform keeps the orientation of its corners, which is how flips
/// are carried from destination back to source space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle spanning two corner points, preserving orientation
    pub fn from_points(top_left: PointF, bottom_right: PointF) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            w: bottom_right.x - top_left.x,
            h: bottom_right.y - top_left.y,
        }
    }

    /// Get the right x coordinate
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Get the top-left corner
    pub fn location(&self) -> PointF {
        PointF::new(self.x, self.y)
    }

    /// Check if the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.w == 0.0 || self.h == 0.0
    }

    /// Flip negative extents so width and height are non-negative
    pub fn to_positive(&self) -> RectF {
        let (x, w) = if self.w < 0.0 {
            (self.x + self.w, -self.w)
        } else {
            (self.x, self.w)
        };
        let (y, h) = if self.h < 0.0 {
            (self.y + self.h, -self.h)
        } else {
            (self.y, self.h)
        };
        RectF { x, y, w, h }
    }

    /// Smallest integer rectangle containing this one
    ///
    /// The rectangle is normalized first; edges are floored/ceiled.
    pub fn round_inflate(&self) -> Rect {
        let p = self.to_positive();
        let left = p.x.floor() as i32;
        let top = p.y.floor() as i32;
        let right = p.right().ceil() as i32;
        let bottom = p.bottom().ceil() as i32;
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Offset the rectangle by a size
    pub fn offset(&self, size: SizeF) -> RectF {
        RectF {
            x: self.x + size.w,
            y: self.y + size.h,
            ..*self
        }
    }
}
