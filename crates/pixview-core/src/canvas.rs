//! Canvas - a pixel buffer with drawing state
//!
//! A [`Canvas`] owns a [`PixelBuffer`] and a current world-to-device
//! transform. Shape operations take coordinates in world space, map them
//! through the transform and rasterize the result with the point
//! generators in [`crate::raster`]. Pen widths are given in world units
//! and scale with the transform; dash lengths are multiples of the pen
//! width.
//!
//! [`Canvas::scoped_transform`] installs a transform for the lifetime of
//! a guard and restores the previous one when the guard is dropped, on
//! both the success and the error path.

use std::ops::{Deref, DerefMut};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Matrix, PointF, Rect, RectF, SizeF};
use crate::raster::{self, ClipBox, DashCursor};
use crate::text::{self, Font, StringFormat};

/// Segments used per Bezier span of a curve
const CURVE_STEPS: usize = 16;
/// Tension of cardinal splines
const CURVE_TENSION: f32 = 0.5;

/// Line dash style
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashStyle {
    #[default]
    Solid,
    /// Alternating on/off lengths in multiples of the pen width
    Custom(Vec<f32>),
}

/// Stroke parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Color,
    /// Width in world units
    pub width: f32,
    pub dash: DashStyle,
}

impl Pen {
    /// A solid pen
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: DashStyle::Solid,
        }
    }

    /// Set the dash style
    pub fn with_dash(mut self, dash: DashStyle) -> Self {
        self.dash = dash;
        self
    }
}

/// A pixel buffer with a current transform
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: PixelBuffer,
    transform: Matrix,
    dpi: f32,
}

impl Canvas {
    /// Create a canvas of the given size at 96 dpi
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Ok(Self {
            pixels: PixelBuffer::new(width, height)?,
            transform: Matrix::IDENTITY,
            dpi: 96.0,
        })
    }

    pub fn width(&self) -> i32 {
        self.pixels.width()
    }

    pub fn height(&self) -> i32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.pixels
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Set the resolution used for font sizes
    pub fn set_dpi(&mut self, dpi: f32) {
        self.dpi = dpi;
    }

    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix) {
        self.transform = transform;
    }

    /// Reset the transform to identity
    pub fn reset_transform(&mut self) {
        self.transform = Matrix::IDENTITY;
    }

    /// Install `transform` until the returned guard is dropped
    pub fn scoped_transform(&mut self, transform: Matrix) -> TransformGuard<'_> {
        let previous = std::mem::replace(&mut self.transform, transform);
        TransformGuard {
            canvas: self,
            previous,
        }
    }

    /// Fill the whole canvas, ignoring the transform
    pub fn clear(&mut self, color: Color) {
        self.pixels.clear(color.to_argb());
    }

    /// Composite another buffer at the device origin, unscaled
    pub fn draw_image(&mut self, image: &PixelBuffer) {
        self.pixels.draw_buffer(image, 0, 0);
    }

    fn to_device(&self, points: &[PointF]) -> Result<Vec<PointF>> {
        points
            .iter()
            .map(|p| {
                let d = self.transform.transform_point(*p);
                if d.is_finite() {
                    Ok(d)
                } else {
                    Err(Error::InvalidGeometry(format!(
                        "non-finite point ({}, {})",
                        p.x, p.y
                    )))
                }
            })
            .collect()
    }

    /// Pen width in device pixels, capped at the canvas diagonal extent
    fn device_pen_width(&self, pen: &Pen) -> u32 {
        let w = pen.width * self.transform.scale_factor();
        let cap = (self.pixels.width() + self.pixels.height()).max(1) as f32;
        if w.is_finite() { w.round().clamp(1.0, cap) as u32 } else { 1 }
    }

    fn clip_box(&self, margin: u32) -> ClipBox {
        ClipBox::new(self.pixels.width(), self.pixels.height(), margin)
    }

    fn dash_cursor(&self, pen: &Pen, device_width: u32) -> DashCursor {
        match &pen.dash {
            DashStyle::Solid => DashCursor::solid(),
            DashStyle::Custom(pattern) => {
                let scaled: Vec<f32> = pattern.iter().map(|v| v * device_width as f32).collect();
                DashCursor::new(&scaled)
            }
        }
    }

    fn plot(&mut self, points: &[(i32, i32)], color: Color) {
        let argb = color.to_argb();
        for &(x, y) in points {
            self.pixels.blend_pixel(x, y, argb);
        }
    }

    fn stroke_path(&mut self, pen: &Pen, world: &[PointF], closed: bool) -> Result<()> {
        let device = self.to_device(world)?;
        let width = self.device_pen_width(pen);
        let mut dash = self.dash_cursor(pen, width);
        let clip = self.clip_box(width + 1);
        let points = raster::generate_polyline_points(&device, width, closed, &clip, &mut dash);
        self.plot(&points, pen.color);
        Ok(())
    }

    /// Draw a line segment
    pub fn draw_line(&mut self, pen: &Pen, p1: PointF, p2: PointF) -> Result<()> {
        self.stroke_path(pen, &[p1, p2], false)
    }

    /// Draw connected line segments
    pub fn draw_lines(&mut self, pen: &Pen, points: &[PointF], closed: bool) -> Result<()> {
        self.stroke_path(pen, points, closed)
    }

    /// Draw a rectangle outline
    pub fn draw_rectangle(&mut self, pen: &Pen, rect: &RectF) -> Result<()> {
        let corners = rect_corners(rect);
        self.stroke_path(pen, &corners, true)
    }

    /// Draw an ellipse outline inscribed in `rect`
    pub fn draw_ellipse(&mut self, pen: &Pen, rect: &RectF) -> Result<()> {
        let points = ellipse_points(rect, 0.0, 360.0);
        self.stroke_path(pen, &points, true)
    }

    /// Draw an elliptical arc
    ///
    /// Angles are in degrees, measured clockwise from the x axis.
    pub fn draw_arc(&mut self, pen: &Pen, rect: &RectF, start: f32, sweep: f32) -> Result<()> {
        let points = ellipse_points(rect, start, sweep);
        self.stroke_path(pen, &points, false)
    }

    /// Draw a cardinal spline through `points`
    pub fn draw_curve(&mut self, pen: &Pen, points: &[PointF], closed: bool) -> Result<()> {
        let path = cardinal_spline(points, closed);
        self.stroke_path(pen, &path, closed)
    }

    /// Fill a rectangle
    pub fn fill_rectangle(&mut self, color: Color, rect: &RectF) -> Result<()> {
        let device = self.to_device(&rect_corners(&rect.to_positive()))?;
        let points = raster::fill_polygon_points(&device, &self.clip_box(0));
        self.plot(&points, color);
        Ok(())
    }

    /// Measure text laid out without a rectangle
    pub fn measure_string(&self, text: &str, font: &Font) -> SizeF {
        text::measure(text, font, self.dpi)
    }

    /// Measure text laid out in an area of the given size
    pub fn measure_string_in(
        &self,
        text: &str,
        font: &Font,
        area: SizeF,
        format: &StringFormat,
    ) -> SizeF {
        text::measure_in(text, font, self.dpi, area, format)
    }

    /// Draw text with its top-left corner at `origin`
    pub fn draw_string(
        &mut self,
        text: &str,
        font: &Font,
        color: Color,
        origin: PointF,
    ) -> Result<()> {
        let origin = self.to_device(&[origin])?[0];
        let line_height = font.line_height(self.dpi);
        for (i, line) in text.split('\n').enumerate() {
            self.draw_text_line(line, font, color, origin.x, origin.y + i as f32 * line_height);
        }
        Ok(())
    }

    /// Draw text laid out inside a device rectangle
    pub fn draw_string_in(
        &mut self,
        text: &str,
        font: &Font,
        color: Color,
        rect: &Rect,
        format: &StringFormat,
    ) -> Result<()> {
        let lines = text::layout(text, font, self.dpi, &rect.to_rect_f(), format);
        for line in lines {
            self.draw_text_line(&line.text, font, color, line.x, line.y);
        }
        Ok(())
    }

    fn draw_text_line(&mut self, line: &str, font: &Font, color: Color, x: f32, y: f32) {
        let argb = color.to_argb();
        let advance = font.line_width("A", self.dpi) - if font.style().bold { 1.0 } else { 0.0 };
        for (i, ch) in line.chars().enumerate() {
            let cx = x + i as f32 * advance;
            for (bx, by, size) in font.glyph_blocks(ch, cx, y, self.dpi) {
                let left = bx.floor() as i32;
                let top = by.floor() as i32;
                let right = ((bx + size).floor() as i32).max(left + 1);
                let bottom = ((by + size).floor() as i32).max(top + 1);
                self.pixels
                    .fill_rect(&Rect::new(left, top, right - left, bottom - top), argb);
            }
        }
    }
}

/// Restores a canvas transform when dropped
pub struct TransformGuard<'a> {
    canvas: &'a mut Canvas,
    previous: Matrix,
}

impl Deref for TransformGuard<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for TransformGuard<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for TransformGuard<'_> {
    fn drop(&mut self) {
        self.canvas.transform = self.previous;
    }
}

fn rect_corners(rect: &RectF) -> [PointF; 4] {
    [
        PointF::new(rect.x, rect.y),
        PointF::new(rect.right(), rect.y),
        PointF::new(rect.right(), rect.bottom()),
        PointF::new(rect.x, rect.bottom()),
    ]
}

/// Points along the ellipse inscribed in `rect`, from `start` sweeping
/// `sweep` degrees. Angles are true angles, not parametric ones.
fn ellipse_points(rect: &RectF, start: f32, sweep: f32) -> Vec<PointF> {
    let r = rect.to_positive();
    let (rx, ry) = (r.w / 2.0, r.h / 2.0);
    let (cx, cy) = (r.x + rx, r.y + ry);
    let steps = ((rx + ry).abs().ceil() as usize).clamp(16, 360);
    let steps = ((steps as f32 * (sweep.abs() / 360.0)).ceil() as usize).max(2);

    (0..=steps)
        .map(|i| {
            let theta = (start + sweep * i as f32 / steps as f32).to_radians();
            let phi = (rx * theta.sin()).atan2(ry * theta.cos());
            PointF::new(cx + rx * phi.cos(), cy + ry * phi.sin())
        })
        .collect()
}

/// Flatten a cardinal spline into a polyline.
fn cardinal_spline(points: &[PointF], closed: bool) -> Vec<PointF> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let at = |i: isize| -> PointF {
        if closed {
            points[i.rem_euclid(n as isize) as usize]
        } else {
            points[i.clamp(0, n as isize - 1) as usize]
        }
    };
    let spans = if closed { n } else { n - 1 };
    let k = CURVE_TENSION / 3.0;

    let mut path = Vec::with_capacity(spans * CURVE_STEPS + 1);
    path.push(points[0]);
    for s in 0..spans as isize {
        let p0 = at(s - 1);
        let p1 = at(s);
        let p2 = at(s + 1);
        let p3 = at(s + 2);
        let c1 = PointF::new(p1.x + (p2.x - p0.x) * k, p1.y + (p2.y - p0.y) * k);
        let c2 = PointF::new(p2.x - (p3.x - p1.x) * k, p2.y - (p3.y - p1.y) * k);
        for step in 1..=CURVE_STEPS {
            let t = step as f32 / CURVE_STEPS as f32;
            let u = 1.0 - t;
            let b0 = u * u * u;
            let b1 = 3.0 * u * u * t;
            let b2 = 3.0 * u * t * t;
            let b3 = t * t * t;
            path.push(PointF::new(
                b0 * p1.x + b1 * c1.x + b2 * c2.x + b3 * p2.x,
                b0 * p1.y + b1 * c1.y + b2 * c2.y + b3 * p2.y,
            ));
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        let mut c = Canvas::new(20, 20).unwrap();
        c.clear(Color::BLACK);
        c
    }

    #[test]
    fn test_draw_line_horizontal() {
        let mut c = canvas();
        let pen = Pen::new(Color::WHITE, 1.0);
        c.draw_line(&pen, PointF::new(2.0, 5.0), PointF::new(8.0, 5.0)).unwrap();
        assert_eq!(c.pixels().get_pixel(2, 5), Some(Color::WHITE.to_argb()));
        assert_eq!(c.pixels().get_pixel(8, 5), Some(Color::WHITE.to_argb()));
        assert_eq!(c.pixels().get_pixel(9, 5), Some(Color::BLACK.to_argb()));
    }

    #[test]
    fn test_transform_applies_to_geometry() {
        let mut c = canvas();
        c.set_transform(Matrix::translation(10.0, 0.0));
        let pen = Pen::new(Color::RED, 1.0);
        c.draw_line(&pen, PointF::new(0.0, 0.0), PointF::new(0.0, 3.0)).unwrap();
        assert_eq!(c.pixels().get_pixel(10, 2), Some(Color::RED.to_argb()));
        assert_eq!(c.pixels().get_pixel(0, 2), Some(Color::BLACK.to_argb()));
    }

    #[test]
    fn test_scoped_transform_restored() {
        let mut c = canvas();
        c.set_transform(Matrix::translation(1.0, 1.0));
        {
            let mut guard = c.scoped_transform(Matrix::scaling(2.0, 2.0));
            assert_eq!(*guard.transform(), Matrix::scaling(2.0, 2.0));
            let pen = Pen::new(Color::WHITE, 1.0);
            assert!(guard
                .draw_line(&pen, PointF::new(f32::NAN, 0.0), PointF::new(1.0, 1.0))
                .is_err());
        }
        assert_eq!(*c.transform(), Matrix::translation(1.0, 1.0));
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut c = canvas();
        let pen = Pen::new(Color::WHITE, 1.0).with_dash(DashStyle::Custom(vec![4.0, 4.0]));
        c.draw_line(&pen, PointF::new(0.0, 0.0), PointF::new(15.0, 0.0)).unwrap();
        let white = Some(Color::WHITE.to_argb());
        assert_eq!(c.pixels().get_pixel(0, 0), white);
        assert_eq!(c.pixels().get_pixel(3, 0), white);
        assert_ne!(c.pixels().get_pixel(5, 0), white);
        assert_eq!(c.pixels().get_pixel(8, 0), white);
    }

    #[test]
    fn test_far_offscreen_line_is_clipped() {
        let mut c = canvas();
        let pen = Pen::new(Color::WHITE, 1.0).with_dash(DashStyle::Custom(vec![4.0, 4.0]));
        c.draw_line(&pen, PointF::new(0.0, 5.0), PointF::new(3.0e9, 5.0)).unwrap();
        assert_eq!(c.pixels().get_pixel(0, 5), Some(Color::WHITE.to_argb()));
        assert_eq!(c.pixels().get_pixel(0, 4), Some(Color::BLACK.to_argb()));

        c.fill_rectangle(Color::RED, &RectF::new(-4.0e9, -4.0e9, 8.0e9, 8.0e9))
            .unwrap();
        assert_eq!(c.pixels().get_pixel(19, 19), Some(Color::RED.to_argb()));
    }

    #[test]
    fn test_fill_rectangle() {
        let mut c = canvas();
        c.fill_rectangle(Color::BLUE, &RectF::new(2.0, 2.0, 2.0, 2.0)).unwrap();
        assert_eq!(c.pixels().get_pixel(3, 3), Some(Color::BLUE.to_argb()));
        assert_eq!(c.pixels().get_pixel(4, 4), Some(Color::BLACK.to_argb()));
    }

    #[test]
    fn test_ellipse_touches_bounds() {
        let mut c = canvas();
        let pen = Pen::new(Color::WHITE, 1.0);
        c.draw_ellipse(&pen, &RectF::new(2.0, 2.0, 10.0, 10.0)).unwrap();
        let white = Some(Color::WHITE.to_argb());
        assert_eq!(c.pixels().get_pixel(12, 7), white);
        assert_eq!(c.pixels().get_pixel(7, 7), Some(Color::BLACK.to_argb()));
    }

    #[test]
    fn test_curve_passes_through_points() {
        let pts = [
            PointF::new(0.0, 0.0),
            PointF::new(5.0, 5.0),
            PointF::new(10.0, 0.0),
        ];
        let path = cardinal_spline(&pts, false);
        assert_eq!(path[0], pts[0]);
        assert!(path.iter().any(|p| (p.x - 5.0).abs() < 1e-4 && (p.y - 5.0).abs() < 1e-4));
        assert_eq!(*path.last().unwrap(), pts[2]);
    }

    #[test]
    fn test_draw_string_marks_pixels() {
        let mut c = canvas();
        let font = Font::builtin(
            9.0,
            crate::text::FontStyle::REGULAR,
            crate::text::FontUnit::Pixel,
        );
        c.draw_string("I", &font, Color::WHITE, PointF::new(0.0, 0.0)).unwrap();
        // Top bar of 'I' sits one unit below the cell top.
        assert_eq!(c.pixels().get_pixel(2, 1), Some(Color::WHITE.to_argb()));
        assert_eq!(c.pixels().get_pixel(0, 0), Some(Color::BLACK.to_argb()));
    }
}
