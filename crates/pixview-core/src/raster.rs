//! Point generation for rasterized shapes
//!
//! This module turns device-space geometry into integer pixel positions:
//! - Lines (Bresenham, 8-connected), clipped to a [`ClipBox`]
//! - Wide lines (parallel offsets)
//! - Dashed lines (pattern filtering along the line)
//! - Polylines (connected segments, optionally closed)
//! - Filled polygons (scanline, even-odd)
//!
//! Every generator works inside a clip window, so the cost of a shape
//! depends on its visible extent only. Geometry far outside the canvas
//! produces no points at all.

use crate::geometry::PointF;

/// A list of integer pixel positions
pub type PointList = Vec<(i32, i32)>;

/// Device-space clip window in continuous pixel coordinates
///
/// Pixel `(x, y)` covers `[x, x + 1) x [y, y + 1)`. The window spans the
/// canvas grown by `margin` pixels on every side, so wide pens centred
/// just outside the canvas still reach its edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBox {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl ClipBox {
    /// Clip window for a `width` x `height` canvas plus `margin` pixels
    pub fn new(width: i32, height: i32, margin: u32) -> Self {
        let m = margin as f64;
        Self {
            x0: -m,
            y0: -m,
            x1: width.max(0) as f64 + m,
            y1: height.max(0) as f64 + m,
        }
    }

    /// Check whether a point lies inside the window
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Parametric range `[t0, t1]` of the segment `a -> b` inside the
    /// window (Liang-Barsky), or `None` if the segment misses it.
    fn clip_segment(&self, a: (f64, f64), b: (f64, f64)) -> Option<(f64, f64)> {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        let edges = [
            (-dx, a.0 - self.x0),
            (dx, self.x1 - a.0),
            (-dy, a.1 - self.y0),
            (dy, self.y1 - a.1),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some((t0, t1))
    }
}

/// Walk the 8-connected pixel path from `from` to `to`, end points included.
///
/// Both ends must already lie inside a clip window, which keeps every
/// coordinate well within `i32`.
fn trace_segment(from: (i32, i32), to: (i32, i32), points: &mut PointList) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if to.0 > x { 1 } else { -1 };
    let sy = if to.1 > y { 1 } else { -1 };
    let mut err = dx + dy;
    points.reserve((dx.max(-dy) + 1) as usize);
    loop {
        points.push((x, y));
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Generate the visible points of the line from `a` to `b`.
///
/// The segment is clipped to `clip` before it is traced, and `dash` is
/// advanced over the clipped-off lengths as if they had been traced, so
/// a dash pattern stays continuous when part of the line is off-canvas.
/// Each call advances the dash phase by the full length of the segment
/// in pixel steps, end points included.
pub fn generate_line_points(
    a: PointF,
    b: PointF,
    clip: &ClipBox,
    dash: &mut DashCursor,
) -> PointList {
    let start = (a.x.floor() as f64, a.y.floor() as f64);
    let end = (b.x.floor() as f64, b.y.floor() as f64);
    let steps = (end.0 - start.0).abs().max((end.1 - start.1).abs()) + 1.0;

    let Some((t0, t1)) = clip.clip_segment((a.x as f64, a.y as f64), (b.x as f64, b.y as f64))
    else {
        dash.advance(steps);
        return Vec::new();
    };

    let at = |t: f64| {
        let x = a.x as f64 + t * (b.x as f64 - a.x as f64);
        let y = a.y as f64 + t * (b.y as f64 - a.y as f64);
        let x = x.clamp(clip.x0, clip.x1).floor() as i32;
        let y = y.clamp(clip.y0, clip.y1).floor() as i32;
        (x, y)
    };

    let mut traced = Vec::new();
    trace_segment(at(t0), at(t1), &mut traced);

    let skipped = (t0 * (steps - 1.0)).round();
    dash.advance(skipped);
    let kept = dash.filter(&traced);
    dash.advance((steps - skipped - traced.len() as f64).max(0.0));
    kept
}

/// Offsets of the parallel lines that make up a line of `width` pixels.
///
/// Offsets alternate around the centre line: 0, -1, +1, -2, +2, ...
fn width_offsets(width: u32) -> impl Iterator<Item = i32> {
    (0..width.max(1)).map(|i| {
        let offset = i.div_ceil(2) as i32;
        if i % 2 == 1 { -offset } else { offset }
    })
}

/// Widen a run of line points perpendicular to the line's major axis.
///
/// `horizontal` is true when the line steps mainly along x, in which
/// case parallel copies are offset in y.
pub fn widen_points(points: &[(i32, i32)], horizontal: bool, width: u32) -> PointList {
    if width <= 1 {
        return points.to_vec();
    }
    let mut result = Vec::with_capacity(points.len() * width as usize);
    for offset in width_offsets(width) {
        for &(x, y) in points {
            if horizontal {
                result.push((x, y + offset));
            } else {
                result.push((x + offset, y));
            }
        }
    }
    result
}

/// Dash pattern state carried along a path
///
/// The pattern alternates on/off lengths in pixels, starting "on".
/// Carrying the phase across segments keeps dashes continuous around
/// polyline corners.
#[derive(Debug, Clone)]
pub struct DashCursor {
    pattern: Vec<f32>,
    total: f64,
    phase: f64,
}

impl DashCursor {
    /// Create a cursor for a pattern of on/off lengths.
    ///
    /// An empty or non-positive pattern yields a solid cursor.
    pub fn new(pattern: &[f32]) -> Self {
        let pattern: Vec<f32> = pattern.iter().map(|v| v.max(0.0)).collect();
        let total = pattern.iter().map(|v| *v as f64).sum();
        Self {
            pattern,
            total,
            phase: 0.0,
        }
    }

    /// A cursor that keeps every point
    pub fn solid() -> Self {
        Self::new(&[])
    }

    fn is_on(&self) -> bool {
        if self.total <= 0.0 {
            return true;
        }
        let mut pos = self.phase;
        for (i, len) in self.pattern.iter().enumerate() {
            let len = *len as f64;
            if pos < len {
                return i % 2 == 0;
            }
            pos -= len;
        }
        true
    }

    /// Move the phase forward by `steps` pixels without emitting points
    pub fn advance(&mut self, steps: f64) {
        if self.total > 0.0 && steps.is_finite() {
            self.phase = (self.phase + steps).rem_euclid(self.total);
        }
    }

    /// Keep the points of a segment that fall on "on" runs, advancing the phase
    pub fn filter(&mut self, points: &[(i32, i32)]) -> PointList {
        if self.total <= 0.0 {
            return points.to_vec();
        }
        let mut kept = Vec::with_capacity(points.len());
        for &p in points {
            if self.is_on() {
                kept.push(p);
            }
            self.advance(1.0);
        }
        kept
    }
}

/// Generate the points of a polyline connecting `vertices`.
///
/// If `close` is true, the last vertex is connected back to the first.
/// Segments are clipped to `clip`; the dash phase still runs over the
/// clipped parts.
pub fn generate_polyline_points(
    vertices: &[PointF],
    width: u32,
    close: bool,
    clip: &ClipBox,
    dash: &mut DashCursor,
) -> PointList {
    let n = vertices.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        let kept = generate_line_points(vertices[0], vertices[0], clip, dash);
        return widen_points(&kept, true, width);
    }

    let mut result = Vec::new();
    let mut emit = |a: PointF, b: PointF, dash: &mut DashCursor| {
        let horizontal = (b.x - a.x).abs() > (b.y - a.y).abs();
        let kept = generate_line_points(a, b, clip, dash);
        result.extend(widen_points(&kept, horizontal, width));
    };

    for pair in vertices.windows(2) {
        emit(pair[0], pair[1], dash);
    }
    if close && n > 2 {
        emit(vertices[n - 1], vertices[0], dash);
    }

    result
}

/// Generate the interior points of a polygon (even-odd rule).
///
/// A pixel is inside when its centre is inside the polygon. Rows and
/// spans are limited to `clip`.
pub fn fill_polygon_points(vertices: &[PointF], clip: &ClipBox) -> PointList {
    if vertices.len() < 3 {
        return Vec::new();
    }
    let (mut ymin, mut ymax) = (f64::MAX, f64::MIN);
    for v in vertices {
        ymin = ymin.min(v.y as f64);
        ymax = ymax.max(v.y as f64);
    }

    let first_row = (ymin - 0.5).ceil().max(clip.y0.ceil());
    let last_row = (ymax - 0.5).floor().min(clip.y1.ceil() - 1.0);
    if first_row > last_row {
        return Vec::new();
    }
    let (first_row, last_row) = (first_row as i32, last_row as i32);
    let (left, right) = (clip.x0.ceil(), clip.x1.ceil());

    let mut points = Vec::new();
    let mut crossings: Vec<f64> = Vec::new();
    for row in first_row..=last_row {
        let cy = row as f64 + 0.5;
        crossings.clear();
        for i in 0..vertices.len() {
            let (ax, ay) = (vertices[i].x as f64, vertices[i].y as f64);
            let b = vertices[(i + 1) % vertices.len()];
            let (bx, by) = (b.x as f64, b.y as f64);
            if (ay <= cy && by > cy) || (by <= cy && ay > cy) {
                let t = (cy - ay) / (by - ay);
                crossings.push(ax + t * (bx - ax));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(left);
            let end = (span[1] - 0.5).ceil().min(right);
            if start < end {
                points.extend((start as i32..end as i32).map(|x| (x, row)));
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_clip() -> ClipBox {
        ClipBox::new(64, 64, 0)
    }

    fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> PointList {
        generate_line_points(
            PointF::new(x1, y1),
            PointF::new(x2, y2),
            &open_clip(),
            &mut DashCursor::solid(),
        )
    }

    #[test]
    fn test_line_endpoints() {
        let pts = line(0.0, 0.0, 5.0, 2.0);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], (0, 0));
        assert_eq!(pts[5], (5, 2));
        assert!(pts.windows(2).all(|w| {
            (w[1].0 - w[0].0).abs() <= 1 && (w[1].1 - w[0].1).abs() <= 1
        }));
    }

    #[test]
    fn test_line_single_point() {
        assert_eq!(line(3.2, 4.7, 3.2, 4.7), vec![(3, 4)]);
    }

    #[test]
    fn test_line_clipped_to_window() {
        let clip = ClipBox::new(8, 8, 0);
        let pts = generate_line_points(
            PointF::new(-3.0e9, 2.5),
            PointF::new(3.0e9, 2.5),
            &clip,
            &mut DashCursor::solid(),
        );
        assert!(pts.len() <= 10);
        assert!(pts.contains(&(0, 2)));
        assert!(pts.contains(&(7, 2)));
        assert!(pts.iter().all(|&(_, y)| y == 2));
    }

    #[test]
    fn test_line_outside_window() {
        let clip = ClipBox::new(8, 8, 1);
        let pts = generate_line_points(
            PointF::new(20.0, 0.0),
            PointF::new(40.0, 30.0),
            &clip,
            &mut DashCursor::solid(),
        );
        assert!(pts.is_empty());
    }

    #[test]
    fn test_clipped_dash_keeps_phase() {
        // The visible part of a clipped dashed line matches the same
        // pixels of the unclipped line.
        let pattern = [3.0, 2.0];
        let full = generate_line_points(
            PointF::new(-20.0, 1.0),
            PointF::new(15.0, 1.0),
            &ClipBox::new(64, 64, 32),
            &mut DashCursor::new(&pattern),
        );
        let clipped = generate_line_points(
            PointF::new(-20.0, 1.0),
            PointF::new(15.0, 1.0),
            &ClipBox::new(16, 16, 0),
            &mut DashCursor::new(&pattern),
        );
        let visible: PointList = full.into_iter().filter(|&(x, _)| x >= 0).collect();
        assert_eq!(clipped, visible);
    }

    #[test]
    fn test_wide_polyline_count() {
        let pts = generate_polyline_points(
            &[PointF::new(0.0, 5.0), PointF::new(9.0, 5.0)],
            3,
            false,
            &open_clip(),
            &mut DashCursor::solid(),
        );
        assert_eq!(pts.len(), 30);
        assert!(pts.contains(&(0, 4)));
        assert!(pts.contains(&(0, 6)));
    }

    #[test]
    fn test_dash_cursor_pattern() {
        let mut dash = DashCursor::new(&[2.0, 2.0]);
        let line = line(0.0, 0.0, 7.0, 0.0);
        let kept = dash.filter(&line);
        assert_eq!(kept, vec![(0, 0), (1, 0), (4, 0), (5, 0)]);
    }

    #[test]
    fn test_dash_phase_carries_across_segments() {
        let mut dash = DashCursor::new(&[3.0, 3.0]);
        let a = dash.filter(&[(0, 0), (1, 0)]);
        let b = dash.filter(&[(2, 0), (3, 0)]);
        assert_eq!(a.len(), 2);
        assert_eq!(b, vec![(2, 0)]);
    }

    #[test]
    fn test_closed_polyline() {
        let square = [
            PointF::new(0.0, 0.0),
            PointF::new(4.0, 0.0),
            PointF::new(4.0, 4.0),
            PointF::new(0.0, 4.0),
        ];
        let clip = open_clip();
        let pts = generate_polyline_points(&square, 1, true, &clip, &mut DashCursor::solid());
        assert!(pts.contains(&(0, 2)));
        let open = generate_polyline_points(&square, 1, false, &clip, &mut DashCursor::solid());
        assert!(!open.contains(&(0, 2)));
    }

    #[test]
    fn test_fill_polygon_square() {
        let square = [
            PointF::new(1.0, 1.0),
            PointF::new(4.0, 1.0),
            PointF::new(4.0, 3.0),
            PointF::new(1.0, 3.0),
        ];
        let pts = fill_polygon_points(&square, &open_clip());
        assert_eq!(pts.len(), 6);
        assert!(pts.contains(&(1, 1)));
        assert!(pts.contains(&(3, 2)));
        assert!(!pts.contains(&(4, 1)));
    }

    #[test]
    fn test_fill_polygon_clamped() {
        let huge = [
            PointF::new(-1.0e9, -1.0e9),
            PointF::new(1.0e9, -1.0e9),
            PointF::new(1.0e9, 1.0e9),
            PointF::new(-1.0e9, 1.0e9),
        ];
        let pts = fill_polygon_points(&huge, &ClipBox::new(5, 4, 0));
        assert_eq!(pts.len(), 20);
        assert!(pts.iter().all(|&(x, y)| (0..5).contains(&x) && (0..4).contains(&y)));
    }
}
