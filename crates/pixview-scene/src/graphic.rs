//! Scene graph nodes
//!
//! A [`Graphic`] is one node of the scene graph: a visibility flag, a
//! [`SpatialTransform`] relative to its parent, the coordinate system its
//! geometry is currently read in, and a [`GraphicKind`] holding either
//! children or one primitive.
//!
//! Invariant primitives keep their on-screen size and orientation: their
//! geometry is in destination pixels around an anchor, and only the
//! parent's placement of that anchor is inherited.

use std::cell::Cell;

use crate::image::ImageGraphic;
use pixview_core::{Color, Matrix, PointF, RectF, SizeF};
use pixview_transform::SpatialTransform;

/// Space in which a graphic's geometry is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSystem {
    /// The graphic's own (parent-relative) coordinates
    #[default]
    Source,
    /// Root destination pixels
    Destination,
}

/// Restores a graphic's coordinate system when dropped
#[must_use = "the coordinate system is restored when the guard is dropped"]
pub struct CoordinateSystemGuard<'a> {
    cell: &'a Cell<CoordinateSystem>,
    previous: CoordinateSystem,
}

impl Drop for CoordinateSystemGuard<'_> {
    fn drop(&mut self) {
        self.cell.set(self.previous);
    }
}

/// Stroke style of vector primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
}

/// Transform and linear scale of a node relative to the root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub transform: Matrix,
    pub scale: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self::ROOT
    }
}

impl Placement {
    /// Placement of the scene root's parent
    pub const ROOT: Placement = Placement {
        transform: Matrix::IDENTITY,
        scale: 1.0,
    };

    /// Placement of a child with local transform `local`
    pub fn child(&self, local: &SpatialTransform) -> Placement {
        Placement {
            transform: local.cumulative(&self.transform),
            scale: self.scale * local.local_scale(),
        }
    }

    /// Placement of an invariant child
    ///
    /// The local translation is an anchor in the parent's coordinates;
    /// everything else in `local` applies in destination pixels.
    pub fn invariant_child(&self, local: &SpatialTransform) -> Placement {
        let t = local.translation();
        let anchor = self.transform.transform_point(PointF::new(t.w, t.h));
        let mut relative = *local;
        relative.set_translation(0.0, 0.0);
        Placement {
            transform: relative
                .matrix()
                .then(&Matrix::translation(anchor.x, anchor.y)),
            scale: local.local_scale(),
        }
    }
}

/// A straight line segment
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub start: PointF,
    pub end: PointF,
    pub color: Color,
    pub style: LineStyle,
}

/// A cardinal spline through a list of points
///
/// The curve is closed when the first and last points coincide.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePrimitive {
    pub points: Vec<PointF>,
    pub color: Color,
    pub style: LineStyle,
}

impl CurvePrimitive {
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }
}

/// A rectangle outline, or an ellipse inscribed in the rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPrimitive {
    pub rect: RectF,
    pub color: Color,
    pub style: LineStyle,
}

/// An elliptical arc inscribed in a rectangle
///
/// Angles are in degrees, clockwise from the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPrimitive {
    pub rect: RectF,
    pub start_angle: f32,
    pub sweep_angle: f32,
    pub color: Color,
    pub style: LineStyle,
}

/// A single point, drawn as a pen-sized square
#[derive(Debug, Clone, PartialEq)]
pub struct PointPrimitive {
    pub location: PointF,
    pub color: Color,
}

/// Text drawn at a fixed on-screen size
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    /// Top-left corner, in source coordinates
    pub location: PointF,
    pub size_in_points: f32,
    pub font_name: String,
    pub color: Color,
    /// Size of the text as last drawn, in destination pixels
    pub dimensions: Cell<SizeF>,
}

impl TextPrimitive {
    pub fn new(text: impl Into<String>, location: PointF) -> Self {
        Self {
            text: text.into(),
            location,
            size_in_points: 10.0,
            font_name: "Arial".to_string(),
            color: Color::YELLOW,
            dimensions: Cell::new(SizeF::ZERO),
        }
    }
}

/// What a scene graph node holds
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicKind {
    Composite(Vec<Graphic>),
    Image(Box<ImageGraphic>),
    Line(LinePrimitive),
    InvariantLine(LinePrimitive),
    Curve(CurvePrimitive),
    Rectangle(BoundedPrimitive),
    InvariantRectangle(BoundedPrimitive),
    Ellipse(BoundedPrimitive),
    InvariantEllipse(BoundedPrimitive),
    Arc(ArcPrimitive),
    InvariantArc(ArcPrimitive),
    Point(PointPrimitive),
    InvariantText(TextPrimitive),
}

impl GraphicKind {
    /// Check for primitives that keep their on-screen size
    pub fn is_invariant(&self) -> bool {
        matches!(
            self,
            GraphicKind::InvariantLine(_)
                | GraphicKind::InvariantRectangle(_)
                | GraphicKind::InvariantEllipse(_)
                | GraphicKind::InvariantArc(_)
                | GraphicKind::InvariantText(_)
        )
    }
}

/// A scene graph node
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    visible: bool,
    transform: SpatialTransform,
    coordinate_system: Cell<CoordinateSystem>,
    kind: GraphicKind,
}

impl Graphic {
    /// Create a visible node with an identity transform
    pub fn new(kind: GraphicKind) -> Self {
        Self {
            visible: true,
            transform: SpatialTransform::new(),
            coordinate_system: Cell::new(CoordinateSystem::Source),
            kind,
        }
    }

    /// Create a composite node
    pub fn composite(children: Vec<Graphic>) -> Self {
        Self::new(GraphicKind::Composite(children))
    }

    /// Create an image node
    pub fn image(image: ImageGraphic) -> Self {
        Self::new(GraphicKind::Image(Box::new(image)))
    }

    pub fn with_transform(mut self, transform: SpatialTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn transform(&self) -> &SpatialTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut SpatialTransform {
        &mut self.transform
    }

    pub fn kind(&self) -> &GraphicKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut GraphicKind {
        &mut self.kind
    }

    pub fn is_invariant(&self) -> bool {
        self.kind.is_invariant()
    }

    /// Children of a composite node; empty for primitives
    pub fn children(&self) -> &[Graphic] {
        match &self.kind {
            GraphicKind::Composite(children) => children,
            _ => &[],
        }
    }

    /// Mutable children of a composite node
    pub fn children_mut(&mut self) -> Option<&mut Vec<Graphic>> {
        match &mut self.kind {
            GraphicKind::Composite(children) => Some(children),
            _ => None,
        }
    }

    /// Placement of this node given its parent's
    pub fn placement(&self, parent: &Placement) -> Placement {
        if self.is_invariant() {
            parent.invariant_child(&self.transform)
        } else {
            parent.child(&self.transform)
        }
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system.get()
    }

    /// Switch the coordinate system until the returned guard is dropped
    pub fn use_coordinate_system(&self, system: CoordinateSystem) -> CoordinateSystemGuard<'_> {
        let previous = self.coordinate_system.replace(system);
        CoordinateSystemGuard {
            cell: &self.coordinate_system,
            previous,
        }
    }

    /// Express a source point in the current coordinate system
    pub fn convert_point(&self, point: PointF, placement: &Placement) -> PointF {
        match self.coordinate_system.get() {
            CoordinateSystem::Source => point,
            CoordinateSystem::Destination => placement.transform.transform_point(point),
        }
    }
}
