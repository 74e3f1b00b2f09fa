//! Scene graph walking and the renderer contract
//!
//! [`draw_scene_graph`] visits a scene depth-first in child order,
//! skipping invisible subtrees, and hands every leaf to the matching
//! [`SceneRenderer`] hook together with its [`Placement`]. A
//! [`Renderer`] owns the policy for a whole draw: what happens in
//! [`DrawMode::Render`] and [`DrawMode::Refresh`], and how failures are
//! reported.

use crate::error::{RenderError, Result};
use crate::surface::{RenderingSurface, WindowId};
use pixview_scene::{
    AnnotationBox, ArcPrimitive, BoundedPrimitive, CurvePrimitive, Graphic, GraphicKind,
    ImageGraphic, LinePrimitive, Placement, PointPrimitive, PresentationImage, TextPrimitive,
};

/// What a draw call does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Redraw the scene into the final buffer
    #[default]
    Render,
    /// Present the existing final buffer again
    Refresh,
}

/// Arguments of one draw call
#[derive(Debug)]
pub struct DrawArgs<'a> {
    pub surface: &'a mut RenderingSurface,
    pub image: &'a PresentationImage,
    pub mode: DrawMode,
    /// Resolution of the target device
    pub dpi: f32,
    /// Free-form caller tag, logged with the draw
    pub tag: Option<String>,
}

impl<'a> DrawArgs<'a> {
    /// Create draw arguments at 96 DPI
    pub fn new(
        surface: &'a mut RenderingSurface,
        image: &'a PresentationImage,
        mode: DrawMode,
    ) -> Self {
        Self {
            surface,
            image,
            mode,
            dpi: 96.0,
            tag: None,
        }
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Draws a presentation image onto rendering surfaces
pub trait Renderer {
    /// Create the surface for a host window
    fn get_rendering_surface(
        &mut self,
        window_id: WindowId,
        width: i32,
        height: i32,
    ) -> RenderingSurface;

    /// Render or refresh according to `args.mode`
    ///
    /// # Errors
    ///
    /// Any failure is returned as a [`RenderError`] carrying the mode
    /// and the surface state at the time of the draw.
    fn draw(&mut self, args: &mut DrawArgs<'_>) -> std::result::Result<(), RenderError>;

    /// Release cached resources; the renderer stays usable
    fn dispose(&mut self);
}

/// Per-primitive drawing hooks called by [`draw_scene_graph`]
///
/// Every hook gets the node itself, so it can switch the node's
/// coordinate system, and the node's placement relative to the root.
/// Invariant variants draw like their ordinary counterparts unless
/// overridden.
pub trait SceneRenderer {
    fn draw_image_graphic(
        &mut self,
        graphic: &Graphic,
        image: &ImageGraphic,
        placement: &Placement,
    ) -> Result<()>;

    fn draw_line(
        &mut self,
        graphic: &Graphic,
        line: &LinePrimitive,
        placement: &Placement,
    ) -> Result<()>;

    fn draw_invariant_line(
        &mut self,
        graphic: &Graphic,
        line: &LinePrimitive,
        placement: &Placement,
    ) -> Result<()> {
        self.draw_line(graphic, line, placement)
    }

    fn draw_curve(
        &mut self,
        graphic: &Graphic,
        curve: &CurvePrimitive,
        placement: &Placement,
    ) -> Result<()>;

    fn draw_rectangle(
        &mut self,
        graphic: &Graphic,
        rectangle: &BoundedPrimitive,
        placement: &Placement,
    ) -> Result<()>;

    fn draw_invariant_rectangle(
        &mut self,
        graphic: &Graphic,
        rectangle: &BoundedPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        self.draw_rectangle(graphic, rectangle, placement)
    }

    fn draw_ellipse(
        &mut self,
        graphic: &Graphic,
        ellipse: &BoundedPrimitive,
        placement: &Placement,
    ) -> Result<()>;

    fn draw_invariant_ellipse(
        &mut self,
        graphic: &Graphic,
        ellipse: &BoundedPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        self.draw_ellipse(graphic, ellipse, placement)
    }

    fn draw_arc(
        &mut self,
        graphic: &Graphic,
        arc: &ArcPrimitive,
        placement: &Placement,
    ) -> Result<()>;

    fn draw_invariant_arc(
        &mut self,
        graphic: &Graphic,
        arc: &ArcPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        self.draw_arc(graphic, arc, placement)
    }

    fn draw_point(
        &mut self,
        graphic: &Graphic,
        point: &PointPrimitive,
        placement: &Placement,
    ) -> Result<()>;

    fn draw_text_primitive(
        &mut self,
        graphic: &Graphic,
        text: &TextPrimitive,
        placement: &Placement,
    ) -> Result<()>;

    /// Draw one overlay box; `text` may be empty
    fn draw_annotation_box(&mut self, text: &str, annotation_box: &AnnotationBox) -> Result<()>;
}

/// Draw `graphic` and its visible descendants
///
/// `parent` is the placement of the node's parent; pass
/// [`Placement::ROOT`] for a scene root. The first hook error stops the
/// walk.
pub fn draw_scene_graph<R>(renderer: &mut R, graphic: &Graphic, parent: &Placement) -> Result<()>
where
    R: SceneRenderer + ?Sized,
{
    if !graphic.is_visible() {
        return Ok(());
    }
    let placement = graphic.placement(parent);
    match graphic.kind() {
        GraphicKind::Composite(children) => {
            for child in children {
                draw_scene_graph(renderer, child, &placement)?;
            }
            Ok(())
        }
        GraphicKind::Image(image) => renderer.draw_image_graphic(graphic, image, &placement),
        GraphicKind::Line(line) => renderer.draw_line(graphic, line, &placement),
        GraphicKind::InvariantLine(line) => renderer.draw_invariant_line(graphic, line, &placement),
        GraphicKind::Curve(curve) => renderer.draw_curve(graphic, curve, &placement),
        GraphicKind::Rectangle(rect) => renderer.draw_rectangle(graphic, rect, &placement),
        GraphicKind::InvariantRectangle(rect) => {
            renderer.draw_invariant_rectangle(graphic, rect, &placement)
        }
        GraphicKind::Ellipse(ellipse) => renderer.draw_ellipse(graphic, ellipse, &placement),
        GraphicKind::InvariantEllipse(ellipse) => {
            renderer.draw_invariant_ellipse(graphic, ellipse, &placement)
        }
        GraphicKind::Arc(arc) => renderer.draw_arc(graphic, arc, &placement),
        GraphicKind::InvariantArc(arc) => renderer.draw_invariant_arc(graphic, arc, &placement),
        GraphicKind::Point(point) => renderer.draw_point(graphic, point, &placement),
        GraphicKind::InvariantText(text) => {
            renderer.draw_text_primitive(graphic, text, &placement)
        }
    }
}

/// Draw every visible annotation box of `image`, in layout order
pub fn draw_text_overlay<R>(renderer: &mut R, image: &PresentationImage) -> Result<()>
where
    R: SceneRenderer + ?Sized,
{
    let Some(layout) = image.annotation_layout() else {
        return Ok(());
    };
    if !layout.visible {
        return Ok(());
    }
    for annotation_box in layout.visible_boxes() {
        let text = annotation_box.annotation_text(image);
        renderer.draw_annotation_box(&text, annotation_box)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pixview_core::{Color, PointF, RectF};
    use pixview_scene::{AnnotationLayout, LineStyle};
    use pixview_transform::SpatialTransform;

    /// Records the hooks it sees
    #[derive(Default)]
    struct Spy {
        calls: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl Spy {
        fn record(&mut self, name: &str, placement: &Placement) -> Result<()> {
            let origin = placement.transform.transform_point(PointF::new(0.0, 0.0));
            self.calls.push(format!("{}@{},{}", name, origin.x, origin.y));
            if self.fail_on == Some(name) {
                return Err(Error::UnsupportedRotation(placement.transform));
            }
            Ok(())
        }
    }

    impl SceneRenderer for Spy {
        fn draw_image_graphic(
            &mut self,
            _: &Graphic,
            _: &ImageGraphic,
            p: &Placement,
        ) -> Result<()> {
            self.record("image", p)
        }

        fn draw_line(&mut self, _: &Graphic, _: &LinePrimitive, p: &Placement) -> Result<()> {
            self.record("line", p)
        }

        fn draw_curve(&mut self, _: &Graphic, _: &CurvePrimitive, p: &Placement) -> Result<()> {
            self.record("curve", p)
        }

        fn draw_rectangle(
            &mut self,
            _: &Graphic,
            _: &BoundedPrimitive,
            p: &Placement,
        ) -> Result<()> {
            self.record("rectangle", p)
        }

        fn draw_ellipse(&mut self, _: &Graphic, _: &BoundedPrimitive, p: &Placement) -> Result<()> {
            self.record("ellipse", p)
        }

        fn draw_arc(&mut self, _: &Graphic, _: &ArcPrimitive, p: &Placement) -> Result<()> {
            self.record("arc", p)
        }

        fn draw_point(&mut self, _: &Graphic, _: &PointPrimitive, p: &Placement) -> Result<()> {
            self.record("point", p)
        }

        fn draw_text_primitive(
            &mut self,
            _: &Graphic,
            _: &TextPrimitive,
            p: &Placement,
        ) -> Result<()> {
            self.record("text", p)
        }

        fn draw_annotation_box(&mut self, text: &str, _: &AnnotationBox) -> Result<()> {
            self.calls.push(format!("box:{}", text));
            Ok(())
        }
    }

    fn line() -> Graphic {
        Graphic::new(GraphicKind::Line(LinePrimitive {
            start: PointF::new(0.0, 0.0),
            end: PointF::new(1.0, 1.0),
            color: Color::WHITE,
            style: LineStyle::Solid,
        }))
    }

    fn rectangle() -> Graphic {
        Graphic::new(GraphicKind::InvariantRectangle(BoundedPrimitive {
            rect: RectF::new(0.0, 0.0, 2.0, 2.0),
            color: Color::WHITE,
            style: LineStyle::Dash,
        }))
    }

    #[test]
    fn test_depth_first_order() {
        let moved = SpatialTransform::new().with_translation(5.0, 0.0);
        let scene = Graphic::composite(vec![
            line(),
            Graphic::composite(vec![rectangle(), line()]).with_transform(moved),
            Graphic::new(GraphicKind::Point(PointPrimitive {
                location: PointF::new(0.0, 0.0),
                color: Color::WHITE,
            })),
        ]);
        let mut spy = Spy::default();
        draw_scene_graph(&mut spy, &scene, &Placement::ROOT).unwrap();
        assert_eq!(
            spy.calls,
            vec!["line@0,0", "rectangle@5,0", "line@5,0", "point@0,0"]
        );
    }

    #[test]
    fn test_invisible_subtree_skipped() {
        let scene = Graphic::composite(vec![
            Graphic::composite(vec![line(), line()]).with_visible(false),
            rectangle().with_visible(false),
            line(),
        ]);
        let mut spy = Spy::default();
        draw_scene_graph(&mut spy, &scene, &Placement::ROOT).unwrap();
        assert_eq!(spy.calls, vec!["line@0,0"]);

        let hidden = Graphic::composite(vec![line()]).with_visible(false);
        let mut spy = Spy::default();
        draw_scene_graph(&mut spy, &hidden, &Placement::ROOT).unwrap();
        assert!(spy.calls.is_empty());
    }

    #[test]
    fn test_first_error_stops_walk() {
        let scene = Graphic::composite(vec![line(), rectangle(), line()]);
        let mut spy = Spy {
            fail_on: Some("rectangle"),
            ..Spy::default()
        };
        let r = draw_scene_graph(&mut spy, &scene, &Placement::ROOT);
        assert!(r.is_err());
        assert_eq!(spy.calls.len(), 2);
    }

    #[test]
    fn test_text_overlay() {
        let layout = AnnotationLayout::new(vec![
            AnnotationBox::new(RectF::new(0.0, 0.0, 1.0, 0.5), "top".to_string()),
            AnnotationBox::new(RectF::new(0.0, 0.5, 1.0, 0.5), "hidden".to_string())
                .with_visible(false),
            AnnotationBox::default(),
        ]);
        let image = PresentationImage::new(Graphic::composite(vec![])).with_layout_provider(layout);
        let mut spy = Spy::default();
        draw_text_overlay(&mut spy, &image).unwrap();
        assert_eq!(spy.calls, vec!["box:top", "box:"]);

        let mut hidden = AnnotationLayout::new(vec![AnnotationBox::new(
            RectF::new(0.0, 0.0, 1.0, 1.0),
            "x".to_string(),
        )]);
        hidden.visible = false;
        let image = PresentationImage::new(Graphic::composite(vec![])).with_layout_provider(hidden);
        let mut spy = Spy::default();
        draw_text_overlay(&mut spy, &image).unwrap();
        assert!(spy.calls.is_empty());
    }
}
