//! Software renderer
//!
//! Draws images through [`image_renderer`](crate::image_renderer) and
//! vector graphics and text through the [`Canvas`] of the surface's
//! final buffer. Every vector primitive gets a black drop shadow one
//! device-independent pixel down and right.

use std::rc::Rc;
use std::time::Instant;

use crate::config::RendererConfig;
use crate::error::{RenderError, Result};
use crate::font_factory::FontFactory;
use crate::image_renderer;
use crate::surface::{RenderingSurface, WindowId};
use crate::walker::{
    DrawArgs, DrawMode, Renderer, SceneRenderer, draw_scene_graph, draw_text_overlay,
};
use pixview_core::{
    Canvas, Color, DashStyle, Font, FontSource, FontStyle, FontUnit, Matrix, Pen, RectF, SizeF,
    StringAlignment, StringFormat, StringTrimming,
};
use pixview_scene::{
    AnnotationBox, ArcPrimitive, BoundedPrimitive, CoordinateSystem, CurvePrimitive, Graphic,
    ImageGraphic, Justification, LinePrimitive, LineStyle, Placement, PointPrimitive,
    TextPrimitive, Truncation, VerticalAlignment,
};

/// Renderer drawing into in-memory buffers
#[derive(Debug)]
pub struct SoftwareRenderer {
    fonts: FontFactory,
    config: RendererConfig,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareRenderer {
    /// Create a renderer with default options
    pub fn new() -> Self {
        Self::with_config(RendererConfig::default())
    }

    /// Create a renderer with custom options
    pub fn with_config(config: RendererConfig) -> Self {
        Self {
            fonts: FontFactory::new(config.font_cache_capacity),
            config,
        }
    }

    /// Use another font source
    pub fn with_font_source(mut self, source: impl FontSource + 'static) -> Self {
        self.fonts = FontFactory::with_source(source, self.config.font_cache_capacity);
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontFactory {
        &self.fonts
    }

    fn render(&mut self, args: &mut DrawArgs<'_>) -> Result<()> {
        let start = Instant::now();
        let canvas = args.surface.final_buffer()?;
        canvas.set_dpi(args.dpi);
        canvas.reset_transform();
        canvas.clear(Color::BLACK);

        let mut pass = SoftwarePass {
            fonts: &mut self.fonts,
            config: &self.config,
            surface: &mut *args.surface,
            dpi: args.dpi,
        };
        draw_scene_graph(&mut pass, args.image.scene_graph(), &Placement::ROOT)?;
        draw_text_overlay(&mut pass, args.image)?;

        log::trace!(
            "window {}: render{} took {:?}",
            args.surface.window_id(),
            tag_suffix(args),
            start.elapsed()
        );
        Ok(())
    }

    fn refresh(&mut self, args: &mut DrawArgs<'_>) -> Result<()> {
        let start = Instant::now();
        if args.surface.has_final_buffer() {
            args.surface.render_to_screen()?;
        }
        log::trace!(
            "window {}: refresh{} took {:?}",
            args.surface.window_id(),
            tag_suffix(args),
            start.elapsed()
        );
        Ok(())
    }
}

fn tag_suffix(args: &DrawArgs<'_>) -> String {
    args.tag
        .as_deref()
        .map(|tag| format!(" [{}]", tag))
        .unwrap_or_default()
}

impl Renderer for SoftwareRenderer {
    fn get_rendering_surface(
        &mut self,
        window_id: WindowId,
        width: i32,
        height: i32,
    ) -> RenderingSurface {
        RenderingSurface::new(window_id, width, height)
    }

    fn draw(&mut self, args: &mut DrawArgs<'_>) -> std::result::Result<(), RenderError> {
        let result = match args.mode {
            DrawMode::Render => self.render(args),
            DrawMode::Refresh => self.refresh(args),
        };
        result.map_err(|source| RenderError::new(args.mode, args.surface, source))
    }

    fn dispose(&mut self) {
        log::debug!("disposing software renderer ({} cached fonts)", self.fonts.len());
        self.fonts.clear();
    }
}

/// State of one render pass
struct SoftwarePass<'a> {
    fonts: &'a mut FontFactory,
    config: &'a RendererConfig,
    surface: &'a mut RenderingSurface,
    dpi: f32,
}

fn dash_style(style: LineStyle) -> DashStyle {
    match style {
        LineStyle::Solid => DashStyle::Solid,
        LineStyle::Dash => DashStyle::Custom(vec![4.0, 4.0]),
        LineStyle::Dot => DashStyle::Custom(vec![2.0, 4.0]),
    }
}

fn annotation_format(annotation_box: &AnnotationBox) -> StringFormat {
    let trimming = if annotation_box.fit_width {
        StringTrimming::None
    } else {
        match annotation_box.truncation {
            Truncation::Truncate => StringTrimming::Character,
            Truncation::Ellipsis => StringTrimming::EllipsisCharacter,
        }
    };
    let alignment = match annotation_box.justification {
        Justification::Left => StringAlignment::Near,
        Justification::Center => StringAlignment::Center,
        Justification::Right => StringAlignment::Far,
    };
    let line_alignment = match annotation_box.vertical_alignment {
        VerticalAlignment::Top => StringAlignment::Near,
        VerticalAlignment::Center => StringAlignment::Center,
        VerticalAlignment::Bottom => StringAlignment::Far,
    };
    StringFormat {
        alignment,
        line_alignment,
        trimming,
        no_wrap: annotation_box.number_of_lines == 1,
    }
}

impl SoftwarePass<'_> {
    /// Pen width in source units: one pixel at nominal resolution
    fn pen_width(&self, placement: &Placement) -> f32 {
        self.config.dpi_scale(self.dpi) / placement.scale
    }

    /// Stroke a primitive twice: shadow first, then in its color
    fn stroke<F>(
        &mut self,
        graphic: &Graphic,
        placement: &Placement,
        color: Color,
        style: LineStyle,
        draw: F,
    ) -> Result<()>
    where
        F: Fn(&mut Canvas, &Pen) -> pixview_core::Result<()>,
    {
        let _source = graphic.use_coordinate_system(CoordinateSystem::Source);
        let width = self.pen_width(placement);
        let dash = dash_style(style);
        let canvas = self.surface.final_buffer()?;
        {
            let shadow = Matrix::translation(width, width).then(&placement.transform);
            let mut canvas = canvas.scoped_transform(shadow);
            draw(&mut *canvas, &Pen::new(Color::BLACK, width).with_dash(dash.clone()))?;
        }
        let mut canvas = canvas.scoped_transform(placement.transform);
        draw(&mut *canvas, &Pen::new(color, width).with_dash(dash))?;
        Ok(())
    }

    fn annotation_font(&mut self, annotation_box: &AnnotationBox, size: f32) -> Rc<Font> {
        let style = FontStyle {
            bold: annotation_box.bold,
            italic: annotation_box.italic,
        };
        self.fonts.create_font(
            &annotation_box.font,
            size,
            style,
            FontUnit::Pixel,
            &self.config.default_font,
        )
    }
}

impl SceneRenderer for SoftwarePass<'_> {
    fn draw_image_graphic(
        &mut self,
        _graphic: &Graphic,
        image: &ImageGraphic,
        placement: &Placement,
    ) -> Result<()> {
        let start = Instant::now();
        let client = self.surface.client_rectangle();
        let canvas = self.surface.image_buffer()?;
        canvas.clear(Color::TRANSPARENT_WHITE);
        image_renderer::render(image, &placement.transform, canvas.pixels_mut(), client)?;
        self.surface.render_image()?;
        log::trace!(
            "window {}: {}x{} image drawn in {:?}",
            self.surface.window_id(),
            image.columns(),
            image.rows(),
            start.elapsed()
        );
        Ok(())
    }

    fn draw_line(
        &mut self,
        graphic: &Graphic,
        line: &LinePrimitive,
        placement: &Placement,
    ) -> Result<()> {
        self.stroke(graphic, placement, line.color, line.style, |canvas, pen| {
            canvas.draw_line(pen, line.start, line.end)
        })
    }

    fn draw_curve(
        &mut self,
        graphic: &Graphic,
        curve: &CurvePrimitive,
        placement: &Placement,
    ) -> Result<()> {
        let closed = curve.is_closed();
        let points = if closed {
            &curve.points[..curve.points.len() - 1]
        } else {
            &curve.points[..]
        };
        if points.len() < 2 {
            return Ok(());
        }
        self.stroke(graphic, placement, curve.color, curve.style, |canvas, pen| {
            canvas.draw_curve(pen, points, closed)
        })
    }

    fn draw_rectangle(
        &mut self,
        graphic: &Graphic,
        rectangle: &BoundedPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        let rect = rectangle.rect.to_positive();
        self.stroke(graphic, placement, rectangle.color, rectangle.style, |canvas, pen| {
            canvas.draw_rectangle(pen, &rect)
        })
    }

    fn draw_ellipse(
        &mut self,
        graphic: &Graphic,
        ellipse: &BoundedPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        let rect = ellipse.rect.to_positive();
        self.stroke(graphic, placement, ellipse.color, ellipse.style, |canvas, pen| {
            canvas.draw_ellipse(pen, &rect)
        })
    }

    fn draw_arc(
        &mut self,
        graphic: &Graphic,
        arc: &ArcPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        let rect = arc.rect.to_positive();
        self.stroke(graphic, placement, arc.color, arc.style, |canvas, pen| {
            canvas.draw_arc(pen, &rect, arc.start_angle, arc.sweep_angle)
        })
    }

    fn draw_point(
        &mut self,
        graphic: &Graphic,
        point: &PointPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        let _source = graphic.use_coordinate_system(CoordinateSystem::Source);
        let width = self.pen_width(placement);
        let square = RectF::new(point.location.x, point.location.y, width, width);
        let canvas = self.surface.final_buffer()?;
        let mut canvas = canvas.scoped_transform(placement.transform);
        canvas.fill_rectangle(Color::BLACK, &square.offset(SizeF::new(width, width)))?;
        canvas.fill_rectangle(point.color, &square)?;
        Ok(())
    }

    fn draw_text_primitive(
        &mut self,
        graphic: &Graphic,
        text: &TextPrimitive,
        placement: &Placement,
    ) -> Result<()> {
        let _destination = graphic.use_coordinate_system(CoordinateSystem::Destination);
        let scale = self.config.dpi_scale(self.dpi);
        let font = self.fonts.create_font(
            &text.font_name,
            text.size_in_points * scale,
            FontStyle::REGULAR,
            FontUnit::Point,
            &self.config.default_font,
        );
        let top_left = graphic.convert_point(text.location, placement);

        let canvas = self.surface.final_buffer()?;
        let mut canvas = canvas.scoped_transform(Matrix::IDENTITY);
        text.dimensions.set(canvas.measure_string(&text.text, &font));
        canvas.draw_string(
            &text.text,
            &font,
            Color::BLACK,
            top_left.offset(SizeF::new(scale, scale)),
        )?;
        canvas.draw_string(&text.text, &font, text.color, top_left)?;
        Ok(())
    }

    fn draw_annotation_box(&mut self, text: &str, annotation_box: &AnnotationBox) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let inset = self.config.annotation_inset;
        let area = self
            .surface
            .client_rectangle()
            .sub_rectangle(&annotation_box.normalized_rectangle)
            .inflate(-inset, -inset);
        if area.is_empty() {
            return Ok(());
        }
        let minimum = self.config.minimum_font_size;
        let lines = annotation_box.number_of_lines.max(1) as i32;
        let mut font_size = (area.h / lines - 1) as f32;
        if font_size < minimum {
            return Ok(());
        }

        let format = annotation_format(annotation_box);
        let mut font = self.annotation_font(annotation_box, font_size);
        if annotation_box.fit_width {
            let layout_area = SizeF::new(area.w as f32, area.h as f32);
            let measured = self
                .surface
                .final_buffer()?
                .measure_string_in(text, &font, layout_area, &format);
            if measured.w > area.w as f32 {
                font_size = (font_size * area.w as f32 / measured.w - 0.5).round();
                if font_size < minimum {
                    return Ok(());
                }
                font = self.annotation_font(annotation_box, font_size);
            }
        }

        let color = Color::from_name(&annotation_box.color).unwrap_or_else(|| {
            log::warn!("unknown annotation color '{}', using white", annotation_box.color);
            Color::WHITE
        });
        let canvas = self.surface.final_buffer()?;
        let mut canvas = canvas.scoped_transform(Matrix::IDENTITY);
        canvas.draw_string_in(text, &font, Color::BLACK, &area.offset(1, 1), &format)?;
        canvas.draw_string_in(text, &font, color, &area, &format)?;
        Ok(())
    }
}
