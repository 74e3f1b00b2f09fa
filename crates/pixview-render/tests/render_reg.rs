//! Rendering regression test
//!
//! Tests the full render/refresh cycle on small images, the annotation
//! overlay, surface resizing, the font cache bound and the renderer pool.

use pixview_core::{Color, FontStyle, FontUnit, PixelBuffer, PointF, Rect, RectF, color};
use pixview_render::{
    DrawArgs, DrawMode, FontFactory, Renderer, RendererPool, RenderingSurface, SoftwareRenderer,
    WindowId,
};
use pixview_scene::{
    AnnotationBox, AnnotationLayout, BoundedPrimitive, Graphic, GraphicKind, ImageGraphic,
    LinePrimitive, LineStyle, PresentationImage, VerticalAlignment,
};
use pixview_test::RegParams;
use pixview_transform::SpatialTransform;

fn draw(
    renderer: &mut SoftwareRenderer,
    surface: &mut RenderingSurface,
    scene: &PresentationImage,
) {
    for mode in [DrawMode::Render, DrawMode::Refresh] {
        let mut args = DrawArgs::new(surface, scene, mode).with_tag("render_reg");
        renderer.draw(&mut args).unwrap();
    }
}

fn gray_at(buf: &PixelBuffer, x: i32, y: i32) -> f64 {
    color::blue(buf.get_pixel(x, y).unwrap_or(0)) as f64
}

fn gradient(size: i32) -> ImageGraphic {
    let data = (0..size * size)
        .map(|i| ((i % size) * 255 / (size - 1)) as u8)
        .collect();
    ImageGraphic::grayscale8(size, size, data).unwrap()
}

#[test]
fn render_reg() {
    let mut rp = RegParams::new("render");
    let mut renderer = SoftwareRenderer::new();

    // Test 1: 2x2 image at 1:1 reaches the screen unchanged
    let block = ImageGraphic::grayscale8(2, 2, vec![10, 20, 30, 40]).unwrap();
    let scene = PresentationImage::new(Graphic::image(block.clone()));
    let mut surface = renderer.get_rendering_surface(WindowId(1), 2, 2);
    draw(&mut renderer, &mut surface, &scene);
    let screen = surface.screen().unwrap().clone();
    for (i, expected) in [10.0, 20.0, 30.0, 40.0].into_iter().enumerate() {
        rp.compare_values(expected, gray_at(&screen, i as i32 % 2, i as i32 / 2), 0.0);
    }

    // Test 2: the same image minified onto one pixel averages to 25
    let zoomed = Graphic::image(block)
        .with_transform(SpatialTransform::new().with_scale(0.5).unwrap());
    let scene = PresentationImage::new(zoomed);
    let mut one = renderer.get_rendering_surface(WindowId(2), 1, 1);
    draw(&mut renderer, &mut one, &scene);
    rp.compare_values(25.0, gray_at(one.screen().unwrap(), 0, 0), 0.0);

    // Test 3: zoomed gradient with an outline and a bottom overlay line
    let overlay = AnnotationLayout::new(vec![
        AnnotationBox::new(RectF::new(0.0, 0.75, 1.0, 0.25), "W 255".to_string())
            .with_color("White")
            .with_vertical_alignment(VerticalAlignment::Bottom),
    ]);
    let outline = Graphic::new(GraphicKind::Rectangle(BoundedPrimitive {
        rect: RectF::new(2.0, 2.0, 12.0, 12.0),
        color: Color::YELLOW,
        style: LineStyle::Dash,
    }));
    let scene = PresentationImage::new(
        Graphic::composite(vec![Graphic::image(gradient(16)), outline])
            .with_transform(SpatialTransform::new().with_scale(4.0).unwrap()),
    )
    .with_layout_provider(overlay);
    let mut large = renderer.get_rendering_surface(WindowId(3), 64, 64);
    draw(&mut renderer, &mut large, &scene);
    let first = large.screen().unwrap().clone();
    rp.compare_values(0.0, gray_at(&first, 0, 0), 0.0);
    rp.compare_values(255.0, gray_at(&first, 63, 0), 0.0);
    let corner = first.get_pixel(8, 8).unwrap_or(0);
    rp.compare_values(Color::YELLOW.to_argb() as f64, corner as f64, 0.0);

    // Test 4: drawing again is deterministic
    draw(&mut renderer, &mut large, &scene);
    rp.compare_buffers(&first, large.screen().unwrap());

    // Test 5: resizing reallocates the buffers at the new size
    large.set_client_rectangle(Rect::new(0, 0, 32, 48));
    rp.compare_values(0.0, large.has_final_buffer() as u8 as f64, 0.0);
    draw(&mut renderer, &mut large, &scene);
    let resized = large.screen().unwrap();
    rp.compare_values(32.0, resized.width() as f64, 0.0);
    rp.compare_values(48.0, resized.height() as f64, 0.0);

    // Test 6: disposed surfaces refuse to draw
    large.dispose();
    let mut args = DrawArgs::new(&mut large, &scene, DrawMode::Render);
    rp.compare_values(1.0, renderer.draw(&mut args).is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "render regression test failed");
}

#[test]
fn offscreen_geometry_reg() {
    let mut rp = RegParams::new("offscreen_geometry");
    let mut renderer = SoftwareRenderer::new();
    let white = Color::WHITE.to_argb();

    // Test 1: a line running billions of pixels off the surface draws its
    // visible part and returns promptly
    for (style, far) in [(LineStyle::Solid, 2.0e7f32), (LineStyle::Dash, 3.0e9)] {
        let line = Graphic::new(GraphicKind::Line(LinePrimitive {
            start: PointF::new(0.0, 5.0),
            end: PointF::new(far, 5.0),
            color: Color::WHITE,
            style,
        }));
        let scene = PresentationImage::new(line);
        let mut surface = renderer.get_rendering_surface(WindowId(5), 16, 16);
        let started = std::time::Instant::now();
        let mut args = DrawArgs::new(&mut surface, &scene, DrawMode::Render);
        rp.compare_values(1.0, renderer.draw(&mut args).is_ok() as u8 as f64, 0.0);
        rp.compare_values(1.0, (started.elapsed().as_secs_f64() < 0.5) as u8 as f64, 0.0);
        let pixel = surface.final_buffer().ok().and_then(|c| c.pixels().get_pixel(0, 5));
        rp.compare_values(white as f64, pixel.unwrap_or(0) as f64, 0.0);
    }

    // Test 2: a dotted outline far larger than the surface is skipped cheaply
    let blob = Graphic::new(GraphicKind::Rectangle(BoundedPrimitive {
        rect: RectF::new(-1.0e9, -1.0e9, 2.0e9, 2.0e9),
        color: Color::RED,
        style: LineStyle::Dot,
    }));
    let scene = PresentationImage::new(blob);
    let mut surface = renderer.get_rendering_surface(WindowId(6), 16, 16);
    let mut args = DrawArgs::new(&mut surface, &scene, DrawMode::Render);
    rp.compare_values(1.0, renderer.draw(&mut args).is_ok() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "offscreen geometry regression test failed");
}

#[test]
fn font_cache_reg() {
    let mut rp = RegParams::new("font_cache");
    let mut fonts = FontFactory::default();

    // Test 1: 50 distinct sizes fill the cache
    for i in 0..50 {
        fonts.create_font("Arial", 6.0 + i as f32, FontStyle::REGULAR, FontUnit::Pixel, "Arial");
    }
    rp.compare_values(50.0, fonts.len() as f64, 0.0);

    // Test 2: the 51st distinct font flushes the cache first
    fonts.create_font("Arial", 80.0, FontStyle::BOLD, FontUnit::Point, "Arial");
    rp.compare_values(1.0, fonts.len() as f64, 0.0);

    // Test 3: a hit neither grows nor flushes
    fonts.create_font("Arial", 80.04, FontStyle::BOLD, FontUnit::Point, "Arial");
    rp.compare_values(1.0, fonts.len() as f64, 0.0);

    assert!(rp.cleanup(), "font cache regression test failed");
}

#[test]
fn renderer_pool_reg() {
    let mut rp = RegParams::new("renderer_pool");
    let pool = RendererPool::new(SoftwareRenderer::new);
    let scene = PresentationImage::new(Graphic::new(GraphicKind::InvariantText(
        pixview_scene::TextPrimitive::new("pool", PointF::new(2.0, 2.0)),
    )));

    // Test 1: a leased renderer draws and goes back to the pool
    {
        let mut renderer = pool.lease();
        let mut surface = renderer.get_rendering_surface(WindowId(4), 48, 24);
        let mut args = DrawArgs::new(&mut surface, &scene, DrawMode::Render);
        rp.compare_values(1.0, renderer.draw(&mut args).is_ok() as u8 as f64, 0.0);
        rp.compare_values(1.0, renderer.fonts().len() as f64, 0.0);
    }
    rp.compare_values(1.0, pool.idle_count() as f64, 0.0);

    // Test 2: the next lease reuses the renderer and its fonts
    let renderer = pool.lease();
    rp.compare_values(1.0, renderer.fonts().len() as f64, 0.0);
    renderer.release();

    // Test 3: teardown empties the pool
    pool.dispose_all();
    rp.compare_values(0.0, pool.idle_count() as f64, 0.0);

    assert!(rp.cleanup(), "renderer pool regression test failed");
}
