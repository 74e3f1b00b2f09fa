//! Image graphic rasterization
//!
//! Draws an [`ImageGraphic`] into an ARGB buffer through its cumulative
//! transform: the visible part of the image is found in destination
//! space, mapped back to a source rectangle, and resampled with the
//! bilinear interpolator through a flattened LUT.

use crate::error::{Error, Result};
use pixview_color::{LutComposer, ModalityLut, OutputLut, with_flattened_lut};
use pixview_core::{Matrix, PixelBuffer, PointF, Rect, RectF};
use pixview_scene::{ColorSettings, GrayscaleSettings, ImageGraphic, ImageKind};
use pixview_transform::{
    DestinationPixels, LutRef, SourcePixels, TransformError, interpolate_bilinear,
};

/// Where an image lands on the destination and which part of it is seen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRectangles {
    /// Visible destination pixels, inside the client rectangle
    pub destination: Rect,
    /// Source region covering `destination`; negative extents are flips
    pub source: RectF,
}

/// Find the visible destination rectangle of an image and its source region
///
/// Returns `None` when nothing of the image is inside `client`.
///
/// # Errors
///
/// Returns an error if `cumulative` cannot be inverted.
pub fn calculate_visible_rectangles(
    image: &ImageGraphic,
    cumulative: &Matrix,
    client: Rect,
) -> Result<Option<VisibleRectangles>> {
    let bounds = RectF::new(0.0, 0.0, image.columns() as f32, image.rows() as f32);
    let destination_bounds = cumulative.transform_rect(&bounds).round_inflate();
    let Some(destination) = destination_bounds.intersect(&client) else {
        return Ok(None);
    };
    if destination.is_empty() {
        return Ok(None);
    }

    // Inverse-mapped corners keep their orientation, so flips come out
    // as negative extents and a swapped transform walks source x along
    // destination rows.
    let inverse = cumulative.invert()?;
    let top_left =
        inverse.transform_point(PointF::new(destination.x as f32, destination.y as f32));
    let bottom_right = inverse.transform_point(PointF::new(
        destination.right() as f32,
        destination.bottom() as f32,
    ));
    Ok(Some(VisibleRectangles {
        destination,
        source: RectF::from_points(top_left, bottom_right),
    }))
}

/// Build the LUT that takes stored gray values to 0..=255
fn grayscale_output_lut(image: &ImageGraphic, settings: &GrayscaleSettings) -> Result<OutputLut> {
    let bits = image.bits_stored();
    let signed = image.is_signed();
    let modality = ModalityLut::new(
        bits,
        signed,
        settings.rescale_slope,
        settings.rescale_intercept,
    )?;
    Ok(LutComposer::new(bits, signed)?
        .with_modality(modality)
        .with_voi(settings.voi)
        .output_lut(0, 255)?)
}

/// Build the per-channel LUT of a color image, when enabled
fn color_output_lut(settings: &ColorSettings) -> Result<Option<OutputLut>> {
    if !settings.voi_lut_enabled {
        return Ok(None);
    }
    let lut = LutComposer::new(8, false)?
        .with_voi(settings.voi)
        .output_lut(0, 255)?;
    Ok(Some(lut))
}

/// Draw `image` into `dst` through `cumulative`, clipped to `client`
///
/// # Errors
///
/// Returns [`Error::UnsupportedRotation`] for transforms that are not
/// axis aligned, and propagates pixel data and LUT errors.
pub fn render(
    image: &ImageGraphic,
    cumulative: &Matrix,
    dst: &mut PixelBuffer,
    client: Rect,
) -> Result<()> {
    if image.pixel_data().len() != image.expected_len() {
        return Err(TransformError::BufferSizeMismatch {
            expected: image.expected_len(),
            actual: image.pixel_data().len(),
        }
        .into());
    }
    if !cumulative.is_axis_aligned() {
        return Err(Error::UnsupportedRotation(*cumulative));
    }
    let Some(visible) = calculate_visible_rectangles(image, cumulative, client)? else {
        return Ok(());
    };

    let src = SourcePixels::new(
        image.pixel_data(),
        image.columns(),
        image.rows(),
        image.pixel_format(),
    )?;
    let (width, height) = (dst.width(), dst.height());
    let mut dst = DestinationPixels::new(dst.as_bytes_mut(), width, height, 4)?;
    let swap_xy = cumulative.swaps_axes();

    match image.kind() {
        ImageKind::Grayscale(settings) => {
            let output = grayscale_output_lut(image, settings)?;
            with_flattened_lut(&output, Some(&settings.color_map), settings.invert, |lut| {
                interpolate_bilinear(
                    &src,
                    visible.source,
                    &mut dst,
                    visible.destination,
                    swap_xy,
                    Some(LutRef {
                        data: lut,
                        first_mapped_value: output.min_input(),
                    }),
                )
            })?;
        }
        ImageKind::Color(settings) => match color_output_lut(settings)? {
            Some(output) => {
                with_flattened_lut(&output, None, false, |lut| {
                    interpolate_bilinear(
                        &src,
                        visible.source,
                        &mut dst,
                        visible.destination,
                        swap_xy,
                        Some(LutRef {
                            data: lut,
                            first_mapped_value: output.min_input(),
                        }),
                    )
                })?;
            }
            None => {
                interpolate_bilinear(
                    &src,
                    visible.source,
                    &mut dst,
                    visible.destination,
                    swap_xy,
                    None,
                )?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixview_core::color;
    use pixview_transform::SpatialTransform;

    fn block() -> ImageGraphic {
        ImageGraphic::grayscale8(2, 2, vec![10, 20, 30, 40]).unwrap()
    }

    fn grays(buf: &PixelBuffer) -> Vec<u8> {
        (0..buf.height())
            .flat_map(|y| (0..buf.width()).map(move |x| (x, y)))
            .map(|(x, y)| color::blue(buf.get_pixel(x, y).unwrap_or(0)))
            .collect()
    }

    fn draw(image: &ImageGraphic, transform: &Matrix, w: i32, h: i32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        render(image, transform, &mut buf, Rect::from_size(w, h)).unwrap();
        buf
    }

    #[test]
    fn test_identity_end_to_end() {
        let buf = draw(&block(), &Matrix::IDENTITY, 2, 2);
        assert_eq!(grays(&buf), vec![10, 20, 30, 40]);
        assert_eq!(color::alpha(buf.get_pixel(0, 0).unwrap()), 255);
    }

    #[test]
    fn test_half_scale_averages() {
        let buf = draw(&block(), &Matrix::scaling(0.5, 0.5), 1, 1);
        assert_eq!(grays(&buf), vec![25]);
    }

    #[test]
    fn test_flip_and_rotation() {
        let mut flip = SpatialTransform::new().with_center_of_rotation(PointF::new(1.0, 1.0));
        flip.set_flip_horizontal(true);
        let buf = draw(&block(), &flip.matrix(), 2, 2);
        assert_eq!(grays(&buf), vec![20, 10, 40, 30]);

        let rotate = SpatialTransform::new()
            .with_rotation(90)
            .with_center_of_rotation(PointF::new(1.0, 1.0));
        let buf = draw(&block(), &rotate.matrix(), 2, 2);
        assert_eq!(grays(&buf), vec![30, 10, 40, 20]);
    }

    #[test]
    fn test_invert() {
        let image =
            block().with_grayscale_settings(GrayscaleSettings::default().with_invert(true));
        let buf = draw(&image, &Matrix::IDENTITY, 2, 2);
        assert_eq!(grays(&buf), vec![245, 235, 225, 215]);
    }

    #[test]
    fn test_visible_rectangles() {
        let image = block();
        let client = Rect::from_size(2, 2);
        let v = calculate_visible_rectangles(&image, &Matrix::translation(1.0, 0.0), client)
            .unwrap()
            .unwrap();
        assert_eq!(v.destination, Rect::new(1, 0, 1, 2));
        assert_eq!(v.source, RectF::new(0.0, 0.0, 1.0, 2.0));

        let off =
            calculate_visible_rectangles(&image, &Matrix::translation(5.0, 0.0), client).unwrap();
        assert!(off.is_none());
    }

    #[test]
    fn test_unsupported_rotation() {
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        let r = render(&block(), &Matrix::rotation(45.0), &mut buf, Rect::from_size(2, 2));
        assert!(matches!(r, Err(Error::UnsupportedRotation(_))));
    }

    #[test]
    fn test_color_image_without_lut() {
        // B, G, R, A
        let image = ImageGraphic::color(1, 1, false, vec![1, 2, 3, 255]).unwrap();
        let buf = draw(&image, &Matrix::IDENTITY, 1, 1);
        assert_eq!(buf.get_pixel(0, 0), Some(0xFF030201));
    }
}
