use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::error::ComposeError;
use super::model::{Bitmap, Settings};

/// Largest accepted image scale factor.
pub const MAX_SCALE: f64 = 16.0;

/// Largest accepted output width or height, in pixels.
pub const MAX_OUTPUT_SIDE: u32 = 32_768;

/// Largest accepted output area (1 GiB of RGBA).
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Placement of the two (already scaled, already ordered) images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// Top-left corner of the image drawn on the left.
    pub first: (u32, u32),
    /// Top-left corner of the image drawn on the right.
    pub second: (u32, u32),
}

/// Abut two images horizontally, each centred vertically in the taller row.
pub fn plan(first: (u32, u32), second: (u32, u32)) -> Result<Layout, ComposeError> {
    let width = u64::from(first.0) + u64::from(second.0);
    let height = u64::from(first.1.max(second.1));
    let max_side = u64::from(MAX_OUTPUT_SIDE);
    if width > max_side || height > max_side || width * height > MAX_OUTPUT_PIXELS {
        return Err(ComposeError::TooLarge { width, height });
    }

    // Both fit in MAX_OUTPUT_SIDE, so the narrowing is lossless.
    let width = width as u32;
    let height = height as u32;
    Ok(Layout {
        width,
        height,
        first: (0, (height - first.1) / 2),
        second: (first.0, (height - second.1) / 2),
    })
}

// ---------------------------------------------------------------------------
// Scaling
// ---------------------------------------------------------------------------

pub fn validate_scale(scale: f64) -> Result<f64, ComposeError> {
    if scale.is_finite() && scale > 0.0 && scale <= MAX_SCALE {
        Ok(scale)
    } else {
        Err(ComposeError::InvalidScale {
            scale,
            max: MAX_SCALE,
        })
    }
}

/// `round(len * scale)`, never collapsing to zero pixels.
pub fn scaled_dimension(len: u32, scale: f64) -> u32 {
    (f64::from(len) * scale).round().max(1.0) as u32
}

fn scaled_size((w, h): (u32, u32), scale: f64) -> (u32, u32) {
    (scaled_dimension(w, scale), scaled_dimension(h, scale))
}

/// Nearest-neighbour copy at `scale`; borrows the input when `scale` is 1.
fn rescale(image: &RgbaImage, scale: f64) -> Cow<'_, RgbaImage> {
    if scale == 1.0 {
        return Cow::Borrowed(image);
    }
    let (w, h) = scaled_size(image.dimensions(), scale);
    Cow::Owned(imageops::resize(image, w, h, FilterType::Nearest))
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

/// Build the side-by-side stereograph.
///
/// Both images are scaled by `settings.scale` (no smoothing), optionally
/// swapped, then copied onto a transparent canvas without blending.
pub fn compose(
    left: &Bitmap,
    right: &Bitmap,
    settings: &Settings,
) -> Result<RgbaImage, ComposeError> {
    let scale = validate_scale(settings.scale)?;

    let mut ordered = [left.as_image(), right.as_image()];
    if settings.flip {
        ordered.swap(0, 1);
    }

    // Size check happens before any resampling allocates.
    let layout = plan(
        scaled_size(ordered[0].dimensions(), scale),
        scaled_size(ordered[1].dimensions(), scale),
    )?;

    let mut canvas = RgbaImage::new(layout.width, layout.height);
    for (image, (x, y)) in ordered.into_iter().zip([layout.first, layout.second]) {
        let placed = rescale(image, scale);
        imageops::replace(&mut canvas, &*placed, i64::from(x), i64::from(y));
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn solid(w: u32, h: u32, color: Rgba<u8>) -> Bitmap {
        Bitmap::new(RgbaImage::from_pixel(w, h, color))
    }

    /// Image with a distinct value in every pixel.
    fn gradient(w: u32, h: u32) -> Bitmap {
        Bitmap::new(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x * 7 + y * 13) % 256) as u8, 255])
        }))
    }

    fn settings(scale: f64, flip: bool) -> Settings {
        Settings { scale, flip }
    }

    #[test]
    fn output_size_is_sum_of_widths_and_max_height() {
        let out = compose(&solid(30, 40, RED), &solid(50, 25, BLUE), &Settings::default());
        let out = out.unwrap();
        assert_eq!(out.dimensions(), (80, 40));
    }

    #[test]
    fn equal_heights_place_images_side_by_side() {
        let out = compose(&solid(100, 200, RED), &solid(150, 200, BLUE), &Settings::default());
        let out = out.unwrap();
        assert_eq!(out.dimensions(), (250, 200));
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(99, 199), RED);
        assert_eq!(*out.get_pixel(100, 0), BLUE);
        assert_eq!(*out.get_pixel(249, 199), BLUE);
    }

    #[test]
    fn flip_puts_right_image_first() {
        let out = compose(&solid(100, 200, RED), &solid(150, 200, BLUE), &settings(1.0, true));
        let out = out.unwrap();
        assert_eq!(out.dimensions(), (250, 200));
        assert_eq!(*out.get_pixel(0, 0), BLUE);
        assert_eq!(*out.get_pixel(149, 0), BLUE);
        assert_eq!(*out.get_pixel(150, 0), RED);
        assert_eq!(*out.get_pixel(249, 199), RED);
    }

    #[test]
    fn flip_keeps_output_dimensions() {
        let left = solid(37, 12, RED);
        let right = solid(5, 64, BLUE);
        let plain = compose(&left, &right, &settings(1.0, false)).unwrap();
        let flipped = compose(&left, &right, &settings(1.0, true)).unwrap();
        assert_eq!(plain.dimensions(), flipped.dimensions());
    }

    #[test]
    fn unit_scale_copies_pixels_exactly() {
        let left = gradient(17, 9);
        let right = gradient(11, 9);
        let out = compose(&left, &right, &Settings::default()).unwrap();

        let left_view = out.view(0, 0, 17, 9).to_image();
        let right_view = out.view(17, 0, 11, 9).to_image();
        assert_eq!(left_view.as_raw(), left.as_image().as_raw());
        assert_eq!(right_view.as_raw(), right.as_image().as_raw());
    }

    #[test]
    fn half_scale_halves_and_centres_image() {
        // Left 100x200 → 50x100, right 300x400 → 150x200.
        let out = compose(&solid(100, 200, RED), &solid(300, 400, BLUE), &settings(0.5, false));
        let out = out.unwrap();
        assert_eq!(out.dimensions(), (200, 200));

        // Left image occupies rows 50..150 of columns 0..50.
        assert_eq!(*out.get_pixel(0, 49), CLEAR);
        assert_eq!(*out.get_pixel(0, 50), RED);
        assert_eq!(*out.get_pixel(49, 149), RED);
        assert_eq!(*out.get_pixel(0, 150), CLEAR);
        assert_eq!(*out.get_pixel(50, 0), BLUE);
    }

    #[test]
    fn scaled_size_rounds() {
        assert_eq!(scaled_dimension(100, 0.5), 50);
        assert_eq!(scaled_dimension(3, 0.5), 2);
        assert_eq!(scaled_dimension(10, 1.26), 13);
        assert_eq!(scaled_dimension(1, 0.1), 1);
    }

    #[test]
    fn upscale_uses_nearest_neighbour() {
        let mut img = RgbaImage::from_pixel(2, 1, RED);
        img.put_pixel(1, 0, BLUE);
        let out = compose(&Bitmap::new(img), &solid(1, 1, RED), &settings(2.0, false)).unwrap();

        assert_eq!(out.dimensions(), (6, 2));
        // No intermediate colours at the red/blue edge.
        for y in 0..2 {
            assert_eq!(*out.get_pixel(0, y), RED);
            assert_eq!(*out.get_pixel(1, y), RED);
            assert_eq!(*out.get_pixel(2, y), BLUE);
            assert_eq!(*out.get_pixel(3, y), BLUE);
        }
    }

    #[test]
    fn shorter_image_margins_are_balanced() {
        for (tall, short) in [(200, 100), (200, 99), (7, 2)] {
            let layout = plan((10, short), (10, tall)).unwrap();
            let top = layout.first.1;
            let bottom = layout.height - short - top;
            assert!(top.abs_diff(bottom) <= 1, "top {top} bottom {bottom}");
        }
    }

    #[test]
    fn plan_places_second_after_first() {
        let layout = plan((100, 200), (150, 200)).unwrap();
        assert_eq!(
            layout,
            Layout {
                width: 250,
                height: 200,
                first: (0, 0),
                second: (100, 0),
            }
        );
    }

    #[test]
    fn repeated_compose_is_identical() {
        let left = gradient(23, 31);
        let right = gradient(19, 40);
        let s = settings(0.75, true);
        let a = compose(&left, &right, &s).unwrap();
        let b = compose(&left, &right, &s).unwrap();
        assert_eq!(a.dimensions(), b.dimensions());
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn non_positive_and_non_finite_scales_are_rejected() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY, MAX_SCALE + 0.1] {
            let result = compose(&solid(2, 2, RED), &solid(2, 2, BLUE), &settings(scale, false));
            assert!(
                matches!(result, Err(ComposeError::InvalidScale { .. })),
                "scale {scale} accepted"
            );
        }
    }

    #[test]
    fn oversized_output_is_rejected() {
        let result = plan((MAX_OUTPUT_SIDE, 10), (1, 10));
        assert!(matches!(result, Err(ComposeError::TooLarge { .. })));
        assert!(plan((MAX_OUTPUT_SIDE - 1, 10), (1, 10)).is_ok());
    }

    #[test]
    fn output_area_is_capped_even_when_sides_fit() {
        // Two 2048x4096 photos at scale 8: each side fits, the area does not.
        let result = plan((16_384, 32_768), (16_384, 32_768));
        assert!(matches!(
            result,
            Err(ComposeError::TooLarge {
                width: 32_768,
                height: 32_768
            })
        ));
        assert!(plan((8_192, 16_384), (8_192, 16_384)).is_ok());
    }

    #[test]
    fn oversized_area_is_rejected_by_compose() {
        let s = settings(16.0, false);
        let result = compose(&solid(1_000, 1_000, RED), &solid(1_000, 1_000, BLUE), &s);
        assert!(matches!(result, Err(ComposeError::TooLarge { .. })));
    }

    #[test]
    fn oversized_scale_result_is_rejected_before_resampling() {
        let s = settings(8.0, false);
        let result = compose(&solid(4_000, 10, RED), &solid(4_000, 10, BLUE), &s);
        assert!(matches!(result, Err(ComposeError::TooLarge { width: 64_000, .. })));
    }
}
