//! Pixel-level drawing primitives shared by the icon compositor and the
//! swipe overlay.
//!
//! All functions draw into a caller-owned [`RgbaImage`] and clip to its
//! bounds, so callers may pass rectangles that extend past the canvas.

use image::{Rgba, RgbaImage};

use crate::geometry::TransformMatrix;
use crate::icon::{RectPx, SizePx};

/// Returns the full bounds of a canvas.
pub fn canvas_rect(canvas: &RgbaImage) -> RectPx {
    RectPx::from_size(canvas.width(), canvas.height())
}

/// Replaces every pixel of `rect` with `color` (no blending).
pub fn fill_rect(canvas: &mut RgbaImage, rect: RectPx, color: Rgba<u8>) {
    let Some(region) = rect.intersect(&canvas_rect(canvas)) else {
        return;
    };
    for y in region.y..region.bottom() {
        for x in region.x..region.right() {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Resets every pixel of `rect` to fully transparent.
pub fn clear_rect(canvas: &mut RgbaImage, rect: RectPx) {
    fill_rect(canvas, rect, Rgba([0, 0, 0, 0]));
}

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination).
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let clip = canvas_rect(dest);
    composite_over_clipped(dest, src, x, y, clip);
}

/// Like [`composite_over`], but only touches pixels inside `clip`.
pub fn composite_over_clipped(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32, clip: RectPx) {
    let placed = RectPx::new(x, y, src.width(), src.height());
    let Some(region) = placed
        .intersect(&clip)
        .and_then(|r| r.intersect(&canvas_rect(dest)))
    else {
        return;
    };

    for dy in region.y..region.bottom() {
        for dx in region.x..region.right() {
            let src_pixel = src.get_pixel((dx - x) as u32, (dy - y) as u32);
            let dst_pixel = dest.get_pixel(dx as u32, dy as u32);
            let blended = alpha_blend(*src_pixel, *dst_pixel);
            dest.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

/// Alpha blends two RGBA pixels (source over destination).
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Bilinearly samples `src` at a continuous pixel-center coordinate.
///
/// Coordinates outside the image are clamped to the nearest edge pixel.
/// Interpolation happens on premultiplied values so transparent neighbours
/// do not bleed their color into the result.
pub fn sample_bilinear(src: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let x = x.clamp(0.0, (w - 1) as f32);
    let y = y.clamp(0.0, (h - 1) as f32);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let taps = [
        (src.get_pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (src.get_pixel(x1, y0), fx * (1.0 - fy)),
        (src.get_pixel(x0, y1), (1.0 - fx) * fy),
        (src.get_pixel(x1, y1), fx * fy),
    ];

    let mut acc = [0.0f32; 4];
    for (pixel, weight) in taps {
        let a = pixel[3] as f32 / 255.0 * weight;
        acc[0] += pixel[0] as f32 * a;
        acc[1] += pixel[1] as f32 * a;
        acc[2] += pixel[2] as f32 * a;
        acc[3] += a;
    }

    if acc[3] <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |v: f32| (v / acc[3]).round().clamp(0.0, 255.0) as u8;
    Rgba([
        channel(acc[0]),
        channel(acc[1]),
        channel(acc[2]),
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Draws `src` onto `dest` through `transform` with bilinear filtering.
///
/// Every destination pixel overlapping the transformed source is sampled
/// once at its center; pixels only partially covered along the edges get
/// their alpha scaled by the covered fraction.
pub fn draw_transformed(dest: &mut RgbaImage, src: &RgbaImage, transform: &TransformMatrix) {
    if src.width() == 0 || src.height() == 0 {
        return;
    }
    let target = transform.destination_rect(SizePx::new(src.width(), src.height()));

    let x_start = target.x.floor().max(0.0) as u32;
    let y_start = target.y.floor().max(0.0) as u32;
    let x_end = (target.right().ceil().max(0.0) as u32).min(dest.width());
    let y_end = (target.bottom().ceil().max(0.0) as u32).min(dest.height());

    for y in y_start..y_end {
        let cover_y = coverage(y, target.y, target.bottom());
        if cover_y <= 0.0 {
            continue;
        }
        for x in x_start..x_end {
            let cover_x = coverage(x, target.x, target.right());
            if cover_x <= 0.0 {
                continue;
            }

            let (sx, sy) = transform.invert_point(x as f32 + 0.5, y as f32 + 0.5);
            let mut sample = sample_bilinear(src, sx - 0.5, sy - 0.5);
            sample[3] = (sample[3] as f32 * cover_x * cover_y).round() as u8;

            let dst_pixel = *dest.get_pixel(x, y);
            dest.put_pixel(x, y, alpha_blend(sample, dst_pixel));
        }
    }
}

/// Fraction of the unit pixel span `[i, i + 1)` that lies inside `[start, end)`.
fn coverage(i: u32, start: f32, end: f32) -> f32 {
    let lo = (i as f32).max(start);
    let hi = (i as f32 + 1.0).min(end);
    (hi - lo).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_simple() {
        // Create a 10x10 red background
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));

        // Create a 4x4 blue overlay
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src, 3, 3);

        assert_eq!(dest.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn composite_with_transparency() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));

        composite_over(&mut dest, &src, 0, 0);

        // The result should be a blend of red and blue
        let pixel = dest.get_pixel(0, 0);
        assert!(pixel[0] > 0, "Should have some red");
        assert!(pixel[2] > 0, "Should have some blue");
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn composite_respects_clip() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255]));

        composite_over_clipped(&mut dest, &src, 2, 2, RectPx::new(5, 0, 10, 10));

        assert_eq!(dest.get_pixel(4, 4).0, [0, 0, 0, 255]);
        assert_eq!(dest.get_pixel(5, 4).0, [255, 255, 255, 255]);
        assert_eq!(dest.get_pixel(7, 7).0, [255, 255, 255, 255]);
        assert_eq!(dest.get_pixel(8, 8).0, [0, 0, 0, 255]);
    }

    #[test]
    fn fill_and_clear_clip_to_canvas() {
        let mut canvas = RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 255]));
        fill_rect(&mut canvas, RectPx::new(-4, -4, 6, 6), Rgba([1, 2, 3, 255]));
        assert_eq!(canvas.get_pixel(1, 1).0, [1, 2, 3, 255]);
        assert_eq!(canvas.get_pixel(2, 2).0, [9, 9, 9, 255]);

        clear_rect(&mut canvas, RectPx::new(6, 6, 100, 100));
        assert_eq!(canvas.get_pixel(7, 7).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(5, 5).0, [9, 9, 9, 255]);
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([200, 100, 50, 255]));

        assert_eq!(sample_bilinear(&src, 0.5, 0.0).0, [100, 50, 25, 255]);
        // Clamped outside the image
        assert_eq!(sample_bilinear(&src, -3.0, 5.0).0, [0, 0, 0, 255]);
        assert_eq!(sample_bilinear(&src, 9.0, 0.0).0, [200, 100, 50, 255]);
    }

    #[test]
    fn bilinear_ignores_color_of_transparent_neighbours() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 0]));
        src.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let pixel = sample_bilinear(&src, 0.5, 0.0);
        assert_eq!(pixel[0], 0);
        assert_eq!(pixel[2], 255);
        assert_eq!(pixel[3], 128);
    }

    #[test]
    fn draw_transformed_covers_exact_region() {
        let mut dest = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(5, 5, Rgba([255, 255, 255, 255]));
        let transform = TransformMatrix {
            scale: 2.0,
            translate_x: 5.0,
            translate_y: 5.0,
        };

        draw_transformed(&mut dest, &src, &transform);

        assert_eq!(dest.get_pixel(4, 10).0, [0, 0, 0, 255]);
        assert_eq!(dest.get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(dest.get_pixel(14, 14).0, [255, 255, 255, 255]);
        assert_eq!(dest.get_pixel(15, 14).0, [0, 0, 0, 255]);
    }

    #[test]
    fn draw_transformed_blends_partial_edges() {
        let mut dest = RgbaImage::from_pixel(4, 1, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let transform = TransformMatrix {
            scale: 2.0,
            translate_x: 0.5,
            translate_y: -0.5,
        };

        draw_transformed(&mut dest, &src, &transform);

        let edge = dest.get_pixel(0, 0);
        assert!(edge[0] > 0 && edge[0] < 255, "half covered pixel is blended");
        assert_eq!(dest.get_pixel(1, 0).0, [255, 255, 255, 255]);
        assert_eq!(dest.get_pixel(3, 0).0, [0, 0, 0, 255]);
    }
}
