//! Rasterization of the built-in vector assets.
//!
//! Assets are parsed with usvg, drawn into a tiny_skia pixmap sized to the
//! requested edge length, and handed back as straight-alpha [`RgbaImage`]s.

use image::{Rgba, RgbaImage};
use palette::Srgb;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::config::format_hex_color;

/// Paint attributes rewritten when tinting.
const PAINT_ATTRS: [&str; 2] = ["fill", "stroke"];

/// Renders `svg` so that its larger side is `size` pixels.
///
/// Returns `None` if the document does not parse or `size` is zero.
pub fn render_svg(svg: &str, size: u32) -> Option<RgbaImage> {
    let tree = Tree::from_str(svg, &Options::default()).ok()?;

    let bounds = tree.size();
    let scale = size as f32 / bounds.width().max(bounds.height());
    let mut pixmap = Pixmap::new(
        (bounds.width() * scale).ceil() as u32,
        (bounds.height() * scale).ceil() as u32,
    )?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Some(to_straight_alpha(&pixmap))
}

/// Renders a monochrome `svg` with every paint replaced by `tint`.
pub fn render_svg_tinted(svg: &str, size: u32, tint: Srgb<u8>) -> Option<RgbaImage> {
    render_svg(&tint_paints(svg, &format_hex_color(tint)), size)
}

/// Rewrites every `fill="…"` and `stroke="…"` value to `color`, leaving
/// `none` and `transparent` alone.
fn tint_paints(svg: &str, color: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;

    while let Some((attr_end, value_len)) = next_paint(rest) {
        let value = &rest[attr_end..attr_end + value_len];
        out.push_str(&rest[..attr_end]);
        out.push_str(if matches!(value, "none" | "transparent") { value } else { color });
        rest = &rest[attr_end + value_len..];
    }

    out.push_str(rest);
    out
}

/// Finds the earliest paint attribute in `s`. Returns the offset just past
/// its opening quote and the length of its value.
fn next_paint(s: &str) -> Option<(usize, usize)> {
    PAINT_ATTRS
        .iter()
        .filter_map(|attr| {
            let prefix = format!("{attr}=\"");
            let start = s.find(&prefix)? + prefix.len();
            let len = s[start..].find('"')?;
            Some((start, len))
        })
        .min_by_key(|&(start, _)| start)
}

// tiny_skia stores premultiplied alpha.
fn to_straight_alpha(pixmap: &Pixmap) -> RgbaImage {
    RgbaImage::from_fn(pixmap.width(), pixmap.height(), |x, y| {
        let Some(p) = pixmap.pixel(x, y) else {
            return Rgba([0, 0, 0, 0]);
        };
        let c = p.demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}
