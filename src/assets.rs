//! Built-in vector assets: the placeholder station image and the swipe
//! action icons.

use std::io::Cursor;

use image::imageops;
use image::{ImageFormat, RgbaImage};
use palette::Srgb;

use crate::config::BadgeConfig;
use crate::error::{RenderError, RenderResult};
use crate::icon::RasterImage;
use crate::svg::{render_svg, render_svg_tinted};

const DEFAULT_STATION_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<rect width="64" height="64" rx="8" fill="#595959"/>
<path fill="#ffffff" d="M14 24h36a4 4 0 0 1 4 4v20a4 4 0 0 1-4 4H14a4 4 0 0 1-4-4V28a4 4 0 0 1 4-4zm4-4 24-8 1.3 3.8L27 20z"/>
<circle cx="22" cy="38" r="7" fill="#595959"/>
<rect x="36" y="32" width="12" height="3" fill="#595959"/>
<rect x="36" y="40" width="12" height="3" fill="#595959"/>
</svg>"##;

const DELETE_ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<path fill-rule="evenodd" fill="#000000" d="M12 2a10 10 0 1 0 0 20a10 10 0 1 0 0-20zM7 11v2h10v-2z"/>
</svg>"##;

const STAR_ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<path fill="#000000" d="M12 2 14.65 8.36 21.51 8.91 16.28 13.39 17.88 20.09 12 16.5 6.12 20.09 7.72 13.39 2.49 8.91 9.35 8.36z"/>
</svg>"##;

/// Renders the placeholder used when a station image cannot be loaded.
pub fn default_station_image(size: u32) -> RenderResult<RasterImage> {
    let image = render_svg(DEFAULT_STATION_SVG, size).ok_or(RenderError::Asset("default station image"))?;
    Ok(RasterImage::new(exact_square(image, size)))
}

/// Renders the placeholder station image and encodes it as PNG.
pub fn default_station_image_png(size: u32) -> RenderResult<Vec<u8>> {
    let image = default_station_image(size)?.into_inner();
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Renders the remove-circle icon shown behind a delete swipe.
pub fn delete_icon(size: u32, tint: Srgb<u8>) -> RenderResult<RasterImage> {
    tinted(DELETE_ICON_SVG, "delete icon", size, tint)
}

/// Renders the star icon shown behind a star swipe.
pub fn star_icon(size: u32, tint: Srgb<u8>) -> RenderResult<RasterImage> {
    tinted(STAR_ICON_SVG, "star icon", size, tint)
}

/// Pixel size of the swipe action icons at the given display density.
pub fn action_icon_size(config: &BadgeConfig, density: f32) -> RenderResult<u32> {
    if !density.is_finite() || density <= 0.0 {
        return Err(RenderError::InvalidDensity(density));
    }
    Ok(((config.overlay_icon_size as f32 * density) as u32).max(1))
}

fn tinted(svg: &str, name: &'static str, size: u32, tint: Srgb<u8>) -> RenderResult<RasterImage> {
    let image = render_svg_tinted(svg, size, tint).ok_or(RenderError::Asset(name))?;
    Ok(RasterImage::new(exact_square(image, size)))
}

// Rounding in the fit scale can leave the pixmap one pixel too large.
fn exact_square(image: RgbaImage, size: u32) -> RgbaImage {
    if image.dimensions() == (size, size) {
        return image;
    }
    let mut out = RgbaImage::new(size, size);
    imageops::overlay(&mut out, &image, 0, 0);
    out
}
