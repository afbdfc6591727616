//! Image acquisition seam and the shortcut icon pipeline built on it.
//!
//! Loading and decoding belong to the caller. An [`ImageLoader`] hands the
//! core a decoded buffer, or fails with [`RenderError::ImageUnavailable`].
//! The helpers here turn such a failure into the built-in placeholder
//! (icons) or the default accent (colors), then run the pure core.
//!
//! Both helpers block; run them off any UI thread.

use tracing::{debug, warn};

use crate::accent::{AccentColor, extract_accent_color_with};
use crate::assets::default_station_image;
use crate::compositor::{Background, IconSizeProfile, compose_icon_with, icon_size_for};
use crate::config::BadgeConfig;
use crate::error::{RenderError, RenderResult};
use crate::icon::RasterImage;

/// Source of decoded station images.
pub trait ImageLoader {
    /// Loads `reference`, scaled to fit within `width × height`.
    fn load(&self, reference: &str, width: u32, height: u32) -> RenderResult<RasterImage>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str, u32, u32) -> RenderResult<RasterImage>,
{
    fn load(&self, reference: &str, width: u32, height: u32) -> RenderResult<RasterImage> {
        self(reference, width, height)
    }
}

/// Loads `reference` at `size`, substituting the placeholder station image
/// when the loader fails or yields an empty buffer.
pub fn resolve_source<L: ImageLoader + ?Sized>(loader: &L, reference: &str, size: u32) -> RenderResult<RasterImage> {
    match loader.load(reference, size, size) {
        Ok(image) if !image.is_empty() => Ok(image),
        Ok(_) => {
            warn!(reference, "Loader returned an empty image, using placeholder");
            default_station_image(size)
        }
        Err(err) => {
            warn!(reference, error = %err, "Station image unavailable, using placeholder");
            default_station_image(size)
        }
    }
}

/// Builds a home-screen shortcut icon for a station.
///
/// The icon size comes from `profile` and `density`; the station image is
/// loaded at that size and composed onto `background`.
pub fn shortcut_icon<L: ImageLoader + ?Sized>(
    config: &BadgeConfig,
    loader: &L,
    reference: &str,
    background: Background,
    profile: IconSizeProfile,
    density: f32,
) -> RenderResult<RasterImage> {
    let size = icon_size_for(profile, density, config)?;
    if size == 0 {
        return Err(RenderError::InvalidGeometryInput(format!(
            "density {density} yields a zero-sized icon"
        )));
    }
    let source = resolve_source(loader, reference, size)?;
    compose_icon_with(config, &source, background, profile, size)
}

/// Requests a probe-sized image from `loader` and extracts its accent color.
///
/// Never fails; loader errors yield the configured default accent.
pub fn accent_color_from<L: ImageLoader + ?Sized>(config: &BadgeConfig, loader: &L, reference: &str) -> AccentColor {
    match loader.load(reference, config.probe_size, config.probe_size) {
        Ok(image) => extract_accent_color_with(config, &image),
        Err(err) => {
            debug!(reference, error = %err, "Accent image unavailable, using default");
            AccentColor::new(config.default_accent_color)
        }
    }
}

/// Convenience for loaders: the error to return when a reference cannot be
/// resolved.
pub fn unavailable(reference: &str, reason: impl std::fmt::Display) -> RenderError {
    RenderError::ImageUnavailable(format!("{reference}: {reason}"))
}
