//! Square icon composition.
//!
//! A source image of any aspect ratio is scaled (never cropped) onto an
//! opaque square background. Adaptive icons keep the source inside the
//! mask-safe center of the square; legacy icons let it touch the edges.

use image::{Rgba, RgbaImage};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::canvas::draw_transformed;
use crate::config::BadgeConfig;
use crate::error::{RenderError, RenderResult};
use crate::geometry::compute_fit_transform;
use crate::icon::RasterImage;

// ============================================================================
// IconSizeProfile
// ============================================================================

/// Platform icon tier. Which one applies is decided by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum IconSizeProfile {
    /// Padded square whose content stays inside the mask-safe center.
    Adaptive,
    /// Unpadded square.
    Legacy,
}

impl IconSizeProfile {
    /// Logical edge length of this tier, before density scaling.
    pub fn base_size(self, config: &BadgeConfig) -> u32 {
        match self {
            Self::Adaptive => config.adaptive_base_size,
            Self::Legacy => config.legacy_base_size,
        }
    }

    /// Padding applied on each side of a `size` pixel icon.
    pub fn padding(self, size: u32, config: &BadgeConfig) -> f32 {
        match self {
            Self::Adaptive => size as f32 * config.adaptive_padding_fraction,
            Self::Legacy => 0.0,
        }
    }
}

/// Returns the pixel size of an icon for the given tier and display density.
///
/// The fractional part of `base × density` is dropped.
pub fn icon_size_for(profile: IconSizeProfile, density: f32, config: &BadgeConfig) -> RenderResult<u32> {
    if !density.is_finite() || density <= 0.0 {
        return Err(RenderError::InvalidDensity(density));
    }
    Ok((profile.base_size(config) as f32 * density) as u32)
}

// ============================================================================
// Background
// ============================================================================

/// Fill color behind the composited source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    /// No color chosen; the configured neutral gray is used.
    #[default]
    Unspecified,
    /// An explicit opaque color.
    Solid(Srgb<u8>),
}

impl Background {
    /// Resolves to an opaque pixel, substituting the configured default.
    pub fn resolve(self, config: &BadgeConfig) -> Rgba<u8> {
        let color = match self {
            Self::Unspecified => config.default_background_color,
            Self::Solid(color) => color,
        };
        Rgba([color.red, color.green, color.blue, 255])
    }
}

impl From<Srgb<u8>> for Background {
    fn from(color: Srgb<u8>) -> Self {
        Self::Solid(color)
    }
}

impl From<Option<Srgb<u8>>> for Background {
    fn from(color: Option<Srgb<u8>>) -> Self {
        color.map_or(Self::Unspecified, Self::Solid)
    }
}

// ============================================================================
// Composition
// ============================================================================

/// Composes `source` onto a `size × size` square using the default
/// configuration.
///
/// See [`compose_icon_with`].
pub fn compose_icon(
    source: &RasterImage,
    background: Background,
    profile: IconSizeProfile,
    size: u32,
) -> RenderResult<RasterImage> {
    compose_icon_with(&BadgeConfig::default(), source, background, profile, size)
}

/// Composes `source` onto a `size × size` opaque square.
///
/// The square is filled with `background`, then the source is drawn through
/// the fit transform for `profile` with bilinear filtering. The result is
/// always exactly `size × size` and fully opaque.
///
/// `source` must already be resolved: substituting a placeholder for an
/// unavailable image is the caller's job.
///
/// # Errors
///
/// [`RenderError::InvalidGeometryInput`] if `size` or a source dimension is
/// zero.
pub fn compose_icon_with(
    config: &BadgeConfig,
    source: &RasterImage,
    background: Background,
    profile: IconSizeProfile,
    size: u32,
) -> RenderResult<RasterImage> {
    let padding = profile.padding(size, config);
    let transform = compute_fit_transform(size, padding, source.width(), source.height())?;

    debug!(
        ?profile,
        size,
        source_width = source.width(),
        source_height = source.height(),
        "Composing icon"
    );

    let mut output = RgbaImage::from_pixel(size, size, background.resolve(config));
    draw_transformed(&mut output, source.as_rgba(), &transform);

    trace!(size, scale = transform.scale, "compositor::compose");
    Ok(RasterImage::new(output))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GRAY: [u8; 4] = [0x59, 0x59, 0x59, 255];

    fn solid(width: u32, height: u32, pixel: Rgba<u8>) -> RasterImage {
        RasterImage::from_pixel(width, height, pixel)
    }

    #[test]
    fn icon_sizes_follow_density() {
        let config = BadgeConfig::default();
        assert_eq!(icon_size_for(IconSizeProfile::Adaptive, 2.0, &config).unwrap(), 216);
        assert_eq!(icon_size_for(IconSizeProfile::Legacy, 1.0, &config).unwrap(), 48);
        assert_eq!(icon_size_for(IconSizeProfile::Legacy, 2.625, &config).unwrap(), 126);
        assert!(matches!(
            icon_size_for(IconSizeProfile::Adaptive, 0.0, &config),
            Err(RenderError::InvalidDensity(_))
        ));
        assert!(icon_size_for(IconSizeProfile::Adaptive, f32::INFINITY, &config).is_err());
    }

    #[test]
    fn output_is_square_for_any_aspect_ratio() {
        let landscape = solid(400, 100, RED);
        let portrait = solid(100, 400, RED);
        for profile in [IconSizeProfile::Adaptive, IconSizeProfile::Legacy] {
            for source in [&landscape, &portrait] {
                let icon = compose_icon(source, Background::Unspecified, profile, 256).unwrap();
                assert_eq!(icon.width(), 256);
                assert_eq!(icon.height(), 256);
            }
        }
    }

    #[test]
    fn adaptive_square_source_occupies_center_half() {
        let source = solid(200, 200, RED);
        let icon = compose_icon(&source, Background::Unspecified, IconSizeProfile::Adaptive, 216).unwrap();

        assert_eq!(icon.width(), 216);
        assert_eq!(icon.height(), 216);
        for y in 0..216 {
            for x in 0..216 {
                let inside = (54..162).contains(&x) && (54..162).contains(&y);
                let expected = if inside { RED.0 } else { GRAY };
                assert_eq!(icon.pixel(x, y).0, expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn legacy_landscape_touches_side_edges() {
        let source = solid(400, 100, RED);
        let icon = compose_icon(&source, Background::Unspecified, IconSizeProfile::Legacy, 256).unwrap();

        // 400x100 scales to 256x64, centered at rows 96..160
        assert_eq!(icon.pixel(0, 128).0, RED.0);
        assert_eq!(icon.pixel(255, 128).0, RED.0);
        assert_eq!(icon.pixel(128, 95).0, GRAY);
        assert_eq!(icon.pixel(128, 96).0, RED.0);
        assert_eq!(icon.pixel(128, 159).0, RED.0);
        assert_eq!(icon.pixel(128, 160).0, GRAY);
    }

    #[test]
    fn portrait_is_centered_horizontally() {
        let source = solid(100, 400, RED);
        let icon = compose_icon(&source, Background::Unspecified, IconSizeProfile::Legacy, 256).unwrap();

        // 100x400 scales to 64x256, centered at columns 96..160
        assert_eq!(icon.pixel(95, 0).0, GRAY);
        assert_eq!(icon.pixel(96, 0).0, RED.0);
        assert_eq!(icon.pixel(159, 255).0, RED.0);
        assert_eq!(icon.pixel(160, 255).0, GRAY);
    }

    #[test]
    fn explicit_background_and_transparent_source() {
        let source = solid(10, 10, Rgba([0, 0, 0, 0]));
        let background = Background::Solid(Srgb::new(10, 20, 30));
        let icon = compose_icon(&source, background, IconSizeProfile::Adaptive, 64).unwrap();

        assert!(icon.as_rgba().pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn output_is_always_opaque() {
        let mut data = RgbaImage::new(33, 17);
        for (x, y, p) in data.enumerate_pixels_mut() {
            *p = Rgba([(x * 7) as u8, (y * 13) as u8, 90, ((x + y) * 5) as u8]);
        }
        let icon = compose_icon(&RasterImage::new(data), Background::Unspecified, IconSizeProfile::Adaptive, 97)
            .unwrap();
        assert!(icon.as_rgba().pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn composition_is_idempotent() {
        let mut data = RgbaImage::new(37, 23);
        for (x, y, p) in data.enumerate_pixels_mut() {
            *p = Rgba([(x * 6) as u8, (y * 11) as u8, ((x ^ y) * 3) as u8, 255]);
        }
        let source = RasterImage::new(data);
        let first = compose_icon(&source, Background::Unspecified, IconSizeProfile::Adaptive, 150).unwrap();
        let second = compose_icon(&source, Background::Unspecified, IconSizeProfile::Adaptive, 150).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn background_conversions() {
        assert_eq!(Background::from(None::<Srgb<u8>>), Background::Unspecified);
        assert_eq!(
            Background::from(Some(Srgb::new(1, 2, 3))),
            Background::Solid(Srgb::new(1, 2, 3))
        );
        let config = BadgeConfig::default();
        assert_eq!(Background::Unspecified.resolve(&config).0, GRAY);
    }

    #[test]
    fn zero_size_is_rejected() {
        let source = solid(10, 10, RED);
        assert!(matches!(
            compose_icon(&source, Background::Unspecified, IconSizeProfile::Legacy, 0),
            Err(RenderError::InvalidGeometryInput(_))
        ));
        let empty = RasterImage::new(RgbaImage::new(0, 0));
        assert!(compose_icon(&empty, Background::Unspecified, IconSizeProfile::Legacy, 48).is_err());
    }
}
