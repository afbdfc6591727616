//! Stateless rendering service bundling a configuration with the core
//! operations.

use crate::accent::{AccentColor, extract_accent_color_with};
use crate::assets::default_station_image_png;
use crate::compositor::{Background, IconSizeProfile, compose_icon_with, icon_size_for};
use crate::config::BadgeConfig;
use crate::error::RenderResult;
use crate::icon::RasterImage;
use crate::shortcut::{ImageLoader, accent_color_from, shortcut_icon};
use crate::swipe::SwipeOverlay;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`BadgeConfig`].
pub trait Configurable {
    /// Replaces the current settings after validating them.
    fn apply_config(&mut self, config: BadgeConfig) -> RenderResult<()>;

    /// Exports the current settings.
    fn export_config(&self) -> BadgeConfig;
}

// ============================================================================
// BadgeRenderer
// ============================================================================

/// Entry point for icon composition, accent extraction and swipe overlays.
///
/// Holds only an immutable configuration, so one renderer can be shared
/// freely across threads; every call allocates its own output.
///
/// # Example
///
/// ```
/// use station_badge::{Background, BadgeRenderer, IconSizeProfile, RasterImage};
/// use image::Rgba;
///
/// let renderer = BadgeRenderer::default();
/// let station = RasterImage::from_pixel(300, 200, Rgba([200, 40, 40, 255]));
///
/// let accent = renderer.accent_color(&station);
/// let size = renderer.icon_size(IconSizeProfile::Adaptive, 2.0).unwrap();
/// let icon = renderer
///     .compose(&station, Background::Solid(accent.rgb()), IconSizeProfile::Adaptive, size)
///     .unwrap();
/// assert_eq!((icon.width(), icon.height()), (216, 216));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BadgeRenderer {
    config: BadgeConfig,
}

impl BadgeRenderer {
    /// Creates a renderer with a validated configuration.
    pub fn new(config: BadgeConfig) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    /// Pixel size of an icon for `profile` at `density`.
    pub fn icon_size(&self, profile: IconSizeProfile, density: f32) -> RenderResult<u32> {
        icon_size_for(profile, density, &self.config)
    }

    /// Composes `source` onto a `size × size` square.
    pub fn compose(
        &self,
        source: &RasterImage,
        background: Background,
        profile: IconSizeProfile,
        size: u32,
    ) -> RenderResult<RasterImage> {
        compose_icon_with(&self.config, source, background, profile, size)
    }

    /// Extracts the accent color of `image`. Never fails.
    pub fn accent_color(&self, image: &RasterImage) -> AccentColor {
        extract_accent_color_with(&self.config, image)
    }

    /// Loads a station image and extracts its accent color. Never fails.
    pub fn accent_color_from<L: ImageLoader + ?Sized>(&self, loader: &L, reference: &str) -> AccentColor {
        accent_color_from(&self.config, loader, reference)
    }

    /// Loads a station image (or the placeholder) and builds its shortcut icon.
    pub fn shortcut_icon<L: ImageLoader + ?Sized>(
        &self,
        loader: &L,
        reference: &str,
        background: Background,
        profile: IconSizeProfile,
        density: f32,
    ) -> RenderResult<RasterImage> {
        shortcut_icon(&self.config, loader, reference, background, profile, density)
    }

    /// The placeholder station image as PNG bytes, at `placeholderSize`.
    pub fn default_station_png(&self) -> RenderResult<Vec<u8>> {
        default_station_image_png(self.config.placeholder_size)
    }

    /// The delete swipe overlay at `density`.
    pub fn delete_overlay(&self, density: f32) -> RenderResult<SwipeOverlay> {
        SwipeOverlay::delete(&self.config, density)
    }

    /// The star swipe overlay at `density`.
    pub fn star_overlay(&self, density: f32) -> RenderResult<SwipeOverlay> {
        SwipeOverlay::star(&self.config, density)
    }
}

impl Configurable for BadgeRenderer {
    fn apply_config(&mut self, config: BadgeConfig) -> RenderResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn export_config(&self) -> BadgeConfig {
        self.config.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
