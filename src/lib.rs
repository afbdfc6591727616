//! station-badge: icon and accent rendering for station badges
//!
//! This crate turns decoded station images into square home-screen icons,
//! derives an accent color from them, and draws the swipe-to-reveal
//! backgrounds of station list rows. It never decodes files or touches the
//! network: callers hand in decoded [`RasterImage`]s, typically through an
//! [`ImageLoader`].
//!
//! # Example
//!
//! ```
//! use station_badge::{
//!     compose_icon, extract_accent_color, Background, IconSizeProfile, RasterImage,
//! };
//! use image::Rgba;
//!
//! let station = RasterImage::from_pixel(400, 100, Rgba([30, 90, 200, 255]));
//!
//! let accent = extract_accent_color(&station);
//! let icon = compose_icon(&station, Background::Solid(accent.rgb()), IconSizeProfile::Legacy, 96).unwrap();
//!
//! assert_eq!((icon.width(), icon.height()), (96, 96));
//! ```
//!
//! # Swipe Overlays
//!
//! ```
//! use station_badge::{BadgeConfig, DrawOp, OverlayState, RectPx, SwipeOverlay};
//!
//! let delete = SwipeOverlay::delete(&BadgeConfig::default(), 1.0).unwrap();
//! let row = RectPx::new(0, 0, 400, 120);
//!
//! let ops = delete.plan(&OverlayState::new(-80.0, row, true));
//! assert!(matches!(ops[0], DrawOp::Fill { rect, .. } if rect == RectPx::new(320, 0, 80, 120)));
//! ```

mod accent;
mod assets;
mod canvas;
mod compositor;
mod config;
mod error;
mod geometry;
mod icon;
mod renderer;
mod shortcut;
mod svg;
mod swipe;

pub use accent::{
    AccentColor, MAX_SWATCHES, Swatch, SwatchCandidate, SwatchRank, analyze_palette, choose_accent,
    extract_accent_color, extract_accent_color_with, probe_image, quantize, rank_swatches,
};
pub use assets::{action_icon_size, default_station_image, default_station_image_png, delete_icon, star_icon};
pub use canvas::{alpha_blend, clear_rect, composite_over, composite_over_clipped, draw_transformed, fill_rect, sample_bilinear};
pub use compositor::{Background, IconSizeProfile, compose_icon, compose_icon_with, icon_size_for};
pub use config::{
    BadgeConfig, DEFAULT_ACCENT_COLOR, DEFAULT_BACKGROUND_COLOR, format_hex_color, parse_hex_color,
};
pub use error::{RenderError, RenderResult};
pub use geometry::{RectF, TransformMatrix, compute_fit_transform};
pub use icon::{RasterImage, RectPx, SizePx};
pub use renderer::{BadgeRenderer, Configurable};
pub use shortcut::{ImageLoader, accent_color_from, resolve_source, shortcut_icon, unavailable};
pub use swipe::{DrawOp, GesturePhase, ItemCategory, MovementFlags, OverlayState, RevealDirection, SwipeOverlay};
