//! Serializable rendering configuration.
//!
//! [`BadgeConfig`] carries every constant that shapes the visual output:
//! icon base sizes, adaptive padding, probe size, fallback colors and the
//! swipe overlay theme. Changing a value changes geometry or color only,
//! never control flow.
//!
//! # Example
//!
//! ```
//! use station_badge::BadgeConfig;
//!
//! let config = BadgeConfig::from_json(r##"{ "probeSize": 96, "primaryColor": "#336699" }"##).unwrap();
//! assert_eq!(config.probe_size, 96);
//! assert_eq!(config.adaptive_base_size, 108);
//!
//! let json = config.to_json().unwrap();
//! assert!(json.contains("\"primaryColor\":\"#336699\""));
//! ```

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Default gray behind icons whose background color is unspecified.
pub const DEFAULT_BACKGROUND_COLOR: Srgb<u8> = Srgb::new(0x59, 0x59, 0x59);

/// Gray returned by the accent extractor when no swatch qualifies.
pub const DEFAULT_ACCENT_COLOR: Srgb<u8> = Srgb::new(0x7d, 0x7d, 0x7d);

// ============================================================================
// BadgeConfig
// ============================================================================

/// All tunable constants of the renderer.
///
/// # JSON Format
///
/// Colors are `#rrggbb` strings; `#aarrggbb` is accepted on input and its
/// alpha discarded. Missing fields take their defaults.
///
/// ```json
/// {
///   "adaptiveBaseSize": 108,
///   "legacyBaseSize": 48,
///   "adaptivePaddingFraction": 0.25,
///   "probeSize": 72,
///   "defaultBackgroundColor": "#595959",
///   "defaultAccentColor": "#7d7d7d"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeConfig {
    /// Logical edge length of adaptive icons, before density scaling.
    pub adaptive_base_size: u32,

    /// Logical edge length of legacy icons, before density scaling.
    pub legacy_base_size: u32,

    /// Padding on each side of an adaptive icon, as a fraction of its size.
    pub adaptive_padding_fraction: f32,

    /// Edge length of the probe image used for palette analysis.
    pub probe_size: u32,

    /// Background used when the caller leaves it unspecified.
    #[serde(with = "hex_color")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub default_background_color: Srgb<u8>,

    /// Accent returned when no swatch qualifies or analysis fails.
    #[serde(with = "hex_color")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub default_accent_color: Srgb<u8>,

    /// Reveal background of the delete (left) swipe.
    #[serde(with = "hex_color")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub destructive_color: Srgb<u8>,

    /// Reveal background of the star (right) swipe.
    #[serde(with = "hex_color")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub primary_color: Srgb<u8>,

    /// Tint of the delete action icon.
    #[serde(with = "hex_color")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub delete_icon_tint: Srgb<u8>,

    /// Tint of the star action icon.
    #[serde(with = "hex_color")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub star_icon_tint: Srgb<u8>,

    /// Logical edge length of the swipe action icons.
    pub overlay_icon_size: u32,

    /// Edge length of the exported placeholder station image.
    pub placeholder_size: u32,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            adaptive_base_size: 108,
            legacy_base_size: 48,
            adaptive_padding_fraction: 0.25,
            probe_size: 72,
            default_background_color: DEFAULT_BACKGROUND_COLOR,
            default_accent_color: DEFAULT_ACCENT_COLOR,
            destructive_color: Srgb::new(0xf9, 0xde, 0xdc),
            primary_color: Srgb::new(0x67, 0x50, 0xa4),
            delete_icon_tint: Srgb::new(0x41, 0x0e, 0x0b),
            star_icon_tint: Srgb::new(0xff, 0xff, 0xff),
            overlay_icon_size: 24,
            placeholder_size: 512,
        }
    }
}

impl BadgeConfig {
    /// Checks that sizes are non-zero and the padding fraction leaves room
    /// for content.
    pub fn validate(&self) -> RenderResult<()> {
        let sizes = [
            ("adaptiveBaseSize", self.adaptive_base_size),
            ("legacyBaseSize", self.legacy_base_size),
            ("probeSize", self.probe_size),
            ("overlayIconSize", self.overlay_icon_size),
            ("placeholderSize", self.placeholder_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| *v == 0) {
            return Err(RenderError::InvalidGeometryInput(format!(
                "{name} must be greater than zero"
            )));
        }
        let fraction = self.adaptive_padding_fraction;
        if !(0.0..0.5).contains(&fraction) {
            return Err(RenderError::InvalidGeometryInput(format!(
                "adaptivePaddingFraction {fraction} must be in [0, 0.5)"
            )));
        }
        Ok(())
    }

    /// Serializes the configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the configuration to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Hex colors
// ============================================================================

/// Parses `#rrggbb` or `#aarrggbb` (alpha is dropped).
pub fn parse_hex_color(s: &str) -> Option<Srgb<u8>> {
    let hex = s
        .strip_prefix('#')
        .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))?;
    let rgb = match hex.len() {
        6 => hex,
        8 => &hex[2..],
        _ => return None,
    };
    let value = u32::from_str_radix(rgb, 16).ok()?;
    Some(Srgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

/// Formats a color as `#rrggbb`.
pub fn format_hex_color(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

mod hex_color {
    use palette::Srgb;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(color: &Srgb<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hex_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Srgb<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hex_color(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid color `{s}`, expected #rrggbb")))
    }
}

// ============================================================================
// Tests
// ============================================================================
