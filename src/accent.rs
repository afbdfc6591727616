//! Accent color extraction.
//!
//! An image is center-cropped and downsampled into a small probe, the probe
//! is quantized into at most [`MAX_SWATCHES`] swatches by median cut, and the
//! swatches are ranked against a vibrant and a muted target. The first
//! target that finds a swatch wins; when neither does, or when anything goes
//! wrong, the configured default gray is returned instead.

use std::collections::BTreeMap;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use palette::{Hsl, IntoColor, Srgb};
use tracing::{debug, trace};

use crate::config::{BadgeConfig, DEFAULT_ACCENT_COLOR};
use crate::error::{RenderError, RenderResult};
use crate::icon::RasterImage;

/// Upper bound on the number of swatches produced by quantization.
pub const MAX_SWATCHES: usize = 16;

/// Bits kept per channel when building the color histogram.
const QUANTIZE_BITS: u32 = 5;

// ============================================================================
// AccentColor
// ============================================================================

/// An opaque color representing an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentColor(Srgb<u8>);

impl AccentColor {
    pub fn new(color: Srgb<u8>) -> Self {
        Self(color)
    }

    pub fn rgb(self) -> Srgb<u8> {
        self.0
    }

    /// Returns the color as a fully opaque pixel.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0.red, self.0.green, self.0.blue, 255])
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self(DEFAULT_ACCENT_COLOR)
    }
}

impl From<AccentColor> for Srgb<u8> {
    fn from(color: AccentColor) -> Self {
        color.0
    }
}

// ============================================================================
// Swatches
// ============================================================================

/// Target a swatch was selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwatchRank {
    Vibrant,
    Muted,
}

/// A representative color of a region of the probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub color: Srgb<u8>,
    /// Number of probe pixels this swatch stands for.
    pub population: u32,
    pub hsl: Hsl,
}

impl Swatch {
    fn new(color: Srgb<u8>, population: u32) -> Self {
        let hsl: Hsl = color.into_format::<f32>().into_color();
        Self {
            color,
            population,
            hsl,
        }
    }

    /// Near-black and near-white swatches say nothing about the image.
    fn is_neutral_extreme(&self) -> bool {
        self.hsl.lightness <= 0.05 || self.hsl.lightness >= 0.95
    }
}

/// A swatch tagged with the target that selected it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwatchCandidate {
    pub swatch: Swatch,
    pub rank: SwatchRank,
}

/// Scoring window for one swatch target.
struct Target {
    rank: SwatchRank,
    saturation: (f32, f32, f32),
    lightness: (f32, f32, f32),
}

impl Target {
    const SATURATION_WEIGHT: f32 = 0.24;
    const LIGHTNESS_WEIGHT: f32 = 0.52;
    const POPULATION_WEIGHT: f32 = 0.24;

    /// (min, target, max) for saturation and lightness.
    const VIBRANT: Target = Target {
        rank: SwatchRank::Vibrant,
        saturation: (0.35, 1.0, 1.0),
        lightness: (0.3, 0.5, 0.7),
    };
    const MUTED: Target = Target {
        rank: SwatchRank::Muted,
        saturation: (0.0, 0.3, 0.4),
        lightness: (0.3, 0.5, 0.7),
    };

    fn accepts(&self, swatch: &Swatch) -> bool {
        let (s_min, _, s_max) = self.saturation;
        let (l_min, _, l_max) = self.lightness;
        let s = swatch.hsl.saturation;
        let l = swatch.hsl.lightness;
        (s_min..=s_max).contains(&s) && (l_min..=l_max).contains(&l)
    }

    fn score(&self, swatch: &Swatch, max_population: u32) -> f32 {
        let s = 1.0 - (swatch.hsl.saturation - self.saturation.1).abs();
        let l = 1.0 - (swatch.hsl.lightness - self.lightness.1).abs();
        let p = swatch.population as f32 / max_population.max(1) as f32;
        s * Self::SATURATION_WEIGHT + l * Self::LIGHTNESS_WEIGHT + p * Self::POPULATION_WEIGHT
    }

    /// Picks the best scoring acceptable swatch not already taken.
    fn select<'a>(&self, swatches: &'a [Swatch], taken: &[Swatch]) -> Option<&'a Swatch> {
        let max_population = swatches.iter().map(|s| s.population).max().unwrap_or(1);
        swatches
            .iter()
            .filter(|s| self.accepts(s) && !taken.contains(s))
            .max_by(|a, b| {
                self.score(a, max_population)
                    .total_cmp(&self.score(b, max_population))
            })
    }
}

// ============================================================================
// Probe
// ============================================================================

/// Center-crops `image` to a square and downsamples it to `probe_size`.
pub fn probe_image(image: &RasterImage, probe_size: u32) -> RenderResult<RgbaImage> {
    if image.is_empty() {
        return Err(RenderError::PaletteAnalysis("source image is empty".into()));
    }
    if probe_size == 0 {
        return Err(RenderError::PaletteAnalysis("probe size is zero".into()));
    }

    let (w, h) = (image.width(), image.height());
    let side = w.min(h);
    let cropped = imageops::crop_imm(image.as_rgba(), (w - side) / 2, (h - side) / 2, side, side).to_image();
    Ok(imageops::resize(&cropped, probe_size, probe_size, FilterType::Triangle))
}

// ============================================================================
// Palette analysis
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct HistogramEntry {
    /// Quantized channels, used for box splitting.
    q: [u8; 3],
    count: u32,
    /// Full precision channel sums, so swatch colors stay exact.
    sum: [u64; 3],
}

struct ColorBox {
    entries: Vec<HistogramEntry>,
}

impl ColorBox {
    fn range(&self, channel: usize) -> (u8, u8) {
        self.entries.iter().fold((u8::MAX, u8::MIN), |(lo, hi), e| {
            (lo.min(e.q[channel]), hi.max(e.q[channel]))
        })
    }

    fn volume(&self) -> u32 {
        (0..3)
            .map(|c| {
                let (lo, hi) = self.range(c);
                (hi - lo) as u32 + 1
            })
            .product()
    }

    fn can_split(&self) -> bool {
        self.entries.len() > 1
    }

    fn longest_channel(&self) -> usize {
        (0..3)
            .max_by_key(|&c| {
                let (lo, hi) = self.range(c);
                hi - lo
            })
            .unwrap_or(0)
    }

    /// Splits at the population median along the longest channel.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.longest_channel();
        self.entries.sort_by_key(|e| (e.q[channel], e.q));

        let total: u32 = self.entries.iter().map(|e| e.count).sum();
        let mut running = 0;
        let mut at = self.entries.len() - 1;
        for (i, entry) in self.entries.iter().enumerate() {
            running += entry.count;
            if running >= total / 2 {
                at = i + 1;
                break;
            }
        }
        let at = at.clamp(1, self.entries.len() - 1);

        let upper = self.entries.split_off(at);
        (self, ColorBox { entries: upper })
    }

    fn swatch(&self) -> Swatch {
        let count: u32 = self.entries.iter().map(|e| e.count).sum();
        let mut sum = [0u64; 3];
        for entry in &self.entries {
            for c in 0..3 {
                sum[c] += entry.sum[c];
            }
        }
        let n = count.max(1) as u64;
        let mean = |c: usize| ((sum[c] + n / 2) / n) as u8;
        Swatch::new(Srgb::new(mean(0), mean(1), mean(2)), count)
    }
}

/// Quantizes a probe into at most [`MAX_SWATCHES`] swatches.
///
/// Fully transparent pixels are skipped, as are near-black and near-white
/// results. Partial alpha is ignored: only the color channels count.
/// Fails when the probe contains no usable pixel.
pub fn quantize(probe: &RgbaImage) -> RenderResult<Vec<Swatch>> {
    let shift = 8 - QUANTIZE_BITS;
    let mut histogram: BTreeMap<[u8; 3], HistogramEntry> = BTreeMap::new();

    for pixel in probe.pixels() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }
        let q = [r >> shift, g >> shift, b >> shift];
        let entry = histogram.entry(q).or_insert(HistogramEntry {
            q,
            count: 0,
            sum: [0; 3],
        });
        entry.count += 1;
        entry.sum[0] += r as u64;
        entry.sum[1] += g as u64;
        entry.sum[2] += b as u64;
    }

    if histogram.is_empty() {
        return Err(RenderError::PaletteAnalysis("probe has no opaque pixels".into()));
    }

    let mut boxes = vec![ColorBox {
        entries: histogram.into_values().collect(),
    }];
    while boxes.len() < MAX_SWATCHES {
        let Some(index) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.can_split())
            .max_by_key(|(i, b)| (b.volume(), std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
        else {
            break;
        };
        let (lower, upper) = boxes.swap_remove(index).split();
        boxes.push(lower);
        boxes.push(upper);
    }

    Ok(boxes
        .iter()
        .map(ColorBox::swatch)
        .filter(|s| !s.is_neutral_extreme())
        .collect())
}

/// Ranks swatches into candidates: the vibrant pick first, then the muted
/// pick. A swatch is never chosen for both targets.
pub fn rank_swatches(swatches: &[Swatch]) -> Vec<SwatchCandidate> {
    let mut candidates: Vec<SwatchCandidate> = Vec::with_capacity(2);
    for target in [Target::VIBRANT, Target::MUTED] {
        let taken: Vec<Swatch> = candidates.iter().map(|c| c.swatch).collect();
        if let Some(swatch) = target.select(swatches, &taken) {
            candidates.push(SwatchCandidate {
                swatch: *swatch,
                rank: target.rank,
            });
        }
    }
    candidates
}

/// Runs probe acquisition and palette analysis, returning ranked candidates.
pub fn analyze_palette(image: &RasterImage, probe_size: u32) -> RenderResult<Vec<SwatchCandidate>> {
    let probe = probe_image(image, probe_size)?;
    let swatches = quantize(&probe)?;
    trace!(swatches = swatches.len(), probe_size, "accent::quantize");
    Ok(rank_swatches(&swatches))
}

/// Applies the fallback chain: vibrant, then muted, then `default`.
pub fn choose_accent(candidates: &[SwatchCandidate], default: Srgb<u8>) -> AccentColor {
    let pick = |rank: SwatchRank| candidates.iter().find(|c| c.rank == rank).map(|c| c.swatch.color);
    let color = pick(SwatchRank::Vibrant)
        .or_else(|| pick(SwatchRank::Muted))
        .unwrap_or(default);
    AccentColor::new(color)
}

// ============================================================================
// Extraction
// ============================================================================

/// Extracts an accent color using the default configuration.
///
/// Never fails: see [`extract_accent_color_with`].
pub fn extract_accent_color(image: &RasterImage) -> AccentColor {
    extract_accent_color_with(&BadgeConfig::default(), image)
}

/// Extracts an accent color from `image`.
///
/// Any failure during probing or analysis is absorbed and the configured
/// default accent is returned, so the caller always gets a color. This is
/// blocking CPU work.
pub fn extract_accent_color_with(config: &BadgeConfig, image: &RasterImage) -> AccentColor {
    match analyze_palette(image, config.probe_size) {
        Ok(candidates) => choose_accent(&candidates, config.default_accent_color),
        Err(err) => {
            debug!(error = %err, "Accent extraction fell back to default");
            AccentColor::new(config.default_accent_color)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RasterImage {
        RasterImage::from_pixel(width, height, Rgba(rgba))
    }

    fn close(a: Srgb<u8>, b: Srgb<u8>, tolerance: u8) -> bool {
        a.red.abs_diff(b.red) <= tolerance
            && a.green.abs_diff(b.green) <= tolerance
            && a.blue.abs_diff(b.blue) <= tolerance
    }

    #[test]
    fn uniform_vibrant_image_returns_its_color() {
        let accent = extract_accent_color(&solid(300, 200, [200, 40, 40, 255]));
        assert!(close(accent.rgb(), Srgb::new(200, 40, 40), 2), "{accent:?}");
        assert_eq!(accent.to_rgba()[3], 255);
    }

    #[test]
    fn uniform_muted_image_returns_its_color() {
        let accent = extract_accent_color(&solid(64, 64, [120, 128, 136, 255]));
        assert!(close(accent.rgb(), Srgb::new(120, 128, 136), 2), "{accent:?}");
    }

    #[test]
    fn translucent_source_color_is_made_opaque() {
        let accent = extract_accent_color(&solid(50, 50, [30, 90, 200, 200]));
        assert!(close(accent.rgb(), Srgb::new(30, 90, 200), 2));
        assert_eq!(accent.to_rgba()[3], 255);
    }

    #[test]
    fn faint_source_still_counts() {
        let accent = extract_accent_color(&solid(72, 72, [200, 40, 40, 100]));
        assert!(close(accent.rgb(), Srgb::new(200, 40, 40), 2), "{accent:?}");

        let probe = RgbaImage::from_pixel(4, 4, Rgba([20, 120, 220, 1]));
        assert_eq!(quantize(&probe).unwrap()[0].color, Srgb::new(20, 120, 220));
    }

    #[test]
    fn uniform_colors_outside_lightness_window_return_default() {
        let default = AccentColor::default();
        // Lightness 0.20, 0.89 and 0.16: neither target accepts them
        for rgba in [[0, 0, 100, 255], [255, 200, 200, 255], [60, 20, 20, 255]] {
            assert_eq!(extract_accent_color(&solid(72, 72, rgba)), default, "{rgba:?}");
        }
        // Lightness 0.31, just inside the window
        let dark = extract_accent_color(&solid(72, 72, [140, 20, 20, 255]));
        assert!(close(dark.rgb(), Srgb::new(140, 20, 20), 2), "{dark:?}");
    }

    #[test]
    fn unanalyzable_images_return_default() {
        let default = AccentColor::new(Srgb::new(0x7d, 0x7d, 0x7d));
        assert_eq!(extract_accent_color(&solid(40, 40, [255, 0, 0, 0])), default);
        assert_eq!(extract_accent_color(&RasterImage::new(RgbaImage::new(0, 0))), default);
        assert_eq!(AccentColor::default(), default);
    }

    #[test]
    fn black_and_white_images_return_default() {
        let default = AccentColor::default();
        assert_eq!(extract_accent_color(&solid(20, 20, [0, 0, 0, 255])), default);
        assert_eq!(extract_accent_color(&solid(20, 20, [255, 255, 255, 255])), default);
    }

    #[test]
    fn configured_default_is_used() {
        let config = BadgeConfig {
            default_accent_color: Srgb::new(1, 2, 3),
            ..BadgeConfig::default()
        };
        let accent = extract_accent_color_with(&config, &solid(8, 8, [0, 0, 0, 0]));
        assert_eq!(accent.rgb(), Srgb::new(1, 2, 3));
    }

    #[test]
    fn vibrant_wins_over_larger_muted_area() {
        let mut data = RgbaImage::from_pixel(100, 100, Rgba([110, 120, 130, 255]));
        for y in 0..100 {
            for x in 0..30 {
                data.put_pixel(x, y, Rgba([20, 180, 60, 255]));
            }
        }
        let accent = extract_accent_color(&RasterImage::new(data));
        // Center crop keeps the whole square; the green band survives downsampling
        let hsl: Hsl = accent.rgb().into_format::<f32>().into_color();
        assert!(hsl.saturation >= 0.35, "expected vibrant pick, got {accent:?}");
    }

    #[test]
    fn probe_is_center_cropped_square() {
        let mut data = RgbaImage::from_pixel(300, 100, Rgba([0, 0, 255, 255]));
        for y in 0..100 {
            for x in 100..200 {
                data.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let probe = probe_image(&RasterImage::new(data), 72).unwrap();
        assert_eq!(probe.dimensions(), (72, 72));
        assert!(probe.pixels().all(|p| p[0] > 200 && p[2] < 50));
    }

    #[test]
    fn quantize_limits_swatch_count() {
        let mut data = RgbaImage::new(64, 64);
        for (x, y, p) in data.enumerate_pixels_mut() {
            *p = Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255]);
        }
        let swatches = quantize(&data).unwrap();
        assert!(!swatches.is_empty());
        assert!(swatches.len() <= MAX_SWATCHES);
    }

    #[test]
    fn quantize_fails_on_transparent_probe() {
        let probe = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 0]));
        assert!(matches!(quantize(&probe), Err(RenderError::PaletteAnalysis(_))));
    }

    #[test]
    fn ranking_never_reuses_a_swatch() {
        let gray = Swatch::new(Srgb::new(128, 128, 128), 10);
        let red = Swatch::new(Srgb::new(200, 40, 40), 5);
        let candidates = rank_swatches(&[gray, red]);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].rank, SwatchRank::Vibrant);
        assert_eq!(candidates[0].swatch, red);
        assert_eq!(candidates[1].rank, SwatchRank::Muted);
        assert_eq!(candidates[1].swatch, gray);
    }

    #[test]
    fn fallback_chain_order() {
        let default = Srgb::new(9, 9, 9);
        let muted = SwatchCandidate {
            swatch: Swatch::new(Srgb::new(128, 128, 128), 1),
            rank: SwatchRank::Muted,
        };
        let vibrant = SwatchCandidate {
            swatch: Swatch::new(Srgb::new(200, 40, 40), 1),
            rank: SwatchRank::Vibrant,
        };
        assert_eq!(choose_accent(&[muted, vibrant], default).rgb(), Srgb::new(200, 40, 40));
        assert_eq!(choose_accent(&[muted], default).rgb(), Srgb::new(128, 128, 128));
        assert_eq!(choose_accent(&[], default).rgb(), default);
    }
}
