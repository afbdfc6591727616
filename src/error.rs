//! Error types for badge rendering.

use thiserror::Error;

/// Error type for badge rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A zero, negative or non-finite size, padding or dimension was passed
    /// to the geometry engine. Not recoverable; validate upstream.
    #[error("invalid geometry input: {0}")]
    InvalidGeometryInput(String),

    /// The image loader could not resolve the requested image.
    #[error("image unavailable: {0}")]
    ImageUnavailable(String),

    /// Palette analysis of a probe image failed.
    ///
    /// Never escapes [`extract_accent_color`](crate::extract_accent_color).
    #[error("palette analysis failed: {0}")]
    PaletteAnalysis(String),

    /// Display density scale factor was not a positive finite number.
    #[error("invalid density scale: {0}")]
    InvalidDensity(f32),

    /// A built-in vector asset could not be rendered.
    #[error("failed to render built-in asset `{0}`")]
    Asset(&'static str),

    /// PNG encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Configuration could not be parsed or serialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for badge rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
