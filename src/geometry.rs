//! Fit transforms mapping a source rectangle into a destination square.
//!
//! The transform is uniform (no stretch): the source is scaled so that its
//! major axis exactly fills the square minus padding on both sides, then
//! centered along its minor axis.

use tracing::trace;

use crate::error::{RenderError, RenderResult};
use crate::icon::SizePx;

/// A rectangle in floating point canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A uniform scale followed by a translation.
///
/// Maps a source coordinate `(x, y)` to
/// `(x * scale + translate_x, y * scale + translate_y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl TransformMatrix {
    /// Maps a point from source space into destination space.
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    /// Maps a point from destination space back into source space.
    pub fn invert_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.translate_x) / self.scale,
            (y - self.translate_y) / self.scale,
        )
    }

    /// Returns where a source of the given size lands in destination space.
    pub fn destination_rect(&self, source: SizePx) -> RectF {
        RectF {
            x: self.translate_x,
            y: self.translate_y,
            width: source.width as f32 * self.scale,
            height: source.height as f32 * self.scale,
        }
    }
}

/// Computes the transform fitting a `source_width × source_height` image into
/// a `target_size` square, leaving `padding` pixels free on every side of the
/// major axis.
///
/// Returns [`RenderError::InvalidGeometryInput`] when `target_size` or either
/// source dimension is zero, or when `padding` is negative, non-finite or not
/// strictly less than half of `target_size`.
pub fn compute_fit_transform(
    target_size: u32,
    padding: f32,
    source_width: u32,
    source_height: u32,
) -> RenderResult<TransformMatrix> {
    if target_size == 0 {
        return Err(RenderError::InvalidGeometryInput(
            "target size must be greater than zero".into(),
        ));
    }
    if source_width == 0 || source_height == 0 {
        return Err(RenderError::InvalidGeometryInput(format!(
            "source dimensions must be greater than zero, got {source_width}x{source_height}"
        )));
    }
    let size = target_size as f32;
    if !padding.is_finite() || padding < 0.0 || padding >= size / 2.0 {
        return Err(RenderError::InvalidGeometryInput(format!(
            "padding {padding} out of range for target size {target_size}"
        )));
    }

    let available = size - padding * 2.0;
    let source = SizePx::new(source_width, source_height);
    let (w, h) = (source_width as f32, source_height as f32);

    let transform = if source.is_landscape_or_square() {
        let scale = available / w;
        TransformMatrix {
            scale,
            translate_x: padding,
            translate_y: (size - h * scale) / 2.0,
        }
    } else {
        let scale = available / h;
        TransformMatrix {
            scale,
            translate_x: (size - w * scale) / 2.0,
            translate_y: padding,
        }
    };

    trace!(
        target_size,
        padding,
        source_width,
        source_height,
        scale = transform.scale,
        "geometry::fit"
    );
    Ok(transform)
}
