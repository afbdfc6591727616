//! Raster and rectangle types shared by the compositor, the accent color
//! extractor and the swipe overlay.

use image::{Rgba, RgbaImage};

/// A rectangle defined in pixel coordinates.
///
/// The origin may be negative: list items scrolled partially off screen, or
/// regions handed to the swipe overlay, are not confined to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the canvas
    pub x: i32,
    /// Y offset from the top edge of the canvas
    pub y: i32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Creates a rectangle from its four edges.
    ///
    /// Edges given in the wrong order are swapped, so the result is never
    /// inverted.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let (left, right) = (left.min(right), left.max(right));
        let (top, bottom) = (top.min(bottom), top.max(bottom));
        Self {
            x: left,
            y: top,
            width: left.abs_diff(right),
            height: top.abs_diff(bottom),
        }
    }

    /// Returns the right edge coordinate (x + width), saturating at
    /// `i32::MAX`.
    pub fn right(&self) -> i32 {
        far_edge(self.x, self.width)
    }

    /// Returns the bottom edge coordinate (y + height), saturating at
    /// `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        far_edge(self.y, self.height)
    }

    /// Returns true if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the overlapping region of two rectangles, if any.
    pub fn intersect(&self, other: &RectPx) -> Option<RectPx> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left >= right || top >= bottom {
            return None;
        }
        Some(RectPx::from_edges(left, top, right, bottom))
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &RectPx) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

fn far_edge(origin: i32, extent: u32) -> i32 {
    origin.saturating_add(i32::try_from(extent).unwrap_or(i32::MAX))
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if the source should be fitted along its width
    /// (landscape or square).
    pub fn is_landscape_or_square(&self) -> bool {
        self.width >= self.height
    }
}

/// An immutable, decoded RGBA pixel buffer.
///
/// Inputs are owned by the caller and only ever read; every operation in this
/// crate returns a freshly allocated `RasterImage`.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    data: RgbaImage,
}

impl RasterImage {
    /// Wraps an already decoded buffer.
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Creates an image filled with a single color.
    pub fn from_pixel(width: u32, height: u32, pixel: Rgba<u8>) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, pixel))
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns true if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.width() == 0 || self.data.height() == 0
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.data.get_pixel(x, y)
    }

    /// Borrows the underlying buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.data
    }

    /// Consumes the image and returns the underlying buffer.
    pub fn into_inner(self) -> RgbaImage {
        self.data
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(data: RgbaImage) -> Self {
        Self::new(data)
    }
}
