//! Swipe-to-reveal overlays for list rows.
//!
//! While a row is dragged sideways, the uncovered strip shows an action
//! background and a centered action icon. Delete reveals from the right edge
//! when dragging left; star reveals from the left edge when dragging right.
//! Both are the same [`SwipeOverlay`] with a different [`RevealDirection`],
//! color and icon.
//!
//! The overlay keeps no state between frames. Each call receives the full
//! [`OverlayState`] from the gesture controller and produces a list of
//! [`DrawOp`]s, which [`SwipeOverlay::draw`] executes on a canvas.

use image::{Rgba, RgbaImage};
use palette::Srgb;
use tracing::trace;

use crate::assets::{action_icon_size, delete_icon, star_icon};
use crate::canvas::{clear_rect, composite_over_clipped, fill_rect};
use crate::config::BadgeConfig;
use crate::error::RenderResult;
use crate::icon::{RasterImage, RectPx};

// ============================================================================
// Gesture state
// ============================================================================

/// The edge of the row the action background emerges from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealDirection {
    /// Row dragged to the left; background grows from the right edge.
    LeftReveal,
    /// Row dragged to the right; background grows from the left edge.
    RightReveal,
}

/// Phase of a drag as seen by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// Drag in progress: draw background and icon.
    Active,
    /// Released with no net offset: wipe what was drawn.
    Canceling,
}

/// Kind of list row being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemCategory {
    #[default]
    Station,
    /// The trailing "add new" row, which never swipes.
    AddNew,
}

/// Directions a row may be swiped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementFlags {
    pub left: bool,
    pub right: bool,
}

impl MovementFlags {
    pub const NONE: Self = Self {
        left: false,
        right: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.left && !self.right
    }
}

/// Everything the overlay needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayState {
    /// Horizontal drag offset in pixels; negative means dragged left.
    pub drag_offset: f32,
    /// Bounds of the row being dragged, in canvas coordinates.
    pub item_bounds: RectPx,
    /// True while the user's finger is still driving the drag.
    pub is_user_driving: bool,
    pub category: ItemCategory,
}

impl OverlayState {
    pub fn new(drag_offset: f32, item_bounds: RectPx, is_user_driving: bool) -> Self {
        Self {
            drag_offset,
            item_bounds,
            is_user_driving,
            category: ItemCategory::Station,
        }
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn phase(&self) -> GesturePhase {
        if self.drag_offset == 0.0 && !self.is_user_driving {
            GesturePhase::Canceling
        } else {
            GesturePhase::Active
        }
    }
}

// ============================================================================
// Draw instructions
// ============================================================================

/// A single drawing step produced for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    /// Reset the region to transparent.
    Clear { rect: RectPx },
    /// Fill the region with an opaque color.
    Fill { rect: RectPx, color: Rgba<u8> },
    /// Draw the action icon at `rect`, showing only the part inside `clip`.
    Icon { rect: RectPx, clip: RectPx },
}

// ============================================================================
// SwipeOverlay
// ============================================================================

/// One swipe action: direction, background color and icon.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeOverlay {
    direction: RevealDirection,
    color: Rgba<u8>,
    icon: RasterImage,
}

impl SwipeOverlay {
    /// Creates an overlay. The icon is drawn at its intrinsic size.
    pub fn new(direction: RevealDirection, color: Srgb<u8>, icon: RasterImage) -> Self {
        Self {
            direction,
            color: Rgba([color.red, color.green, color.blue, 255]),
            icon,
        }
    }

    /// The delete action: left reveal on the destructive color.
    pub fn delete(config: &BadgeConfig, density: f32) -> RenderResult<Self> {
        let size = action_icon_size(config, density)?;
        let icon = delete_icon(size, config.delete_icon_tint)?;
        Ok(Self::new(RevealDirection::LeftReveal, config.destructive_color, icon))
    }

    /// The star action: right reveal on the primary color.
    pub fn star(config: &BadgeConfig, density: f32) -> RenderResult<Self> {
        let size = action_icon_size(config, density)?;
        let icon = star_icon(size, config.star_icon_tint)?;
        Ok(Self::new(RevealDirection::RightReveal, config.primary_color, icon))
    }

    pub fn direction(&self) -> RevealDirection {
        self.direction
    }

    pub fn icon(&self) -> &RasterImage {
        &self.icon
    }

    /// Swipe directions allowed for a row. "Add new" rows never move.
    pub fn movement_flags(&self, category: ItemCategory) -> MovementFlags {
        match (category, self.direction) {
            (ItemCategory::AddNew, _) => MovementFlags::NONE,
            (ItemCategory::Station, RevealDirection::LeftReveal) => MovementFlags {
                left: true,
                right: false,
            },
            (ItemCategory::Station, RevealDirection::RightReveal) => MovementFlags {
                left: false,
                right: true,
            },
        }
    }

    /// Background strip uncovered by the drag, clamped to the row.
    pub fn background_rect(&self, state: &OverlayState) -> RectPx {
        let bounds = state.item_bounds;
        let offset = state.drag_offset as i32;
        let width = i32::try_from(bounds.width).unwrap_or(i32::MAX);
        match self.direction {
            RevealDirection::LeftReveal => {
                let reveal = offset.clamp(-width, 0);
                RectPx::from_edges(bounds.right().saturating_add(reveal), bounds.y, bounds.right(), bounds.bottom())
            }
            RevealDirection::RightReveal => {
                let reveal = offset.clamp(0, width);
                RectPx::from_edges(bounds.x, bounds.y, bounds.x.saturating_add(reveal), bounds.bottom())
            }
        }
    }

    /// Where the icon sits: vertically centered and inset from the revealed
    /// edge by the same margin it has above and below.
    pub fn icon_rect(&self, item_bounds: RectPx) -> RectPx {
        let icon_width = self.icon.width() as i32;
        let icon_height = self.icon.height() as i32;
        let margin = (item_bounds.height as i32 - icon_height) / 2;
        let top = item_bounds.y + margin;
        let left = match self.direction {
            RevealDirection::LeftReveal => item_bounds.right() - margin - icon_width,
            RevealDirection::RightReveal => item_bounds.x + margin,
        };
        RectPx::new(left, top, self.icon.width(), self.icon.height())
    }

    /// Computes the drawing steps for one frame.
    pub fn plan(&self, state: &OverlayState) -> Vec<DrawOp> {
        if self.movement_flags(state.category).is_empty() {
            return Vec::new();
        }

        let ops = match state.phase() {
            GesturePhase::Canceling => vec![DrawOp::Clear {
                rect: state.item_bounds,
            }],
            GesturePhase::Active => {
                let background = self.background_rect(state);
                if background.is_empty() {
                    Vec::new()
                } else {
                    vec![
                        DrawOp::Fill {
                            rect: background,
                            color: self.color,
                        },
                        DrawOp::Icon {
                            rect: self.icon_rect(state.item_bounds),
                            clip: background,
                        },
                    ]
                }
            }
        };

        trace!(
            direction = ?self.direction,
            drag_offset = state.drag_offset,
            ops = ops.len(),
            "swipe::plan"
        );
        ops
    }

    /// Plans and draws one frame onto `canvas`, returning the executed steps.
    pub fn draw(&self, canvas: &mut RgbaImage, state: &OverlayState) -> Vec<DrawOp> {
        let ops = self.plan(state);
        for op in &ops {
            match *op {
                DrawOp::Clear { rect } => clear_rect(canvas, rect),
                DrawOp::Fill { rect, color } => fill_rect(canvas, rect, color),
                DrawOp::Icon { rect, clip } => {
                    composite_over_clipped(canvas, self.icon.as_rgba(), rect.x, rect.y, clip)
                }
            }
        }
        ops
    }
}

// ============================================================================
// Tests
// ============================================================================
