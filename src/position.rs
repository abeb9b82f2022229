//! Viewport-aware placement for the root popup and nested submenu panels
//!
//! All functions are pure: they take the anchor, the measured popup size and
//! the viewport, and return the popup's top-left corner. Placement never
//! fails; out-of-range values are clamped.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::view::TextDirection;

/// Root popup placement policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Offset added to the anchor point
    pub offset_x: f64,
    pub offset_y: f64,
    /// Minimum distance kept from every viewport edge
    pub padding: f64,
    /// Grow up/left from the anchor when the popup would overflow
    pub flip: bool,
    /// Slide the popup back inside the padded viewport
    pub shift: bool,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            padding: 8.0,
            flip: true,
            shift: true,
        }
    }
}

impl PositionConfig {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    /// Set the anchor offset (builder pattern)
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

/// Place one axis of the root popup
///
/// With shift on and room between the paddings, an overflowing popup slides
/// so its far edge sits at `viewport - padding`. Flip applies when shift is
/// off or the popup cannot fit at all; shift then pins it to the near padding.
fn place_axis(
    anchor: f64,
    offset: f64,
    len: f64,
    viewport: f64,
    padding: f64,
    flip: bool,
    shift: bool,
) -> f64 {
    let start = anchor + offset;
    let far_limit = viewport - padding;
    let fits = len <= viewport - padding * 2.0;

    let pos = if start + len <= far_limit {
        start
    } else if shift && fits {
        far_limit - len
    } else if flip {
        anchor - offset - len
    } else {
        start
    };

    if !shift {
        return pos;
    }
    if fits {
        pos.clamp(padding, far_limit - len)
    } else {
        padding
    }
}

/// Top-left corner of the root popup anchored at `anchor`
pub fn place_root(anchor: Point, size: Size, viewport: Size, cfg: &PositionConfig) -> Point {
    let x = place_axis(
        anchor.x,
        cfg.offset_x,
        size.width,
        viewport.width,
        cfg.padding,
        cfg.flip,
        cfg.shift,
    );
    let y = place_axis(
        anchor.y,
        cfg.offset_y,
        size.height,
        viewport.height,
        cfg.padding,
        cfg.flip,
        cfg.shift,
    );
    Point::new(x, y)
}

/// Which side a submenu prefers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmenuPlacement {
    /// Writing-direction side, falling back to the other side once
    #[default]
    Auto,
    Right,
    Left,
}

/// Side a submenu panel ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    fn opposite(self) -> Side {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
        }
    }
}

/// Place a submenu panel next to its trigger row
///
/// Only `Auto` falls back, and only once: the fallback side is used without
/// checking it for overflow. Vertically the panel aligns with the trigger's
/// top and is pulled up if it would cross the bottom padding.
pub fn place_submenu(
    trigger: Rect,
    size: Size,
    viewport: Size,
    placement: SubmenuPlacement,
    direction: TextDirection,
    padding: f64,
) -> (Point, Side) {
    let preferred = match (placement, direction) {
        (SubmenuPlacement::Right, _) => Side::Right,
        (SubmenuPlacement::Left, _) => Side::Left,
        (SubmenuPlacement::Auto, TextDirection::Ltr) => Side::Right,
        (SubmenuPlacement::Auto, TextDirection::Rtl) => Side::Left,
    };
    let fits = |side: Side| match side {
        Side::Right => trigger.x1 + size.width <= viewport.width - padding,
        Side::Left => trigger.x0 - size.width >= padding,
    };
    let side = if placement == SubmenuPlacement::Auto && !fits(preferred) {
        preferred.opposite()
    } else {
        preferred
    };

    let x = match side {
        Side::Right => trigger.x1,
        Side::Left => trigger.x0 - size.width,
    };
    let mut y = trigger.y0;
    if y + size.height > viewport.height - padding {
        y = (viewport.height - padding - size.height).max(padding);
    }
    (Point::new(x, y), side)
}

/// Placement of a popup opened against a host element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementPlacement {
    /// `BottomStart`, or `TopStart` when there is no room below
    #[default]
    Auto,
    TopStart,
    TopEnd,
    BottomStart,
    BottomEnd,
    LeftStart,
    LeftEnd,
    RightStart,
    RightEnd,
}

impl ElementPlacement {
    /// Resolve `Auto` against the available room below the element
    pub fn resolve(self, element: Rect, size: Size, viewport: Size, padding: f64) -> Self {
        if self != ElementPlacement::Auto {
            return self;
        }
        let room_below = element.y1 + size.height <= viewport.height - padding;
        let room_above = element.y0 - size.height >= padding;
        if !room_below && room_above {
            ElementPlacement::TopStart
        } else {
            ElementPlacement::BottomStart
        }
    }
}

/// Top-left corner of a popup of `size` placed against `element`
pub fn element_anchor(element: Rect, placement: ElementPlacement, size: Size) -> Point {
    match placement {
        ElementPlacement::Auto | ElementPlacement::BottomStart => Point::new(element.x0, element.y1),
        ElementPlacement::BottomEnd => Point::new(element.x1 - size.width, element.y1),
        ElementPlacement::TopStart => Point::new(element.x0, element.y0 - size.height),
        ElementPlacement::TopEnd => Point::new(element.x1 - size.width, element.y0 - size.height),
        ElementPlacement::RightStart => Point::new(element.x1, element.y0),
        ElementPlacement::RightEnd => Point::new(element.x1, element.y1 - size.height),
        ElementPlacement::LeftStart => Point::new(element.x0 - size.width, element.y0),
        ElementPlacement::LeftEnd => Point::new(element.x0 - size.width, element.y1 - size.height),
    }
}

/// Place a popup against an element: resolve the placement, then clamp
///
/// The anchor already accounts for the popup size, so only shift applies.
pub fn place_at_element(
    element: Rect,
    placement: ElementPlacement,
    size: Size,
    viewport: Size,
    cfg: &PositionConfig,
) -> (Point, ElementPlacement) {
    let resolved = placement.resolve(element, size, viewport, cfg.padding);
    let anchor = element_anchor(element, resolved, size);
    let clamp_only = PositionConfig {
        offset_x: 0.0,
        offset_y: 0.0,
        flip: false,
        ..*cfg
    };
    (place_root(anchor, size, viewport, &clamp_only), resolved)
}
