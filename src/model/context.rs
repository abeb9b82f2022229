//! Open requests and the immutable contexts handed to lifecycle hooks

use kurbo::{Point, Rect};

use crate::item::MenuItem;
use crate::messages::PointerEvent;
use crate::position::ElementPlacement;

use super::{HostElementId, InstanceId};

/// What the root popup is anchored to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Point(Point),
    Element {
        rect: Rect,
        placement: ElementPlacement,
    },
}

impl Anchor {
    /// Reference point reported to hooks
    pub fn point(&self) -> Point {
        match self {
            Anchor::Point(p) => *p,
            Anchor::Element { rect, .. } => rect.origin(),
        }
    }
}

/// Arguments of an `open` call
///
/// Coordinates resolve in order: explicit position, the native event's
/// position, the element anchor, the configured anchor getter, the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenRequest {
    pub position: Option<Point>,
    pub event: Option<PointerEvent>,
    pub element: Option<(Rect, ElementPlacement)>,
    /// Host element focused before opening; focus returns there on close
    pub focused: Option<HostElementId>,
}

impl OpenRequest {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Self::default()
        }
    }

    pub fn from_event(event: PointerEvent) -> Self {
        Self {
            event: Some(event),
            ..Self::default()
        }
    }

    pub fn at_element(rect: Rect, placement: ElementPlacement) -> Self {
        Self {
            element: Some((rect, placement)),
            ..Self::default()
        }
    }

    /// Record the host element to restore focus to
    pub fn with_focus(mut self, focused: HostElementId) -> Self {
        self.focused = Some(focused);
        self
    }
}

/// Passed to `on_before_open` and `on_open`
#[derive(Debug, Clone, PartialEq)]
pub struct OpenContext {
    pub instance: InstanceId,
    pub position: Point,
    pub anchor: Anchor,
    pub event: Option<PointerEvent>,
}

/// Why a menu is closing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// `close()` called by the host
    Api,
    Toggle,
    OutsidePointer,
    Resize,
    Escape,
    /// An item was activated
    Selection,
    /// Another instance is opening
    Superseded,
}

impl CloseReason {
    /// Closes forced by the engine do not consult `on_before_close`
    pub fn asks_hook(self) -> bool {
        !matches!(self, CloseReason::Superseded)
    }
}

/// Passed to `on_before_close`, `on_close` and `on_after_close`
#[derive(Debug, Clone, PartialEq)]
pub struct CloseContext {
    pub instance: InstanceId,
    pub reason: CloseReason,
    /// Where the menu was opened
    pub position: Option<Point>,
    pub event: Option<PointerEvent>,
    pub selection: Option<MenuItem>,
}
