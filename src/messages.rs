//! Message types for the Elm-style architecture
//!
//! Everything the host observes (pointer, keyboard, timers, paint frames,
//! transition ends, deferred hook results) flows in through these types.

use kurbo::{Point, Size};

use crate::hooks::HookError;
use crate::item::{LoadTicket, RawItem};
use crate::keymap::{Keystroke, Modifiers};
use crate::model::{FrameToken, HookTicket, HostElementId, InstanceId, TimerToken};
use crate::view::NodeId;

/// What a host event landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// Inside a menu's popup layer (`node` when the host resolved one)
    Menu {
        instance: InstanceId,
        node: Option<NodeId>,
    },
    /// Anywhere else in the host document
    Host(Option<HostElementId>),
}

impl EventTarget {
    /// Whether the event landed inside `instance`'s own popup
    pub fn is_inside(&self, instance: InstanceId) -> bool {
        matches!(self, EventTarget::Menu { instance: i, .. } if *i == instance)
    }
}

/// A native pointer event reduced to what the engine needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub target: EventTarget,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: Point, target: EventTarget) -> Self {
        Self {
            position,
            target,
            modifiers: Modifiers::NONE,
        }
    }

    /// A pointer event on the host document at `(x, y)`
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), EventTarget::Host(None))
    }
}

/// Events from a bound trigger element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    /// Secondary click / context-menu key
    ContextMenu {
        event: PointerEvent,
        focused: Option<HostElementId>,
    },
    TouchStart {
        position: Point,
        focused: Option<HostElementId>,
    },
    TouchMove {
        position: Point,
    },
    TouchEnd,
}

/// Messages addressed to one menu instance
#[derive(Debug, Clone)]
pub enum MenuMsg {
    /// A deferred before-open/before-close hook settled
    HookResolved {
        ticket: HookTicket,
        result: Result<bool, HookError>,
    },
    /// A scheduled timer elapsed
    Timer(TimerToken),
    /// A requested paint frame arrived
    Frame(FrameToken),
    /// A panel finished its CSS-style transition
    TransitionEnd(NodeId),
    PointerEnter(NodeId),
    PointerLeave(NodeId),
    Click {
        node: NodeId,
        modifiers: Modifiers,
    },
    Key(Keystroke),
    Trigger(TriggerEvent),
    /// Deferred submenu children arrived
    ChildrenLoaded {
        ticket: LoadTicket,
        result: Result<Vec<RawItem>, HookError>,
    },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Instance(InstanceId, MenuMsg),
    /// Document-level pointer down (capture phase)
    PointerDown(PointerEvent),
    /// Document-level wheel or touch-move (capture phase)
    Scroll { target: EventTarget },
    /// The viewport changed size
    Resize(Size),
}

impl Msg {
    /// Shorthand for an instance-addressed message
    pub fn to(instance: InstanceId, msg: MenuMsg) -> Self {
        Msg::Instance(instance, msg)
    }
}
