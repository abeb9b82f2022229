//! Engine model - the complete state of every menu instance
//!
//! This module contains the state types following the Elm Architecture
//! pattern; all mutation happens in `update`.

pub mod context;
pub mod instance;
pub mod timers;

pub use context::{Anchor, CloseContext, CloseReason, OpenContext, OpenRequest};
pub use instance::{Instance, OpeningStage, Panel, Phase, TriggerBinding};
pub use timers::{FrameToken, TimerKind, TimerToken, Timers};

use std::fmt;

/// Unique identifier for a menu instance within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

/// Opaque handle of a host element (trigger, focus-restore target, portal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostElementId(pub u64);

/// Handle of one `open` call; settled exactly once by `Cmd::Settled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenTicket(pub(crate) u64);

/// Identifies one deferred hook invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookTicket(pub(crate) u64);

/// Where the popup layer is attached in the host tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MountPoint {
    /// The host's default portal (document body)
    #[default]
    Portal,
    Element(HostElementId),
}
