//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host performs after an update:
//! timers, paint frames, focus moves, mounting the popup layer, navigation
//! and settling open tickets.

use std::collections::VecDeque;
use std::time::Duration;

use crate::item::MenuItem;
use crate::model::{
    FrameToken, HostElementId, InstanceId, MountPoint, OpenRequest, OpenTicket, TimerToken,
};
use crate::view::NodeId;

/// Where focus should move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// A node in a menu's popup
    Menu { instance: InstanceId, node: NodeId },
    /// Back to a host element (focus restore on close)
    Host(HostElementId),
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),
    /// The instance's tree changed; repaint it
    Redraw(InstanceId),
    /// After `delay`, send `MenuMsg::Timer(token)` to `instance`
    ScheduleTimer {
        instance: InstanceId,
        token: TimerToken,
        delay: Duration,
    },
    CancelTimer {
        instance: InstanceId,
        token: TimerToken,
    },
    /// On the next paint frame, send `MenuMsg::Frame(token)`
    RequestFrame {
        instance: InstanceId,
        token: FrameToken,
    },
    Focus(FocusTarget),
    /// Suppress the native default of the event being handled
    PreventDefault,
    /// Follow a link item
    Navigate {
        href: String,
        target: Option<String>,
        /// Modifier-click: let the host open a new tab/window instead
        passthrough: bool,
    },
    /// Attach the popup root to the host's portal
    Mount {
        instance: InstanceId,
        root: NodeId,
        mount: MountPoint,
    },
    /// Detach the popup root
    Unmount { instance: InstanceId, root: NodeId },
    /// The open ticket is settled with the selected item, if any
    Settled {
        instance: InstanceId,
        ticket: OpenTicket,
        selection: Option<MenuItem>,
    },
}

impl Cmd {
    /// Create a batch of commands, dropping no-ops and unwrapping singletons
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut flat: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match flat.len() {
            0 => Cmd::None,
            1 => flat.remove(0),
            _ => Cmd::Batch(flat),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Check if this command requires a repaint
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw(_) | Cmd::Mount { .. } | Cmd::Unmount { .. } => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            _ => false,
        }
    }

    /// Depth-first list of the leaf commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}

/// Cross-instance notifications collected while handling a message
///
/// The registry drains these after every handler so the single-open
/// invariant is enforced in one place.
#[derive(Debug, Clone)]
pub(crate) enum Signal {
    /// The instance passed its before-open hook and wants to be the open one
    Registered(InstanceId),
    /// The instance finished closing (or aborted its open)
    Unregistered(InstanceId),
    /// A bound trigger asked to open the menu
    OpenRequested(InstanceId, OpenRequest),
}

/// Collector threaded through update handlers
#[derive(Debug, Default)]
pub(crate) struct Effects {
    cmds: Vec<Cmd>,
    signals: VecDeque<Signal>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: Cmd) {
        if !cmd.is_none() {
            self.cmds.push(cmd);
        }
    }

    pub fn signal(&mut self, signal: Signal) {
        self.signals.push_back(signal);
    }

    pub fn next_signal(&mut self) -> Option<Signal> {
        self.signals.pop_front()
    }

    pub fn into_cmd(self) -> Cmd {
        Cmd::batch(self.cmds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_unwraps_and_drops_none() {
        assert_eq!(Cmd::batch(vec![Cmd::None, Cmd::None]), Cmd::None);
        assert_eq!(Cmd::batch(vec![Cmd::None, Cmd::PreventDefault]), Cmd::PreventDefault);
        assert!(matches!(
            Cmd::batch(vec![Cmd::PreventDefault, Cmd::PreventDefault]),
            Cmd::Batch(v) if v.len() == 2
        ));
    }

    #[test]
    fn test_flatten_nested() {
        let cmd = Cmd::Batch(vec![
            Cmd::PreventDefault,
            Cmd::Batch(vec![Cmd::None, Cmd::PreventDefault]),
        ]);
        assert_eq!(cmd.flatten().len(), 2);
    }
}
