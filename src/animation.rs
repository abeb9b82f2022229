//! Enter/leave transitions for panels
//!
//! Enter applies the open class on the frame after mounting so a closed
//! frame is always observed. Leave races the host's transition-end signal
//! against a safety timer of `leave_ms + LEAVE_GRACE`; whichever arrives
//! first completes the leave and the other finds nothing to complete.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{FrameToken, TimerToken};
use crate::view::{classes, NodeId, VisualTree};

/// Extra time allowed past the configured leave duration
pub const LEAVE_GRACE: Duration = Duration::from_millis(50);

/// Visual style of the transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    #[default]
    Fade,
    Scale,
    Slide,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Global switch; when off, open/close state applies synchronously
    pub enabled: bool,
    pub kind: AnimationKind,
    pub enter_ms: u64,
    pub leave_ms: u64,
    pub enter_easing: String,
    pub leave_easing: String,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: AnimationKind::Fade,
            enter_ms: 120,
            leave_ms: 100,
            enter_easing: "ease-out".to_string(),
            leave_easing: "ease-in".to_string(),
        }
    }
}

impl AnimationOptions {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.kind != AnimationKind::None
    }

    /// Safety timeout for a leave transition
    pub fn leave_timeout(&self) -> Duration {
        Duration::from_millis(self.leave_ms) + LEAVE_GRACE
    }
}

/// What a finished leave transition was closing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveTarget {
    Root,
    Submenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLeave {
    pub node: NodeId,
    pub token: TimerToken,
    pub target: LeaveTarget,
}

/// Per-instance transition state
///
/// At most one leave is in flight: panel closes are sequenced leaf-first and
/// the step queue parks while [`Animator::is_busy`].
#[derive(Debug, Default)]
pub struct Animator {
    leave: Option<PendingLeave>,
    frames: Vec<(FrameToken, NodeId)>,
    frame_seq: u64,
}

impl Animator {
    pub fn is_busy(&self) -> bool {
        self.leave.is_some()
    }

    pub fn pending_leave(&self) -> Option<&PendingLeave> {
        self.leave.as_ref()
    }

    /// Start an enter transition
    ///
    /// Returns the frame to wait for, or `None` when the open class was
    /// applied synchronously because animation is disabled.
    pub fn enter(&mut self, tree: &mut VisualTree, node: NodeId, enabled: bool) -> Option<FrameToken> {
        tree.remove_class(node, classes::LEAVE);
        if !enabled {
            tree.add_class(node, classes::OPEN);
            return None;
        }
        self.frame_seq += 1;
        let token = FrameToken(self.frame_seq);
        self.frames.push((token, node));
        Some(token)
    }

    /// A requested frame arrived: apply the open class
    ///
    /// Returns the node whose enter completed, `None` for stale frames.
    pub fn frame(&mut self, tree: &mut VisualTree, token: FrameToken) -> Option<NodeId> {
        let pos = self.frames.iter().position(|(t, _)| *t == token)?;
        let (_, node) = self.frames.remove(pos);
        if !tree.is_alive(node) {
            return None;
        }
        tree.add_class(node, classes::OPEN);
        Some(node)
    }

    /// Start a leave transition
    ///
    /// With `safety == None` (animation disabled) nothing is left pending and
    /// the caller completes the leave immediately; returns whether a leave is
    /// now in flight.
    pub fn begin_leave(
        &mut self,
        tree: &mut VisualTree,
        node: NodeId,
        target: LeaveTarget,
        safety: Option<TimerToken>,
    ) -> bool {
        self.frames.retain(|(_, n)| *n != node);
        tree.remove_class(node, classes::OPEN);
        let Some(token) = safety else {
            return false;
        };
        tree.add_class(node, classes::LEAVE);
        self.leave = Some(PendingLeave { node, token, target });
        true
    }

    /// Transition-end signal from the host
    pub fn transition_end(&mut self, node: NodeId) -> Option<PendingLeave> {
        match self.leave {
            Some(pending) if pending.node == node => self.leave.take(),
            _ => None,
        }
    }

    /// Safety timer fired
    pub fn timeout(&mut self, token: TimerToken) -> Option<PendingLeave> {
        match self.leave {
            Some(pending) if pending.token == token => self.leave.take(),
            _ => None,
        }
    }

    /// Abort an in-flight leave (idempotent)
    pub fn cancel(&mut self, tree: &mut VisualTree) -> Option<PendingLeave> {
        let pending = self.leave.take()?;
        tree.remove_class(pending.node, classes::LEAVE);
        Some(pending)
    }

    /// Forget everything, e.g. after the popup was torn down
    pub fn clear(&mut self) {
        self.leave = None;
        self.frames.clear();
    }
}
