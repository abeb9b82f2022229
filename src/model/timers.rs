//! Sequence-numbered timer and frame tokens
//!
//! Every scheduled timer carries a token; rescheduling a kind invalidates the
//! previous token, so a late fire of a superseded timer is ignored.

use std::time::Duration;

use crate::commands::{Cmd, Effects};

use super::InstanceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Hover intent before opening a submenu
    HoverOpen,
    /// Grace period after leaving an open submenu's trigger
    HoverClose,
    /// Touch hold on a bound trigger
    LongPress,
    /// Fallback completion of a leave transition
    LeaveSafety,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub(crate) u64);

/// Pending timers of one instance, at most one per kind
#[derive(Debug, Default)]
pub struct Timers {
    seq: u64,
    pending: Vec<TimerToken>,
}

impl Timers {
    /// Schedule `kind`, replacing any pending timer of the same kind
    pub(crate) fn schedule(
        &mut self,
        fx: &mut Effects,
        instance: InstanceId,
        kind: TimerKind,
        delay: Duration,
    ) -> TimerToken {
        self.cancel(fx, instance, kind);
        self.seq += 1;
        let token = TimerToken {
            kind,
            seq: self.seq,
        };
        self.pending.push(token);
        fx.push(Cmd::ScheduleTimer {
            instance,
            token,
            delay,
        });
        token
    }

    pub(crate) fn cancel(&mut self, fx: &mut Effects, instance: InstanceId, kind: TimerKind) {
        if let Some(pos) = self.pending.iter().position(|t| t.kind == kind) {
            let token = self.pending.remove(pos);
            fx.push(Cmd::CancelTimer { instance, token });
        }
    }

    pub(crate) fn cancel_all(&mut self, fx: &mut Effects, instance: InstanceId) {
        for token in self.pending.drain(..) {
            fx.push(Cmd::CancelTimer { instance, token });
        }
    }

    /// Consume a fired token; false when it was cancelled or superseded
    pub fn fire(&mut self, token: TimerToken) -> bool {
        match self.pending.iter().position(|t| *t == token) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
