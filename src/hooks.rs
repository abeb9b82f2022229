//! Lifecycle hooks supplied by the host
//!
//! Before-hooks may answer later: returning [`HookOutcome::Defer`] parks the
//! transition until the host sends `MenuMsg::HookResolved` with the same
//! ticket. A rejected deferred hook counts as a denial.

use std::fmt;

use crate::item::MenuItem;
use crate::model::{CloseContext, HookTicket, OpenContext};

/// Answer of a before-open or before-close hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Allow,
    Deny,
    /// The answer arrives later via `MenuMsg::HookResolved`
    Defer,
}

impl From<bool> for HookOutcome {
    fn from(allow: bool) -> Self {
        if allow {
            HookOutcome::Allow
        } else {
            HookOutcome::Deny
        }
    }
}

/// Failure reported for a deferred hook or lazy child load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HookError {}

/// Host callbacks around the open/close lifecycle
///
/// Every method has a permissive default, so implementors only override
/// what they need.
pub trait MenuHooks {
    fn on_before_open(&self, _ctx: &OpenContext, _ticket: HookTicket) -> HookOutcome {
        HookOutcome::Allow
    }

    /// Content is visible and focus has moved into the menu
    fn on_open(&self, _ctx: &OpenContext) {}

    fn on_before_close(&self, _ctx: &CloseContext, _ticket: HookTicket) -> HookOutcome {
        HookOutcome::Allow
    }

    /// The popup was detached
    ///
    /// Not called when a re-open replaces a popup that is open or still
    /// leaving; that session ends with its ticket settling instead.
    fn on_close(&self, _ctx: &CloseContext) {}

    /// Runs after `on_close`, once focus has been restored
    fn on_after_close(&self, _ctx: &CloseContext) {}

    fn on_item_hover(&self, _item: &MenuItem) {}
}

/// Hooks that allow everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl MenuHooks for NoHooks {}
