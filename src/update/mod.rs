//! Update functions for the Elm-style architecture
//!
//! All instance state transformations flow through these functions. Each
//! handler receives the instance and an [`Effects`] collector; cross-instance
//! consequences are raised as signals and resolved by the registry.

mod keyboard;
mod lifecycle;
mod pointer;
mod submenu;

use tracing::{debug, span, trace, Level};

use crate::commands::Effects;
use crate::messages::MenuMsg;
use crate::model::{Instance, TimerKind};
use crate::tracing::MenuSnapshot;

pub(crate) use lifecycle::{close, destroy, open, rerender, reposition, resume_open};
pub(crate) use pointer::{outside_pointer, resize};

/// Dispatch a message addressed to one instance
pub(crate) fn update_instance(inst: &mut Instance, fx: &mut Effects, msg: MenuMsg) {
    // Pointer motion and paint frames arrive constantly
    let is_noisy = matches!(
        msg,
        MenuMsg::PointerEnter(_) | MenuMsg::PointerLeave(_) | MenuMsg::Frame(_)
    );

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", menu = %inst.id, msg = msg_name).entered())
    };

    let before = MenuSnapshot::from_instance(inst);
    if !is_noisy {
        debug!(target: "message", msg = msg_name, "processing");
    }

    update_inner(inst, fx, msg);

    if let Some(diff) = before.diff(&MenuSnapshot::from_instance(inst)) {
        debug!(target: "menu", %diff, "state changed");
    }
}

fn msg_type_name(msg: &MenuMsg) -> &'static str {
    match msg {
        MenuMsg::HookResolved { .. } => "HookResolved",
        MenuMsg::Timer(_) => "Timer",
        MenuMsg::Frame(_) => "Frame",
        MenuMsg::TransitionEnd(_) => "TransitionEnd",
        MenuMsg::PointerEnter(_) => "PointerEnter",
        MenuMsg::PointerLeave(_) => "PointerLeave",
        MenuMsg::Click { .. } => "Click",
        MenuMsg::Key(_) => "Key",
        MenuMsg::Trigger(_) => "Trigger",
        MenuMsg::ChildrenLoaded { .. } => "ChildrenLoaded",
    }
}

fn update_inner(inst: &mut Instance, fx: &mut Effects, msg: MenuMsg) {
    match msg {
        MenuMsg::HookResolved { ticket, result } => {
            lifecycle::hook_resolved(inst, fx, ticket, result)
        }
        MenuMsg::Timer(token) => {
            if !inst.timers.fire(token) {
                debug!("{}: ignoring stale timer {:?}", inst.id, token);
                return;
            }
            trace!("{}: timer {:?} fired", inst.id, token.kind);
            match token.kind {
                TimerKind::HoverOpen => submenu::hover_open_elapsed(inst, fx),
                TimerKind::HoverClose => submenu::hover_close_elapsed(inst, fx),
                TimerKind::LongPress => pointer::long_press_elapsed(inst, fx),
                TimerKind::LeaveSafety => {
                    if let Some(pending) = inst.animator.timeout(token) {
                        debug!("{}: leave finished by safety timeout", inst.id);
                        lifecycle::leave_finished(inst, fx, pending);
                    }
                }
            }
        }
        MenuMsg::Frame(token) => lifecycle::frame(inst, fx, token),
        MenuMsg::TransitionEnd(node) => {
            if let Some(pending) = inst.animator.transition_end(node) {
                inst.timers.cancel(fx, inst.id, TimerKind::LeaveSafety);
                lifecycle::leave_finished(inst, fx, pending);
            }
        }
        MenuMsg::PointerEnter(node) => submenu::pointer_enter(inst, fx, node),
        MenuMsg::PointerLeave(node) => submenu::pointer_leave(inst, fx, node),
        MenuMsg::Click { node, modifiers } => pointer::click(inst, fx, node, modifiers),
        MenuMsg::Key(stroke) => keyboard::key(inst, fx, stroke),
        MenuMsg::Trigger(event) => pointer::trigger(inst, fx, event),
        MenuMsg::ChildrenLoaded { ticket, result } => {
            submenu::children_loaded(inst, fx, ticket, result)
        }
    }
}
