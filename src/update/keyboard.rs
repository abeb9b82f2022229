//! Keyboard navigation and shortcut dispatch for the active panel

use tracing::{debug, trace};

use crate::commands::{Cmd, Effects};
use crate::keymap::{nav_intent, step_index, Keystroke, Modifiers, NavIntent, Shortcut};
use crate::model::instance::Step;
use crate::model::{CloseReason, Instance, TimerKind};
use crate::view::{ItemSlot, NodeId, TextDirection};

use super::{lifecycle, pointer, submenu};

pub(crate) fn key(inst: &mut Instance, fx: &mut Effects, stroke: Keystroke) {
    if !inst.is_open() {
        return;
    }
    let Some(depth) = inst.active_depth() else {
        return;
    };
    let rtl = inst.tree.direction(inst.panels[depth].node) == TextDirection::Rtl;

    if let Some(intent) = nav_intent(&stroke, rtl) {
        fx.push(Cmd::PreventDefault);
        navigate(inst, fx, depth, intent);
        return;
    }

    let platform = inst.options.platform;
    let hit = inst.panels[depth].items.iter().enumerate().find(|(index, item)| {
        inst.is_focusable(depth, *index)
            && item
                .shortcut()
                .and_then(|s| s.parse::<Shortcut>().ok())
                .is_some_and(|s| s.matches(&stroke, platform))
    });
    if let Some((index, _)) = hit {
        let slot = ItemSlot {
            panel: depth,
            index,
        };
        trace!("{}: shortcut {:?} matched item {}", inst.id, stroke, index);
        fx.push(Cmd::PreventDefault);
        if let Some(node) = inst.item_node(depth, index) {
            pointer::activate(inst, fx, node, slot, stroke.mods);
        }
    }
}

fn navigate(inst: &mut Instance, fx: &mut Effects, depth: usize, intent: NavIntent) {
    let len = inst.panels[depth].items.len();
    let focused = inst.panels[depth].focused;
    let candidate = |i: usize| inst.is_focusable(depth, i);

    let target = match intent {
        NavIntent::Next => step_index(len, focused, true, candidate),
        NavIntent::Prev => step_index(len, focused, false, candidate),
        NavIntent::First => step_index(len, None, true, candidate),
        NavIntent::Last => step_index(len, None, false, candidate),
        NavIntent::Expand => {
            if let Some(node) = focused_submenu(inst, depth) {
                cancel_hover_open(inst, fx);
                submenu::request_open(inst, fx, node, true);
            }
            return;
        }
        NavIntent::Activate => {
            let Some(index) = focused else {
                return;
            };
            let Some(node) = inst.item_node(depth, index) else {
                return;
            };
            if focused_submenu(inst, depth).is_some() {
                cancel_hover_open(inst, fx);
                submenu::request_open(inst, fx, node, false);
            } else {
                let slot = ItemSlot {
                    panel: depth,
                    index,
                };
                pointer::activate(inst, fx, node, slot, Modifiers::NONE);
            }
            return;
        }
        NavIntent::Collapse | NavIntent::Dismiss => {
            // A submenu opened from the focused trigger closes first
            if inst.panels.len() > depth + 1 {
                cancel_hover_open(inst, fx);
                submenu::request_close_to(inst, fx, depth + 1);
            } else if depth == 0 {
                lifecycle::close(inst, fx, CloseReason::Escape, None);
            } else {
                collapse(inst, fx, depth);
            }
            return;
        }
    };

    if let Some(index) = target {
        inst.focus_item(fx, depth, index);
        let focused = inst.focused_node();
        submenu::abandon_load(inst, depth, focused);
        close_unfocused_child(inst, fx, depth);
    }
}

/// Moving focus off an open trigger closes its submenu
fn close_unfocused_child(inst: &mut Instance, fx: &mut Effects, depth: usize) {
    let Some(child_trigger) = inst.panels.get(depth + 1).and_then(|p| p.trigger) else {
        return;
    };
    if inst.focused_node() != Some(child_trigger) {
        submenu::request_close_to(inst, fx, depth + 1);
    }
}

/// Close the panel at `depth` and return focus to its trigger
fn collapse(inst: &mut Instance, fx: &mut Effects, depth: usize) {
    let Some(trigger) = inst.panels[depth].trigger else {
        return;
    };
    debug!("{}: collapsing submenu at depth {}", inst.id, depth);
    submenu::abandon_load(inst, depth, None);
    inst.queue.push_back(Step::CloseSubmenusTo(depth));
    inst.queue.push_back(Step::Focus(trigger));
    lifecycle::run_queue(inst, fx);
}

/// Node of the focused item in `depth` when it is an enabled submenu trigger
fn focused_submenu(inst: &Instance, depth: usize) -> Option<NodeId> {
    let index = inst.panels[depth].focused?;
    let item = inst.panels[depth].items.get(index)?;
    if !item.is_submenu() || item.is_disabled() {
        return None;
    }
    inst.item_node(depth, index)
}

fn cancel_hover_open(inst: &mut Instance, fx: &mut Effects) {
    if inst.hover_open.take().is_some() {
        inst.timers.cancel(fx, inst.id, TimerKind::HoverOpen);
    }
}
