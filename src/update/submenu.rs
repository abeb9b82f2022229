//! Submenu stack: hover intent, opening, lazy children and leaf-first closing

use tracing::{debug, warn};

use crate::animation::LeaveTarget;
use crate::commands::{Cmd, Effects};
use crate::hooks::HookError;
use crate::item::{normalize_all, Children, LoadTicket, MenuItem, RawItem};
use crate::model::instance::{PendingLoad, Step};
use crate::model::{Instance, Panel, TimerKind};
use crate::position::{place_submenu, Side};
use crate::view::{layout_panel, measure_panel, render_panel, set_expanded, NodeId};

use super::lifecycle;

// ============================================================================
// Hover intent
// ============================================================================

pub(crate) fn pointer_enter(inst: &mut Instance, fx: &mut Effects, node: NodeId) {
    if !inst.is_open() {
        return;
    }
    let Some(depth) = inst.panel_containing(node) else {
        return;
    };
    let item = inst.resolve_item(node);

    // Reaching the submenu (or coming back to its trigger) keeps it open
    if let Some(trigger) = inst.hover_close {
        let owner = inst.panels.iter().position(|p| p.trigger == Some(trigger));
        let back_on_trigger = item.map(|(n, _)| n) == Some(trigger);
        if owner.is_some_and(|k| depth >= k) || back_on_trigger {
            inst.timers.cancel(fx, inst.id, TimerKind::HoverClose);
            inst.hover_close = None;
        }
    }

    let Some((item_node, slot)) = item else {
        return;
    };
    let Some(entered) = inst.item(slot).cloned() else {
        return;
    };
    let hooks = inst.hooks.clone();
    hooks.on_item_hover(&entered);
    abandon_load(inst, slot.panel, Some(item_node));

    if inst.is_focusable(slot.panel, slot.index) {
        inst.focus_item(fx, slot.panel, slot.index);
    }

    let child_open = inst.panels.get(slot.panel + 1).and_then(|p| p.trigger) == Some(item_node);
    if child_open {
        inst.timers.cancel(fx, inst.id, TimerKind::HoverOpen);
        inst.hover_open = None;
        return;
    }

    if inst.panels.len() > slot.panel + 1 {
        request_close_to(inst, fx, slot.panel + 1);
    }

    if entered.is_submenu() && !entered.is_disabled() {
        inst.hover_open = Some(item_node);
        let delay = inst.options.submenu.open_delay();
        inst.timers.schedule(fx, inst.id, TimerKind::HoverOpen, delay);
    } else if inst.hover_open.take().is_some() {
        inst.timers.cancel(fx, inst.id, TimerKind::HoverOpen);
    }
}

pub(crate) fn pointer_leave(inst: &mut Instance, fx: &mut Effects, node: NodeId) {
    if !inst.is_open() {
        return;
    }
    let Some((item_node, slot)) = inst.resolve_item(node) else {
        return;
    };
    if inst.hover_open == Some(item_node) {
        inst.timers.cancel(fx, inst.id, TimerKind::HoverOpen);
        inst.hover_open = None;
    }
    if inst.panels.get(slot.panel + 1).and_then(|p| p.trigger) == Some(item_node) {
        inst.hover_close = Some(item_node);
        let delay = inst.options.submenu.close_delay();
        inst.timers.schedule(fx, inst.id, TimerKind::HoverClose, delay);
    }
}

pub(crate) fn hover_open_elapsed(inst: &mut Instance, fx: &mut Effects) {
    let Some(trigger) = inst.hover_open.take() else {
        return;
    };
    if inst.tree.is_alive(trigger) {
        request_open(inst, fx, trigger, false);
    }
}

pub(crate) fn hover_close_elapsed(inst: &mut Instance, fx: &mut Effects) {
    let Some(trigger) = inst.hover_close.take() else {
        return;
    };
    if let Some(depth) = inst.panels.iter().position(|p| p.trigger == Some(trigger)) {
        debug!("{}: hover left submenu at depth {}", inst.id, depth);
        request_close_to(inst, fx, depth);
    }
}

// ============================================================================
// Queue entry points
// ============================================================================

pub(crate) fn request_open(inst: &mut Instance, fx: &mut Effects, trigger: NodeId, keyboard: bool) {
    inst.queue.push_back(Step::OpenSubmenu { trigger, keyboard });
    lifecycle::run_queue(inst, fx);
}

/// Close panels until `depth` remain
pub(crate) fn request_close_to(inst: &mut Instance, fx: &mut Effects, depth: usize) {
    abandon_load(inst, depth, None);
    inst.queue.push_back(Step::CloseSubmenusTo(depth));
    lifecycle::run_queue(inst, fx);
}

// ============================================================================
// Step execution
// ============================================================================

/// Open the submenu of `trigger` on top of the stack
///
/// If the trigger's panel is not the top one, deeper panels close first.
pub(crate) fn open_submenu(inst: &mut Instance, fx: &mut Effects, trigger: NodeId, keyboard: bool) {
    if !inst.is_open() {
        return;
    }
    let Some((node, slot)) = inst.resolve_item(trigger) else {
        debug!("{}: submenu trigger {} is gone", inst.id, trigger);
        return;
    };
    if node != trigger {
        return;
    }
    let depth = slot.panel;

    if inst.panels.get(depth + 1).and_then(|p| p.trigger) == Some(trigger) {
        if keyboard {
            inst.focus_first(fx, depth + 1);
        }
        return;
    }
    if inst.panels.len() > depth + 1 {
        inst.queue.push_front(Step::OpenSubmenu { trigger, keyboard });
        inst.queue.push_front(Step::CloseSubmenusTo(depth + 1));
        return;
    }

    let Some(MenuItem::Submenu(sub)) = inst.item(slot).cloned() else {
        return;
    };
    if sub.base.disabled {
        return;
    }

    match sub.children {
        Children::Items(items) => {
            let path = inst.panels[depth].path.clone().map(|mut p| {
                p.push(slot.index);
                p
            });
            mount_submenu(inst, fx, trigger, items, path, keyboard);
        }
        Children::Deferred(producer) => {
            let ticket = LoadTicket(inst.next_seq());
            inst.pending_load = Some(PendingLoad {
                ticket,
                trigger,
                keyboard,
            });
            match producer.produce(ticket) {
                Some(raw) => {
                    inst.pending_load = None;
                    mount_submenu(inst, fx, trigger, normalize_all(raw), None, keyboard);
                }
                None => debug!("{}: waiting for children of {}", inst.id, trigger),
            }
        }
    }
}

/// Forget a pending lazy load whose trigger sits at `depth` or deeper,
/// unless it is `keep`
pub(crate) fn abandon_load(inst: &mut Instance, depth: usize, keep: Option<NodeId>) {
    let Some(pending) = inst.pending_load else {
        return;
    };
    if keep == Some(pending.trigger) {
        return;
    }
    let stale = inst
        .resolve_item(pending.trigger)
        .map_or(true, |(_, slot)| slot.panel >= depth);
    if stale {
        debug!("{}: abandoning children load for {}", inst.id, pending.trigger);
        inst.pending_load = None;
    }
}

/// Lazily produced children arrived
pub(crate) fn children_loaded(
    inst: &mut Instance,
    fx: &mut Effects,
    ticket: LoadTicket,
    result: Result<Vec<RawItem>, HookError>,
) {
    let pending = match inst.pending_load {
        Some(pending) if pending.ticket == ticket => pending,
        _ => {
            debug!("{}: ignoring stale children load", inst.id);
            return;
        }
    };
    inst.pending_load = None;

    let raw = match result {
        Ok(raw) => raw,
        Err(err) => {
            warn!("{}: loading submenu children failed: {}", inst.id, err);
            return;
        }
    };
    if !inst.is_open() {
        return;
    }
    let Some((_, slot)) = inst.resolve_item(pending.trigger) else {
        return;
    };
    if inst.panels.len() != slot.panel + 1 {
        debug!("{}: submenu stack changed while loading", inst.id);
        return;
    }
    mount_submenu(
        inst,
        fx,
        pending.trigger,
        normalize_all(raw),
        None,
        pending.keyboard,
    );
}

fn mount_submenu(
    inst: &mut Instance,
    fx: &mut Effects,
    trigger: NodeId,
    items: Vec<MenuItem>,
    path: Option<Vec<usize>>,
    keyboard: bool,
) {
    let depth = inst.panels.len();
    let panel = render_panel(
        &mut inst.tree,
        &mut inst.node_map,
        &items,
        depth,
        &inst.options,
    );
    inst.tree.append(trigger, panel);
    inst.panels.push(Panel {
        node: panel,
        trigger: Some(trigger),
        items,
        focused: None,
        path,
    });
    set_expanded(&mut inst.tree, trigger, true);
    place_panel(inst, depth);

    let enabled = inst.options.animation.is_enabled();
    if let Some(token) = inst.animator.enter(&mut inst.tree, panel, enabled) {
        fx.push(Cmd::RequestFrame {
            instance: inst.id,
            token,
        });
    }
    if keyboard {
        inst.focus_first(fx, depth);
    }
    fx.push(Cmd::Redraw(inst.id));
    debug!("{}: submenu opened at depth {}", inst.id, depth);
}

/// Place the panel at `depth` beside its trigger row
pub(crate) fn place_panel(inst: &mut Instance, depth: usize) {
    let Some(panel) = inst.panels.get(depth) else {
        return;
    };
    let Some(trigger) = panel.trigger else {
        return;
    };
    let node = panel.node;
    let metrics = inst.options.metrics;
    let size = measure_panel(&inst.tree, node, &metrics);
    let (origin, side) = place_submenu(
        inst.tree.rect(trigger),
        size,
        inst.viewport,
        inst.options.submenu.placement,
        inst.tree.direction(trigger),
        inst.options.position.padding,
    );
    layout_panel(&mut inst.tree, node, origin, &metrics);
    let side = match side {
        Side::Right => "right",
        Side::Left => "left",
    };
    inst.tree.set_attr(node, "data-side", side);
}

/// Start closing the deepest submenu
pub(crate) fn begin_close_leaf(inst: &mut Instance, fx: &mut Effects) {
    if inst.panels.len() < 2 {
        return;
    }
    let Some(node) = inst.panels.last().map(|p| p.node) else {
        return;
    };
    let safety = lifecycle::leave_safety(inst, fx);
    if !inst
        .animator
        .begin_leave(&mut inst.tree, node, LeaveTarget::Submenu, safety)
    {
        remove_leaf(inst, fx);
    }
}

/// Detach the deepest submenu once its leave finished
pub(crate) fn remove_leaf(inst: &mut Instance, fx: &mut Effects) {
    if inst.panels.len() < 2 {
        return;
    }
    let Some(panel) = inst.panels.pop() else {
        return;
    };
    if let Some(trigger) = panel.trigger {
        set_expanded(&mut inst.tree, trigger, false);
    }
    inst.tree.remove(panel.node);
    inst.node_map.forget_panels_from(inst.panels.len());
    inst.clamp_active();
    fx.push(Cmd::Redraw(inst.id));
    debug!("{}: submenu closed, depth now {}", inst.id, inst.panels.len());
}
