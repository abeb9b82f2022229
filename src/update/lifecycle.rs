//! Open/close lifecycle and the step queue

use kurbo::Point;
use tracing::{debug, warn};

use crate::animation::{LeaveTarget, PendingLeave};
use crate::builder::MenuSource;
use crate::commands::{Cmd, Effects, FocusTarget, Signal};
use crate::hooks::{HookError, HookOutcome};
use crate::item::{normalize_all, MenuItem};
use crate::messages::PointerEvent;
use crate::model::instance::{PendingClose, PendingOpen, Step};
use crate::model::{
    Anchor, CloseContext, CloseReason, FrameToken, HookTicket, Instance, OpenContext,
    OpenRequest, OpenTicket, OpeningStage, Panel, Phase, TimerKind, TimerToken,
};
use crate::position::{place_at_element, place_root};
use crate::view::{classes, fill_panel, layout_panel, measure_panel, render_panel};

use super::submenu;

// ============================================================================
// Opening
// ============================================================================

/// Start an open sequence for `ticket`
///
/// A newer open supersedes a pending one, whose ticket settles empty.
pub(crate) fn open(inst: &mut Instance, fx: &mut Effects, request: OpenRequest, ticket: OpenTicket) {
    if let Some(old) = inst.pending_open.take() {
        debug!("{}: open supersedes pending {:?}", inst.id, old.ticket);
        settle(inst, fx, old.ticket, None);
    }

    let (position, anchor) = resolve_anchor(inst, &request);
    let ctx = OpenContext {
        instance: inst.id,
        position,
        anchor,
        event: request.event,
    };
    let hook = HookTicket(inst.next_seq());
    inst.pending_open = Some(PendingOpen {
        ticket,
        request,
        ctx: ctx.clone(),
        hook: Some(hook),
        stage: OpeningStage::AwaitingHook,
    });
    inst.set_stage(OpeningStage::AwaitingHook);

    let hooks = inst.hooks.clone();
    match hooks.on_before_open(&ctx, hook) {
        HookOutcome::Allow => register(inst, fx),
        HookOutcome::Deny => abort_open(inst, fx, "on_before_open denied"),
        HookOutcome::Defer => debug!("{}: waiting for deferred on_before_open", inst.id),
    }
}

fn resolve_anchor(inst: &Instance, request: &OpenRequest) -> (Point, Anchor) {
    if let Some(p) = request.position {
        return (p, Anchor::Point(p));
    }
    if let Some(event) = &request.event {
        return (event.position, Anchor::Point(event.position));
    }
    if let Some((rect, placement)) = request.element {
        return (rect.origin(), Anchor::Element { rect, placement });
    }
    let p = inst
        .anchor_fn
        .as_ref()
        .and_then(|f| f.get())
        .unwrap_or(Point::ZERO);
    (p, Anchor::Point(p))
}

fn register(inst: &mut Instance, fx: &mut Effects) {
    inst.set_stage(OpeningStage::AwaitingOthers);
    fx.signal(Signal::Registered(inst.id));
}

/// Drop the pending open; a popup that is still mounted stays as it was
fn abort_open(inst: &mut Instance, fx: &mut Effects, why: &str) {
    let Some(pending) = inst.pending_open.take() else {
        return;
    };
    debug!("{}: open aborted ({})", inst.id, why);
    settle(inst, fx, pending.ticket, None);
    if !inst.is_mounted() {
        inst.phase = Phase::Closed;
        fx.signal(Signal::Unregistered(inst.id));
    }
}

/// A deferred before-open or before-close hook settled
pub(crate) fn hook_resolved(
    inst: &mut Instance,
    fx: &mut Effects,
    ticket: HookTicket,
    result: Result<bool, HookError>,
) {
    let allow = match result {
        Ok(allow) => allow,
        Err(err) => {
            warn!("{}: lifecycle hook failed: {}", inst.id, err);
            false
        }
    };

    let open_hook = inst
        .pending_open
        .as_ref()
        .filter(|p| p.stage == OpeningStage::AwaitingHook)
        .and_then(|p| p.hook);
    if open_hook == Some(ticket) {
        if allow {
            register(inst, fx);
        } else {
            abort_open(inst, fx, "deferred on_before_open denied");
        }
        return;
    }

    if inst.pending_close.as_ref().map(|p| p.hook) == Some(ticket) {
        let Some(pending) = inst.pending_close.take() else {
            return;
        };
        if allow {
            begin_close(inst, fx, pending.ctx);
        } else {
            debug!("{}: close vetoed by deferred on_before_close", inst.id);
        }
        return;
    }

    debug!("{}: ignoring stale hook result {:?}", inst.id, ticket);
}

/// Every other instance has closed; mount the content
///
/// A popup that is still mounted (open, or mid-leave) is torn down without
/// `on_close`/`on_after_close`; its ticket settles with the selection so far.
pub(crate) fn resume_open(inst: &mut Instance, fx: &mut Effects) {
    let Some(pending) = inst.pending_open.take() else {
        return;
    };

    if inst.animator.cancel(&mut inst.tree).is_some() {
        inst.timers.cancel(fx, inst.id, TimerKind::LeaveSafety);
    }
    inst.queue.clear();
    inst.pending_close = None;

    if inst.is_mounted() {
        debug!("{}: re-open tears down the current popup", inst.id);
        teardown(inst, fx);
        if let Some(old) = inst.ticket.take() {
            let selection = inst.selection.take();
            settle(inst, fx, old, selection);
        }
    }
    inst.selection = None;
    inst.close_ctx = None;

    mount(inst, fx, pending);
}

fn mount(inst: &mut Instance, fx: &mut Effects, pending: PendingOpen) {
    if let MenuSource::Producer(produce) = &inst.source {
        inst.items = normalize_all(produce());
    }
    inst.restore_focus = pending.request.focused;
    inst.anchor = Some(pending.ctx.anchor);
    inst.open_ctx = Some(pending.ctx);
    inst.ticket = Some(pending.ticket);

    let root = render_panel(
        &mut inst.tree,
        &mut inst.node_map,
        &inst.items,
        0,
        &inst.options,
    );
    inst.tree.set_attr(root, "data-instance", inst.id.to_string());
    inst.panels.push(Panel {
        node: root,
        trigger: None,
        items: inst.items.clone(),
        focused: None,
        path: Some(Vec::new()),
    });
    inst.active = 0;
    fx.push(Cmd::Mount {
        instance: inst.id,
        root,
        mount: inst.mount,
    });
    reposition(inst);

    inst.listening = true;
    if inst.options.lock_scroll_outside {
        inst.scroll_lock.install();
    }

    let enabled = inst.options.animation.is_enabled();
    match inst.animator.enter(&mut inst.tree, root, enabled) {
        Some(token) => {
            inst.phase = Phase::Opening(OpeningStage::AwaitingFrame);
            fx.push(Cmd::RequestFrame {
                instance: inst.id,
                token,
            });
        }
        None => finish_open(inst, fx),
    }
    debug!("{}: mounted {} items", inst.id, inst.items.len());
}

/// A paint frame arrived; completes an enter transition
pub(crate) fn frame(inst: &mut Instance, fx: &mut Effects, token: FrameToken) {
    let Some(node) = inst.animator.frame(&mut inst.tree, token) else {
        debug!("{}: ignoring stale frame {:?}", inst.id, token);
        return;
    };
    fx.push(Cmd::Redraw(inst.id));
    if Some(node) == inst.root_element()
        && inst.phase == Phase::Opening(OpeningStage::AwaitingFrame)
    {
        finish_open(inst, fx);
    }
}

fn finish_open(inst: &mut Instance, fx: &mut Effects) {
    inst.phase = Phase::Open;
    if let Some(ctx) = inst.open_ctx.clone() {
        let hooks = inst.hooks.clone();
        hooks.on_open(&ctx);
    }
    inst.focus_first(fx, 0);
    fx.push(Cmd::Redraw(inst.id));
    debug!("{}: open", inst.id);
}

// ============================================================================
// Placement and re-render
// ============================================================================

/// Place the root against its anchor, then every open submenu
pub(crate) fn reposition(inst: &mut Instance) {
    let Some(root) = inst.root_element() else {
        return;
    };
    let metrics = inst.options.metrics;
    let cfg = inst.options.position;
    let size = measure_panel(&inst.tree, root, &metrics);
    let origin = match inst.anchor {
        Some(Anchor::Element { rect, placement }) => {
            place_at_element(rect, placement, size, inst.viewport, &cfg).0
        }
        Some(Anchor::Point(p)) => place_root(p, size, inst.viewport, &cfg),
        None => place_root(Point::ZERO, size, inst.viewport, &cfg),
    };
    layout_panel(&mut inst.tree, root, origin, &metrics);
    inst.tree
        .set_style(root, classes::VAR_X, format!("{}px", origin.x));
    inst.tree
        .set_style(root, classes::VAR_Y, format!("{}px", origin.y));

    for depth in 1..inst.panels.len() {
        submenu::place_panel(inst, depth);
    }
}

/// Rebuild the root rows from the current items, dropping open submenus
pub(crate) fn rerender(inst: &mut Instance, fx: &mut Effects) {
    if !inst.is_open() {
        return;
    }
    let Some(root) = inst.root_element() else {
        return;
    };
    inst.timers.cancel(fx, inst.id, TimerKind::HoverOpen);
    inst.timers.cancel(fx, inst.id, TimerKind::HoverClose);
    inst.hover_open = None;
    inst.hover_close = None;
    inst.pending_load = None;
    inst.queue.clear();
    inst.panels.truncate(1);
    inst.clamp_active();

    inst.node_map.clear();
    fill_panel(
        &mut inst.tree,
        &mut inst.node_map,
        root,
        &inst.items,
        0,
        &inst.options,
    );
    inst.panels[0].items = inst.items.clone();
    inst.panels[0].focused = None;
    reposition(inst);
    if inst.phase == Phase::Open {
        inst.focus_first(fx, 0);
    }
    fx.push(Cmd::Redraw(inst.id));
    debug!("{}: re-rendered {} items", inst.id, inst.items.len());
}

// ============================================================================
// Closing
// ============================================================================

/// Ask the instance to close
///
/// Closes requested while already closing are ignored. Superseding closes
/// skip `on_before_close`.
pub(crate) fn close(
    inst: &mut Instance,
    fx: &mut Effects,
    reason: CloseReason,
    event: Option<PointerEvent>,
) {
    if inst.pending_open.is_some() {
        abort_open(inst, fx, "closed while opening");
    }
    if inst.phase == Phase::Closing || !inst.is_mounted() {
        return;
    }
    if inst.pending_close.is_some() {
        if reason.asks_hook() {
            debug!("{}: close already waiting for on_before_close", inst.id);
            return;
        }
        inst.pending_close = None;
    }

    let ctx = inst.close_context(reason, event);
    if !reason.asks_hook() {
        begin_close(inst, fx, ctx);
        return;
    }

    let hook = HookTicket(inst.next_seq());
    let hooks = inst.hooks.clone();
    match hooks.on_before_close(&ctx, hook) {
        HookOutcome::Allow => begin_close(inst, fx, ctx),
        HookOutcome::Deny => debug!("{}: close vetoed by on_before_close", inst.id),
        HookOutcome::Defer => inst.pending_close = Some(PendingClose { hook, ctx }),
    }
}

fn begin_close(inst: &mut Instance, fx: &mut Effects, ctx: CloseContext) {
    debug!("{}: closing ({:?})", inst.id, ctx.reason);
    inst.listening = false;
    inst.scroll_lock.remove();
    for kind in [TimerKind::HoverOpen, TimerKind::HoverClose, TimerKind::LongPress] {
        inst.timers.cancel(fx, inst.id, kind);
    }
    inst.hover_open = None;
    inst.hover_close = None;
    inst.long_press = None;
    inst.pending_load = None;
    inst.close_ctx = Some(ctx);
    inst.phase = Phase::Closing;

    inst.queue.clear();
    inst.queue.push_back(Step::CloseSubmenusTo(1));
    inst.queue.push_back(Step::CloseRoot);
    run_queue(inst, fx);
}

fn finish_close(inst: &mut Instance, fx: &mut Effects) {
    teardown(inst, fx);
    inst.phase = Phase::Closed;

    let ctx = inst
        .close_ctx
        .take()
        .unwrap_or_else(|| inst.close_context(CloseReason::Api, None));
    let hooks = inst.hooks.clone();
    hooks.on_close(&ctx);
    if let Some(element) = inst.restore_focus.take() {
        fx.push(Cmd::Focus(FocusTarget::Host(element)));
    }
    hooks.on_after_close(&ctx);

    fx.signal(Signal::Unregistered(inst.id));
    let selection = inst.selection.take();
    if let Some(ticket) = inst.ticket.take() {
        settle(inst, fx, ticket, selection);
    }
    debug!("{}: closed", inst.id);
}

/// Detach the popup and forget everything tied to it; no hooks run
fn teardown(inst: &mut Instance, fx: &mut Effects) {
    inst.timers.cancel_all(fx, inst.id);
    inst.listening = false;
    inst.scroll_lock.remove();
    if let Some(root) = inst.root_element() {
        inst.tree.remove(root);
        fx.push(Cmd::Unmount {
            instance: inst.id,
            root,
        });
    }
    inst.panels.clear();
    inst.active = 0;
    inst.node_map.clear();
    inst.animator.clear();
    inst.queue.clear();
    inst.hover_open = None;
    inst.hover_close = None;
    inst.long_press = None;
    inst.pending_load = None;
}

/// Synchronous teardown for `Registry::destroy`
pub(crate) fn destroy(inst: &mut Instance, fx: &mut Effects) {
    teardown(inst, fx);
    inst.phase = Phase::Closed;
    inst.binding = None;
    inst.pending_close = None;
    if let Some(pending) = inst.pending_open.take() {
        settle(inst, fx, pending.ticket, None);
    }
    if let Some(ticket) = inst.ticket.take() {
        settle(inst, fx, ticket, None);
    }
    fx.signal(Signal::Unregistered(inst.id));
    debug!("{}: destroyed", inst.id);
}

fn settle(inst: &Instance, fx: &mut Effects, ticket: OpenTicket, selection: Option<MenuItem>) {
    fx.push(Cmd::Settled {
        instance: inst.id,
        ticket,
        selection,
    });
}

// ============================================================================
// Step queue
// ============================================================================

/// Run queued steps until the queue drains or a leave transition parks it
pub(crate) fn run_queue(inst: &mut Instance, fx: &mut Effects) {
    while !inst.animator.is_busy() {
        let Some(step) = inst.queue.pop_front() else {
            break;
        };
        match step {
            Step::CloseSubmenusTo(depth) => {
                let depth = depth.max(1);
                if inst.panels.len() > depth {
                    inst.queue.push_front(Step::CloseSubmenusTo(depth));
                    submenu::begin_close_leaf(inst, fx);
                }
            }
            Step::OpenSubmenu { trigger, keyboard } => {
                submenu::open_submenu(inst, fx, trigger, keyboard)
            }
            Step::Focus(node) => {
                if let Some((_, slot)) = inst.resolve_item(node) {
                    inst.focus_item(fx, slot.panel, slot.index);
                }
            }
            Step::CloseRoot => {
                inst.queue.push_front(Step::FinishClose);
                if let Some(root) = inst.root_element() {
                    let safety = leave_safety(inst, fx);
                    inst.animator
                        .begin_leave(&mut inst.tree, root, LeaveTarget::Root, safety);
                    fx.push(Cmd::Redraw(inst.id));
                }
            }
            Step::FinishClose => finish_close(inst, fx),
        }
    }
}

/// Safety timer for a leave transition; `None` when animation is off
pub(crate) fn leave_safety(inst: &mut Instance, fx: &mut Effects) -> Option<TimerToken> {
    if !inst.options.animation.is_enabled() {
        return None;
    }
    let timeout = inst.options.animation.leave_timeout();
    Some(
        inst.timers
            .schedule(fx, inst.id, TimerKind::LeaveSafety, timeout),
    )
}

/// A leave transition ended (transition end or safety timeout)
pub(crate) fn leave_finished(inst: &mut Instance, fx: &mut Effects, pending: PendingLeave) {
    if pending.target == LeaveTarget::Submenu {
        submenu::remove_leaf(inst, fx);
    }
    run_queue(inst, fx);
}
