//! Item activation, trigger bindings and document-level pointer events

use kurbo::Size;
use tracing::{debug, trace};

use crate::commands::{Cmd, Effects, Signal};
use crate::item::{ActionEvent, CheckboxEvent, MenuItem, RadioEvent};
use crate::keymap::Modifiers;
use crate::messages::{PointerEvent, TriggerEvent};
use crate::model::instance::LongPress;
use crate::model::{CloseReason, Instance, OpenRequest, TimerKind};
use crate::view::{set_checked, ItemSlot, NodeId};

use super::{lifecycle, submenu};

/// Touch movement beyond this distance cancels a long press
pub const LONG_PRESS_SLOP: f64 = 10.0;

pub(crate) fn click(inst: &mut Instance, fx: &mut Effects, node: NodeId, modifiers: Modifiers) {
    if !inst.is_open() {
        return;
    }
    let Some((item_node, slot)) = inst.resolve_item(node) else {
        return;
    };
    activate(inst, fx, item_node, slot, modifiers);
}

/// Run an item's behavior; disabled items do nothing
pub(crate) fn activate(
    inst: &mut Instance,
    fx: &mut Effects,
    node: NodeId,
    slot: ItemSlot,
    modifiers: Modifiers,
) {
    let Some(item) = inst.item(slot).cloned() else {
        return;
    };
    if item.is_disabled() || !item.is_interactive() {
        trace!("{}: ignoring activation of inert item", inst.id);
        return;
    }

    match &item {
        MenuItem::Action(action) => {
            inst.selection = Some(item.clone());
            if let Some(handler) = &action.on_click {
                handler.call(&ActionEvent {
                    item: item.clone(),
                    modifiers,
                });
            }
        }
        MenuItem::Link(link) => {
            inst.selection = Some(item.clone());
            let primary = inst.options.platform.primary_modifier();
            let passthrough = modifiers.contains(primary) || modifiers.shift() || modifiers.meta();
            fx.push(Cmd::Navigate {
                href: link.href.clone(),
                target: link.target.clone(),
                passthrough,
            });
        }
        MenuItem::Checkbox(checkbox) => {
            let mut updated = checkbox.clone();
            updated.checked = !checkbox.checked;
            let checked = updated.checked;
            let updated = MenuItem::Checkbox(updated);
            inst.replace_item(slot, updated.clone());
            set_checked(&mut inst.tree, node, checked);
            inst.selection = Some(updated.clone());
            if let Some(handler) = &checkbox.on_change {
                handler.call(&CheckboxEvent {
                    item: updated,
                    checked,
                });
            }
        }
        MenuItem::Radio(radio) => {
            select_radio(inst, slot, &radio.group);
            let Some(selected) = inst.item(slot).cloned() else {
                return;
            };
            inst.selection = Some(selected.clone());
            if let Some(handler) = &radio.on_select {
                handler.call(&RadioEvent {
                    item: selected,
                    group: radio.group.clone(),
                    value: radio.value.clone(),
                });
            }
        }
        MenuItem::Submenu(_) => {
            submenu::request_open(inst, fx, node, false);
            return;
        }
        MenuItem::Separator(_) | MenuItem::Label(_) => return,
    }

    fx.push(Cmd::Redraw(inst.id));
    if item.closes_on_action() {
        lifecycle::close(inst, fx, CloseReason::Selection, None);
    }
}

/// Check `slot` and uncheck the rest of its group within the same panel
fn select_radio(inst: &mut Instance, slot: ItemSlot, group: &str) {
    let count = inst.panels[slot.panel].items.len();
    for index in 0..count {
        let sibling = ItemSlot {
            panel: slot.panel,
            index,
        };
        let Some(MenuItem::Radio(radio)) = inst.item(sibling).cloned() else {
            continue;
        };
        if radio.group != group {
            continue;
        }
        let checked = index == slot.index;
        if radio.checked != checked {
            let mut updated = radio;
            updated.checked = checked;
            inst.replace_item(sibling, MenuItem::Radio(updated));
        }
        if let Some(node) = inst.item_node(slot.panel, index) {
            set_checked(&mut inst.tree, node, checked);
        }
    }
}

// ============================================================================
// Trigger binding
// ============================================================================

pub(crate) fn trigger(inst: &mut Instance, fx: &mut Effects, event: TriggerEvent) {
    let Some(binding) = inst.binding else {
        debug!("{}: trigger event without a binding", inst.id);
        return;
    };
    match event {
        TriggerEvent::ContextMenu { event, focused } => {
            fx.push(Cmd::PreventDefault);
            fx.signal(Signal::OpenRequested(
                inst.id,
                OpenRequest {
                    event: Some(event),
                    focused,
                    ..OpenRequest::default()
                },
            ));
        }
        TriggerEvent::TouchStart { position, focused } => {
            inst.long_press = Some(LongPress {
                origin: position,
                focused,
            });
            let delay = binding
                .long_press
                .unwrap_or_else(|| inst.options.long_press());
            inst.timers
                .schedule(fx, inst.id, TimerKind::LongPress, delay);
        }
        TriggerEvent::TouchMove { position } => {
            let moved = inst
                .long_press
                .is_some_and(|lp| (position - lp.origin).hypot() > LONG_PRESS_SLOP);
            if moved {
                cancel_long_press(inst, fx);
            }
        }
        TriggerEvent::TouchEnd => cancel_long_press(inst, fx),
    }
}

fn cancel_long_press(inst: &mut Instance, fx: &mut Effects) {
    if inst.long_press.take().is_some() {
        inst.timers.cancel(fx, inst.id, TimerKind::LongPress);
    }
}

pub(crate) fn long_press_elapsed(inst: &mut Instance, fx: &mut Effects) {
    let Some(press) = inst.long_press.take() else {
        return;
    };
    if inst.binding.is_none() {
        return;
    }
    debug!("{}: long press at {:?}", inst.id, press.origin);
    fx.signal(Signal::OpenRequested(
        inst.id,
        OpenRequest {
            position: Some(press.origin),
            focused: press.focused,
            ..OpenRequest::default()
        },
    ));
}

// ============================================================================
// Document-level events
// ============================================================================

/// A pointer went down somewhere in the host document
pub(crate) fn outside_pointer(inst: &mut Instance, fx: &mut Effects, event: PointerEvent) {
    if !inst.listening || event.target.is_inside(inst.id) {
        return;
    }
    lifecycle::close(inst, fx, CloseReason::OutsidePointer, Some(event));
}

pub(crate) fn resize(inst: &mut Instance, fx: &mut Effects, viewport: Size) {
    inst.viewport = viewport;
    if !inst.listening {
        return;
    }
    if inst.options.close_on_resize {
        lifecycle::close(inst, fx, CloseReason::Resize, None);
    } else {
        lifecycle::reposition(inst);
        fx.push(Cmd::Redraw(inst.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_slop_is_distance_not_axis() {
        let origin = Point::new(0.0, 0.0);
        assert!((Point::new(8.0, 8.0) - origin).hypot() > LONG_PRESS_SLOP);
        assert!((Point::new(6.0, 6.0) - origin).hypot() <= LONG_PRESS_SLOP);
    }
}
