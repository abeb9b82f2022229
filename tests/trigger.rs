//! Bound trigger elements: context-menu events and touch long press

mod common;

use std::time::Duration;

use common::{nested_items, quiet, Host};

use ctxmenu::model::{HostElementId, Phase};
use ctxmenu::{FocusTarget, InstanceId, MenuMsg, PointerEvent, TriggerEvent};
use kurbo::Point;

const BUTTON: HostElementId = HostElementId(42);

fn bound(host: &mut Host) -> InstanceId {
    let id = host.create(quiet(nested_items()));
    host.registry.bind(id, BUTTON, None);
    id
}

fn touch_start(host: &mut Host, id: InstanceId, x: f64, y: f64) {
    host.to(
        id,
        MenuMsg::Trigger(TriggerEvent::TouchStart {
            position: Point::new(x, y),
            focused: Some(BUTTON),
        }),
    );
}

fn touch_move(host: &mut Host, id: InstanceId, x: f64, y: f64) {
    host.to(
        id,
        MenuMsg::Trigger(TriggerEvent::TouchMove {
            position: Point::new(x, y),
        }),
    );
}

fn anchor(host: &Host, id: InstanceId) -> Option<Point> {
    host.instance(id).anchor().map(|a| a.point())
}

#[test]
fn test_context_menu_opens_at_event() {
    let mut host = Host::new();
    let id = bound(&mut host);
    host.to(
        id,
        MenuMsg::Trigger(TriggerEvent::ContextMenu {
            event: PointerEvent::at(30.0, 40.0),
            focused: Some(BUTTON),
        }),
    );

    assert_eq!(host.prevented, 1);
    assert!(host.instance(id).is_open());
    assert_eq!(anchor(&host, id), Some(Point::new(30.0, 40.0)));

    host.close(id);
    assert_eq!(host.focus.last(), Some(&FocusTarget::Host(BUTTON)));
}

#[test]
fn test_unbound_instance_ignores_trigger_events() {
    let mut host = Host::new();
    let id = host.create(quiet(nested_items()));
    host.to(
        id,
        MenuMsg::Trigger(TriggerEvent::ContextMenu {
            event: PointerEvent::at(30.0, 40.0),
            focused: None,
        }),
    );
    assert_eq!(host.prevented, 0);
    assert_eq!(host.instance(id).phase(), Phase::Closed);
}

#[test]
fn test_long_press_opens_after_default_delay() {
    let mut host = Host::new();
    let id = bound(&mut host);
    touch_start(&mut host, id, 50.0, 60.0);

    host.advance_ms(499);
    assert_eq!(host.instance(id).phase(), Phase::Closed);
    host.advance_ms(1);
    assert!(host.instance(id).is_open());
    assert_eq!(anchor(&host, id), Some(Point::new(50.0, 60.0)));
}

#[test]
fn test_binding_overrides_long_press_delay() {
    let mut host = Host::new();
    let id = host.create(quiet(nested_items()));
    host.registry
        .bind(id, BUTTON, Some(Duration::from_millis(300)));
    touch_start(&mut host, id, 0.0, 0.0);

    host.advance_ms(300);
    assert!(host.instance(id).is_open());
}

#[test]
fn test_small_movement_keeps_long_press() {
    let mut host = Host::new();
    let id = bound(&mut host);
    touch_start(&mut host, id, 100.0, 100.0);
    touch_move(&mut host, id, 106.0, 106.0);

    host.advance_ms(500);
    assert!(host.instance(id).is_open());
}

#[test]
fn test_movement_beyond_slop_cancels() {
    let mut host = Host::new();
    let id = bound(&mut host);
    touch_start(&mut host, id, 100.0, 100.0);
    touch_move(&mut host, id, 108.0, 108.0);

    host.advance_ms(1000);
    assert_eq!(host.instance(id).phase(), Phase::Closed);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_touch_end_cancels() {
    let mut host = Host::new();
    let id = bound(&mut host);
    touch_start(&mut host, id, 100.0, 100.0);
    host.advance_ms(200);
    host.to(id, MenuMsg::Trigger(TriggerEvent::TouchEnd));

    host.advance_ms(1000);
    assert_eq!(host.instance(id).phase(), Phase::Closed);
}

#[test]
fn test_unbind_cancels_pending_press() {
    let mut host = Host::new();
    let id = bound(&mut host);
    touch_start(&mut host, id, 100.0, 100.0);
    let cmd = host.registry.unbind(id);
    host.apply(cmd);

    host.advance_ms(1000);
    assert_eq!(host.instance(id).phase(), Phase::Closed);
    assert!(host.instance(id).binding().is_none());
}
