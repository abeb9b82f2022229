//! Submenu hover intent, stacking and lazily loaded children

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{nested_items, quiet, with_hooks, Host, RecordingHooks};

use ctxmenu::animation::AnimationOptions;
use ctxmenu::hooks::HookError;
use ctxmenu::item::{ChildProducer, LoadTicket, RawItem};
use ctxmenu::model::Phase;
use ctxmenu::{InstanceId, MenuBuilder, MenuMsg};

fn open_nested(host: &mut Host) -> InstanceId {
    let id = host.create(quiet(nested_items()));
    host.open_at(id, 100.0, 100.0);
    id
}

// ============================================================================
// Hover intent
// ============================================================================

#[test]
fn test_hover_opens_after_delay() {
    let mut host = Host::new();
    let id = open_nested(&mut host);

    host.hover(id, "Share");
    host.advance_ms(199);
    assert!(host.open_path(id).is_empty());

    host.advance_ms(1);
    assert_eq!(host.open_path(id), vec!["Share"]);
    // Hover opens never move focus into the submenu
    assert_eq!(host.focused_label(id).as_deref(), Some("Share"));
    let inst = host.instance(id);
    assert_eq!(inst.panels().len(), 2);
    assert_eq!(inst.panels()[1].focused, None);
}

#[test]
fn test_hover_reports_item() {
    let mut host = Host::new();
    let hooks = RecordingHooks::shared();
    let id = host.create(with_hooks(quiet(nested_items()), &hooks));
    host.open_at(id, 0.0, 0.0);
    host.hover(id, "Share");

    assert!(hooks.calls().contains(&"hover Share".to_string()));
    assert_eq!(host.focused_label(id).as_deref(), Some("Share"));
}

#[test]
fn test_moving_off_before_delay_cancels_open() {
    let mut host = Host::new();
    let id = open_nested(&mut host);

    host.hover(id, "Share");
    host.advance_ms(100);
    host.unhover(id, "Share");
    host.hover(id, "New");
    host.advance_ms(500);

    assert!(host.open_path(id).is_empty());
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_hovering_sibling_closes_open_submenu() {
    let mut host = Host::new();
    let id = open_nested(&mut host);
    host.hover(id, "Share");
    host.advance_ms(200);

    host.hover(id, "Quit");
    assert!(host.open_path(id).is_empty());
}

#[test]
fn test_reaching_submenu_cancels_close() {
    let mut host = Host::new();
    let id = open_nested(&mut host);
    host.hover(id, "Share");
    host.advance_ms(200);

    host.unhover(id, "Share");
    host.hover(id, "Email");
    host.advance_ms(1000);

    assert_eq!(host.open_path(id), vec!["Share"]);
    assert_eq!(host.focused_label(id).as_deref(), Some("Email"));
}

#[test]
fn test_returning_to_trigger_cancels_close() {
    let mut host = Host::new();
    let id = open_nested(&mut host);
    host.hover(id, "Share");
    host.advance_ms(200);

    host.unhover(id, "Share");
    host.advance_ms(100);
    host.hover(id, "Share");
    host.advance_ms(1000);

    assert_eq!(host.open_path(id), vec!["Share"]);
}

#[test]
fn test_leaving_trigger_closes_after_delay() {
    let mut host = Host::new();
    let id = open_nested(&mut host);
    host.hover(id, "Share");
    host.advance_ms(200);

    host.unhover(id, "Share");
    host.advance_ms(149);
    assert_eq!(host.open_path(id), vec!["Share"]);
    host.advance_ms(1);
    assert!(host.open_path(id).is_empty());
    assert_eq!(host.instance(id).phase(), Phase::Open);
}

#[test]
fn test_disabled_submenu_never_opens() {
    let mut host = Host::new();
    let id = host.create(quiet(vec![RawItem::submenu(
        "Locked",
        vec![RawItem::action("Secret")],
    )
    .disabled(true)]));
    host.open_at(id, 0.0, 0.0);

    host.hover(id, "Locked");
    host.advance_ms(500);
    host.click(id, "Locked");
    assert!(host.open_path(id).is_empty());
}

// ============================================================================
// Stack
// ============================================================================

#[test]
fn test_click_opens_immediately() {
    let mut host = Host::new();
    let id = open_nested(&mut host);
    host.click(id, "Share");
    assert_eq!(host.open_path(id), vec!["Share"]);
    host.click(id, "Social");
    assert_eq!(host.open_path(id), vec!["Share", "Social"]);
    assert_eq!(host.instance(id).phase(), Phase::Open);
}

#[test]
fn test_aria_expanded_follows_submenu() {
    let mut host = Host::new();
    let id = open_nested(&mut host);
    let trigger = host.node(id, "Share");
    let expanded = |host: &Host| {
        host.instance(id)
            .tree()
            .attr(trigger, "aria-expanded")
            .map(str::to_string)
    };

    assert_eq!(expanded(&host).as_deref(), Some("false"));
    host.click(id, "Share");
    assert_eq!(expanded(&host).as_deref(), Some("true"));
    host.hover(id, "New");
    assert_eq!(expanded(&host).as_deref(), Some("false"));
}

#[test]
fn test_submenu_flips_left_near_right_edge() {
    let mut host = Host::new();
    let id = host.create(quiet(nested_items()));
    host.open_at(id, 990.0, 10.0);
    host.click(id, "Share");

    let inst = host.instance(id);
    let panel = inst.panels()[1].node;
    assert_eq!(inst.tree().attr(panel, "data-side"), Some("left"));
    let trigger = inst.node_for_label("Share").unwrap();
    assert!(inst.tree().rect(panel).x1 <= inst.tree().rect(trigger).x0 + 0.5);
}

#[test]
fn test_submenu_opens_right_by_default() {
    let mut host = Host::new();
    let id = open_nested(&mut host);
    host.click(id, "Share");

    let inst = host.instance(id);
    let panel = inst.panels()[1].node;
    assert_eq!(inst.tree().attr(panel, "data-side"), Some("right"));
}

#[test]
fn test_animated_close_is_leaf_first() {
    let mut host = Host::new();
    let id = host.create(MenuBuilder::new(nested_items()).animation(AnimationOptions::default()));
    host.open_at(id, 0.0, 0.0);
    host.flush_frames();
    host.click(id, "Share");
    host.flush_frames();
    host.click(id, "Social");
    host.flush_frames();
    assert_eq!(host.instance(id).panels().len(), 3);

    host.close(id);
    let social = host.instance(id).panels()[2].node;
    assert_eq!(host.instance(id).leaving(), Some(social));

    assert!(host.end_transition(id));
    assert_eq!(host.instance(id).panels().len(), 2);
    assert!(host.end_transition(id));
    assert_eq!(host.instance(id).panels().len(), 1);
    assert_eq!(host.instance(id).phase(), Phase::Closing);
    assert!(host.end_transition(id));
    assert_eq!(host.instance(id).phase(), Phase::Closed);
    assert!(!host.end_transition(id));
}

#[test]
fn test_switching_submenus_waits_for_leave() {
    let mut host = Host::new();
    let items = vec![
        RawItem::submenu("A", vec![RawItem::action("A1")]),
        RawItem::submenu("B", vec![RawItem::action("B1")]),
    ];
    let id = host.create(MenuBuilder::new(items).animation(AnimationOptions::default()));
    host.open_at(id, 0.0, 0.0);
    host.flush_frames();
    host.click(id, "A");
    host.flush_frames();

    host.click(id, "B");
    // A is still leaving, B is queued behind it
    assert_eq!(host.open_path(id), vec!["A"]);
    host.end_transition(id);
    assert_eq!(host.open_path(id), vec!["B"]);
}

// ============================================================================
// Lazy children
// ============================================================================

fn lazy_menu(seen: Rc<RefCell<Vec<LoadTicket>>>) -> MenuBuilder {
    let producer = ChildProducer::new(move |ticket| {
        seen.borrow_mut().push(ticket);
        None
    });
    quiet(vec![
        RawItem::action("New"),
        RawItem::lazy_submenu("Recent", producer),
    ])
}

#[test]
fn test_lazy_children_mount_when_loaded() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();
    let id = host.create(lazy_menu(seen.clone()));
    host.open_at(id, 0.0, 0.0);
    host.click(id, "Recent");
    assert!(host.open_path(id).is_empty());

    let ticket = seen.borrow()[0];
    host.to(
        id,
        MenuMsg::ChildrenLoaded {
            ticket,
            result: Ok(vec![RawItem::action("notes.txt")]),
        },
    );
    assert_eq!(host.open_path(id), vec!["Recent"]);
    assert!(host.instance(id).node_for_label("notes.txt").is_some());
}

#[test]
fn test_load_for_abandoned_trigger_is_dropped() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();
    let id = host.create(lazy_menu(seen.clone()));
    host.open_at(id, 0.0, 0.0);

    host.hover(id, "Recent");
    host.advance_ms(200);
    assert_eq!(seen.borrow().len(), 1);
    host.unhover(id, "Recent");
    host.hover(id, "New");
    host.advance_ms(1000);

    let ticket = seen.borrow()[0];
    host.to(
        id,
        MenuMsg::ChildrenLoaded {
            ticket,
            result: Ok(vec![RawItem::action("notes.txt")]),
        },
    );
    assert!(host.open_path(id).is_empty());
    assert!(host.instance(id).node_for_label("notes.txt").is_none());
}

#[test]
fn test_load_survives_returning_to_trigger() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();
    let id = host.create(lazy_menu(seen.clone()));
    host.open_at(id, 0.0, 0.0);

    host.hover(id, "Recent");
    host.advance_ms(200);
    host.unhover(id, "Recent");
    host.hover(id, "Recent");

    let ticket = seen.borrow()[0];
    host.to(
        id,
        MenuMsg::ChildrenLoaded {
            ticket,
            result: Ok(vec![RawItem::action("notes.txt")]),
        },
    );
    assert_eq!(host.open_path(id), vec!["Recent"]);
}

#[test]
fn test_stale_children_are_dropped() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();
    let id = host.create(lazy_menu(seen.clone()));
    host.open_at(id, 0.0, 0.0);
    host.click(id, "Recent");
    host.close(id);
    host.open_at(id, 0.0, 0.0);
    host.click(id, "Recent");

    let (first, second) = (seen.borrow()[0], seen.borrow()[1]);
    assert_ne!(first, second);
    host.to(
        id,
        MenuMsg::ChildrenLoaded {
            ticket: first,
            result: Ok(vec![RawItem::action("stale")]),
        },
    );
    assert!(host.open_path(id).is_empty());

    host.to(
        id,
        MenuMsg::ChildrenLoaded {
            ticket: second,
            result: Ok(vec![RawItem::action("fresh")]),
        },
    );
    assert!(host.instance(id).node_for_label("fresh").is_some());
    assert!(host.instance(id).node_for_label("stale").is_none());
}

#[test]
fn test_failed_load_leaves_submenu_closed() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();
    let id = host.create(lazy_menu(seen.clone()));
    host.open_at(id, 0.0, 0.0);
    host.click(id, "Recent");

    let ticket = seen.borrow()[0];
    host.to(
        id,
        MenuMsg::ChildrenLoaded {
            ticket,
            result: Err(HookError::new("timeout")),
        },
    );
    assert!(host.open_path(id).is_empty());
    assert!(host.instance(id).is_open());

    // The ticket is spent
    host.to(
        id,
        MenuMsg::ChildrenLoaded {
            ticket,
            result: Ok(vec![RawItem::action("late")]),
        },
    );
    assert!(host.open_path(id).is_empty());
}

#[test]
fn test_ready_producer_mounts_immediately() {
    let calls = Rc::new(Cell::new(0));
    let counted = calls.clone();
    let producer = ChildProducer::ready(move || {
        counted.set(counted.get() + 1);
        vec![RawItem::action("Generated")]
    });
    let mut host = Host::new();
    let id = host.create(quiet(vec![RawItem::lazy_submenu("More", producer)]));
    host.open_at(id, 0.0, 0.0);

    host.click(id, "More");
    assert_eq!(host.open_path(id), vec!["More"]);
    host.hover(id, "More");
    host.unhover(id, "More");
    host.advance_ms(150);
    host.click(id, "More");
    assert_eq!(calls.get(), 2);
}
