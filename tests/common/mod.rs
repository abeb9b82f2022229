//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use kurbo::Size;

use ctxmenu::animation::AnimationOptions;
use ctxmenu::hooks::{HookOutcome, MenuHooks};
use ctxmenu::item::{MenuItem, RawItem};
use ctxmenu::keymap::{Keystroke, Modifiers};
use ctxmenu::model::{
    CloseContext, FrameToken, HookTicket, Instance, InstanceId, OpenContext, OpenRequest,
    OpenTicket, TimerToken,
};
use ctxmenu::view::NodeId;
use ctxmenu::{Cmd, FocusTarget, MenuBuilder, MenuMsg, Msg, Registry};

pub const VIEWPORT: Size = Size::new(1000.0, 800.0);

/// A host that records every command and drives timers on a virtual clock
pub struct Host {
    pub registry: Registry,
    pub now: Duration,
    timers: Vec<(Duration, InstanceId, TimerToken)>,
    frames: Vec<(InstanceId, FrameToken)>,
    pub focus: Vec<FocusTarget>,
    pub settled: Vec<(OpenTicket, Option<MenuItem>)>,
    pub navigations: Vec<(String, Option<String>, bool)>,
    pub mounted: Vec<InstanceId>,
    pub prevented: usize,
}

impl Host {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(VIEWPORT),
            now: Duration::ZERO,
            timers: Vec::new(),
            frames: Vec::new(),
            focus: Vec::new(),
            settled: Vec::new(),
            navigations: Vec::new(),
            mounted: Vec::new(),
            prevented: 0,
        }
    }

    pub fn apply(&mut self, cmd: Cmd) {
        for cmd in cmd.flatten() {
            match cmd {
                Cmd::ScheduleTimer {
                    instance,
                    token,
                    delay,
                } => self.timers.push((self.now + delay, instance, token)),
                Cmd::CancelTimer { token, .. } => self.timers.retain(|(_, _, t)| *t != token),
                Cmd::RequestFrame { instance, token } => self.frames.push((instance, token)),
                Cmd::Focus(target) => self.focus.push(target),
                Cmd::PreventDefault => self.prevented += 1,
                Cmd::Navigate {
                    href,
                    target,
                    passthrough,
                } => self.navigations.push((href, target, passthrough)),
                Cmd::Mount { instance, .. } => self.mounted.push(instance),
                Cmd::Unmount { instance, .. } => self.mounted.retain(|&i| i != instance),
                Cmd::Settled {
                    ticket, selection, ..
                } => self.settled.push((ticket, selection)),
                Cmd::None | Cmd::Batch(_) | Cmd::Redraw(_) => {}
            }
        }
    }

    pub fn send(&mut self, msg: Msg) {
        let cmd = self.registry.update(msg);
        self.apply(cmd);
    }

    pub fn to(&mut self, id: InstanceId, msg: MenuMsg) {
        self.send(Msg::to(id, msg));
    }

    pub fn create(&mut self, builder: MenuBuilder) -> InstanceId {
        self.registry.create(builder.build())
    }

    pub fn open(&mut self, id: InstanceId, request: OpenRequest) -> OpenTicket {
        let (ticket, cmd) = self.registry.open(id, request);
        self.apply(cmd);
        ticket
    }

    pub fn open_at(&mut self, id: InstanceId, x: f64, y: f64) -> OpenTicket {
        self.open(id, OpenRequest::at(x, y))
    }

    pub fn close(&mut self, id: InstanceId) {
        let cmd = self.registry.close(id);
        self.apply(cmd);
    }

    /// Move the clock forward, firing due timers in order
    pub fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, (due, _, _))| *due <= target)
                .min_by_key(|(_, (due, _, _))| *due)
                .map(|(i, _)| i);
            let Some(index) = next else {
                break;
            };
            let (due, instance, token) = self.timers.remove(index);
            self.now = due;
            self.to(instance, MenuMsg::Timer(token));
        }
        self.now = target;
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Deliver every requested paint frame
    pub fn flush_frames(&mut self) {
        while !self.frames.is_empty() {
            for (instance, token) in std::mem::take(&mut self.frames) {
                self.to(instance, MenuMsg::Frame(token));
            }
        }
    }

    /// Report the end of the in-flight leave transition, if any
    pub fn end_transition(&mut self, id: InstanceId) -> bool {
        let Some(node) = self.instance(id).leaving() else {
            return false;
        };
        self.to(id, MenuMsg::TransitionEnd(node));
        true
    }

    pub fn instance(&self, id: InstanceId) -> &Instance {
        self.registry
            .instance(id)
            .expect("instance should exist")
    }

    pub fn node(&self, id: InstanceId, label: &str) -> NodeId {
        self.instance(id)
            .node_for_label(label)
            .unwrap_or_else(|| panic!("no rendered item labelled {:?}", label))
    }

    pub fn hover(&mut self, id: InstanceId, label: &str) {
        let node = self.node(id, label);
        self.to(id, MenuMsg::PointerEnter(node));
    }

    pub fn unhover(&mut self, id: InstanceId, label: &str) {
        let node = self.node(id, label);
        self.to(id, MenuMsg::PointerLeave(node));
    }

    pub fn click(&mut self, id: InstanceId, label: &str) {
        self.click_with(id, label, Modifiers::NONE);
    }

    pub fn click_with(&mut self, id: InstanceId, label: &str, modifiers: Modifiers) {
        let node = self.node(id, label);
        self.to(id, MenuMsg::Click { node, modifiers });
    }

    pub fn key(&mut self, id: InstanceId, stroke: Keystroke) {
        self.to(id, MenuMsg::Key(stroke));
    }

    /// Label of the item holding focus in the active panel
    pub fn focused_label(&self, id: InstanceId) -> Option<String> {
        let inst = self.instance(id);
        let panel = inst.active_panel()?;
        let index = panel.focused?;
        panel.items.get(index)?.label().map(str::to_string)
    }

    /// Labels of the submenu triggers currently open, outermost first
    pub fn open_path(&self, id: InstanceId) -> Vec<String> {
        let inst = self.instance(id);
        let panels = inst.panels();
        (1..panels.len())
            .filter_map(|depth| {
                let trigger = panels[depth].trigger?;
                let parent = &panels[depth - 1];
                let index = (0..parent.items.len())
                    .find(|&i| inst.item_node(depth - 1, i) == Some(trigger))?;
                parent.items[index].label().map(str::to_string)
            })
            .collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

/// A menu builder with animation off, so opens and closes are synchronous
pub fn quiet(items: Vec<RawItem>) -> MenuBuilder {
    MenuBuilder::new(items).animation(AnimationOptions::disabled())
}

/// The nested menu used across the submenu tests
pub fn nested_items() -> Vec<RawItem> {
    vec![
        RawItem::action("New").with_shortcut("mod+N"),
        RawItem::submenu(
            "Share",
            vec![
                RawItem::action("Email"),
                RawItem::submenu("Social", vec![RawItem::action("Mastodon")]),
            ],
        ),
        RawItem::separator(),
        RawItem::action("Disabled").disabled(true),
        RawItem::action("Quit").with_shortcut("mod+Q"),
    ]
}

pub fn down() -> Keystroke {
    Keystroke::key(ctxmenu::keymap::KeyCode::Down)
}

pub fn key(code: ctxmenu::keymap::KeyCode) -> Keystroke {
    Keystroke::key(code)
}

/// Hooks that record every call and can be told to deny or defer
#[derive(Default)]
pub struct RecordingHooks {
    pub log: RefCell<Vec<String>>,
    pub deny_open: Cell<bool>,
    pub deny_close: Cell<bool>,
    pub defer_open: Cell<bool>,
    pub defer_close: Cell<bool>,
    pub tickets: RefCell<Vec<HookTicket>>,
}

impl RecordingHooks {
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn last_ticket(&self) -> HookTicket {
        *self
            .tickets
            .borrow()
            .last()
            .expect("a deferred hook should have run")
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl MenuHooks for RecordingHooks {
    fn on_before_open(&self, ctx: &OpenContext, ticket: HookTicket) -> HookOutcome {
        self.record(format!("before_open {}", ctx.instance));
        if self.defer_open.get() {
            self.tickets.borrow_mut().push(ticket);
            return HookOutcome::Defer;
        }
        HookOutcome::from(!self.deny_open.get())
    }

    fn on_open(&self, ctx: &OpenContext) {
        self.record(format!("open {}", ctx.instance));
    }

    fn on_before_close(&self, ctx: &CloseContext, ticket: HookTicket) -> HookOutcome {
        self.record(format!("before_close {} {:?}", ctx.instance, ctx.reason));
        if self.defer_close.get() {
            self.tickets.borrow_mut().push(ticket);
            return HookOutcome::Defer;
        }
        HookOutcome::from(!self.deny_close.get())
    }

    fn on_close(&self, ctx: &CloseContext) {
        self.record(format!("close {} {:?}", ctx.instance, ctx.reason));
    }

    fn on_after_close(&self, ctx: &CloseContext) {
        self.record(format!("after_close {}", ctx.instance));
    }

    fn on_item_hover(&self, item: &MenuItem) {
        self.record(format!("hover {}", item.label().unwrap_or("?")));
    }
}

/// Builder wired to shared recording hooks
pub fn with_hooks(builder: MenuBuilder, hooks: &Rc<RecordingHooks>) -> MenuBuilder {
    builder.shared_hooks(hooks.clone())
}
