//! The registry owns every menu instance and enforces single-open
//!
//! All host interaction goes through here: API calls return the resulting
//! [`Cmd`] and host events arrive through [`Registry::update`]. After each
//! handler the registry drains cross-instance signals so at most one
//! instance is open or opening at a time.

use std::collections::BTreeMap;
use std::time::Duration;

use kurbo::{Rect, Size};
use tracing::{debug, warn};

use crate::animation::AnimationOptions;
use crate::builder::{MenuConfig, MenuSource};
use crate::commands::{Cmd, Effects, Signal};
use crate::item::{deep_clone, MenuItem};
use crate::messages::{EventTarget, Msg};
use crate::model::{
    CloseReason, HostElementId, Instance, InstanceId, OpenRequest, OpenTicket, Phase,
    TimerKind, TriggerBinding,
};
use crate::position::{ElementPlacement, PositionConfig};
use crate::theme::Theme;
use crate::update;
use crate::view::decorate_panel;

pub struct Registry {
    instances: BTreeMap<InstanceId, Instance>,
    /// Instances that passed their before-open hook, in registration order
    registered: Vec<InstanceId>,
    viewport: Size,
    next_id: u32,
    next_ticket: u64,
}

impl Registry {
    pub fn new(viewport: Size) -> Self {
        Self {
            instances: BTreeMap::new(),
            registered: Vec::new(),
            viewport,
            next_id: 0,
            next_ticket: 0,
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Create a closed instance from a fully built configuration
    pub fn create(&mut self, config: MenuConfig) -> InstanceId {
        self.next_id += 1;
        let id = InstanceId(self.next_id);
        self.instances
            .insert(id, Instance::new(id, config, self.viewport));
        debug!("{}: created", id);
        id
    }

    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    pub fn is_open(&self, id: InstanceId) -> bool {
        self.instances.get(&id).is_some_and(Instance::is_open)
    }

    /// Ids of instances whose popup is mounted
    pub fn open_instances(&self) -> Vec<InstanceId> {
        self.instances
            .values()
            .filter(|i| i.is_mounted())
            .map(Instance::id)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Lifecycle API
    // ------------------------------------------------------------------------

    /// Open `id`; the returned ticket is settled by a later `Cmd::Settled`
    ///
    /// Opening an instance that is open or closing replaces its popup in place
    /// without running the close hooks for the replaced session.
    pub fn open(&mut self, id: InstanceId, request: OpenRequest) -> (OpenTicket, Cmd) {
        let ticket = self.next_ticket();
        let mut fx = Effects::new();
        match self.instances.get_mut(&id) {
            Some(inst) => update::open(inst, &mut fx, request, ticket),
            None => {
                warn!("open on unknown instance {}", id);
                fx.push(Cmd::Settled {
                    instance: id,
                    ticket,
                    selection: None,
                });
            }
        }
        (ticket, self.settle(fx))
    }

    /// Open anchored to a host element's bounding box
    pub fn open_at_element(
        &mut self,
        id: InstanceId,
        element: Rect,
        placement: ElementPlacement,
    ) -> (OpenTicket, Cmd) {
        self.open(id, OpenRequest::at_element(element, placement))
    }

    pub fn close(&mut self, id: InstanceId) -> Cmd {
        self.with_instance(id, |inst, fx| {
            update::close(inst, fx, CloseReason::Api, None)
        })
    }

    /// Close when open or opening, otherwise open
    pub fn toggle(&mut self, id: InstanceId, request: OpenRequest) -> (Option<OpenTicket>, Cmd) {
        let active = self
            .instances
            .get(&id)
            .is_some_and(|i| i.phase() != Phase::Closed);
        if active {
            let cmd = self.with_instance(id, |inst, fx| {
                update::close(inst, fx, CloseReason::Toggle, None)
            });
            (None, cmd)
        } else {
            let (ticket, cmd) = self.open(id, request);
            (Some(ticket), cmd)
        }
    }

    /// Synchronous teardown; no hooks run and pending tickets settle empty
    pub fn destroy(&mut self, id: InstanceId) -> Cmd {
        let Some(mut inst) = self.instances.remove(&id) else {
            return Cmd::None;
        };
        let mut fx = Effects::new();
        update::destroy(&mut inst, &mut fx);
        self.settle(fx)
    }

    /// Bind a trigger element; its context-menu and long-press events open the menu
    pub fn bind(&mut self, id: InstanceId, element: HostElementId, long_press: Option<Duration>) {
        if let Some(inst) = self.instances.get_mut(&id) {
            inst.binding = Some(TriggerBinding {
                element,
                long_press,
            });
        }
    }

    pub fn unbind(&mut self, id: InstanceId) -> Cmd {
        self.with_instance(id, |inst, fx| {
            inst.binding = None;
            inst.long_press = None;
            inst.timers.cancel(fx, inst.id, TimerKind::LongPress);
        })
    }

    // ------------------------------------------------------------------------
    // Live reconfiguration
    // ------------------------------------------------------------------------

    /// Replace the items; an open menu re-renders its root in place
    pub fn set_menu(&mut self, id: InstanceId, items: Vec<MenuItem>) -> Cmd {
        self.with_instance(id, |inst, fx| {
            inst.source = MenuSource::Items(items.clone());
            inst.items = items;
            update::rerender(inst, fx);
        })
    }

    /// Edit a copy of the items and apply it with [`Registry::set_menu`]
    pub fn update_menu(&mut self, id: InstanceId, edit: impl FnOnce(&mut Vec<MenuItem>)) -> Cmd {
        let Some(inst) = self.instances.get(&id) else {
            return Cmd::None;
        };
        let mut items = deep_clone(&inst.items);
        edit(&mut items);
        self.set_menu(id, items)
    }

    pub fn set_theme(&mut self, id: InstanceId, theme: Theme) -> Cmd {
        self.with_instance(id, |inst, fx| {
            for panel in inst.panels.iter().map(|p| p.node).collect::<Vec<_>>() {
                inst.options.theme.unapply(&mut inst.tree, panel);
                theme.apply(&mut inst.tree, panel);
            }
            inst.options.theme = theme;
            if inst.is_mounted() {
                fx.push(Cmd::Redraw(inst.id));
            }
        })
    }

    pub fn set_position(&mut self, id: InstanceId, position: PositionConfig) -> Cmd {
        self.with_instance(id, |inst, fx| {
            inst.options.position = position;
            if inst.is_mounted() {
                update::reposition(inst);
                fx.push(Cmd::Redraw(inst.id));
            }
        })
    }

    pub fn set_animation(&mut self, id: InstanceId, animation: AnimationOptions) -> Cmd {
        self.with_instance(id, |inst, fx| {
            inst.options.animation = animation;
            for panel in inst.panels.iter().map(|p| p.node).collect::<Vec<_>>() {
                decorate_panel(&mut inst.tree, panel, &inst.options);
            }
            if inst.is_mounted() {
                fx.push(Cmd::Redraw(inst.id));
            }
        })
    }

    /// Toggling while open installs or removes the lock immediately
    pub fn set_lock_scroll_outside(&mut self, id: InstanceId, lock: bool) -> Cmd {
        self.with_instance(id, |inst, _| {
            inst.options.lock_scroll_outside = lock;
            if !inst.listening {
                return;
            }
            if lock {
                inst.scroll_lock.install();
            } else {
                inst.scroll_lock.remove();
            }
        })
    }

    // ------------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------------

    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Instance(id, msg) => {
                self.with_instance(id, |inst, fx| update::update_instance(inst, fx, msg))
            }
            Msg::PointerDown(event) => {
                let mut fx = Effects::new();
                for inst in self.instances.values_mut() {
                    update::outside_pointer(inst, &mut fx, event);
                }
                self.settle(fx)
            }
            Msg::Scroll { target } => self.scroll(target),
            Msg::Resize(viewport) => {
                self.viewport = viewport;
                let mut fx = Effects::new();
                for inst in self.instances.values_mut() {
                    update::resize(inst, &mut fx, viewport);
                }
                self.settle(fx)
            }
        }
    }

    fn scroll(&self, target: EventTarget) -> Cmd {
        let blocked = self
            .instances
            .values()
            .any(|inst| inst.scroll_lock.suppresses(inst.id, &target));
        if blocked {
            Cmd::PreventDefault
        } else {
            Cmd::None
        }
    }

    // ------------------------------------------------------------------------
    // Coordination
    // ------------------------------------------------------------------------

    fn next_ticket(&mut self) -> OpenTicket {
        self.next_ticket += 1;
        OpenTicket(self.next_ticket)
    }

    fn with_instance(
        &mut self,
        id: InstanceId,
        f: impl FnOnce(&mut Instance, &mut Effects),
    ) -> Cmd {
        let mut fx = Effects::new();
        match self.instances.get_mut(&id) {
            Some(inst) => f(inst, &mut fx),
            None => {
                warn!("message for unknown instance {}", id);
                return Cmd::None;
            }
        }
        self.settle(fx)
    }

    /// Drain signals until the single-open invariant holds again
    fn settle(&mut self, mut fx: Effects) -> Cmd {
        while let Some(signal) = fx.next_signal() {
            match signal {
                Signal::Registered(id) => {
                    if !self.registered.contains(&id) {
                        self.registered.push(id);
                    }
                    let others: Vec<InstanceId> = self
                        .registered
                        .iter()
                        .copied()
                        .filter(|&other| other != id)
                        .collect();
                    for other in others {
                        if let Some(inst) = self.instances.get_mut(&other) {
                            debug!("{}: superseded by {}", other, id);
                            update::close(inst, &mut fx, CloseReason::Superseded, None);
                        }
                    }
                    self.resume_waiting(&mut fx);
                }
                Signal::Unregistered(id) => {
                    self.registered.retain(|&r| r != id);
                    self.resume_waiting(&mut fx);
                }
                Signal::OpenRequested(id, request) => {
                    let ticket = self.next_ticket();
                    if let Some(inst) = self.instances.get_mut(&id) {
                        update::open(inst, &mut fx, request, ticket);
                    }
                }
            }
        }
        fx.into_cmd()
    }

    /// Let the sole registered instance finish opening
    fn resume_waiting(&mut self, fx: &mut Effects) {
        let [id] = self.registered.as_slice() else {
            return;
        };
        if let Some(inst) = self.instances.get_mut(id) {
            if inst.awaiting_others() {
                update::resume_open(inst, fx);
            }
        }
    }
}
