//! Per-instance state: phase, panels, timers and the pending open/close
//!
//! An `Instance` is created once by `Registry::create` and lives until
//! `Registry::destroy`. Nothing here is shared between instances.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Size};

use crate::animation::Animator;
use crate::builder::{AnchorFn, MenuConfig, MenuSource};
use crate::commands::{Cmd, Effects, FocusTarget};
use crate::config::MenuOptions;
use crate::hooks::MenuHooks;
use crate::item::{deep_clone, Children, LoadTicket, MenuItem};
use crate::messages::PointerEvent;
use crate::scroll_lock::ScrollLock;
use crate::view::{classes, ItemSlot, NodeId, NodeMap, VisualTree};

use super::context::{Anchor, CloseContext, CloseReason, OpenContext, OpenRequest};
use super::timers::Timers;
use super::{HookTicket, HostElementId, InstanceId, MountPoint, OpenTicket};

/// Which suspension point an open sequence is parked at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningStage {
    /// Waiting for a deferred `on_before_open`
    AwaitingHook,
    /// Waiting for other instances to finish closing
    AwaitingOthers,
    /// Content mounted, waiting for the paint frame that applies the open class
    AwaitingFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening(OpeningStage),
    Open,
    Closing,
}

/// A host element bound as the menu's trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerBinding {
    pub element: HostElementId,
    /// Touch hold time; `None` uses `MenuOptions::long_press_ms`
    pub long_press: Option<Duration>,
}

/// One rendered panel: the root (index 0) or an open submenu entry
#[derive(Debug, Clone)]
pub struct Panel {
    pub node: NodeId,
    /// Item node that spawned this panel; `None` for the root
    pub trigger: Option<NodeId>,
    pub items: Vec<MenuItem>,
    /// Index of the item holding the roving focus stop
    pub focused: Option<usize>,
    /// Indices from the root item list to this panel's items; `None` for
    /// lazily produced children that are not part of the item tree
    pub(crate) path: Option<Vec<usize>>,
}

#[derive(Debug, Clone)]
pub(crate) struct PendingOpen {
    pub ticket: OpenTicket,
    pub request: OpenRequest,
    pub ctx: OpenContext,
    pub hook: Option<HookTicket>,
    pub stage: OpeningStage,
}

#[derive(Debug, Clone)]
pub(crate) struct PendingClose {
    pub hook: HookTicket,
    pub ctx: CloseContext,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingLoad {
    pub ticket: LoadTicket,
    pub trigger: NodeId,
    pub keyboard: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LongPress {
    pub origin: Point,
    pub focused: Option<HostElementId>,
}

/// Serialized submenu-stack and close operations
///
/// Steps run in order; the queue parks while a leave transition is in flight
/// and resumes when it completes, which keeps closes leaf-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Close panels until only `depth` remain (never the root)
    CloseSubmenusTo(usize),
    OpenSubmenu { trigger: NodeId, keyboard: bool },
    Focus(NodeId),
    CloseRoot,
    FinishClose,
}

pub struct Instance {
    pub(crate) id: InstanceId,
    pub(crate) options: MenuOptions,
    pub(crate) source: MenuSource,
    pub(crate) items: Vec<MenuItem>,
    pub(crate) hooks: Rc<dyn MenuHooks>,
    pub(crate) anchor_fn: Option<AnchorFn>,
    pub(crate) mount: MountPoint,
    pub(crate) binding: Option<TriggerBinding>,

    pub(crate) phase: Phase,
    pub(crate) tree: VisualTree,
    pub(crate) node_map: NodeMap,
    pub(crate) panels: Vec<Panel>,
    /// Panel receiving keyboard input; the one holding the focus stop
    pub(crate) active: usize,
    pub(crate) timers: Timers,
    pub(crate) animator: Animator,
    pub(crate) queue: VecDeque<Step>,
    pub(crate) scroll_lock: ScrollLock,
    /// Outside-pointer and resize listeners installed
    pub(crate) listening: bool,
    pub(crate) viewport: Size,

    pub(crate) anchor: Option<Anchor>,
    pub(crate) open_ctx: Option<OpenContext>,
    pub(crate) ticket: Option<OpenTicket>,
    pub(crate) pending_open: Option<PendingOpen>,
    pub(crate) pending_close: Option<PendingClose>,
    pub(crate) close_ctx: Option<CloseContext>,
    pub(crate) pending_load: Option<PendingLoad>,
    pub(crate) selection: Option<MenuItem>,
    pub(crate) restore_focus: Option<HostElementId>,

    pub(crate) hover_open: Option<NodeId>,
    pub(crate) hover_close: Option<NodeId>,
    pub(crate) long_press: Option<LongPress>,
    seq: u64,
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("panels", &self.panels.len())
            .field("nodes", &self.tree.len())
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl Instance {
    pub(crate) fn new(id: InstanceId, config: MenuConfig, viewport: Size) -> Self {
        let items = match &config.source {
            MenuSource::Items(items) => items.clone(),
            MenuSource::Producer(_) => Vec::new(),
        };
        Self {
            id,
            options: config.options,
            source: config.source,
            items,
            hooks: config.hooks,
            anchor_fn: config.anchor_fn,
            mount: config.mount,
            binding: config.binding,
            phase: Phase::Closed,
            tree: VisualTree::new(),
            node_map: NodeMap::new(),
            panels: Vec::new(),
            active: 0,
            timers: Timers::default(),
            animator: Animator::default(),
            queue: VecDeque::new(),
            scroll_lock: ScrollLock::default(),
            listening: false,
            viewport,
            anchor: None,
            open_ctx: None,
            ticket: None,
            pending_open: None,
            pending_close: None,
            close_ctx: None,
            pending_load: None,
            selection: None,
            restore_focus: None,
            hover_open: None,
            hover_close: None,
            long_press: None,
            seq: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Public queries
    // ------------------------------------------------------------------------

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Content is mounted and not closing
    pub fn is_open(&self) -> bool {
        matches!(
            self.phase,
            Phase::Open | Phase::Opening(OpeningStage::AwaitingFrame)
        )
    }

    /// The popup root is attached (includes the closing transition)
    pub fn is_mounted(&self) -> bool {
        !self.panels.is_empty()
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Root node of the popup while mounted
    pub fn root_element(&self) -> Option<NodeId> {
        self.panels.first().map(|p| p.node)
    }

    pub fn tree(&self) -> &VisualTree {
        &self.tree
    }

    pub fn options(&self) -> &MenuOptions {
        &self.options
    }

    /// Independent copy of the current item tree
    pub fn menu(&self) -> Vec<MenuItem> {
        deep_clone(&self.items)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Open submenu entries, root-to-leaf
    pub fn open_submenus(&self) -> &[Panel] {
        self.panels.get(1..).unwrap_or(&[])
    }

    /// Panel holding the focus stop; keyboard input goes here
    ///
    /// A submenu opened by hover or Enter leaves focus on its trigger, so
    /// this is not always the deepest panel.
    pub fn active_panel(&self) -> Option<&Panel> {
        self.panels.get(self.active_depth()?)
    }

    /// Item node holding the roving focus stop in the active panel
    pub fn focused_node(&self) -> Option<NodeId> {
        let depth = self.active_depth()?;
        let index = self.panels[depth].focused?;
        self.item_node(depth, index)
    }

    pub fn binding(&self) -> Option<TriggerBinding> {
        self.binding
    }

    /// Panel whose leave transition the host should report the end of
    pub fn leaving(&self) -> Option<NodeId> {
        self.animator.pending_leave().map(|p| p.node)
    }

    pub fn scroll_lock_installed(&self) -> bool {
        self.scroll_lock.is_installed()
    }

    /// Last item activated during the current session
    pub fn selection(&self) -> Option<&MenuItem> {
        self.selection.as_ref()
    }

    pub fn item(&self, slot: ItemSlot) -> Option<&MenuItem> {
        self.panels.get(slot.panel)?.items.get(slot.index)
    }

    /// Rendered node of an item
    pub fn item_node(&self, panel: usize, index: usize) -> Option<NodeId> {
        self.node_map
            .node_for(&self.tree, ItemSlot { panel, index })
    }

    /// Deepest item under `point`, topmost panel first
    pub fn hit_test(&self, point: Point) -> Option<(NodeId, ItemSlot)> {
        for panel in self.panels.iter().rev() {
            if let Some(hit) = self.tree.hit_test(panel.node, point) {
                if let Some(found) = self.node_map.owning_item(&self.tree, hit) {
                    return Some(found);
                }
                if self.tree.rect(panel.node).contains(point) {
                    return None;
                }
            }
        }
        None
    }

    /// First rendered item with this label, deepest panel first
    pub fn node_for_label(&self, label: &str) -> Option<NodeId> {
        self.panels.iter().enumerate().rev().find_map(|(depth, panel)| {
            let index = panel.items.iter().position(|i| i.label() == Some(label))?;
            self.item_node(depth, index)
        })
    }

    // ------------------------------------------------------------------------
    // Internal helpers for update handlers
    // ------------------------------------------------------------------------

    pub(crate) fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Depth of the panel receiving keyboard input
    pub(crate) fn active_depth(&self) -> Option<usize> {
        let deepest = self.panels.len().checked_sub(1)?;
        Some(self.active.min(deepest))
    }

    /// Keep the active depth inside the stack after panels were dropped
    pub(crate) fn clamp_active(&mut self) {
        self.active = self.active.min(self.panels.len().saturating_sub(1));
    }

    /// Index of the deepest open panel containing `node`
    pub(crate) fn panel_containing(&self, node: NodeId) -> Option<usize> {
        self.panels
            .iter()
            .rposition(|p| self.tree.contains(p.node, node))
    }

    pub(crate) fn resolve_item(&self, node: NodeId) -> Option<(NodeId, ItemSlot)> {
        self.node_map.owning_item(&self.tree, node)
    }

    /// Move the roving focus stop of `panel` to `index`
    pub(crate) fn focus_item(&mut self, fx: &mut Effects, panel: usize, index: usize) {
        let Some(node) = self.item_node(panel, index) else {
            return;
        };
        if let Some(prev) = self.panels[panel].focused {
            if let Some(prev_node) = self.item_node(panel, prev) {
                self.tree.set_attr(prev_node, "tabindex", "-1");
                self.tree.remove_class(prev_node, classes::FOCUSED);
            }
        }
        self.tree.set_attr(node, "tabindex", "0");
        self.tree.add_class(node, classes::FOCUSED);
        self.panels[panel].focused = Some(index);
        self.active = panel;
        fx.push(Cmd::Focus(FocusTarget::Menu {
            instance: self.id,
            node,
        }));
    }

    /// Focus the first focusable item of `panel`, or the panel itself
    pub(crate) fn focus_first(&mut self, fx: &mut Effects, panel: usize) {
        let first = self.first_focusable(panel);
        self.active = panel;
        match first {
            Some(index) => self.focus_item(fx, panel, index),
            None => fx.push(Cmd::Focus(FocusTarget::Menu {
                instance: self.id,
                node: self.panels[panel].node,
            })),
        }
    }

    pub(crate) fn is_focusable(&self, panel: usize, index: usize) -> bool {
        self.panels[panel]
            .items
            .get(index)
            .is_some_and(MenuItem::is_focusable)
            && self.item_node(panel, index).is_some()
    }

    pub(crate) fn first_focusable(&self, panel: usize) -> Option<usize> {
        (0..self.panels[panel].items.len()).find(|&i| self.is_focusable(panel, i))
    }

    pub(crate) fn close_context(
        &self,
        reason: CloseReason,
        event: Option<PointerEvent>,
    ) -> CloseContext {
        CloseContext {
            instance: self.id,
            reason,
            position: self.open_ctx.as_ref().map(|c| c.position),
            event: event.or_else(|| self.open_ctx.as_ref().and_then(|c| c.event)),
            selection: self.selection.clone(),
        }
    }

    /// Update the stage of the pending open and mirror it in the phase
    pub(crate) fn set_stage(&mut self, stage: OpeningStage) {
        if let Some(pending) = &mut self.pending_open {
            pending.stage = stage;
        }
        if matches!(self.phase, Phase::Closed | Phase::Opening(_)) {
            self.phase = Phase::Opening(stage);
        }
    }

    pub(crate) fn awaiting_others(&self) -> bool {
        self.pending_open
            .as_ref()
            .is_some_and(|p| p.stage == OpeningStage::AwaitingOthers)
    }

    /// Write a changed item back into the panel copy and the item tree
    pub(crate) fn replace_item(&mut self, slot: ItemSlot, item: MenuItem) {
        let Some(panel) = self.panels.get_mut(slot.panel) else {
            return;
        };
        if let Some(target) = panel.items.get_mut(slot.index) {
            *target = item.clone();
        }
        let Some(path) = panel.path.clone() else {
            return;
        };
        if let Some(target) =
            items_at_path(&mut self.items, &path).and_then(|list| list.get_mut(slot.index))
        {
            *target = item;
        }

        // Shallower panels hold their own copy of this subtree
        for panel in &mut self.panels[..slot.panel] {
            if let Some(list) = panel
                .path
                .as_deref()
                .and_then(|path| items_at_path(&mut self.items, path))
            {
                panel.items = list.clone();
            }
        }
    }
}

/// Literal child list reached by following `path` from the root list
fn items_at_path<'a>(items: &'a mut Vec<MenuItem>, path: &[usize]) -> Option<&'a mut Vec<MenuItem>> {
    let Some((&first, rest)) = path.split_first() else {
        return Some(items);
    };
    match items.get_mut(first)? {
        MenuItem::Submenu(sub) => match &mut sub.children {
            Children::Items(children) => items_at_path(children, rest),
            Children::Deferred(_) => None,
        },
        _ => None,
    }
}
