//! Menu item model
//!
//! `MenuItem` is the closed, normalized set of variants the engine renders.
//! Declarations arrive as [`RawItem`] (possibly deserialized from YAML/JSON)
//! and are canonicalized by [`normalize`].

mod normalize;

pub use normalize::{deep_clone, load_items_file, normalize, normalize_all, parse_items_yaml, RawItem};

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::keymap::Modifiers;
use crate::view::{NodeId, VisualTree};

// ============================================================================
// Closures carried by items
// ============================================================================

/// An item event handler (`on_click`, `on_change`, `on_select`)
///
/// Handlers compare by identity so normalized items stay comparable.
pub struct Handler<E>(Rc<dyn Fn(&E)>);

impl<E> Handler<E> {
    pub fn new(f: impl Fn(&E) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &E) {
        (self.0)(event)
    }
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<E> PartialEq for Handler<E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl<E> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Replaces the generated node of an item with a host-built one
///
/// The closure builds its node in the given tree and returns its root; the
/// engine then applies roles, focus wiring and bookkeeping on top of it.
#[derive(Clone)]
pub struct CustomRender(Rc<dyn Fn(&mut VisualTree, &MenuItem) -> NodeId>);

impl CustomRender {
    pub fn new(f: impl Fn(&mut VisualTree, &MenuItem) -> NodeId + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn build(&self, tree: &mut VisualTree, item: &MenuItem) -> NodeId {
        (self.0)(tree, item)
    }
}

impl PartialEq for CustomRender {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for CustomRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRender(..)")
    }
}

/// Identifies one invocation of a deferred child producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub(crate) u64);

/// Deferred submenu children
///
/// Returning `Some` resolves immediately; returning `None` means the host will
/// answer later with `MenuMsg::ChildrenLoaded` carrying the same ticket.
#[derive(Clone)]
pub struct ChildProducer(Rc<dyn Fn(LoadTicket) -> Option<Vec<RawItem>>>);

impl ChildProducer {
    pub fn new(f: impl Fn(LoadTicket) -> Option<Vec<RawItem>> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Producer that always answers synchronously
    pub fn ready(f: impl Fn() -> Vec<RawItem> + 'static) -> Self {
        Self(Rc::new(move |_| Some(f())))
    }

    pub fn produce(&self, ticket: LoadTicket) -> Option<Vec<RawItem>> {
        (self.0)(ticket)
    }
}

impl PartialEq for ChildProducer {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for ChildProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChildProducer(..)")
    }
}

// ============================================================================
// Handler events
// ============================================================================

/// Passed to an action's `on_click`
#[derive(Debug, Clone)]
pub struct ActionEvent {
    pub item: MenuItem,
    pub modifiers: Modifiers,
}

/// Passed to a checkbox's `on_change` with the new state
#[derive(Debug, Clone)]
pub struct CheckboxEvent {
    pub item: MenuItem,
    pub checked: bool,
}

/// Passed to a radio's `on_select`
#[derive(Debug, Clone)]
pub struct RadioEvent {
    pub item: MenuItem,
    pub group: String,
    pub value: String,
}

// ============================================================================
// Variants
// ============================================================================

/// The `type` tag of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Action,
    Separator,
    Label,
    Link,
    Checkbox,
    Radio,
    Submenu,
}

/// Fields shared by every variant except separators
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBase {
    /// Stable identifier reported back to the host
    pub id: Option<String>,
    pub disabled: bool,
    /// Invisible items are absent from the rendered tree
    pub visible: bool,
    /// Extra style class applied to the item node
    pub class_name: Option<String>,
    pub render: Option<CustomRender>,
}

impl Default for ItemBase {
    fn default() -> Self {
        Self {
            id: None,
            disabled: false,
            visible: true,
            class_name: None,
            render: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionItem {
    pub base: ItemBase,
    pub label: String,
    pub icon: Option<String>,
    pub shortcut: Option<String>,
    pub badge: Option<String>,
    pub loading: bool,
    pub close_on_action: bool,
    pub on_click: Option<Handler<ActionEvent>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparatorItem {
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelItem {
    pub base: ItemBase,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkItem {
    pub base: ItemBase,
    pub label: String,
    pub href: String,
    /// Browsing context, e.g. `_blank`
    pub target: Option<String>,
    pub icon: Option<String>,
    pub shortcut: Option<String>,
    pub badge: Option<String>,
    pub close_on_action: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxItem {
    pub base: ItemBase,
    pub label: String,
    pub checked: bool,
    pub icon: Option<String>,
    pub shortcut: Option<String>,
    pub badge: Option<String>,
    pub loading: bool,
    pub close_on_action: bool,
    pub on_change: Option<Handler<CheckboxEvent>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadioItem {
    pub base: ItemBase,
    pub label: String,
    /// Name of the mutually-exclusive group
    pub group: String,
    pub value: String,
    pub checked: bool,
    pub icon: Option<String>,
    pub shortcut: Option<String>,
    pub badge: Option<String>,
    pub loading: bool,
    pub close_on_action: bool,
    pub on_select: Option<Handler<RadioEvent>>,
}

/// Children of a submenu: literal or produced on open
#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    Items(Vec<MenuItem>),
    Deferred(ChildProducer),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuItem {
    pub base: ItemBase,
    pub label: String,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub children: Children,
}

/// A normalized menu item
#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Action(ActionItem),
    Separator(SeparatorItem),
    Label(LabelItem),
    Link(LinkItem),
    Checkbox(CheckboxItem),
    Radio(RadioItem),
    Submenu(SubmenuItem),
}

impl MenuItem {
    /// Shorthand for a plain action
    pub fn action(label: impl Into<String>) -> Self {
        normalize(RawItem::action(label))
    }

    pub fn separator() -> Self {
        MenuItem::Separator(SeparatorItem::default())
    }

    pub fn submenu(label: impl Into<String>, children: Vec<MenuItem>) -> Self {
        MenuItem::Submenu(SubmenuItem {
            base: ItemBase::default(),
            label: label.into(),
            icon: None,
            badge: None,
            children: Children::Items(children),
        })
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            MenuItem::Action(_) => ItemKind::Action,
            MenuItem::Separator(_) => ItemKind::Separator,
            MenuItem::Label(_) => ItemKind::Label,
            MenuItem::Link(_) => ItemKind::Link,
            MenuItem::Checkbox(_) => ItemKind::Checkbox,
            MenuItem::Radio(_) => ItemKind::Radio,
            MenuItem::Submenu(_) => ItemKind::Submenu,
        }
    }

    pub fn base(&self) -> Option<&ItemBase> {
        match self {
            MenuItem::Action(i) => Some(&i.base),
            MenuItem::Separator(_) => None,
            MenuItem::Label(i) => Some(&i.base),
            MenuItem::Link(i) => Some(&i.base),
            MenuItem::Checkbox(i) => Some(&i.base),
            MenuItem::Radio(i) => Some(&i.base),
            MenuItem::Submenu(i) => Some(&i.base),
        }
    }

    pub fn base_mut(&mut self) -> Option<&mut ItemBase> {
        match self {
            MenuItem::Action(i) => Some(&mut i.base),
            MenuItem::Separator(_) => None,
            MenuItem::Label(i) => Some(&mut i.base),
            MenuItem::Link(i) => Some(&mut i.base),
            MenuItem::Checkbox(i) => Some(&mut i.base),
            MenuItem::Radio(i) => Some(&mut i.base),
            MenuItem::Submenu(i) => Some(&mut i.base),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.base().and_then(|b| b.id.as_deref())
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            MenuItem::Action(i) => Some(&i.label),
            MenuItem::Separator(_) => None,
            MenuItem::Label(i) => Some(&i.label),
            MenuItem::Link(i) => Some(&i.label),
            MenuItem::Checkbox(i) => Some(&i.label),
            MenuItem::Radio(i) => Some(&i.label),
            MenuItem::Submenu(i) => Some(&i.label),
        }
    }

    pub fn shortcut(&self) -> Option<&str> {
        match self {
            MenuItem::Action(i) => i.shortcut.as_deref(),
            MenuItem::Link(i) => i.shortcut.as_deref(),
            MenuItem::Checkbox(i) => i.shortcut.as_deref(),
            MenuItem::Radio(i) => i.shortcut.as_deref(),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.base().is_none_or(|b| b.visible)
    }

    pub fn is_disabled(&self) -> bool {
        self.base().is_some_and(|b| b.disabled)
    }

    pub fn is_loading(&self) -> bool {
        match self {
            MenuItem::Action(i) => i.loading,
            MenuItem::Checkbox(i) => i.loading,
            MenuItem::Radio(i) => i.loading,
            _ => false,
        }
    }

    /// Whether the item can ever hold focus (separators and labels cannot)
    pub fn is_interactive(&self) -> bool {
        !matches!(self, MenuItem::Separator(_) | MenuItem::Label(_))
    }

    /// Interactive, visible and enabled
    pub fn is_focusable(&self) -> bool {
        self.is_interactive() && self.is_visible() && !self.is_disabled()
    }

    /// Whether activating the item closes the menu
    pub fn closes_on_action(&self) -> bool {
        match self {
            MenuItem::Action(i) => i.close_on_action,
            MenuItem::Link(i) => i.close_on_action,
            MenuItem::Checkbox(i) => i.close_on_action,
            MenuItem::Radio(i) => i.close_on_action,
            _ => false,
        }
    }

    pub fn is_submenu(&self) -> bool {
        matches!(self, MenuItem::Submenu(_))
    }

    /// Depth-first search by id through literal children
    pub fn find_by_id<'a>(items: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
        for item in items {
            if item.id() == Some(id) {
                return Some(item);
            }
            if let MenuItem::Submenu(SubmenuItem {
                children: Children::Items(children),
                ..
            }) = item
            {
                if let Some(found) = Self::find_by_id(children, id) {
                    return Some(found);
                }
            }
        }
        None
    }
}
