//! Retained visual tree for the popup layer
//!
//! Nodes live in an arena addressed by generational [`NodeId`]s. Removing a
//! node bumps its slot generation, so a stale id can never resolve to a node
//! created later in the same slot.

use std::collections::BTreeMap;

use kurbo::{Point, Rect};
use serde::Serialize;

/// Identifier for a node in the tree (slot index, generation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}v{}", self.0, self.1)
    }
}

/// Accessibility role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Plain container or decoration
    None,
    Menu,
    MenuItem,
    MenuItemCheckbox,
    MenuItemRadio,
    Separator,
    /// Non-interactive heading
    Presentation,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Menu => "menu",
            Role::MenuItem => "menuitem",
            Role::MenuItemCheckbox => "menuitemcheckbox",
            Role::MenuItemRadio => "menuitemradio",
            Role::Separator => "separator",
            Role::Presentation => "presentation",
        }
    }
}

/// Resolved writing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Clone)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    role: Role,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
    rect: Rect,
}

impl Node {
    fn new(generation: u32, role: Role) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            role,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: None,
            rect: Rect::ZERO,
        }
    }
}

/// Arena of popup nodes
#[derive(Debug, Default)]
pub struct VisualTree {
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl VisualTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node
    pub fn create(&mut self, role: Role) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, role));
            NodeId::new(idx as u32, generation)
        } else {
            let generation = 1;
            self.nodes.push(Some(Node::new(generation, role)));
            self.generations.push(generation);
            NodeId::new((self.nodes.len() - 1) as u32, generation)
        }
    }

    /// Create a node and append it to `parent`
    pub fn create_child(&mut self, parent: NodeId, role: Role) -> NodeId {
        let id = self.create(role);
        self.append(parent, id);
        id
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A `NodeId` is live if its slot exists and its generation matches
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|n| n.generation == id.1)
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_alive(parent) || !self.is_alive(child) || parent == child {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Unlink a node from its parent without freeing it
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Remove a node and its whole subtree
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `node` is `ancestor` or lies in its subtree
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if !self.is_alive(id) {
                return false;
            }
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    // ------------------------------------------------------------------------
    // Node data
    // ------------------------------------------------------------------------

    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.node(id).map(|n| n.role)
    }

    pub fn set_role(&mut self, id: NodeId, role: Role) {
        if let Some(n) = self.node_mut(id) {
            n.role = role;
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    pub fn attrs(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.node_mut(id) {
            n.attrs.remove(name);
        }
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        self.node(id).map(|n| n.classes.as_slice()).unwrap_or(&[])
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if class.is_empty() || self.has_class(id, class) {
            return;
        }
        if let Some(n) = self.node_mut(id) {
            n.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_mut(id) {
            n.classes.retain(|c| c != class);
        }
    }

    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn style(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.style.get(name))
            .map(String::as_str)
    }

    pub fn styles(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.style.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn set_style(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.style.insert(name.to_string(), value.into());
        }
    }

    pub fn clear_style(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.node_mut(id) {
            n.style.remove(name);
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text.as_deref())
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.text = Some(text.into());
        }
    }

    /// Absolute rectangle written by layout
    pub fn rect(&self, id: NodeId) -> Rect {
        self.node(id).map(|n| n.rect).unwrap_or(Rect::ZERO)
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(n) = self.node_mut(id) {
            n.rect = rect;
        }
    }

    /// Writing direction from the nearest `dir` attribute, LTR when none is set
    pub fn direction(&self, id: NodeId) -> TextDirection {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|n| match self.attr(n, "dir") {
                Some("rtl") => Some(TextDirection::Rtl),
                Some("ltr") => Some(TextDirection::Ltr),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Deepest node under `point` within `root`'s subtree
    ///
    /// Later children paint on top, so they are tested first. A child may lie
    /// outside its parent's rectangle (submenu panels hang off their trigger).
    pub fn hit_test(&self, root: NodeId, point: Point) -> Option<NodeId> {
        if !self.is_alive(root) {
            return None;
        }
        for &child in self.children(root).iter().rev() {
            if let Some(hit) = self.hit_test(child, point) {
                return Some(hit);
            }
        }
        let rect = self.rect(root);
        (rect.area() > 0.0 && rect.contains(point)).then_some(root)
    }
}
