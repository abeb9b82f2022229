//! Node → item side table
//!
//! The map never owns nodes: entries for removed nodes simply stop resolving
//! and are dropped when their panel is forgotten.

use std::collections::HashMap;

use super::tree::{NodeId, Role, VisualTree};

/// Where an item node's item lives: panel depth and index within that panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemSlot {
    /// 0 for the root panel, 1 for the first submenu, ...
    pub panel: usize,
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct NodeMap {
    entries: HashMap<NodeId, ItemSlot>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, slot: ItemSlot) {
        self.entries.insert(node, slot);
    }

    /// Resolve a live node to its item slot
    pub fn get(&self, tree: &VisualTree, node: NodeId) -> Option<ItemSlot> {
        if !tree.is_alive(node) {
            return None;
        }
        self.entries.get(&node).copied()
    }

    /// Resolve `node` or its nearest mapped ancestor within the same panel
    ///
    /// The walk stops at the first menu node, so a submenu panel never
    /// resolves to the trigger it hangs off.
    pub fn owning_item(&self, tree: &VisualTree, node: NodeId) -> Option<(NodeId, ItemSlot)> {
        for n in std::iter::once(node).chain(tree.ancestors(node)) {
            if let Some(slot) = self.get(tree, n) {
                return Some((n, slot));
            }
            if tree.role(n) == Some(Role::Menu) {
                return None;
            }
        }
        None
    }

    /// Node rendered for a given slot
    pub fn node_for(&self, tree: &VisualTree, slot: ItemSlot) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(&node, &s)| s == slot && tree.is_alive(node))
            .map(|(&node, _)| node)
    }

    /// Forget every panel at `depth` or deeper
    pub fn forget_panels_from(&mut self, depth: usize) {
        self.entries.retain(|_, slot| slot.panel < depth);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
