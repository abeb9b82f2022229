//! Serializable snapshot of a rendered subtree
//!
//! Used by the preview binary and by tests that compare whole trees.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use super::tree::{NodeId, Role, VisualTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub role: Role,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `[x, y, width, height]`
    pub rect: [f64; 4],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// Capture `root` and its subtree
pub fn snapshot(tree: &VisualTree, root: NodeId) -> Option<NodeSnapshot> {
    if !tree.is_alive(root) {
        return None;
    }
    let rect = tree.rect(root);
    Some(NodeSnapshot {
        role: tree.role(root)?,
        classes: tree.classes(root).to_vec(),
        attrs: tree
            .attrs(root)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        style: tree
            .styles(root)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        text: tree.text(root).map(str::to_string),
        rect: [rect.x0, rect.y0, rect.width(), rect.height()],
        children: tree
            .children(root)
            .iter()
            .filter_map(|&c| snapshot(tree, c))
            .collect(),
    })
}

/// Pretty-printed JSON of a subtree
pub fn to_json(tree: &VisualTree, root: NodeId) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&snapshot(tree, root))
}

/// Indented one-line-per-node outline
///
/// ```text
/// menu.cm-menu @100,100 160x100
///   menuitem.cm-item @100,104 160x28
///     none.cm-item-label "Copy" @112,104 28x28
/// ```
pub fn outline(tree: &VisualTree, root: NodeId) -> String {
    let mut out = String::new();
    if let Some(snap) = snapshot(tree, root) {
        write_outline(&mut out, &snap, 0);
    }
    out
}

fn write_outline(out: &mut String, node: &NodeSnapshot, depth: usize) {
    let _ = write!(out, "{}{}", "  ".repeat(depth), node.role.as_str());
    for class in &node.classes {
        let _ = write!(out, ".{}", class);
    }
    for (name, value) in &node.attrs {
        if name.starts_with("aria-") || name == "href" {
            let _ = write!(out, " [{}={}]", name, value);
        }
    }
    if let Some(text) = &node.text {
        let _ = write!(out, " {:?}", text);
    }
    let [x, y, w, h] = node.rect;
    let _ = writeln!(out, " @{},{} {}x{}", x, y, w, h);

    for child in &node.children {
        write_outline(out, child, depth + 1);
    }
}
