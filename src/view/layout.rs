//! Synchronous panel measurement and layout
//!
//! Panels are measured from [`Metrics`] rather than real glyph shaping: text
//! width is `chars × char_width`. Hosts with real text metrics override the
//! numbers through `MenuOptions::metrics`.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use super::classes;
use super::tree::{NodeId, Role, TextDirection, VisualTree};

/// Box metrics used by layout (logical pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub item_height: f64,
    pub separator_height: f64,
    pub label_height: f64,
    pub min_width: f64,
    pub char_width: f64,
    /// Horizontal padding inside each row
    pub row_padding: f64,
    /// Vertical padding at top and bottom of a panel
    pub panel_padding: f64,
    /// Width of the leading icon/spinner/check slot
    pub icon_width: f64,
    /// Gap before trailing decorations (shortcut, badge)
    pub gap: f64,
    pub arrow_width: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            item_height: 28.0,
            separator_height: 9.0,
            label_height: 24.0,
            min_width: 160.0,
            char_width: 7.0,
            row_padding: 12.0,
            panel_padding: 4.0,
            icon_width: 20.0,
            gap: 24.0,
            arrow_width: 16.0,
        }
    }
}

impl Metrics {
    fn text_width(&self, text: Option<&str>) -> f64 {
        text.map_or(0.0, |t| t.chars().count() as f64 * self.char_width)
    }

    fn row_height(&self, role: Role) -> f64 {
        match role {
            Role::Separator => self.separator_height,
            Role::Presentation => self.label_height,
            _ => self.item_height,
        }
    }
}

/// Which row slot a decoration node fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Leading,
    Label,
    Shortcut,
    Badge,
    Arrow,
}

fn slot_of(tree: &VisualTree, node: NodeId) -> Option<Slot> {
    let has = |c| tree.has_class(node, c);
    if has(classes::ICON) || has(classes::SPINNER) || has(classes::CHECK) {
        Some(Slot::Leading)
    } else if has(classes::ITEM_LABEL) {
        Some(Slot::Label)
    } else if has(classes::SHORTCUT) {
        Some(Slot::Shortcut)
    } else if has(classes::BADGE) {
        Some(Slot::Badge)
    } else if has(classes::ARROW) {
        Some(Slot::Arrow)
    } else {
        None
    }
}

/// Decoration children of a row, skipping any submenu panel hanging off it
fn decorations(tree: &VisualTree, row: NodeId) -> impl Iterator<Item = (NodeId, Slot)> + '_ {
    tree.children(row)
        .iter()
        .copied()
        .filter_map(move |c| slot_of(tree, c).map(|s| (c, s)))
}

fn slot_width(tree: &VisualTree, node: NodeId, slot: Slot, m: &Metrics) -> f64 {
    match slot {
        Slot::Leading => m.icon_width,
        Slot::Arrow => m.arrow_width,
        Slot::Label => m.text_width(tree.text(node)),
        Slot::Shortcut | Slot::Badge => m.gap + m.text_width(tree.text(node)),
    }
}

fn row_width(tree: &VisualTree, row: NodeId, m: &Metrics) -> f64 {
    let content: f64 = if tree.role(row) == Some(Role::Presentation) {
        m.text_width(tree.text(row))
    } else {
        decorations(tree, row)
            .map(|(node, slot)| slot_width(tree, node, slot, m))
            .sum()
    };
    content + m.row_padding * 2.0
}

/// Rows of a panel: its direct children other than nested menus
fn rows(tree: &VisualTree, panel: NodeId) -> Vec<NodeId> {
    tree.children(panel)
        .iter()
        .copied()
        .filter(|&c| tree.role(c) != Some(Role::Menu))
        .collect()
}

/// Size a panel would occupy
pub fn measure_panel(tree: &VisualTree, panel: NodeId, m: &Metrics) -> Size {
    let rows = rows(tree, panel);
    let width = rows
        .iter()
        .map(|&r| row_width(tree, r, m))
        .fold(m.min_width, f64::max);
    let height = m.panel_padding * 2.0
        + rows
            .iter()
            .map(|&r| m.row_height(tree.role(r).unwrap_or(Role::None)))
            .sum::<f64>();
    Size::new(width.ceil(), height.ceil())
}

/// Write absolute rectangles for a panel, its rows and their decorations
///
/// Nested submenu panels are left alone; they are laid out when placed.
pub fn layout_panel(tree: &mut VisualTree, panel: NodeId, origin: Point, m: &Metrics) -> Rect {
    let size = measure_panel(tree, panel, m);
    let panel_rect = Rect::from_origin_size(origin, size);
    tree.set_rect(panel, panel_rect);

    let rtl = tree.direction(panel) == TextDirection::Rtl;
    let mut y = origin.y + m.panel_padding;

    for row in rows(tree, panel) {
        let h = m.row_height(tree.role(row).unwrap_or(Role::None));
        let row_rect = Rect::new(panel_rect.x0, y, panel_rect.x1, y + h);
        tree.set_rect(row, row_rect);
        layout_row(tree, row, row_rect, rtl, m);
        y += h;
    }
    panel_rect
}

fn layout_row(tree: &mut VisualTree, row: NodeId, row_rect: Rect, rtl: bool, m: &Metrics) {
    let inner_x0 = row_rect.x0 + m.row_padding;
    let inner_x1 = row_rect.x1 - m.row_padding;
    let decos: Vec<(NodeId, Slot)> = decorations(tree, row).collect();

    // Leading and label flow from the start edge, the rest packs to the end edge
    let mut start = inner_x0;
    let mut end = inner_x1;
    let mut placed = Vec::with_capacity(decos.len());
    for &(node, slot) in &decos {
        let w = slot_width(tree, node, slot, m);
        let (x0, x1) = match slot {
            Slot::Leading | Slot::Label => {
                let span = (start, start + w);
                start += w;
                span
            }
            Slot::Shortcut | Slot::Badge | Slot::Arrow => (0.0, w),
        };
        placed.push((node, slot, x0, x1));
    }
    for entry in placed.iter_mut().rev() {
        if matches!(entry.1, Slot::Shortcut | Slot::Badge | Slot::Arrow) {
            let w = entry.3 - entry.2;
            entry.2 = end - w;
            entry.3 = end;
            end -= w;
        }
    }

    for (node, _, x0, x1) in placed {
        let (x0, x1) = if rtl {
            // Mirror around the row's center
            (row_rect.x0 + row_rect.x1 - x1, row_rect.x0 + row_rect.x1 - x0)
        } else {
            (x0, x1)
        };
        tree.set_rect(node, Rect::new(x0, row_rect.y0, x1, row_rect.y1));
    }
}
