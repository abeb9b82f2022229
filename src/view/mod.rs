//! Headless view layer: node arena, rendering, layout and snapshots
//!
//! ```text
//! MenuItem ──render──▶ VisualTree nodes ──layout──▶ rects ──▶ host paints
//!                 └──▶ NodeMap (node → item slot)
//! ```

pub mod classes;
mod layout;
mod node_map;
mod render;
pub mod snapshot;
mod tree;

pub use layout::{layout_panel, measure_panel, Metrics};
pub use node_map::{ItemSlot, NodeMap};
pub use render::{
    decorate_panel, fill_panel, render_item, render_panel, role_for, set_checked, set_expanded,
};
pub use tree::{NodeId, Role, TextDirection, VisualTree};
