//! Item and panel rendering
//!
//! Turns normalized items into nodes carrying roles, state attributes and
//! decorations. Decorations always appear in slot order:
//! leading (spinner, icon or check) → label → shortcut → badge → arrow.

use super::classes;
use super::node_map::{ItemSlot, NodeMap};
use super::tree::{NodeId, Role, TextDirection, VisualTree};
use crate::animation::AnimationKind;
use crate::config::MenuOptions;
use crate::item::MenuItem;
use crate::keymap::Shortcut;

/// Role an item renders with
pub fn role_for(item: &MenuItem) -> Role {
    match item {
        MenuItem::Action(_) | MenuItem::Link(_) | MenuItem::Submenu(_) => Role::MenuItem,
        MenuItem::Checkbox(_) => Role::MenuItemCheckbox,
        MenuItem::Radio(_) => Role::MenuItemRadio,
        MenuItem::Separator(_) => Role::Separator,
        MenuItem::Label(_) => Role::Presentation,
    }
}

/// Render one item; invisible items produce no node at all
pub fn render_item(tree: &mut VisualTree, item: &MenuItem, opts: &MenuOptions) -> Option<NodeId> {
    if !item.is_visible() {
        return None;
    }

    let node = match item {
        MenuItem::Separator(sep) => {
            let node = tree.create(Role::Separator);
            tree.add_class(node, classes::SEPARATOR);
            if let Some(class) = &sep.class_name {
                tree.add_class(node, class);
            }
            return Some(node);
        }
        MenuItem::Label(label) => {
            let node = match &label.base.render {
                Some(custom) => custom.build(tree, item),
                None => {
                    let node = tree.create(Role::Presentation);
                    tree.set_text(node, label.label.clone());
                    node
                }
            };
            tree.set_role(node, Role::Presentation);
            tree.add_class(node, classes::LABEL);
            if let Some(class) = &label.base.class_name {
                tree.add_class(node, class);
            }
            return Some(node);
        }
        _ => match item.base().and_then(|b| b.render.as_ref()) {
            Some(custom) => custom.build(tree, item),
            None => {
                let node = tree.create(role_for(item));
                append_decorations(tree, node, item, opts);
                node
            }
        },
    };

    apply_item_semantics(tree, node, item);
    Some(node)
}

/// Role, classes and state attributes; applied on top of custom renders too
fn apply_item_semantics(tree: &mut VisualTree, node: NodeId, item: &MenuItem) {
    tree.set_role(node, role_for(item));
    tree.add_class(node, classes::ITEM);
    tree.set_attr(node, "tabindex", "-1");

    if let Some(base) = item.base() {
        if let Some(id) = &base.id {
            tree.set_attr(node, "data-id", id.clone());
        }
        if let Some(class) = &base.class_name {
            tree.add_class(node, class);
        }
        if base.disabled {
            tree.set_attr(node, "aria-disabled", "true");
            tree.add_class(node, classes::DISABLED);
        }
    }

    if item.is_loading() {
        tree.set_attr(node, "aria-busy", "true");
        tree.add_class(node, classes::LOADING);
    }

    match item {
        MenuItem::Checkbox(i) => set_checked(tree, node, i.checked),
        MenuItem::Radio(i) => {
            set_checked(tree, node, i.checked);
            tree.set_attr(node, "data-group", i.group.clone());
        }
        MenuItem::Link(i) => {
            tree.add_class(node, classes::LINK);
            tree.set_attr(node, "href", i.href.clone());
            if let Some(target) = &i.target {
                tree.set_attr(node, "target", target.clone());
            }
        }
        MenuItem::Submenu(_) => {
            tree.set_attr(node, "aria-haspopup", "menu");
            tree.set_attr(node, "aria-expanded", "false");
        }
        _ => {}
    }
}

/// Update checked state on an item node and its indicator
pub fn set_checked(tree: &mut VisualTree, node: NodeId, checked: bool) {
    tree.set_attr(node, "aria-checked", if checked { "true" } else { "false" });
    tree.toggle_class(node, classes::CHECKED, checked);

    let indicator = tree
        .children(node)
        .iter()
        .copied()
        .find(|&c| tree.has_class(c, classes::CHECK));
    if let Some(indicator) = indicator {
        let glyph = match tree.role(node) {
            Some(Role::MenuItemRadio) if checked => "●",
            _ if checked => "✓",
            _ => "",
        };
        tree.set_text(indicator, glyph);
    }
}

/// Mark a submenu trigger as expanded or collapsed
pub fn set_expanded(tree: &mut VisualTree, node: NodeId, expanded: bool) {
    tree.set_attr(node, "aria-expanded", if expanded { "true" } else { "false" });
    tree.toggle_class(node, classes::EXPANDED, expanded);
}

fn append_decorations(tree: &mut VisualTree, node: NodeId, item: &MenuItem, opts: &MenuOptions) {
    let (icon, shortcut, badge) = match item {
        MenuItem::Action(i) => (i.icon.as_deref(), i.shortcut.as_deref(), i.badge.as_deref()),
        MenuItem::Link(i) => (i.icon.as_deref(), i.shortcut.as_deref(), i.badge.as_deref()),
        MenuItem::Checkbox(i) => (i.icon.as_deref(), i.shortcut.as_deref(), i.badge.as_deref()),
        MenuItem::Radio(i) => (i.icon.as_deref(), i.shortcut.as_deref(), i.badge.as_deref()),
        MenuItem::Submenu(i) => (i.icon.as_deref(), None, i.badge.as_deref()),
        MenuItem::Separator(_) | MenuItem::Label(_) => (None, None, None),
    };

    // Leading slot
    if item.is_loading() {
        let spinner = tree.create_child(node, Role::None);
        tree.add_class(spinner, classes::SPINNER);
        tree.set_attr(spinner, "aria-hidden", "true");
    } else if let Some(icon) = icon {
        let icon_node = tree.create_child(node, Role::None);
        tree.add_class(icon_node, classes::ICON);
        tree.set_attr(icon_node, "aria-hidden", "true");
        tree.set_text(icon_node, icon);
    } else if matches!(item, MenuItem::Checkbox(_) | MenuItem::Radio(_)) {
        let check = tree.create_child(node, Role::None);
        tree.add_class(check, classes::CHECK);
        tree.set_attr(check, "aria-hidden", "true");
    }

    if let Some(label) = item.label() {
        let label_node = tree.create_child(node, Role::None);
        tree.add_class(label_node, classes::ITEM_LABEL);
        tree.set_text(label_node, label);
    }

    if let Some(shortcut) = shortcut {
        let text = match shortcut.parse::<Shortcut>() {
            Ok(parsed) => parsed.display(opts.platform),
            Err(_) => shortcut.to_string(),
        };
        let shortcut_node = tree.create_child(node, Role::None);
        tree.add_class(shortcut_node, classes::SHORTCUT);
        tree.set_text(shortcut_node, text);
    }

    if let Some(badge) = badge {
        let badge_node = tree.create_child(node, Role::None);
        tree.add_class(badge_node, classes::BADGE);
        tree.set_text(badge_node, badge);
    }

    if item.is_submenu() && opts.submenu.arrow {
        let arrow = tree.create_child(node, Role::None);
        tree.add_class(arrow, classes::ARROW);
        tree.set_attr(arrow, "aria-hidden", "true");
        let glyph = match opts.direction {
            TextDirection::Ltr => "›",
            TextDirection::Rtl => "‹",
        };
        tree.set_text(arrow, glyph);
    }
}

/// Render a panel of items at `depth` and record every item node in `map`
pub fn render_panel(
    tree: &mut VisualTree,
    map: &mut NodeMap,
    items: &[MenuItem],
    depth: usize,
    opts: &MenuOptions,
) -> NodeId {
    let panel = tree.create(Role::Menu);
    tree.set_attr(panel, "aria-orientation", "vertical");
    tree.add_class(panel, if depth == 0 { classes::MENU } else { classes::SUBMENU });
    decorate_panel(tree, panel, opts);
    fill_panel(tree, map, panel, items, depth, opts);
    panel
}

/// Replace the rows of an existing panel, keeping the panel node itself
pub fn fill_panel(
    tree: &mut VisualTree,
    map: &mut NodeMap,
    panel: NodeId,
    items: &[MenuItem],
    depth: usize,
    opts: &MenuOptions,
) {
    for child in tree.children(panel).to_vec() {
        tree.remove(child);
    }
    for (index, item) in items.iter().enumerate() {
        if let Some(node) = render_item(tree, item, opts) {
            tree.append(panel, node);
            map.insert(node, ItemSlot { panel: depth, index });
        }
    }
}

/// Theme, direction and animation classes/variables shared by every panel
pub fn decorate_panel(tree: &mut VisualTree, panel: NodeId, opts: &MenuOptions) {
    for class in [
        classes::ANIM_FADE,
        classes::ANIM_SCALE,
        classes::ANIM_SLIDE,
        classes::NO_ANIMATION,
    ] {
        tree.remove_class(panel, class);
    }

    let anim = &opts.animation;
    if anim.is_enabled() {
        let class = match anim.kind {
            AnimationKind::Fade => classes::ANIM_FADE,
            AnimationKind::Scale => classes::ANIM_SCALE,
            AnimationKind::Slide => classes::ANIM_SLIDE,
            AnimationKind::None => classes::NO_ANIMATION,
        };
        tree.add_class(panel, class);
    } else {
        tree.add_class(panel, classes::NO_ANIMATION);
    }
    tree.set_style(panel, classes::VAR_ENTER_DURATION, format!("{}ms", anim.enter_ms));
    tree.set_style(panel, classes::VAR_LEAVE_DURATION, format!("{}ms", anim.leave_ms));
    tree.set_style(panel, classes::VAR_ENTER_EASING, anim.enter_easing.clone());
    tree.set_style(panel, classes::VAR_LEAVE_EASING, anim.leave_easing.clone());

    opts.theme.apply(tree, panel);

    match opts.direction {
        TextDirection::Rtl => {
            tree.set_attr(panel, "dir", "rtl");
            tree.add_class(panel, classes::RTL);
        }
        TextDirection::Ltr => {
            tree.remove_attr(panel, "dir");
            tree.remove_class(panel, classes::RTL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{normalize, RawItem};
    use crate::keymap::Platform;

    fn opts() -> MenuOptions {
        MenuOptions {
            platform: Platform::Win,
            ..MenuOptions::default()
        }
    }

    fn class_order(tree: &VisualTree, node: NodeId) -> Vec<String> {
        tree.children(node)
            .iter()
            .filter_map(|&c| tree.classes(c).first().cloned())
            .collect()
    }

    #[test]
    fn test_invisible_item_renders_nothing() {
        let mut tree = VisualTree::new();
        let item = normalize(RawItem::action("Hidden").hidden());
        assert!(render_item(&mut tree, &item, &opts()).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_roles_per_variant() {
        let mut tree = VisualTree::new();
        let cases = [
            (RawItem::action("A"), Role::MenuItem),
            (RawItem::checkbox("B", true), Role::MenuItemCheckbox),
            (RawItem::radio("C", "g", "c"), Role::MenuItemRadio),
            (RawItem::separator(), Role::Separator),
            (RawItem::heading("D"), Role::Presentation),
            (RawItem::link("E", "/e"), Role::MenuItem),
        ];
        for (raw, role) in cases {
            let node = render_item(&mut tree, &normalize(raw), &opts()).unwrap();
            assert_eq!(tree.role(node), Some(role));
        }
    }

    #[test]
    fn test_decoration_order() {
        let mut tree = VisualTree::new();
        let item = normalize(
            RawItem::action("Copy")
                .with_icon("copy")
                .with_shortcut("ctrl+c")
                .with_badge("new"),
        );
        let node = render_item(&mut tree, &item, &opts()).unwrap();
        assert_eq!(
            class_order(&tree, node),
            vec![
                classes::ICON,
                classes::ITEM_LABEL,
                classes::SHORTCUT,
                classes::BADGE
            ]
        );
    }

    #[test]
    fn test_loading_replaces_icon_with_spinner() {
        let mut tree = VisualTree::new();
        let item = normalize(RawItem::action("Sync").with_icon("sync").loading(true));
        let node = render_item(&mut tree, &item, &opts()).unwrap();

        assert_eq!(tree.attr(node, "aria-busy"), Some("true"));
        assert_eq!(class_order(&tree, node)[0], classes::SPINNER);
        assert_eq!(tree.attr(node, "aria-disabled"), None);
    }

    #[test]
    fn test_submenu_attributes_and_arrow() {
        let mut tree = VisualTree::new();
        let item = normalize(RawItem::submenu("More", vec![RawItem::action("Rename")]));
        let node = render_item(&mut tree, &item, &opts()).unwrap();

        assert_eq!(tree.attr(node, "aria-haspopup"), Some("menu"));
        assert_eq!(tree.attr(node, "aria-expanded"), Some("false"));
        assert_eq!(class_order(&tree, node).last().map(String::as_str), Some(classes::ARROW));
    }

    #[test]
    fn test_custom_render_keeps_semantics() {
        let mut tree = VisualTree::new();
        let item = normalize(
            RawItem::action("Custom")
                .with_id("custom")
                .with_render(|tree, _| {
                    let node = tree.create(Role::None);
                    tree.add_class(node, "my-row");
                    node
                }),
        );
        let node = render_item(&mut tree, &item, &opts()).unwrap();

        assert!(tree.has_class(node, "my-row"));
        assert!(tree.has_class(node, classes::ITEM));
        assert_eq!(tree.role(node), Some(Role::MenuItem));
        assert_eq!(tree.attr(node, "data-id"), Some("custom"));
        assert!(tree.children(node).is_empty());
    }

    #[test]
    fn test_panel_maps_only_rendered_items() {
        let mut tree = VisualTree::new();
        let mut map = NodeMap::new();
        let items = vec![
            MenuItem::action("Copy"),
            normalize(RawItem::action("Hidden").hidden()),
            MenuItem::action("Paste"),
        ];
        let panel = render_panel(&mut tree, &mut map, &items, 0, &opts());

        assert_eq!(tree.children(panel).len(), 2);
        let paste = tree.children(panel)[1];
        assert_eq!(map.get(&tree, paste), Some(ItemSlot { panel: 0, index: 2 }));
        assert_eq!(tree.attr(panel, "aria-orientation"), Some("vertical"));
    }
}
