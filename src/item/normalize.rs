//! Raw item declarations and their normalization into `MenuItem`

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    ActionEvent, ActionItem, CheckboxEvent, CheckboxItem, ChildProducer, Children, CustomRender,
    Handler, ItemBase, ItemKind, LabelItem, LinkItem, MenuItem, RadioEvent, RadioItem,
    SeparatorItem, SubmenuItem,
};
use crate::error::MenuError;
use crate::view::{NodeId, VisualTree};

/// A heterogeneous item declaration
///
/// Every field is optional; [`normalize`] infers the variant and fills in
/// defaults. Closures cannot be deserialized and are attached with the
/// builder methods instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(alias = "class", alias = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<bool>,
    #[serde(alias = "closeOnAction", skip_serializing_if = "Option::is_none")]
    pub close_on_action: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(alias = "name", skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(alias = "items", skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawItem>>,
    #[serde(skip)]
    pub lazy_children: Option<ChildProducer>,
    #[serde(skip)]
    pub on_click: Option<Handler<ActionEvent>>,
    #[serde(skip)]
    pub on_change: Option<Handler<CheckboxEvent>>,
    #[serde(skip)]
    pub on_select: Option<Handler<RadioEvent>>,
    #[serde(skip)]
    pub render: Option<CustomRender>,
}

impl RawItem {
    pub fn action(label: impl Into<String>) -> Self {
        Self {
            kind: Some(ItemKind::Action),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn separator() -> Self {
        Self {
            kind: Some(ItemKind::Separator),
            ..Self::default()
        }
    }

    /// A non-interactive section label
    pub fn heading(label: impl Into<String>) -> Self {
        Self {
            kind: Some(ItemKind::Label),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            kind: Some(ItemKind::Link),
            label: Some(label.into()),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn checkbox(label: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: Some(ItemKind::Checkbox),
            label: Some(label.into()),
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn radio(
        label: impl Into<String>,
        group: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: Some(ItemKind::Radio),
            label: Some(label.into()),
            group: Some(group.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn submenu(label: impl Into<String>, children: Vec<RawItem>) -> Self {
        Self {
            kind: Some(ItemKind::Submenu),
            label: Some(label.into()),
            children: Some(children),
            ..Self::default()
        }
    }

    /// A submenu whose children are produced when it opens
    pub fn lazy_submenu(label: impl Into<String>, producer: ChildProducer) -> Self {
        Self {
            kind: Some(ItemKind::Submenu),
            label: Some(label.into()),
            lazy_children: Some(producer),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    /// Keep the menu open after the item is activated
    pub fn keep_open(mut self) -> Self {
        self.close_on_action = Some(false);
        self
    }

    pub fn on_click(mut self, f: impl Fn(&ActionEvent) + 'static) -> Self {
        self.on_click = Some(Handler::new(f));
        self
    }

    pub fn on_change(mut self, f: impl Fn(&CheckboxEvent) + 'static) -> Self {
        self.on_change = Some(Handler::new(f));
        self
    }

    pub fn on_select(mut self, f: impl Fn(&RadioEvent) + 'static) -> Self {
        self.on_select = Some(Handler::new(f));
        self
    }

    pub fn with_render(
        mut self,
        f: impl Fn(&mut VisualTree, &MenuItem) -> NodeId + 'static,
    ) -> Self {
        self.render = Some(CustomRender::new(f));
        self
    }

    fn infer_kind(&self) -> ItemKind {
        if self.children.is_some() || self.lazy_children.is_some() {
            ItemKind::Submenu
        } else if self.href.is_some() {
            ItemKind::Link
        } else if self.label.is_some() || self.on_click.is_some() {
            ItemKind::Action
        } else {
            ItemKind::Separator
        }
    }
}

/// Canonicalize a declaration into a `MenuItem`
///
/// Idempotent: `normalize(RawItem::from(normalize(x))) == normalize(x)`.
pub fn normalize(raw: RawItem) -> MenuItem {
    let kind = raw.kind.unwrap_or_else(|| raw.infer_kind());

    let base = ItemBase {
        id: raw.id,
        disabled: raw.disabled.unwrap_or(false),
        visible: raw.visible.unwrap_or(true),
        class_name: raw.class_name,
        render: raw.render,
    };
    let label = raw.label.unwrap_or_default();
    let close_on_action = raw.close_on_action.unwrap_or(true);
    let loading = raw.loading.unwrap_or(false);

    match kind {
        ItemKind::Action => MenuItem::Action(ActionItem {
            base,
            label,
            icon: raw.icon,
            shortcut: raw.shortcut,
            badge: raw.badge,
            loading,
            close_on_action,
            on_click: raw.on_click,
        }),
        ItemKind::Separator => MenuItem::Separator(SeparatorItem {
            class_name: base.class_name,
        }),
        ItemKind::Label => MenuItem::Label(LabelItem { base, label }),
        ItemKind::Link => MenuItem::Link(LinkItem {
            base,
            label,
            href: raw.href.unwrap_or_default(),
            target: raw.target,
            icon: raw.icon,
            shortcut: raw.shortcut,
            badge: raw.badge,
            close_on_action,
        }),
        ItemKind::Checkbox => MenuItem::Checkbox(CheckboxItem {
            base,
            label,
            checked: raw.checked.unwrap_or(false),
            icon: raw.icon,
            shortcut: raw.shortcut,
            badge: raw.badge,
            loading,
            close_on_action,
            on_change: raw.on_change,
        }),
        ItemKind::Radio => {
            let value = raw
                .value
                .or_else(|| base.id.clone())
                .unwrap_or_else(|| label.clone());
            MenuItem::Radio(RadioItem {
                base,
                label,
                group: raw.group.unwrap_or_default(),
                value,
                checked: raw.checked.unwrap_or(false),
                icon: raw.icon,
                shortcut: raw.shortcut,
                badge: raw.badge,
                loading,
                close_on_action,
                on_select: raw.on_select,
            })
        }
        ItemKind::Submenu => {
            // Literal children win over a producer; producers are never run here
            let children = match (raw.children, raw.lazy_children) {
                (Some(children), _) => Children::Items(normalize_all(children)),
                (None, Some(producer)) => Children::Deferred(producer),
                (None, None) => Children::Items(Vec::new()),
            };
            MenuItem::Submenu(SubmenuItem {
                base,
                label,
                icon: raw.icon,
                badge: raw.badge,
                children,
            })
        }
    }
}

/// Normalize a sequence of declarations
pub fn normalize_all(raws: Vec<RawItem>) -> Vec<MenuItem> {
    raws.into_iter().map(normalize).collect()
}

/// Fully independent copy of an item tree
///
/// Literal submenu children are copied element by element, so the clone never
/// shares a child sequence with the original. Closures stay shared behind `Rc`.
pub fn deep_clone(items: &[MenuItem]) -> Vec<MenuItem> {
    items
        .iter()
        .map(|item| match item {
            MenuItem::Submenu(sub) => {
                let children = match &sub.children {
                    Children::Items(children) => Children::Items(deep_clone(children)),
                    Children::Deferred(producer) => Children::Deferred(producer.clone()),
                };
                MenuItem::Submenu(SubmenuItem {
                    children,
                    ..sub.clone()
                })
            }
            other => other.clone(),
        })
        .collect()
}

fn base_fields(raw: &mut RawItem, base: ItemBase) {
    raw.id = base.id;
    raw.disabled = Some(base.disabled);
    raw.visible = Some(base.visible);
    raw.class_name = base.class_name;
    raw.render = base.render;
}

impl From<MenuItem> for RawItem {
    fn from(item: MenuItem) -> Self {
        let mut raw = RawItem {
            kind: Some(item.kind()),
            ..RawItem::default()
        };
        match item {
            MenuItem::Action(i) => {
                base_fields(&mut raw, i.base);
                raw.label = Some(i.label);
                raw.icon = i.icon;
                raw.shortcut = i.shortcut;
                raw.badge = i.badge;
                raw.loading = Some(i.loading);
                raw.close_on_action = Some(i.close_on_action);
                raw.on_click = i.on_click;
            }
            MenuItem::Separator(i) => {
                raw.class_name = i.class_name;
            }
            MenuItem::Label(i) => {
                base_fields(&mut raw, i.base);
                raw.label = Some(i.label);
            }
            MenuItem::Link(i) => {
                base_fields(&mut raw, i.base);
                raw.label = Some(i.label);
                raw.href = Some(i.href);
                raw.target = i.target;
                raw.icon = i.icon;
                raw.shortcut = i.shortcut;
                raw.badge = i.badge;
                raw.close_on_action = Some(i.close_on_action);
            }
            MenuItem::Checkbox(i) => {
                base_fields(&mut raw, i.base);
                raw.label = Some(i.label);
                raw.checked = Some(i.checked);
                raw.icon = i.icon;
                raw.shortcut = i.shortcut;
                raw.badge = i.badge;
                raw.loading = Some(i.loading);
                raw.close_on_action = Some(i.close_on_action);
                raw.on_change = i.on_change;
            }
            MenuItem::Radio(i) => {
                base_fields(&mut raw, i.base);
                raw.label = Some(i.label);
                raw.group = Some(i.group);
                raw.value = Some(i.value);
                raw.checked = Some(i.checked);
                raw.icon = i.icon;
                raw.shortcut = i.shortcut;
                raw.badge = i.badge;
                raw.loading = Some(i.loading);
                raw.close_on_action = Some(i.close_on_action);
                raw.on_select = i.on_select;
            }
            MenuItem::Submenu(i) => {
                base_fields(&mut raw, i.base);
                raw.label = Some(i.label);
                raw.icon = i.icon;
                raw.badge = i.badge;
                match i.children {
                    Children::Items(children) => {
                        raw.children = Some(children.into_iter().map(RawItem::from).collect());
                    }
                    Children::Deferred(producer) => raw.lazy_children = Some(producer),
                }
            }
        }
        raw
    }
}

/// Top-level shape of a declarative menu file: a bare list or `items: [...]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MenuDocument {
    List(Vec<RawItem>),
    Wrapped { items: Vec<RawItem> },
}

/// Parse item declarations from YAML (JSON is valid YAML)
pub fn parse_items_yaml(yaml: &str) -> Result<Vec<RawItem>, MenuError> {
    let doc: MenuDocument = serde_yaml::from_str(yaml)?;
    Ok(match doc {
        MenuDocument::List(items) => items,
        MenuDocument::Wrapped { items } => items,
    })
}

/// Load item declarations from a YAML file
pub fn load_items_file(path: &Path) -> Result<Vec<RawItem>, MenuError> {
    let content = std::fs::read_to_string(path)?;
    parse_items_yaml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infers_submenu_from_children() {
        let raw = RawItem {
            label: Some("More".into()),
            children: Some(vec![RawItem::action("Rename")]),
            ..RawItem::default()
        };
        assert_eq!(normalize(raw).kind(), ItemKind::Submenu);
    }

    #[test]
    fn test_infers_link_from_href() {
        let raw = RawItem {
            label: Some("Docs".into()),
            href: Some("https://example.com".into()),
            ..RawItem::default()
        };
        assert_eq!(normalize(raw).kind(), ItemKind::Link);
    }

    #[test]
    fn test_infers_action_from_label() {
        let raw = RawItem {
            label: Some("Copy".into()),
            ..RawItem::default()
        };
        let item = normalize(raw);
        assert_eq!(item.kind(), ItemKind::Action);
        assert!(item.is_visible());
        assert!(item.closes_on_action());
    }

    #[test]
    fn test_blank_declaration_is_separator() {
        assert_eq!(normalize(RawItem::default()).kind(), ItemKind::Separator);
    }

    #[test]
    fn test_explicit_type_wins() {
        let raw = RawItem {
            kind: Some(ItemKind::Label),
            label: Some("Section".into()),
            href: Some("/x".into()),
            ..RawItem::default()
        };
        assert_eq!(normalize(raw).kind(), ItemKind::Label);
    }

    #[test]
    fn test_radio_value_defaults() {
        let raw = RawItem {
            kind: Some(ItemKind::Radio),
            label: Some("Small".into()),
            ..RawItem::default()
        };
        match normalize(raw) {
            MenuItem::Radio(r) => assert_eq!(r.value, "Small"),
            other => panic!("expected radio, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_lazy_producer_not_invoked() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let raw = RawItem::lazy_submenu(
            "Recent",
            ChildProducer::ready(move || {
                counter.set(counter.get() + 1);
                vec![]
            }),
        );
        let item = normalize(raw);
        assert!(matches!(
            item,
            MenuItem::Submenu(SubmenuItem {
                children: Children::Deferred(_),
                ..
            })
        ));
        assert_eq!(calls.get(), 0);
    }

    fn renormalized(item: &MenuItem) -> MenuItem {
        normalize(RawItem::from(item.clone()))
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let cases = vec![
            RawItem::default(),
            RawItem {
                label: Some("Copy".into()),
                ..RawItem::default()
            },
            RawItem {
                kind: Some(ItemKind::Radio),
                id: Some("size-s".into()),
                label: Some("Small".into()),
                group: Some("size".into()),
                ..RawItem::default()
            },
            RawItem {
                label: Some("More".into()),
                children: Some(vec![
                    RawItem::action("Rename").with_shortcut("mod+r"),
                    RawItem::default(),
                    RawItem::link("Docs", "https://example.com"),
                    RawItem::checkbox("Wrap", true),
                ]),
                ..RawItem::default()
            },
        ];

        for raw in cases {
            let once = normalize(raw);
            assert_eq!(renormalized(&once), once);
        }
    }

    #[test]
    fn test_deep_clone_shares_no_children() {
        let original = normalize_all(vec![RawItem::submenu(
            "Share",
            vec![RawItem::submenu("Social", vec![RawItem::action("Post")])],
        )]);
        let mut copy = deep_clone(&original);
        assert_eq!(copy, original);

        if let MenuItem::Submenu(SubmenuItem {
            children: Children::Items(outer),
            ..
        }) = &mut copy[0]
        {
            if let MenuItem::Submenu(SubmenuItem {
                children: Children::Items(inner),
                ..
            }) = &mut outer[0]
            {
                inner[0] = MenuItem::action("Edited");
                inner.push(MenuItem::action("Extra"));
            }
        }

        assert_ne!(copy, original);
        let MenuItem::Submenu(SubmenuItem {
            children: Children::Items(outer),
            ..
        }) = &original[0]
        else {
            panic!("expected literal children");
        };
        let MenuItem::Submenu(SubmenuItem {
            children: Children::Items(inner),
            ..
        }) = &outer[0]
        else {
            panic!("expected literal children");
        };
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].label(), Some("Post"));
    }

    #[test]
    fn test_parse_wrapped_and_bare_yaml() {
        let bare = "- label: Copy\n- type: separator\n";
        assert_eq!(parse_items_yaml(bare).unwrap().len(), 2);

        let wrapped = "items:\n  - label: Copy\n";
        assert_eq!(parse_items_yaml(wrapped).unwrap().len(), 1);
    }
}
