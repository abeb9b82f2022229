//! Configuration loading tests
//!
//! Options, themes and declarative menus read from YAML files on disk.

mod common;

use std::fs;

use tempfile::tempdir;

use common::Host;

use ctxmenu::error::MenuError;
use ctxmenu::item::{load_items_file, normalize_all, ItemKind, MenuItem};
use ctxmenu::keymap::Platform;
use ctxmenu::position::SubmenuPlacement;
use ctxmenu::theme::load_theme;
use ctxmenu::{MenuBuilder, MenuOptions};

// ========================================================================
// Options
// ========================================================================

#[test]
fn test_options_file_overrides_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("menu.yaml");
    fs::write(
        &path,
        "platform: mac\nsubmenu:\n  open_delay_ms: 50\n  placement: left\nanimation:\n  enabled: false\n",
    )
    .unwrap();

    let opts = MenuOptions::load(&path).unwrap();
    assert_eq!(opts.platform, Platform::Mac);
    assert_eq!(opts.submenu.open_delay_ms, 50);
    assert_eq!(opts.submenu.close_delay_ms, 150);
    assert_eq!(opts.submenu.placement, SubmenuPlacement::Left);
    assert!(!opts.animation.enabled);
    assert!(opts.close_on_resize);
}

#[test]
fn test_missing_options_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = MenuOptions::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, MenuError::IoError(_)));
}

#[test]
fn test_malformed_options_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "submenu: [1, 2").unwrap();
    assert!(matches!(
        MenuOptions::load(&path),
        Err(MenuError::ParseError(_))
    ));
}

#[test]
fn test_loaded_delay_drives_hover() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fast.yaml");
    fs::write(&path, "animation:\n  enabled: false\nsubmenu:\n  open_delay_ms: 20\n").unwrap();

    let mut host = Host::new();
    let opts = MenuOptions::load(&path).unwrap();
    let id = host.create(MenuBuilder::new(common::nested_items()).options(opts));
    host.open_at(id, 0.0, 0.0);
    host.hover(id, "Share");
    host.advance_ms(20);
    assert_eq!(host.open_path(id), vec!["Share"]);
}

// ========================================================================
// Themes
// ========================================================================

#[test]
fn test_theme_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("brand.yaml");
    fs::write(
        &path,
        "version: 1\nname: Brand\nclass_name: cm-brand\ntokens:\n  bg: \"#101010\"\n",
    )
    .unwrap();

    let theme = load_theme(path.to_str().unwrap()).unwrap();
    assert_eq!(theme.name, "Brand");
    assert_eq!(theme.class_name.as_deref(), Some("cm-brand"));
    assert_eq!(theme.tokens.get("bg").map(String::as_str), Some("#101010"));
}

#[test]
fn test_builtin_theme_by_id() {
    let theme = load_theme("light").unwrap();
    assert!(theme.tokens.contains_key("fg"));
    assert!(matches!(
        load_theme("neon"),
        Err(MenuError::UnknownTheme(id)) if id == "neon"
    ));
}

// ========================================================================
// Declarative menus
// ========================================================================

#[test]
fn test_items_file_infers_kinds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("items.yaml");
    fs::write(
        &path,
        r#"
items:
  - label: Copy
    shortcut: mod+C
  - {}
  - label: Docs
    href: https://example.com
  - label: Export
    items:
      - label: PDF
      - label: PNG
  - type: checkbox
    label: Word wrap
    checked: true
"#,
    )
    .unwrap();

    let items = normalize_all(load_items_file(&path).unwrap());
    let kinds: Vec<_> = items.iter().map(MenuItem::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ItemKind::Action,
            ItemKind::Separator,
            ItemKind::Link,
            ItemKind::Submenu,
            ItemKind::Checkbox,
        ]
    );
}

#[test]
fn test_items_file_opens_in_registry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("items.yaml");
    fs::write(&path, "- label: One\n- label: Two\n  disabled: true\n").unwrap();

    let mut host = Host::new();
    let raw = load_items_file(&path).unwrap();
    let id = host.create(common::quiet(raw));
    host.open_at(id, 0.0, 0.0);
    host.key(id, common::down());
    // Two is disabled, so focus wraps back to One
    assert_eq!(host.focused_label(id).as_deref(), Some("One"));
}
