//! Theme tokens for menu panels
//!
//! A theme is a style class plus a set of tokens emitted as style variables
//! (`bg` → `--cm-bg`) on every panel. Built-in themes are YAML files embedded
//! at compile time; hosts can also load their own from disk.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MenuError;
use crate::view::{classes, NodeId, VisualTree};

// Embed theme YAML files at compile time
pub const LIGHT_YAML: &str = include_str!("../themes/light.yaml");
pub const DARK_YAML: &str = include_str!("../themes/dark.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "light", "dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "light",
        yaml: LIGHT_YAML,
    },
    BuiltinTheme {
        id: "dark",
        yaml: DARK_YAML,
    },
];

/// Resolved theme applied to panels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub version: u32,
    /// Display name from YAML (e.g., "Dark")
    pub name: String,
    /// Extra class put on every panel
    pub class_name: Option<String>,
    /// Token name → value, emitted as `--cm-<name>`
    pub tokens: BTreeMap<String, String>,
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, MenuError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, MenuError> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| MenuError::UnknownTheme(id.to_string()))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Set a token (builder pattern)
    pub fn with_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    /// Put the theme class and variables on a panel node
    pub fn apply(&self, tree: &mut VisualTree, panel: NodeId) {
        if let Some(class) = &self.class_name {
            tree.add_class(panel, class);
        }
        for (name, value) in &self.tokens {
            tree.set_style(panel, &classes::theme_var(name), value.clone());
        }
    }

    /// Take this theme's class and variables back off a panel
    pub fn unapply(&self, tree: &mut VisualTree, panel: NodeId) {
        if let Some(class) = &self.class_name {
            tree.remove_class(panel, class);
        }
        for name in self.tokens.keys() {
            tree.clear_style(panel, &classes::theme_var(name));
        }
    }
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, MenuError> {
    let content = std::fs::read_to_string(path)?;
    Theme::from_yaml(&content)
}

/// Load a theme by id, or from a path when the argument names a YAML file
pub fn load_theme(id_or_path: &str) -> Result<Theme, MenuError> {
    let path = Path::new(id_or_path);
    if path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
    {
        tracing::info!("Loading theme from {}", path.display());
        return from_file(path);
    }

    tracing::debug!("Loading builtin theme: {}", id_or_path);
    Theme::from_builtin(id_or_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes_parse() {
        for builtin in BUILTIN_THEMES {
            let theme = Theme::from_builtin(builtin.id).unwrap();
            assert!(!theme.name.is_empty(), "{} has no name", builtin.id);
            assert!(theme.tokens.contains_key("bg"), "{} has no bg", builtin.id);
        }
    }

    #[test]
    fn test_unknown_theme() {
        assert_eq!(
            load_theme("solarized"),
            Err(MenuError::UnknownTheme("solarized".into()))
        );
    }

    #[test]
    fn test_apply_sets_variables() {
        let mut tree = VisualTree::new();
        let panel = tree.create(crate::view::Role::Menu);
        let theme = Theme::from_builtin("dark").unwrap();
        theme.apply(&mut tree, panel);

        assert!(tree.has_class(panel, "cm-theme-dark"));
        assert_eq!(tree.style(panel, "--cm-bg"), Some("#252526"));

        theme.unapply(&mut tree, panel);
        assert_eq!(tree.style(panel, "--cm-bg"), None);
    }
}
