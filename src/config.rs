//! Menu options
//!
//! Every section has serde defaults, so a partial YAML document is valid:
//!
//! ```yaml
//! theme:
//!   class_name: my-menu
//! position:
//!   padding: 12
//! submenu:
//!   open_delay_ms: 100
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationOptions;
use crate::error::MenuError;
use crate::keymap::Platform;
use crate::position::{PositionConfig, SubmenuPlacement};
use crate::theme::Theme;
use crate::view::{Metrics, TextDirection};

/// Submenu decoration and hover-intent timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmenuOptions {
    /// Render the trailing arrow on submenu triggers
    pub arrow: bool,
    pub placement: SubmenuPlacement,
    pub open_delay_ms: u64,
    pub close_delay_ms: u64,
}

impl Default for SubmenuOptions {
    fn default() -> Self {
        Self {
            arrow: true,
            placement: SubmenuPlacement::Auto,
            open_delay_ms: 200,
            close_delay_ms: 150,
        }
    }
}

impl SubmenuOptions {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

/// Configuration snapshot owned by each instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuOptions {
    pub theme: Theme,
    pub animation: AnimationOptions,
    pub position: PositionConfig,
    pub submenu: SubmenuOptions,
    /// Shortcut glyphs and the primary modifier
    pub platform: Platform,
    pub direction: TextDirection,
    pub lock_scroll_outside: bool,
    pub close_on_resize: bool,
    /// Touch hold time before a bound trigger opens the menu
    pub long_press_ms: u64,
    pub metrics: Metrics,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            animation: AnimationOptions::default(),
            position: PositionConfig::default(),
            submenu: SubmenuOptions::default(),
            platform: Platform::Auto,
            direction: TextDirection::Ltr,
            lock_scroll_outside: true,
            close_on_resize: true,
            long_press_ms: 500,
            metrics: Metrics::default(),
        }
    }
}

impl MenuOptions {
    /// Parse options from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, MenuError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load options from a YAML file
    pub fn load(path: &Path) -> Result<Self, MenuError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_yaml(&content)?;
        tracing::info!("Loaded menu options from {}", path.display());
        Ok(options)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}
