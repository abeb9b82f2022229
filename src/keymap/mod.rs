//! Keyboard handling for open menus
//!
//! This module provides:
//! - Key types shared with the host (`Keystroke`, `Modifiers`, `KeyCode`)
//! - Platform resolution of the primary modifier (Cmd on macOS, Ctrl elsewhere)
//! - Parsing and exact matching of item shortcut strings
//! - Mapping of navigation keys to panel intents
//!
//! # Architecture
//!
//! ```text
//! host key event → Keystroke → nav_intent() → NavIntent  (arrows, Enter, Escape…)
//!                            ↘ Shortcut::matches()        (item shortcuts)
//! ```

mod navigation;
mod shortcut;
mod types;

pub use navigation::{nav_intent, step_index, NavIntent};
pub use shortcut::Shortcut;
pub use types::{display_keys, KeyCode, Keystroke, Modifiers, Platform};
