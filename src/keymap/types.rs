//! Core key types: Keystroke, Modifiers, KeyCode and the platform the menu runs on

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform used to resolve the primary modifier and shortcut glyphs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Detect from the compilation target
    #[default]
    Auto,
    /// Cmd is primary, glyph rendering (⌘⇧K)
    Mac,
    /// Ctrl is primary, text rendering (Ctrl+Shift+K)
    Win,
}

impl Platform {
    /// Resolve `Auto` to a concrete platform
    pub fn resolve(self) -> Platform {
        match self {
            Platform::Auto => {
                if cfg!(target_os = "macos") {
                    Platform::Mac
                } else {
                    Platform::Win
                }
            }
            other => other,
        }
    }

    /// Whether this platform (after resolution) renders mac glyphs
    pub fn is_mac(self) -> bool {
        self.resolve() == Platform::Mac
    }

    /// The host's primary modifier (Cmd on mac, Ctrl elsewhere)
    pub fn primary_modifier(self) -> Modifiers {
        if self.is_mac() {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// A key code representing a logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key (normalized to lowercase)
    Char(char),

    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    Up,
    Down,
    Left,
    Right,

    Home,
    End,
    PageUp,
    PageDown,

    F(u8),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Escape => write!(f, "Esc"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Del"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Up => write!(f, "↑"),
            KeyCode::Down => write!(f, "↓"),
            KeyCode::Left => write!(f, "←"),
            KeyCode::Right => write!(f, "→"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::F(n) => write!(f, "F{}", n),
        }
    }
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Create a keystroke with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Create a keystroke with a character key
    pub fn char(c: char) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            mods: Modifiers::NONE,
        }
    }

    /// Create a keystroke with a character and modifiers
    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            mods,
        }
    }
}

/// Render a modifier set plus key the way the given platform labels shortcuts
pub fn display_keys(mods: Modifiers, key: KeyCode, platform: Platform) -> String {
    let key_str = match key {
        KeyCode::Char(c) => c.to_uppercase().to_string(),
        KeyCode::Enter if platform.is_mac() => "↩".to_string(),
        KeyCode::Escape if platform.is_mac() => "⎋".to_string(),
        KeyCode::Backspace if platform.is_mac() => "⌫".to_string(),
        KeyCode::Delete if platform.is_mac() => "⌦".to_string(),
        KeyCode::Tab if platform.is_mac() => "⇥".to_string(),
        _ => format!("{}", key),
    };

    if platform.is_mac() {
        // macOS uses symbols in the conventional order: ⌃ ⌥ ⇧ ⌘
        let mut out = String::new();
        if mods.ctrl() {
            out.push('⌃');
        }
        if mods.alt() {
            out.push('⌥');
        }
        if mods.shift() {
            out.push('⇧');
        }
        if mods.meta() {
            out.push('⌘');
        }
        out.push_str(&key_str);
        out
    } else {
        let mut parts = Vec::new();
        if mods.ctrl() {
            parts.push("Ctrl");
        }
        if mods.alt() {
            parts.push("Alt");
        }
        if mods.shift() {
            parts.push("Shift");
        }
        if mods.meta() {
            parts.push("Win");
        }
        parts.push(&key_str);
        parts.join("+")
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_keys(self.mods, self.key, Platform::Win))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_empty() {
        let mods = Modifiers::NONE;
        assert!(mods.is_empty());
        assert!(!mods.ctrl());
        assert!(!mods.shift());
        assert!(!mods.alt());
        assert!(!mods.meta());
    }

    #[test]
    fn test_modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::META));
    }

    #[test]
    fn test_platform_primary_modifier() {
        assert_eq!(Platform::Mac.primary_modifier(), Modifiers::META);
        assert_eq!(Platform::Win.primary_modifier(), Modifiers::CTRL);
        assert_ne!(Platform::Auto.resolve(), Platform::Auto);
    }

    #[test]
    fn test_display_keys_per_platform() {
        let mods = Modifiers::META | Modifiers::SHIFT;
        assert_eq!(display_keys(mods, KeyCode::Char('k'), Platform::Mac), "⇧⌘K");

        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(
            display_keys(mods, KeyCode::Char('k'), Platform::Win),
            "Ctrl+Shift+K"
        );
    }

    #[test]
    fn test_keystroke_char_lowercase() {
        assert_eq!(Keystroke::char('A'), Keystroke::char('a'));
    }
}
