//! Declared item shortcuts: parsing, exact-modifier matching and glyph rendering

use std::str::FromStr;

use super::types::{display_keys, KeyCode, Keystroke, Modifiers, Platform};
use crate::error::MenuError;

/// A parsed shortcut string such as `"ctrl+shift+k"`
///
/// `ctrl` (and its aliases `cmd`, `mod`, `primary`) is recorded as the
/// *primary* modifier and only resolved against a platform when matching
/// or rendering. `control` always means the literal Control key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    primary: bool,
    mods: Modifiers,
    key: KeyCode,
}

impl Shortcut {
    /// Parse a `+`-separated shortcut string
    pub fn parse(s: &str) -> Result<Self, MenuError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MenuError::InvalidShortcut(s.to_string()));
        }

        let mut primary = false;
        let mut mods = Modifiers::NONE;
        let mut key_part = None;

        // "ctrl++" declares the plus key itself
        let parts: Vec<&str> = if let Some(head) = trimmed.strip_suffix("++") {
            head.split('+').chain(std::iter::once("+")).collect()
        } else {
            trimmed.split('+').collect()
        };

        for part in parts {
            let part_lower = part.trim().to_lowercase();
            match part_lower.as_str() {
                "ctrl" | "cmd" | "mod" | "primary" | "⌘" => primary = true,
                "control" | "⌃" => mods = mods | Modifiers::CTRL,
                "shift" | "⇧" => mods = mods | Modifiers::SHIFT,
                "alt" | "option" | "opt" | "⌥" => mods = mods | Modifiers::ALT,
                "meta" | "super" | "win" => mods = mods | Modifiers::META,
                "" => return Err(MenuError::InvalidShortcut(s.to_string())),
                _ => {
                    if key_part.is_some() {
                        return Err(MenuError::InvalidShortcut(format!(
                            "Multiple keys in shortcut: {}",
                            s
                        )));
                    }
                    key_part = Some(parse_key_code(&part_lower).ok_or_else(|| {
                        MenuError::InvalidShortcut(format!("Unknown key '{}' in {}", part, s))
                    })?);
                }
            }
        }

        let key = key_part
            .ok_or_else(|| MenuError::InvalidShortcut(format!("No key found in: {}", s)))?;

        Ok(Self { primary, mods, key })
    }

    /// The terminal key
    pub fn key(&self) -> KeyCode {
        self.key
    }

    /// Whether the shortcut declares the primary modifier
    pub fn has_primary(&self) -> bool {
        self.primary
    }

    /// The full modifier set required on the given platform
    pub fn resolve(&self, platform: Platform) -> Modifiers {
        if self.primary {
            self.mods | platform.primary_modifier()
        } else {
            self.mods
        }
    }

    /// Exact match: every declared modifier held, no undeclared modifier held
    pub fn matches(&self, stroke: &Keystroke, platform: Platform) -> bool {
        let key_matches = match (self.key, stroke.key) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        key_matches && stroke.mods == self.resolve(platform)
    }

    /// Render the shortcut indicator text for the given platform
    pub fn display(&self, platform: Platform) -> String {
        display_keys(self.resolve(platform), self.key, platform)
    }
}

impl FromStr for Shortcut {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shortcut::parse(s)
    }
}

/// Parse a key code from its lowercase name
fn parse_key_code(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c.to_ascii_lowercase()));
    }

    match key {
        "enter" | "return" => Some(KeyCode::Enter),
        "escape" | "esc" => Some(KeyCode::Escape),
        "tab" => Some(KeyCode::Tab),
        "backspace" | "back" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "space" => Some(KeyCode::Space),
        "up" | "arrowup" => Some(KeyCode::Up),
        "down" | "arrowdown" => Some(KeyCode::Down),
        "left" | "arrowleft" => Some(KeyCode::Left),
        "right" | "arrowright" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdown" | "pgdn" => Some(KeyCode::PageDown),
        "plus" => Some(KeyCode::Char('+')),
        "minus" => Some(KeyCode::Char('-')),
        _ => {
            let n = key.strip_prefix('f')?.parse::<u8>().ok()?;
            (1..=24).contains(&n).then_some(KeyCode::F(n))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primary_shortcut() {
        let s = Shortcut::parse("ctrl+shift+k").unwrap();
        assert!(s.has_primary());
        assert_eq!(s.key(), KeyCode::Char('k'));
        assert_eq!(
            s.resolve(Platform::Win),
            Modifiers::CTRL | Modifiers::SHIFT
        );
        assert_eq!(
            s.resolve(Platform::Mac),
            Modifiers::META | Modifiers::SHIFT
        );
    }

    #[test]
    fn test_parse_named_and_function_keys() {
        assert_eq!(Shortcut::parse("Delete").unwrap().key(), KeyCode::Delete);
        assert_eq!(Shortcut::parse("alt+F4").unwrap().key(), KeyCode::F(4));
        assert_eq!(Shortcut::parse("ctrl++").unwrap().key(), KeyCode::Char('+'));
    }

    #[test]
    fn test_from_str_matches_parse() {
        let parsed: Shortcut = "mod+shift+k".parse().unwrap();
        assert_eq!(parsed, Shortcut::parse("ctrl+shift+k").unwrap());
        assert!(matches!(
            "shift+".parse::<Shortcut>(),
            Err(MenuError::InvalidShortcut(_))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Shortcut::parse("").is_err());
        assert!(Shortcut::parse("ctrl+shift").is_err());
        assert!(Shortcut::parse("a+b").is_err());
        assert!(Shortcut::parse("ctrl+hyperkey").is_err());
        assert!(Shortcut::parse("f99").is_err());
    }

    #[test]
    fn test_matches_is_exact() {
        let s = Shortcut::parse("ctrl+c").unwrap();
        let exact = Keystroke::char_with_mods('c', Modifiers::CTRL);
        let extra = Keystroke::char_with_mods('c', Modifiers::CTRL | Modifiers::SHIFT);
        let missing = Keystroke::char('c');

        assert!(s.matches(&exact, Platform::Win));
        assert!(!s.matches(&extra, Platform::Win));
        assert!(!s.matches(&missing, Platform::Win));
    }

    #[test]
    fn test_ctrl_maps_to_cmd_on_mac() {
        let s = Shortcut::parse("ctrl+c").unwrap();
        let ctrl = Keystroke::char_with_mods('c', Modifiers::CTRL);
        let cmd = Keystroke::char_with_mods('c', Modifiers::META);

        assert!(s.matches(&cmd, Platform::Mac));
        assert!(!s.matches(&ctrl, Platform::Mac));
    }

    #[test]
    fn test_literal_control_stays_control() {
        let s = Shortcut::parse("control+tab").unwrap();
        let stroke = Keystroke::new(KeyCode::Tab, Modifiers::CTRL);
        assert!(s.matches(&stroke, Platform::Mac));
    }

    #[test]
    fn test_display() {
        let s = Shortcut::parse("ctrl+shift+p").unwrap();
        assert_eq!(s.display(Platform::Mac), "⇧⌘P");
        assert_eq!(s.display(Platform::Win), "Ctrl+Shift+P");
    }
}
