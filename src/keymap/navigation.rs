//! Key-to-intent mapping for menu navigation

use super::types::{KeyCode, Keystroke};

/// What a navigation key asks the focused panel to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    Next,
    Prev,
    First,
    Last,
    /// Arrow toward the submenu side (right in LTR)
    Expand,
    /// Arrow away from the submenu side (left in LTR)
    Collapse,
    Activate,
    Dismiss,
}

/// Map a keystroke to a navigation intent
///
/// Only unmodified keys navigate; everything else is
/// left for shortcut matching. `rtl` mirrors the horizontal arrows.
pub fn nav_intent(stroke: &Keystroke, rtl: bool) -> Option<NavIntent> {
    if !stroke.mods.is_empty() {
        return None;
    }

    let intent = match stroke.key {
        KeyCode::Down => NavIntent::Next,
        KeyCode::Up => NavIntent::Prev,
        KeyCode::Home | KeyCode::PageUp => NavIntent::First,
        KeyCode::End | KeyCode::PageDown => NavIntent::Last,
        KeyCode::Right if rtl => NavIntent::Collapse,
        KeyCode::Right => NavIntent::Expand,
        KeyCode::Left if rtl => NavIntent::Expand,
        KeyCode::Left => NavIntent::Collapse,
        KeyCode::Enter | KeyCode::Space => NavIntent::Activate,
        KeyCode::Char(' ') => NavIntent::Activate,
        KeyCode::Escape => NavIntent::Dismiss,
        _ => return None,
    };
    Some(intent)
}

/// Index of the next candidate in `0..len` starting after `from`, with wraparound
///
/// `is_candidate` filters out disabled/non-interactive entries. Returns `None`
/// when no entry qualifies.
pub fn step_index(
    len: usize,
    from: Option<usize>,
    forward: bool,
    is_candidate: impl Fn(usize) -> bool,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let start = match (from, forward) {
        (Some(i), true) => i + 1,
        (Some(i), false) => i + len - 1,
        (None, true) => 0,
        (None, false) => len - 1,
    };

    (0..len)
        .map(|offset| {
            if forward {
                (start + offset) % len
            } else {
                (start + len - offset) % len
            }
        })
        .find(|&i| is_candidate(i))
}
