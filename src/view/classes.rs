//! Style class and style variable names
//!
//! These names are the styling surface hosts and stylesheets depend on.
//! Renaming any of them is a breaking change.

// Structure
pub const MENU: &str = "cm-menu";
pub const SUBMENU: &str = "cm-submenu";
pub const ITEM: &str = "cm-item";
pub const SEPARATOR: &str = "cm-separator";
pub const LABEL: &str = "cm-label";

// Item decorations, in slot order
pub const ICON: &str = "cm-icon";
pub const SPINNER: &str = "cm-spinner";
pub const CHECK: &str = "cm-check";
pub const ITEM_LABEL: &str = "cm-item-label";
pub const SHORTCUT: &str = "cm-shortcut";
pub const BADGE: &str = "cm-badge";
pub const ARROW: &str = "cm-arrow";

// Item state
pub const DISABLED: &str = "cm-disabled";
pub const LOADING: &str = "cm-loading";
pub const CHECKED: &str = "cm-checked";
pub const FOCUSED: &str = "cm-focused";
pub const EXPANDED: &str = "cm-expanded";
pub const LINK: &str = "cm-link";

// Panel state
pub const OPEN: &str = "cm-open";
pub const LEAVE: &str = "cm-leave";
pub const RTL: &str = "cm-rtl";
pub const NO_ANIMATION: &str = "cm-no-animation";
pub const ANIM_FADE: &str = "cm-anim-fade";
pub const ANIM_SCALE: &str = "cm-anim-scale";
pub const ANIM_SLIDE: &str = "cm-anim-slide";

// Style variables
pub const VAR_ENTER_DURATION: &str = "--cm-enter-duration";
pub const VAR_LEAVE_DURATION: &str = "--cm-leave-duration";
pub const VAR_ENTER_EASING: &str = "--cm-enter-easing";
pub const VAR_LEAVE_EASING: &str = "--cm-leave-easing";
pub const VAR_X: &str = "--cm-x";
pub const VAR_Y: &str = "--cm-y";

/// Prefix applied to theme tokens (`bg` becomes `--cm-bg`)
pub const THEME_VAR_PREFIX: &str = "--cm-";

/// Style variable name for a theme token
pub fn theme_var(token: &str) -> String {
    format!("{}{}", THEME_VAR_PREFIX, token)
}
