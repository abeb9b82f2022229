//! ctxmenu - headless context-menu engine
//!
//! This crate models context menus (nested submenus, keyboard navigation,
//! hover intent, viewport-aware positioning, enter/leave transitions) as a
//! pure state machine in the Elm Architecture style. The host feeds events
//! in as [`Msg`]s and carries out the returned [`Cmd`]s; the rendered popup
//! lives in a [`view::VisualTree`] the host mirrors into its own UI.

pub mod animation;
pub mod builder;
pub mod commands;
pub mod config;
pub mod error;
pub mod hooks;
pub mod item;
pub mod keymap;
pub mod messages;
pub mod model;
pub mod position;
pub mod registry;
pub mod scroll_lock;
pub mod theme;
pub mod tracing;
mod update;
pub mod view;

// Re-export commonly used types
pub use builder::{MenuBuilder, MenuConfig};
pub use commands::{Cmd, FocusTarget};
pub use config::MenuOptions;
pub use error::MenuError;
pub use hooks::{HookError, HookOutcome, MenuHooks, NoHooks};
pub use item::{MenuItem, RawItem};
pub use messages::{EventTarget, MenuMsg, Msg, PointerEvent, TriggerEvent};
pub use model::{CloseReason, InstanceId, OpenRequest, OpenTicket, Phase};
pub use registry::Registry;
pub use theme::Theme;
