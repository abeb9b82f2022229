//! Tracing setup and state-diff logging
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=message=debug,menu=debug` - scoped filtering
//! - `RUST_LOG=ctxmenu::update=trace` - module-level filtering

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{Instance, Phase};

/// Initialize the console subscriber
///
/// Respects RUST_LOG and defaults to `warn`. Calling it twice is harmless.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}

/// Lightweight snapshot of an instance for diffing around one message
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSnapshot {
    pub phase: Phase,
    pub depth: usize,
    pub focused: Option<usize>,
    pub queued: usize,
    pub scroll_locked: bool,
}

impl MenuSnapshot {
    pub fn from_instance(inst: &Instance) -> Self {
        Self {
            phase: inst.phase(),
            depth: inst.panels().len(),
            focused: inst.active_panel().and_then(|p| p.focused),
            queued: inst.queue.len(),
            scroll_locked: inst.scroll_lock_installed(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &MenuSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.phase != other.phase {
            changes.push(format!("phase: {:?} → {:?}", self.phase, other.phase));
        }
        if self.depth != other.depth {
            changes.push(format!("panels: {} → {}", self.depth, other.depth));
        }
        if self.focused != other.focused {
            changes.push(format!("focus: {:?} → {:?}", self.focused, other.focused));
        }
        if self.queued != other.queued {
            changes.push(format!("queue: {} → {}", self.queued, other.queued));
        }
        if self.scroll_locked != other.scroll_locked {
            let status = if other.scroll_locked {
                "installed"
            } else {
                "removed"
            };
            changes.push(format!("scroll lock {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
