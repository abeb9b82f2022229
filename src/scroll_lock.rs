//! Outside-scroll suppression while a menu is open
//!
//! The host forwards document-level wheel and touch-move events (capture
//! phase) as `Msg::Scroll`. An installed lock asks the host to prevent the
//! default action unless the event targets the menu's own popup.

use crate::messages::EventTarget;
use crate::model::InstanceId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollLock {
    installed: bool,
}

impl ScrollLock {
    pub fn install(&mut self) {
        if !self.installed {
            tracing::debug!("scroll lock installed");
        }
        self.installed = true;
    }

    pub fn remove(&mut self) {
        if self.installed {
            tracing::debug!("scroll lock removed");
        }
        self.installed = false;
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Whether a scroll aimed at `target` must be suppressed for `owner`
    pub fn suppresses(&self, owner: InstanceId, target: &EventTarget) -> bool {
        self.installed && !target.is_inside(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::EventTarget;

    #[test]
    fn test_inactive_lock_never_suppresses() {
        let lock = ScrollLock::default();
        assert!(!lock.suppresses(InstanceId(1), &EventTarget::Host(None)));
    }

    #[test]
    fn test_lock_spares_own_popup() {
        let mut lock = ScrollLock::default();
        lock.install();
        let own = EventTarget::Menu {
            instance: InstanceId(1),
            node: None,
        };
        let other = EventTarget::Menu {
            instance: InstanceId(2),
            node: None,
        };

        assert!(!lock.suppresses(InstanceId(1), &own));
        assert!(lock.suppresses(InstanceId(1), &other));
        assert!(lock.suppresses(InstanceId(1), &EventTarget::Host(None)));

        lock.remove();
        assert!(!lock.suppresses(InstanceId(1), &other));
    }
}
