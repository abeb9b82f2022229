//! Two-phase construction of menu instances
//!
//! `MenuBuilder` collects items, options and strategies and produces a fully
//! initialized [`MenuConfig`]; `Registry::create` turns that into a live
//! instance. Nothing is back-filled after construction.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use kurbo::Point;

use crate::animation::AnimationOptions;
use crate::config::MenuOptions;
use crate::hooks::{MenuHooks, NoHooks};
use crate::item::{normalize_all, MenuItem, RawItem};
use crate::keymap::Platform;
use crate::model::{HostElementId, MountPoint, TriggerBinding};
use crate::position::PositionConfig;
use crate::theme::Theme;
use crate::view::TextDirection;

/// Where the root items come from
#[derive(Clone)]
pub enum MenuSource {
    Items(Vec<MenuItem>),
    /// Called on every open; the result is normalized and replaces the items
    Producer(Rc<dyn Fn() -> Vec<RawItem>>),
}

impl fmt::Debug for MenuSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuSource::Items(items) => f.debug_tuple("Items").field(&items.len()).finish(),
            MenuSource::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Computes the open position when `open` gets no coordinates
#[derive(Clone)]
pub struct AnchorFn(Rc<dyn Fn() -> Option<Point>>);

impl AnchorFn {
    pub fn new(f: impl Fn() -> Option<Point> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn get(&self) -> Option<Point> {
        (self.0)()
    }
}

impl fmt::Debug for AnchorFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnchorFn(..)")
    }
}

/// Everything an instance needs, fully initialized
#[derive(Clone)]
pub struct MenuConfig {
    pub source: MenuSource,
    pub options: MenuOptions,
    pub hooks: Rc<dyn MenuHooks>,
    pub anchor_fn: Option<AnchorFn>,
    pub binding: Option<TriggerBinding>,
    pub mount: MountPoint,
}

impl fmt::Debug for MenuConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuConfig")
            .field("source", &self.source)
            .field("options", &self.options)
            .field("binding", &self.binding)
            .field("mount", &self.mount)
            .finish_non_exhaustive()
    }
}

pub struct MenuBuilder {
    source: MenuSource,
    options: MenuOptions,
    hooks: Rc<dyn MenuHooks>,
    anchor_fn: Option<AnchorFn>,
    binding: Option<TriggerBinding>,
    mount: MountPoint,
}

impl MenuBuilder {
    /// Start from item declarations
    pub fn new(items: impl IntoIterator<Item = RawItem>) -> Self {
        Self::from_items(normalize_all(items.into_iter().collect()))
    }

    /// Start from already normalized items
    pub fn from_items(items: Vec<MenuItem>) -> Self {
        Self {
            source: MenuSource::Items(items),
            options: MenuOptions::default(),
            hooks: Rc::new(NoHooks),
            anchor_fn: None,
            binding: None,
            mount: MountPoint::Portal,
        }
    }

    /// Produce the items on every open
    pub fn from_fn(producer: impl Fn() -> Vec<RawItem> + 'static) -> Self {
        Self {
            source: MenuSource::Producer(Rc::new(producer)),
            ..Self::from_items(Vec::new())
        }
    }

    /// Replace the whole options snapshot
    pub fn options(mut self, options: MenuOptions) -> Self {
        self.options = options;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.options.theme = theme;
        self
    }

    pub fn animation(mut self, animation: AnimationOptions) -> Self {
        self.options.animation = animation;
        self
    }

    pub fn position(mut self, position: PositionConfig) -> Self {
        self.options.position = position;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.options.platform = platform;
        self
    }

    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.options.direction = direction;
        self
    }

    pub fn lock_scroll_outside(mut self, lock: bool) -> Self {
        self.options.lock_scroll_outside = lock;
        self
    }

    pub fn hooks(mut self, hooks: impl MenuHooks + 'static) -> Self {
        self.hooks = Rc::new(hooks);
        self
    }

    /// Share a hooks object the caller keeps a handle to
    pub fn shared_hooks(mut self, hooks: Rc<dyn MenuHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn anchor_fn(mut self, f: impl Fn() -> Option<Point> + 'static) -> Self {
        self.anchor_fn = Some(AnchorFn::new(f));
        self
    }

    /// Bind a trigger element at construction
    pub fn bind(mut self, element: HostElementId, long_press: Option<Duration>) -> Self {
        self.binding = Some(TriggerBinding {
            element,
            long_press,
        });
        self
    }

    /// Attach the popup somewhere other than the default portal
    pub fn mount(mut self, mount: MountPoint) -> Self {
        self.mount = mount;
        self
    }

    pub fn build(self) -> MenuConfig {
        MenuConfig {
            source: self.source,
            options: self.options,
            hooks: self.hooks,
            anchor_fn: self.anchor_fn,
            binding: self.binding,
            mount: self.mount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_normalizes_items() {
        let config = MenuBuilder::new(vec![RawItem::action("Copy"), RawItem::separator()]).build();
        match config.source {
            MenuSource::Items(items) => assert_eq!(items.len(), 2),
            MenuSource::Producer(_) => panic!("expected literal items"),
        }
    }

    #[test]
    fn test_builder_setters() {
        let config = MenuBuilder::new(vec![])
            .platform(Platform::Mac)
            .lock_scroll_outside(false)
            .bind(HostElementId(7), None)
            .build();
        assert_eq!(config.options.platform, Platform::Mac);
        assert!(!config.options.lock_scroll_outside);
        assert_eq!(config.binding.map(|b| b.element), Some(HostElementId(7)));
    }
}
