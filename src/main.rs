use anyhow::{Context, Result};
use clap::Parser;

use ctxmenu::animation::AnimationOptions;
use ctxmenu::item::load_items_file;
use ctxmenu::keymap::Modifiers;
use ctxmenu::theme::load_theme;
use ctxmenu::view::snapshot;
use ctxmenu::{MenuBuilder, MenuMsg, MenuOptions, Msg, OpenRequest, Registry};

mod cli;

fn main() -> Result<()> {
    ctxmenu::tracing::init();

    let config = cli::CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    let items = load_items_file(&config.menu)
        .with_context(|| format!("loading menu {}", config.menu.display()))?;
    let mut options = match &config.options {
        Some(path) => MenuOptions::load(path)
            .with_context(|| format!("loading options {}", path.display()))?,
        None => MenuOptions::default(),
    };
    if let Some(theme) = &config.theme {
        options.theme = load_theme(theme)?;
    }
    // Transitions need paint frames; the preview renders the settled state
    options.animation = AnimationOptions::disabled();

    let mut registry = Registry::new(config.viewport);
    let id = registry.create(MenuBuilder::new(items).options(options).build());
    registry.open(id, OpenRequest::at(config.at.x, config.at.y));

    for label in &config.expand {
        let node = registry
            .instance(id)
            .and_then(|inst| inst.node_for_label(label))
            .with_context(|| format!("no item labelled {:?}", label))?;
        registry.update(Msg::to(
            id,
            MenuMsg::Click {
                node,
                modifiers: Modifiers::NONE,
            },
        ));
    }

    let inst = registry.instance(id).context("menu instance vanished")?;
    let root = inst
        .root_element()
        .context("menu did not open (empty or denied)")?;
    if config.json {
        println!("{}", snapshot::to_json(inst.tree(), root)?);
    } else {
        print!("{}", snapshot::outline(inst.tree(), root));
    }
    Ok(())
}
