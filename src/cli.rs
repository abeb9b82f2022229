//! Command-line argument parsing for the preview binary
//!
//! Supports:
//! - Rendering a YAML menu document at a point
//! - Options and theme overrides
//! - Opening submenus by label before printing

use clap::Parser;
use kurbo::{Point, Size};
use std::path::PathBuf;

/// Render a context menu headlessly and print the resulting tree
#[derive(Parser, Debug)]
#[command(name = "ctxmenu-preview", version, about = "Preview a context menu layout")]
pub struct CliArgs {
    /// YAML menu document (a list of items, or `items:`)
    #[arg(value_name = "MENU")]
    pub menu: PathBuf,

    /// YAML options file
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Builtin theme id (`light`, `dark`) or a theme YAML file
    #[arg(long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Open position as `X,Y`
    #[arg(long, value_name = "X,Y", default_value = "0,0")]
    pub at: String,

    /// Viewport as `WxH`
    #[arg(long, value_name = "WxH", default_value = "1280x800")]
    pub viewport: String,

    /// Open the submenu with this label (repeatable, outermost first)
    #[arg(long, value_name = "LABEL")]
    pub expand: Vec<String>,

    /// Print a JSON snapshot instead of the outline
    #[arg(long)]
    pub json: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub menu: PathBuf,
    pub options: Option<PathBuf>,
    pub theme: Option<String>,
    pub at: Point,
    pub viewport: Size,
    pub expand: Vec<String>,
    pub json: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into a preview configuration
    pub fn into_config(self) -> Result<PreviewConfig, String> {
        let at = parse_pair(&self.at, ',')
            .map(|(x, y)| Point::new(x, y))
            .ok_or_else(|| format!("invalid --at {:?}, expected X,Y", self.at))?;
        let viewport = parse_pair(&self.viewport, 'x')
            .filter(|(w, h)| *w > 0.0 && *h > 0.0)
            .map(|(w, h)| Size::new(w, h))
            .ok_or_else(|| format!("invalid --viewport {:?}, expected WxH", self.viewport))?;

        Ok(PreviewConfig {
            menu: self.menu,
            options: self.options,
            theme: self.theme,
            at,
            viewport,
            expand: self.expand,
            json: self.json,
        })
    }
}

fn parse_pair(s: &str, sep: char) -> Option<(f64, f64)> {
    let (a, b) = s.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(at: &str, viewport: &str) -> CliArgs {
        CliArgs {
            menu: PathBuf::from("menu.yaml"),
            options: None,
            theme: None,
            at: at.to_string(),
            viewport: viewport.to_string(),
            expand: vec![],
            json: false,
        }
    }

    #[test]
    fn test_defaults_parse() {
        let config = args("0,0", "1280x800").into_config().unwrap();
        assert_eq!(config.at, Point::ZERO);
        assert_eq!(config.viewport, Size::new(1280.0, 800.0));
    }

    #[test]
    fn test_position_allows_spaces() {
        let config = args("12.5, 40", "800x600").into_config().unwrap();
        assert_eq!(config.at, Point::new(12.5, 40.0));
    }

    #[test]
    fn test_invalid_position() {
        assert!(args("12", "800x600").into_config().is_err());
        assert!(args("a,b", "800x600").into_config().is_err());
    }

    #[test]
    fn test_zero_viewport_rejected() {
        assert!(args("0,0", "0x600").into_config().is_err());
    }
}
