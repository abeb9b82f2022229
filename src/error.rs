//! Error type for the fallible loaders (options, themes, declarative menus, shortcuts)

/// Errors raised while loading configuration or parsing declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    IoError(String),
    ParseError(String),
    InvalidShortcut(String),
    UnknownTheme(String),
}

impl std::fmt::Display for MenuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuError::IoError(e) => write!(f, "IO error: {}", e),
            MenuError::ParseError(e) => write!(f, "Parse error: {}", e),
            MenuError::InvalidShortcut(s) => write!(f, "Invalid shortcut: {}", s),
            MenuError::UnknownTheme(t) => write!(f, "Unknown theme: {}", t),
        }
    }
}

impl std::error::Error for MenuError {}

impl From<std::io::Error> for MenuError {
    fn from(e: std::io::Error) -> Self {
        MenuError::IoError(e.to_string())
    }
}

impl From<serde_yaml::Error> for MenuError {
    fn from(e: serde_yaml::Error) -> Self {
        MenuError::ParseError(e.to_string())
    }
}
