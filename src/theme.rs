//! Size and style class tables
//!
//! Symbolic size and style names resolve to literal CSS class strings
//! through a process-wide table seeded with defaults. Applications may
//! add or override entries by name during startup, or load a whole
//! table from a TOML file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a theme file
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Built-in size names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    // Responsive variants
    XsToSm,
    XsToMd,
    XsToLg,
    SmToMd,
    SmToLg,
    MdToLg,
    MdToXl,
}

impl Size {
    /// Table key for this size
    pub fn key(self) -> &'static str {
        match self {
            Size::Xs => "xs",
            Size::Sm => "sm",
            Size::Md => "md",
            Size::Lg => "lg",
            Size::Xl => "xl",
            Size::XsToSm => "xs-to-sm",
            Size::XsToMd => "xs-to-md",
            Size::XsToLg => "xs-to-lg",
            Size::SmToMd => "sm-to-md",
            Size::SmToLg => "sm-to-lg",
            Size::MdToLg => "md-to-lg",
            Size::MdToXl => "md-to-xl",
        }
    }
}

/// Built-in style names
///
/// [`Style::Original`] is not a table entry: it means "no forced
/// override", letting the icon's own harvested attributes drive the
/// classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Original,
    Simple,
    Solid,
    Outline,
    OutlineThin,
    OutlineThick,
    Duotone,
    Brand,
    // Color variants
    SolidPrimary,
    SolidSecondary,
    OutlinePrimary,
    OutlineSecondary,
    // Opacity variants
    SimpleFaded,
    SolidFaded,
    OutlineFaded,
}

impl Style {
    /// Table key for this style
    pub fn key(self) -> &'static str {
        match self {
            Style::Original => "original",
            Style::Simple => "simple",
            Style::Solid => "solid",
            Style::Outline => "outline",
            Style::OutlineThin => "outline-thin",
            Style::OutlineThick => "outline-thick",
            Style::Duotone => "duotone",
            Style::Brand => "brand",
            Style::SolidPrimary => "solid-primary",
            Style::SolidSecondary => "solid-secondary",
            Style::OutlinePrimary => "outline-primary",
            Style::OutlineSecondary => "outline-secondary",
            Style::SimpleFaded => "simple-faded",
            Style::SolidFaded => "solid-faded",
            Style::OutlineFaded => "outline-faded",
        }
    }
}

/// Default class tables
const DEFAULT_THEME: &str = r#"
[sizes]
xs = "h-4 w-4"
sm = "h-5 w-5"
md = "h-6 w-6"
lg = "h-8 w-8"
xl = "h-10 w-10"

# Responsive variants
"xs-to-sm" = "h-4 w-4 md:h-5 md:w-5"
"xs-to-md" = "h-4 w-4 md:h-6 md:w-6"
"xs-to-lg" = "h-4 w-4 md:h-8 md:w-8"
"sm-to-md" = "h-5 w-5 md:h-6 md:w-6"
"sm-to-lg" = "h-5 w-5 md:h-8 md:w-8"
"md-to-lg" = "h-6 w-6 md:h-8 md:w-8"
"md-to-xl" = "h-6 w-6 md:h-10 md:w-10"

[styles]
original = ""
simple = "fill-current"
solid = "fill-current stroke-0"
outline = "fill-none stroke-2 stroke-current"
"outline-thin" = "fill-none stroke-[1.5px] stroke-current"
"outline-thick" = "fill-none stroke-[4px] stroke-current"
duotone = "fill-current fill-opacity-20 stroke-[1.5px] stroke-current"
brand = "fill-primary stroke-0 opacity-90"

# Color variants
"solid-primary" = "fill-primary stroke-0"
"solid-secondary" = "fill-secondary stroke-0"
"outline-primary" = "fill-none stroke-[1.5px] stroke-primary"
"outline-secondary" = "fill-none stroke-[1.5px] stroke-secondary"

# Opacity variants
"simple-faded" = "fill-current opacity-70"
"solid-faded" = "fill-current stroke-0 opacity-70"
"outline-faded" = "fill-none stroke-[1.5px] stroke-current opacity-70"
"#;

/// A size/style class table
#[derive(Debug, Clone)]
pub struct Theme {
    sizes: HashMap<String, String>,
    styles: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlTheme {
    sizes: Option<HashMap<String, String>>,
    styles: Option<HashMap<String, String>>,
}

impl Default for Theme {
    fn default() -> Self {
        let parsed: TomlTheme =
            toml::from_str(DEFAULT_THEME).expect("Default theme should be valid TOML");
        Self {
            sizes: parsed.sizes.unwrap_or_default(),
            styles: parsed.styles.unwrap_or_default(),
        }
    }
}

impl Theme {
    /// Load a theme from a TOML file, merged over the defaults
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a theme from TOML text, merged over the defaults
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;
        let mut theme = Self::default();
        theme.merge(parsed.sizes, parsed.styles);
        Ok(theme)
    }

    /// Classes for a size key, falling back to the `md` entry
    pub fn size_classes(&self, key: &str) -> &str {
        self.sizes
            .get(key)
            .or_else(|| self.sizes.get(Size::Md.key()))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Classes for a style key, if defined
    pub fn style_classes(&self, key: &str) -> Option<&str> {
        self.styles.get(key).map(|s| s.as_str())
    }

    /// Add or override a named size entry
    pub fn set_size(&mut self, name: impl Into<String>, classes: impl Into<String>) {
        self.sizes.insert(name.into(), classes.into());
    }

    /// Add or override a named style entry
    pub fn set_style(&mut self, name: impl Into<String>, classes: impl Into<String>) {
        self.styles.insert(name.into(), classes.into());
    }

    fn merge(
        &mut self,
        sizes: Option<HashMap<String, String>>,
        styles: Option<HashMap<String, String>>,
    ) {
        if let Some(sizes) = sizes {
            self.sizes.extend(sizes);
        }
        if let Some(styles) = styles {
            self.styles.extend(styles);
        }
    }
}

fn table() -> &'static RwLock<Theme> {
    static TABLE: OnceLock<RwLock<Theme>> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(Theme::default()))
}

/// Merge entries into the live process-wide table
///
/// Later writes for the same name override earlier ones. Expected to be
/// called during startup, before serving begins.
pub fn configure(
    sizes: Option<HashMap<String, String>>,
    styles: Option<HashMap<String, String>>,
) {
    table().write().merge(sizes, styles);
}

/// Replace the live table wholesale, e.g. with one loaded from TOML
pub fn install(theme: Theme) {
    *table().write() = theme;
}

/// Run a closure against the live table
pub fn with_current<R>(f: impl FnOnce(&Theme) -> R) -> R {
    f(&table().read())
}
