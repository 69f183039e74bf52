//! icon-sprite - an SVG icon sprite pipeline for web UIs
//!
//! Build time folds a directory tree of individual SVG icons into one
//! sprite document of `<symbol>` definitions, normalizing each icon's
//! presentation attributes onto the symbol. Serve time renders icons as
//! tiny `<use>` references and injects, per response, only the symbol
//! definitions that page actually used.
//!
//! # Example
//!
//! ```no_run
//! use http::Method;
//! use icon_sprite::{build_sprite, Icon, SpriteConfig, SpriteInjector, UsedIcons};
//!
//! // Build time (CLI or build script)
//! let config = SpriteConfig::new().with_icons_dir("icons").with_output_dir("static");
//! build_sprite(&config).unwrap();
//!
//! // Startup: fail fast if the sprite artifact is missing
//! let injector = SpriteInjector::from_sprite_file(&config.sprite_path()).unwrap();
//!
//! // Per request
//! let mut used = UsedIcons::new();
//! let markup = Icon::new("nav.home").render(injector.registry(), &mut used);
//! let rewriter = injector.begin(&Method::GET, "/");
//! # let _ = (markup, rewriter);
//! ```

pub mod icon;
pub mod inject;
pub mod registry;
pub mod sprite;
pub mod theme;

pub use icon::{merge_classes, Icon, Modifier, UsedIcons};
pub use inject::{InjectorConfig, ResponseRewriter, SpriteInjector};
pub use registry::{RegistryError, Resolution, SpriteRegistry};
pub use sprite::{
    build_sprite, harvest, symbol_id, BuildError, HarvestError, RenderPattern, SpriteConfig,
    SpriteReport,
};
pub use theme::{configure, Size, Style, Theme, ThemeError};
