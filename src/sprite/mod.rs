//! Sprite build: harvesting source icons and assembling the sprite document

pub mod assemble;
pub mod harvest;

pub use assemble::{build_sprite, symbol_id, BuildError, SpriteReport};
pub use harvest::{
    harvest, Harvest, HarvestError, HarvestedStyle, RenderPattern, DEFAULT_VIEW_BOX,
    TRACKED_STYLES,
};

use std::env;
use std::path::{Path, PathBuf};

/// Environment override for the icons source directory
pub const SOURCE_DIR_ENV: &str = "ICON_SPRITE_SOURCE_DIR";
/// Environment override for the output directory
pub const OUTPUT_DIR_ENV: &str = "ICON_SPRITE_OUTPUT_DIR";
/// Environment override for the generated names file
pub const TYPES_PATH_ENV: &str = "ICON_SPRITE_TYPES_PATH";

/// File name of the sprite document inside the output directory
pub const SPRITE_FILE_NAME: &str = "sprite.svg";

/// Category assigned to icons sitting directly under the icons root
pub const ROOT_CATEGORY: &str = "icons";

/// Paths for a sprite build
#[derive(Debug, Clone)]
pub struct SpriteConfig {
    /// Directory tree of `*.svg` source icons
    pub icons_dir: PathBuf,
    /// Directory the sprite document is written to
    pub output_dir: PathBuf,
    /// Optional path for the generated icon-name listing
    pub types_path: Option<PathBuf>,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            icons_dir: env_path(SOURCE_DIR_ENV).unwrap_or_else(|| PathBuf::from("icons")),
            output_dir: env_path(OUTPUT_DIR_ENV).unwrap_or_else(|| PathBuf::from("static")),
            types_path: env_path(TYPES_PATH_ENV),
        }
    }
}

impl SpriteConfig {
    /// Create a configuration from environment overrides and cwd-relative defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the icons source directory
    pub fn with_icons_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.icons_dir = dir.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the path for the generated icon-name listing
    pub fn with_types_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.types_path = Some(path.into());
        self
    }

    /// Path of the sprite document this configuration builds
    pub fn sprite_path(&self) -> PathBuf {
        self.output_dir.join(SPRITE_FILE_NAME)
    }

    /// Sprite path derived from the environment alone
    ///
    /// Serve-time consumers (registry, injector) use this when no path
    /// is supplied explicitly.
    pub fn default_sprite_path() -> PathBuf {
        env_path(OUTPUT_DIR_ENV)
            .unwrap_or_else(|| PathBuf::from("static"))
            .join(SPRITE_FILE_NAME)
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).map(PathBuf::from)
}

/// Category for a source file: its parent directory name, or
/// [`ROOT_CATEGORY`] when the parent is the icons root itself.
pub fn category_for(path: &Path, icons_dir: &Path) -> String {
    match path.parent() {
        Some(parent) if parent != icons_dir => parent
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ROOT_CATEGORY.to_string()),
        _ => ROOT_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_path_joins_output_dir() {
        let config = SpriteConfig::new().with_output_dir("/tmp/out");
        assert_eq!(config.sprite_path(), PathBuf::from("/tmp/out/sprite.svg"));
    }

    #[test]
    fn test_category_for_nested_file() {
        let icons = Path::new("/app/icons");
        assert_eq!(category_for(Path::new("/app/icons/nav/home.svg"), icons), "nav");
    }

    #[test]
    fn test_category_for_root_level_file() {
        let icons = Path::new("/app/icons");
        assert_eq!(
            category_for(Path::new("/app/icons/question.svg"), icons),
            ROOT_CATEGORY
        );
    }
}
