//! icon-sprite CLI
//!
//! Usage:
//!   icon-sprite [OPTIONS]
//!
//! Options:
//!   --icons-dir <DIR>    Icons source directory
//!   --output-dir <DIR>   Output directory for sprite.svg
//!   --types-path <FILE>  Path for the generated icon-name listing
//!   -h, --help           Print help
//!
//! Each flag falls back to its environment variable
//! (ICON_SPRITE_SOURCE_DIR, ICON_SPRITE_OUTPUT_DIR, ICON_SPRITE_TYPES_PATH)
//! and then to a path relative to the current directory.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use icon_sprite::{build_sprite, BuildError, SpriteConfig};

#[derive(Parser)]
#[command(name = "icon-sprite")]
#[command(about = "Build an SVG sprite document from a directory of icons")]
struct Cli {
    /// Icons source directory
    #[arg(long)]
    icons_dir: Option<PathBuf>,

    /// Output directory for sprite.svg
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Path for the generated icon-name listing
    #[arg(long)]
    types_path: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = SpriteConfig::new();
    if let Some(dir) = cli.icons_dir {
        config = config.with_icons_dir(dir);
    }
    if let Some(dir) = cli.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(path) = cli.types_path {
        config = config.with_types_path(path);
    }

    info!("icons directory: {}", config.icons_dir.display());
    info!("output directory: {}", config.output_dir.display());
    if let Some(types_path) = &config.types_path {
        info!("types path: {}", types_path.display());
    }

    match build_sprite(&config) {
        Ok(report) => {
            info!(
                "built {} symbols ({} skipped) at {}",
                report.symbols,
                report.skipped,
                report.sprite_path.display()
            );
        }
        Err(BuildError::IconsDirMissing(dir)) => {
            error!("icons directory not found at {}", dir.display());
            std::process::exit(1);
        }
        Err(e) => {
            error!("sprite build failed: {e}");
            std::process::exit(1);
        }
    }
}
