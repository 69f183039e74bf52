//! Sprite assembly: fold a directory tree of SVG icons into one document

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};
use walkdir::WalkDir;

use super::harvest::{harvest, Element, Harvest};
use super::{category_for, SpriteConfig};

/// Errors that abort a sprite build
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configured icons directory does not exist
    #[error("icons directory not found: {0}")]
    IconsDirMissing(PathBuf),

    /// Filesystem failure reading a source or writing an artifact
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}

/// Summary of a completed build
#[derive(Debug)]
pub struct SpriteReport {
    /// Symbols written to the sprite document
    pub symbols: usize,
    /// Source files skipped because they failed to parse
    pub skipped: usize,
    /// Icon names grouped by category, in build order
    pub categories: BTreeMap<String, Vec<String>>,
    /// Where the sprite document was written
    pub sprite_path: PathBuf,
}

/// Normalize (category, stem) into a symbol identifier
///
/// Underscores become dashes and the category separator becomes a dot,
/// so `nav` + `menu_bars` yields `nav.menu-bars`. Applied uniformly at
/// build and lookup time, identifiers stay stable and collision-free
/// across categories.
pub fn symbol_id(category: &str, stem: &str) -> String {
    format!("{category}/{stem}").replace('_', "-").replace('/', ".")
}

/// Build the sprite document from every `*.svg` under the icons directory
///
/// Sources that fail to parse are logged and skipped; a bad icon never
/// aborts the build. Enumeration is sorted so identical input trees
/// produce byte-identical documents.
pub fn build_sprite(config: &SpriteConfig) -> Result<SpriteReport, BuildError> {
    if !config.icons_dir.is_dir() {
        return Err(BuildError::IconsDirMissing(config.icons_dir.clone()));
    }
    fs::create_dir_all(&config.output_dir).map_err(BuildError::io(&config.output_dir))?;

    let mut symbols = String::new();
    let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut count = 0usize;
    let mut skipped = 0usize;

    for entry in WalkDir::new(&config.icons_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("svg") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let category = category_for(path, &config.icons_dir);

        let source = fs::read_to_string(path).map_err(BuildError::io(path))?;
        let harvested = match harvest(&source) {
            Ok(h) => h,
            Err(e) => {
                error!("failed to parse {}: {e}", path.display());
                skipped += 1;
                continue;
            }
        };

        write_symbol(&mut symbols, &symbol_id(&category, stem), &harvested);
        categories.entry(category).or_default().push(stem.to_string());
        count += 1;
    }

    let sprite_path = config.sprite_path();
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" style=\"display:none\">\n\
         {symbols}</svg>\n"
    );
    fs::write(&sprite_path, document).map_err(BuildError::io(&sprite_path))?;
    info!("built sprite with {count} symbols at {}", sprite_path.display());

    if let Some(types_path) = &config.types_path {
        write_types_file(types_path, &categories)?;
        info!("generated icon names at {}", types_path.display());
    }

    Ok(SpriteReport {
        symbols: count,
        skipped,
        categories,
        sprite_path,
    })
}

/// Append one `<symbol>` with its harvested metadata and structural copy
fn write_symbol(out: &mut String, id: &str, harvested: &Harvest) {
    out.push_str(&format!(
        "  <symbol id=\"{}\" viewBox=\"{}\" data-og-pattern=\"{}\"",
        escape_xml(id),
        escape_xml(&harvested.view_box),
        harvested.pattern.as_str()
    ));
    for (name, value) in harvested.style.iter() {
        out.push_str(&format!(" data-og-{name}=\"{}\"", escape_xml(value)));
    }
    if harvested.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &harvested.children {
        write_element(out, child, 2);
    }
    out.push_str("  </symbol>\n");
}

fn write_element(out: &mut String, elem: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}<{}", elem.tag));
    for (name, value) in &elem.attrs {
        out.push_str(&format!(" {name}=\"{}\"", escape_xml(value)));
    }
    if elem.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &elem.children {
        write_element(out, child, depth + 1);
    }
    out.push_str(&format!("{indent}</{}>\n", elem.tag));
}

/// Escape special XML characters in attribute values
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Emit a generated Rust listing of known icon ids, one module per category
fn write_types_file(
    path: &Path,
    categories: &BTreeMap<String, Vec<String>>,
) -> Result<(), BuildError> {
    let mut out = String::from(
        "// Generated by icon-sprite. Do not edit.\n\
         //\n\
         // Tailwind scan triggers:\n\
         // [stroke-linecap:round] [stroke-linejoin:round]\n\n",
    );
    for (category, icons) in categories {
        out.push_str(&format!("pub mod {} {{\n", rust_ident(category)));
        for icon in icons {
            out.push_str(&format!(
                "    pub const {}: &str = \"{}\";\n",
                rust_ident(icon).to_uppercase(),
                symbol_id(category, icon)
            ));
        }
        out.push_str("}\n\n");
    }
    fs::write(path, out).map_err(BuildError::io(path))
}

fn rust_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
