//! Process-wide index of sprite symbols
//!
//! The registry parses the sprite document once and keeps each symbol as
//! a standalone markup string, keyed by id. Loading happens either at
//! startup (fail fast: a site cannot serve icons without the artifact)
//! or lazily on first demand through [`SpriteRegistry::shared`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, info};

use crate::sprite::SpriteConfig;

/// Symbol id used when an unknown icon name is referenced
pub const FALLBACK_ID: &str = "icons.question";

/// Errors raised when the sprite document cannot be loaded
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No sprite document at the expected path; run the sprite build first
    #[error("sprite document not found at {0}; run the sprite build first")]
    Missing(PathBuf),

    /// The sprite document could not be read
    #[error("failed to read sprite document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sprite document is not well-formed XML
    #[error("invalid sprite document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

/// Outcome of resolving a user-facing icon name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name maps to a symbol in the registry
    Exact(String),
    /// The name is unknown; the designated fallback symbol exists
    Fallback(String),
    /// The name is unknown and no fallback symbol is available
    Missing,
}

/// Immutable id → serialized-symbol index over the sprite document
#[derive(Debug)]
pub struct SpriteRegistry {
    symbols: HashMap<String, String>,
}

impl SpriteRegistry {
    /// Parse the sprite document and index every symbol by id
    ///
    /// Namespace prefixes are dropped from all tag names during
    /// serialization so the fragments can be spliced verbatim into an
    /// HTML response. Symbols without an id attribute are skipped.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.is_file() {
            return Err(RegistryError::Missing(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = roxmltree::Document::parse(&text).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut symbols = HashMap::new();
        for node in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "symbol")
        {
            let Some(id) = node.attribute("id") else {
                continue;
            };
            symbols.insert(id.to_string(), serialize_element(node));
        }

        info!("loaded {} symbols from {}", symbols.len(), path.display());
        Ok(Self { symbols })
    }

    /// Load from the environment-derived default sprite path
    pub fn load_default() -> Result<Self, RegistryError> {
        Self::load(&SpriteConfig::default_sprite_path())
    }

    /// Shared instance, populated exactly once across all threads
    ///
    /// Races on first access converge on a single map: every caller
    /// loads against the same path, the first writer wins and later
    /// loads are discarded.
    pub fn shared() -> Result<&'static SpriteRegistry, RegistryError> {
        static SHARED: OnceLock<SpriteRegistry> = OnceLock::new();
        if let Some(registry) = SHARED.get() {
            return Ok(registry);
        }
        let loaded = Self::load_default()?;
        Ok(SHARED.get_or_init(|| loaded))
    }

    /// Serialized markup for a symbol id
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.symbols.get(id).map(|s| s.as_str())
    }

    /// True when the id is present
    pub fn contains(&self, id: &str) -> bool {
        self.symbols.contains_key(id)
    }

    /// Number of indexed symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when the registry holds no symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbol ids, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(|s| s.as_str())
    }

    /// Resolve a user-facing name to a symbol id, never failing hard
    ///
    /// Names without a category qualify under `icons.`; slashes
    /// normalize to dots. The dashed form is tried first, then the raw
    /// underscore form, then the fallback symbol.
    pub fn resolve_name(&self, name: &str) -> Resolution {
        let qualified = {
            let normalized = name.replace('/', ".");
            if normalized.contains('.') {
                normalized
            } else {
                format!("icons.{normalized}")
            }
        };

        let dashed = qualified.replace('_', "-");
        if self.contains(&dashed) {
            return Resolution::Exact(dashed);
        }
        if self.contains(&qualified) {
            return Resolution::Exact(qualified);
        }

        debug!("icon '{name}' not found in registry");
        if self.contains(FALLBACK_ID) {
            Resolution::Fallback(FALLBACK_ID.to_string())
        } else {
            Resolution::Missing
        }
    }
}

/// Serialize an element subtree with namespace-free tag names
fn serialize_element(node: roxmltree::Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: roxmltree::Node) {
    out.push('<');
    out.push_str(node.tag_name().name());
    for attr in node.attributes() {
        out.push_str(&format!(" {}=\"{}\"", attr.name(), escape_attr(attr.value())));
    }
    let children: Vec<_> = node.children().filter(|n| n.is_element()).collect();
    if children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in children {
        out.push('\n');
        write_node(out, child);
    }
    out.push_str(&format!("\n</{}>", node.tag_name().name()));
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
