//! Icon references: lightweight values that render to `<use>` markup
//!
//! An [`Icon`] names a symbol and carries size/style modifiers. Rendering
//! resolves the name through the registry (degrading to the fallback
//! symbol or an inert placeholder, never failing), records the id in the
//! request's [`UsedIcons`] set, and emits a small `<svg><use/></svg>`
//! fragment whose classes come from the theme tables or, for the
//! default "original" style, from the symbol's own harvested attributes.

use tracing::{debug, error};

use crate::registry::{Resolution, SpriteRegistry};
use crate::theme::{self, Size, Style};

/// Classes of the inert placeholder emitted when an icon is missing and
/// no fallback symbol exists
const PLACEHOLDER_CLASSES: &str = "inline-block h-6 w-6";

/// Extra class applied when rendering the fallback symbol
const FALLBACK_CLASS: &str = "text-error";

/// Base display class present on every rendered icon
const BASE_CLASS: &str = "inline-block";

/// Identifiers of the icons rendered while producing one response
///
/// Scoped to a single request: create one per request, thread it through
/// render calls, and hand it to the injector once the body is complete.
/// Insertion order is preserved; duplicates are ignored.
#[derive(Debug, Default)]
pub struct UsedIcons {
    ids: Vec<String>,
}

impl UsedIcons {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id; returns false if it was already present
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.iter().any(|existing| existing == id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Ids in first-reference order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|s| s.as_str())
    }

    /// Number of distinct icons recorded
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no icon has been recorded
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forget all recorded ids
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// How an icon's size resolves to classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeSpec {
    /// A named entry in the theme table (`md` fallback when absent)
    Token(String),
    /// Literal classes used verbatim
    Literal(String),
}

/// How an icon's style resolves to classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSpec {
    /// No forced override; classes derive from the symbol's harvested
    /// pattern and attributes
    Original,
    /// A named entry in the theme table
    Token(String),
    /// Literal classes used verbatim
    Literal(String),
}

/// A positional icon modifier
///
/// Strings carrying a `w-`/`h-`/`size-` token act as a literal size
/// override; any other string sets the extra caller classes.
#[derive(Debug, Clone)]
pub enum Modifier {
    Size(Size),
    Style(Style),
    Raw(String),
}

impl From<Size> for Modifier {
    fn from(size: Size) -> Self {
        Modifier::Size(size)
    }
}

impl From<Style> for Modifier {
    fn from(style: Style) -> Self {
        Modifier::Style(style)
    }
}

impl From<&str> for Modifier {
    fn from(raw: &str) -> Self {
        Modifier::Raw(raw.to_string())
    }
}

impl From<String> for Modifier {
    fn from(raw: String) -> Self {
        Modifier::Raw(raw)
    }
}

/// A reference to an icon at a given size and style
#[derive(Debug, Clone)]
pub struct Icon {
    name: String,
    size: SizeSpec,
    style: StyleSpec,
    class: String,
}

impl Icon {
    /// Reference an icon by name with default modifiers (`md`, original)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: SizeSpec::Token(Size::Md.key().to_string()),
            style: StyleSpec::Original,
            class: String::new(),
        }
    }

    /// Reference an icon, classifying a list of positional modifiers
    ///
    /// Builder setters called afterwards override anything inferred
    /// here.
    pub fn resolve(
        name: impl Into<String>,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Self {
        let mut icon = Self::new(name);
        for modifier in modifiers {
            match modifier {
                Modifier::Size(size) => icon.size = SizeSpec::Token(size.key().to_string()),
                Modifier::Style(style) => icon.style = style_spec(style),
                Modifier::Raw(raw) => {
                    if is_size_like(&raw) {
                        icon.size = SizeSpec::Literal(raw);
                    } else {
                        icon.class = raw;
                    }
                }
            }
        }
        icon
    }

    /// Set a named size
    pub fn size(mut self, size: Size) -> Self {
        self.size = SizeSpec::Token(size.key().to_string());
        self
    }

    /// Set literal size classes
    pub fn size_classes(mut self, classes: impl Into<String>) -> Self {
        self.size = SizeSpec::Literal(classes.into());
        self
    }

    /// Set a named style
    pub fn style(mut self, style: Style) -> Self {
        self.style = style_spec(style);
        self
    }

    /// Set literal style classes
    pub fn style_classes(mut self, classes: impl Into<String>) -> Self {
        self.style = StyleSpec::Literal(classes.into());
        self
    }

    /// Set extra caller classes; these win conflicts against base classes
    pub fn class(mut self, classes: impl Into<String>) -> Self {
        self.class = classes.into();
        self
    }

    /// Render to markup, recording the resolved id into `used`
    ///
    /// Unknown names degrade to the fallback symbol or an inert
    /// placeholder; render never fails.
    pub fn render(&self, registry: &SpriteRegistry, used: &mut UsedIcons) -> String {
        let (id, fallback) = match registry.resolve_name(&self.name) {
            Resolution::Exact(id) => (id, false),
            Resolution::Fallback(id) => (id, true),
            Resolution::Missing => {
                debug!("icon '{}' not found and no fallback symbol exists", self.name);
                return format!("<svg class=\"{PLACEHOLDER_CLASSES}\"></svg>");
            }
        };

        let mut classes: Vec<String> = vec![BASE_CLASS.to_string()];

        match &self.style {
            StyleSpec::Original => {
                if let Some(markup) = registry.resolve(&id) {
                    classes.extend(original_style_classes(markup));
                }
            }
            StyleSpec::Token(key) => {
                let resolved = theme::with_current(|t| {
                    t.style_classes(key).unwrap_or_default().to_string()
                });
                classes.extend(split_classes(&resolved));
            }
            StyleSpec::Literal(literal) => classes.extend(split_classes(literal)),
        }

        let size_classes = match &self.size {
            SizeSpec::Token(key) => theme::with_current(|t| t.size_classes(key).to_string()),
            SizeSpec::Literal(literal) => literal.clone(),
        };
        classes.extend(split_classes(&size_classes));

        let mut caller = self.class.clone();
        if fallback {
            if caller.is_empty() {
                caller = FALLBACK_CLASS.to_string();
            } else {
                caller.push(' ');
                caller.push_str(FALLBACK_CLASS);
            }
        }

        let merged = merge_classes(&classes.join(" "), &caller);

        used.insert(&id);
        format!("<svg class=\"{merged}\">\n<use href=\"#{id}\"/>\n</svg>")
    }
}

fn style_spec(style: Style) -> StyleSpec {
    match style {
        Style::Original => StyleSpec::Original,
        other => StyleSpec::Token(other.key().to_string()),
    }
}

/// True when a raw modifier string carries a sizing token
fn is_size_like(raw: &str) -> bool {
    raw.split_whitespace().any(|token| {
        token.starts_with("w-") || token.starts_with("h-") || token.starts_with("size-")
    })
}

fn split_classes(s: &str) -> Vec<String> {
    s.split_whitespace().map(|c| c.to_string()).collect()
}

/// Derive classes for the "original" style from a symbol's harvested
/// attributes
///
/// Pattern `fill` keeps the shape filled with the current color; pattern
/// `stroke` outlines it; `mixed` inspects the individual harvested fill
/// and stroke values. Linecap/linejoin and the numeric attributes pass
/// through as utility-class tokens.
fn original_style_classes(symbol_markup: &str) -> Vec<String> {
    let doc = match roxmltree::Document::parse(symbol_markup) {
        Ok(doc) => doc,
        Err(e) => {
            error!("failed to parse symbol markup: {e}");
            return Vec::new();
        }
    };
    let symbol = doc.root_element();
    let og = |name: &str| symbol.attribute(&*format!("data-og-{name}"));

    let mut classes = Vec::new();

    if let Some(linecap) = og("stroke-linecap") {
        classes.push(format!("[stroke-linecap:{linecap}]"));
    }
    if let Some(linejoin) = og("stroke-linejoin") {
        classes.push(format!("[stroke-linejoin:{linejoin}]"));
    }

    match symbol.attribute("data-og-pattern").unwrap_or("mixed") {
        "fill" => classes.push("fill-current".to_string()),
        "stroke" => {
            classes.push("stroke-current".to_string());
            classes.push("fill-none".to_string());
        }
        _ => {
            if og("fill") == Some("none") {
                classes.push("fill-none".to_string());
            }
            if og("stroke").is_some() {
                classes.push("stroke-current".to_string());
            }
        }
    }

    if let Some(width) = og("stroke-width") {
        classes.push(format!("stroke-{width}"));
    }
    if let Some(rule) = og("fill-rule") {
        classes.push(format!("fill-rule-{rule}"));
    }
    if let Some(opacity) = og("fill-opacity") {
        classes.push(format!("fill-opacity-{opacity}"));
    }
    if let Some(opacity) = og("opacity") {
        classes.push(format!("opacity-{opacity}"));
    }

    classes
}

/// Merge two class lists, later classes winning conflicts on the same
/// CSS property category
pub fn merge_classes(base: &str, caller: &str) -> String {
    let mut merged: Vec<(String, String)> = Vec::new();
    for class in base.split_whitespace().chain(caller.split_whitespace()) {
        let group = conflict_group(class);
        merged.retain(|(g, _)| *g != group);
        merged.push((group, class.to_string()));
    }
    merged
        .into_iter()
        .map(|(_, class)| class)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Conflict category of one utility class
fn conflict_group(class: &str) -> String {
    // Arbitrary properties like [stroke-linecap:round] conflict per property
    if let Some(rest) = class.strip_prefix('[') {
        if let Some((prop, _)) = rest.split_once(':') {
            return format!("[{prop}]");
        }
    }
    for (prefix, group) in [
        ("w-", "w"),
        ("h-", "h"),
        ("size-", "size"),
        ("fill-opacity-", "fill-opacity"),
        ("fill-rule-", "fill-rule"),
        ("fill-", "fill"),
        ("opacity-", "opacity"),
        ("text-", "text"),
    ] {
        if class.starts_with(prefix) {
            return group.to_string();
        }
    }
    if let Some(rest) = class.strip_prefix("stroke-") {
        // stroke-2 / stroke-[1.5px] size the stroke; stroke-current colors it
        let is_width = rest.starts_with(|c: char| c.is_ascii_digit())
            || rest
                .strip_prefix('[')
                .is_some_and(|r| r.starts_with(|c: char| c.is_ascii_digit()));
        return if is_width { "stroke-width" } else { "stroke" }.to_string();
    }
    class.to_string()
}
