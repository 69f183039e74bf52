//! Presentation-attribute harvesting for source SVG icons
//!
//! Hand-authored icons carry their styling in inconsistent places: on the
//! root element, on individual shapes, as direct attributes, or inside
//! inline `style="..."` declarations. The harvester walks a source tree
//! once, lifts the first value found for each tracked attribute up to the
//! symbol level, classifies the icon's dominant rendering pattern, and
//! produces a structural copy with all style-bearing attributes removed.

use std::collections::HashMap;

use thiserror::Error;

/// Style attribute names lifted from source icons onto the symbol.
pub const TRACKED_STYLES: [&str; 8] = [
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "fill",
    "fill-rule",
    "fill-opacity",
    "opacity",
];

/// Default viewBox when the source root declares none.
pub const DEFAULT_VIEW_BOX: &str = "0 0 24 24";

/// Errors that can occur while harvesting a source icon
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The source file is not well-formed XML
    #[error("invalid SVG: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// Dominant rendering technique of an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPattern {
    /// Only stroke-family attributes were found
    Stroke,
    /// Only fill-family attributes were found
    Fill,
    /// Both families present, or neither
    Mixed,
}

impl RenderPattern {
    /// Attribute value used on the symbol element
    pub fn as_str(self) -> &'static str {
        match self {
            RenderPattern::Stroke => "stroke",
            RenderPattern::Fill => "fill",
            RenderPattern::Mixed => "mixed",
        }
    }
}

/// Tracked style values collected from a source tree
///
/// Each tracked name holds the value found at the shallowest matching
/// element; once a name has a value, later matches are ignored.
#[derive(Debug, Clone, Default)]
pub struct HarvestedStyle {
    values: HashMap<&'static str, String>,
}

impl HarvestedStyle {
    /// Look up a harvested value by tracked name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    /// Iterate harvested values in [`TRACKED_STYLES`] order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        TRACKED_STYLES
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (*name, v.as_str())))
    }

    /// True when no tracked attribute was found
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn record(&mut self, name: &'static str, value: String) {
        self.values.entry(name).or_insert(value);
    }

    fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// An owned, style-stripped copy of a source element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name without namespace prefix
    pub tag: String,
    /// Non-style attributes in document order
    pub attrs: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

/// Everything extracted from one source icon
#[derive(Debug, Clone)]
pub struct Harvest {
    /// viewBox of the source root, or [`DEFAULT_VIEW_BOX`]
    pub view_box: String,
    /// Structural copies of the root's children
    pub children: Vec<Element>,
    /// Collected style values
    pub style: HarvestedStyle,
    /// Dominant rendering pattern
    pub pattern: RenderPattern,
}

/// Harvest style metadata and a structural copy from SVG source text
pub fn harvest(source: &str) -> Result<Harvest, HarvestError> {
    let doc = roxmltree::Document::parse(source)?;
    let root = doc.root_element();

    let mut style = HarvestedStyle::default();

    // Root first, then descendants in document order; the shallowest
    // element wins for each tracked name.
    for node in root.descendants().filter(|n| n.is_element()) {
        let inline = node
            .attribute("style")
            .map(parse_style_attribute)
            .unwrap_or_default();

        for name in TRACKED_STYLES {
            if style.has(name) {
                continue;
            }
            let value = node
                .attribute(name)
                .or_else(|| inline.get(name).map(|v| v.as_str()));
            if let Some(value) = value {
                if value.is_empty() {
                    continue;
                }
                let value = if name == "stroke-width" {
                    value.trim_end_matches("px").to_string()
                } else {
                    value.to_string()
                };
                style.record(name, value);
            }
        }
    }

    let has_stroke = TRACKED_STYLES
        .iter()
        .any(|n| n.starts_with("stroke") && style.has(n));
    let has_fill = TRACKED_STYLES
        .iter()
        .any(|n| n.starts_with("fill") && style.has(n));

    let pattern = match (has_stroke, has_fill) {
        (true, false) => RenderPattern::Stroke,
        (false, true) => RenderPattern::Fill,
        _ => RenderPattern::Mixed,
    };

    let view_box = root
        .attribute("viewBox")
        .unwrap_or(DEFAULT_VIEW_BOX)
        .to_string();

    let children = root
        .children()
        .filter(|n| n.is_element())
        .map(copy_element)
        .collect();

    Ok(Harvest {
        view_box,
        children,
        style,
        pattern,
    })
}

/// Parse an inline `style="k: v; ..."` declaration into key/value pairs
pub fn parse_style_attribute(style: &str) -> HashMap<String, String> {
    style
        .split(';')
        .filter_map(|item| item.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Copy an element tree, dropping tracked style attributes and `style`
fn copy_element(node: roxmltree::Node) -> Element {
    let attrs = node
        .attributes()
        .filter(|a| a.name() != "style" && !TRACKED_STYLES.contains(&a.name()))
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();

    let children = node
        .children()
        .filter(|n| n.is_element())
        .map(copy_element)
        .collect();

    Element {
        tag: node.tag_name().name().to_string(),
        attrs,
        children,
    }
}
