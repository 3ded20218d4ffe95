//! Elements, documents and reference tokens.
//!
//! ## Documents
//!
//! A document is an article's frontmatter: a schema-free mapping of string
//! keys to arbitrary values. It is modelled as a [`serde_json::Map`] so that
//! YAML frontmatter, TOML library files and JSON all decode into the same
//! value tree, and key order survives a round trip.
//!
//! ## Elements
//!
//! An [`Element`] is a named bundle of sections to inject into a document:
//!
//! ```yaml
//! description: "Twitter Cards completo com imagem grande"   # metadata only
//! twitter:                                                  # mergeable mapping
//!   card: summary_large_image
//! stylesheets: ["/newsroom/styles/newsroom-article.css"]    # replaced wholesale
//! content: "## Mantenha-se Atualizado ..."                  # appended to content_snippets
//! ```
//!
//! ## References
//!
//! Callers name elements with tokens: `category/name` applies one element,
//! `preset:name` applies one stored preset.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Article frontmatter being enriched.
pub type Document = Map<String, Value>;

/// Section key holding a literal block that is appended, never merged.
pub const CONTENT_KEY: &str = "content";
/// Section key holding element metadata, never merged.
pub const DESCRIPTION_KEY: &str = "description";
/// Document key accumulating appended content sections.
pub const CONTENT_SNIPPETS_KEY: &str = "content_snippets";
/// Reserved category holding composed presets.
pub const PRESETS_CATEGORY: &str = "presets";

/// A named bundle of document sections.
///
/// `description` is lifted out of the section map so it can never be merged
/// into a document by accident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

/// How one element section is applied to a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section<'a> {
    /// The `content` block: appended to `content_snippets`.
    Content(&'a Value),
    /// A mapping merged field by field.
    Fields(&'a Map<String, Value>),
    /// Any other value (a list of stylesheets, a scalar): set as a whole.
    Whole(&'a Value),
}

impl Element {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            sections: Map::new(),
        }
    }

    /// Build an element from a raw mapping, lifting `description` out.
    ///
    /// A non-string description is kept as a section so no data is lost.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let description = match map.get(DESCRIPTION_KEY) {
            Some(Value::String(_)) => match map.shift_remove(DESCRIPTION_KEY) {
                Some(Value::String(text)) => text,
                _ => String::new(),
            },
            _ => String::new(),
        };
        Self {
            description,
            sections: map,
        }
    }

    /// Builder-style section insertion.
    pub fn with_section(mut self, key: impl Into<String>, value: Value) -> Self {
        self.sections.insert(key.into(), value);
        self
    }

    /// Iterate the element's sections in declaration order, classified by
    /// how they merge. A stray `description` section is skipped.
    pub fn sections(&self) -> impl Iterator<Item = (&str, Section<'_>)> {
        self.sections
            .iter()
            .filter(|(key, _)| key.as_str() != DESCRIPTION_KEY)
            .map(|(key, value)| {
                let section = if key == CONTENT_KEY {
                    Section::Content(value)
                } else if let Value::Object(fields) = value {
                    Section::Fields(fields)
                } else {
                    Section::Whole(value)
                };
                (key.as_str(), section)
            })
    }

    /// Element name or description contains `needle` (already lower-cased).
    pub(crate) fn matches_term(&self, name: &str, needle: &str) -> bool {
        name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

impl From<Map<String, Value>> for Element {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

/// A parsed reference token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `category/name`
    Element { category: String, name: String },
    /// `preset:name`
    Preset(String),
}

impl Reference {
    /// Parse a `category/name` or `preset:name` token.
    ///
    /// The `preset:` prefix wins over `/`; the category/name split happens at
    /// the first `/`, so names may themselves contain slashes. Returns `None`
    /// for tokens matching neither form or with an empty side.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(name) = token.strip_prefix("preset:") {
            return (!name.is_empty()).then(|| Reference::Preset(name.to_string()));
        }
        let (category, name) = token.split_once('/')?;
        if category.is_empty() || name.is_empty() {
            return None;
        }
        Some(Reference::Element {
            category: category.to_string(),
            name: name.to_string(),
        })
    }

    /// The `(category, name)` this reference resolves to in the store.
    pub fn key(&self) -> (&str, &str) {
        match self {
            Reference::Element { category, name } => (category, name),
            Reference::Preset(name) => (PRESETS_CATEGORY, name),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Element { category, name } => write!(f, "{category}/{name}"),
            Reference::Preset(name) => write!(f, "preset:{name}"),
        }
    }
}

/// Split a comma-separated CLI list of reference tokens.
pub fn split_tokens(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Read a string at a dotted path, e.g. `meta_basico.title`.
pub fn str_at<'a>(document: &'a Document, path: &str) -> Option<&'a str> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    current.as_str()
}
