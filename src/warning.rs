//! Non-fatal diagnostics.
//!
//! Enrichment is best-effort: an unknown element, a malformed reference or a
//! missing component never aborts a batch. Each such condition becomes a
//! [`Warning`] recorded in a [`Warnings`] sink that the caller owns. Recording
//! a warning also emits a `tracing` event, so the CLI shows it without the
//! library printing anything itself.

use std::path::PathBuf;
use thiserror::Error;

/// A condition that degraded one operation to a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `(category, name)` did not resolve in the store.
    #[error("element '{category}/{name}' not found in library")]
    ElementNotFound { category: String, name: String },
    /// `preset:<name>` did not resolve.
    #[error("preset '{0}' not found")]
    PresetNotFound(String),
    /// A reference token that is neither `category/name` nor `preset:name`.
    #[error("invalid reference '{0}': use 'category/name' or 'preset:name'")]
    MalformedReference(String),
    /// An automation rule whose condition mentions no known keyword group.
    #[error("automation condition '{0}' matches no keyword group")]
    UnknownCondition(String),
    /// The external library source could not be read or parsed.
    #[error(
        "could not load library {} ({reason}), using built-in elements only",
        .path.display()
    )]
    LibraryUnreadable { path: PathBuf, reason: String },
    /// The Markdown file has no `---` frontmatter block.
    #[error("no YAML frontmatter found")]
    MissingFrontmatter,
    /// The frontmatter block is not a YAML mapping.
    #[error("invalid frontmatter: {0}")]
    InvalidFrontmatter(String),
    /// An `includes` entry names a position the page has no slot for.
    #[error("unknown include position '{0}'")]
    UnknownIncludePosition(String),
    /// A component file referenced by an include does not exist.
    #[error("component not found: {}", .0.display())]
    ComponentNotFound(PathBuf),
    /// A relative image referenced by the page does not exist.
    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),
    /// The article template lacks an element the post-processor fills.
    #[error("template has no '{0}' element")]
    TemplateSlotMissing(String),
    /// The rendered article has no `<main>` to lift content from.
    #[error("rendered article has no <main> element")]
    ArticleMainMissing,
}

/// Ordered collection of warnings produced by a batch of operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and emit it as a `tracing` event.
    pub fn push(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.0.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.0.iter()
    }

    /// Move every warning of `other` to the end of this sink.
    ///
    /// Used to fold per-file sinks from a parallel batch back together; the
    /// events were already logged when first recorded.
    pub fn extend(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
