//! # Newsroom
//!
//! Authoring tools for a static newsroom site. Articles are Markdown files
//! whose YAML frontmatter is enriched from a library of reusable metadata
//! *elements* (analytics blocks, social cards, navigation includes, content
//! snippets) before being rendered to HTML and poured into the site's article
//! template.
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────── Element Store ────────────┐
//!              │ built-ins + biblioteca_config.yaml    │
//!              └───────┬────────────────┬──────────────┘
//!                      │ lookup         │ lookup
//!   frontmatter ──► Merge Engine ◄── Preset Composer      Automation Rules
//!                      │                                   (keyword → references)
//!                      ▼
//!              enriched document ──► render (Markdown → page) ──► article (template)
//! ```
//!
//! The merge engine is the heart of the crate. Applying an element never
//! clobbers what the author wrote unless asked to; composing a preset is the
//! opposite, later references win. See [`merge`] and [`preset`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`element`] | `Element`, `Document` and the `category/name` / `preset:name` reference grammar |
//! | [`builtin`] | The built-in element catalogue |
//! | [`store`] | In-memory element store: list, get, search, save, import/export |
//! | [`merge`] | Applies elements and presets onto a document |
//! | [`preset`] | Folds several elements into one, last-wins |
//! | [`automation`] | Keyword-triggered rules that apply references |
//! | [`library`] | External library file: custom elements, presets, snippets, rules |
//! | [`warning`] | Non-fatal diagnostics collected while enriching |
//! | [`frontmatter`] | YAML frontmatter split/parse/join |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`render`] | Markdown → HTML page, includes, images, batch mode |
//! | [`article`] | Rendered page → article template |
//! | [`dom`] | Helpers over the `kuchikiki` HTML tree |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Absent-Or-Overwrite Merging
//!
//! Elements are shared across hundreds of articles; the article is the
//! authority. A field is written only when the document lacks it, unless the
//! caller passes `overwrite`. `content` sections are the exception: they are
//! appended to `content_snippets`, so applying a snippet twice appends twice.
//!
//! ## Best-Effort Enrichment
//!
//! An unknown element, a malformed token or a missing component degrades to a
//! no-op plus a [`warning::Warning`]. Only I/O on the files the caller named
//! (input, output, template) is a hard error.
//!
//! ## Presets Composed Ahead Of Time
//!
//! Library presets are folded when the library loads and stored under the
//! `presets` category, so applying `preset:x` is the same single lookup as any
//! other element.

pub mod article;
pub mod automation;
pub mod builtin;
pub mod config;
pub mod dom;
pub mod element;
pub mod frontmatter;
pub mod library;
pub mod merge;
pub mod output;
pub mod preset;
pub mod render;
pub mod store;
pub mod warning;

#[cfg(test)]
pub(crate) mod test_helpers;
