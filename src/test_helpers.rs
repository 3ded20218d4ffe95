//! Shared test utilities for the newsroom test suite.
//!
//! Provides fixture setup, document builders and lookup helpers that panic
//! with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let library = fixture_library(&tmp);
//!
//! let element = find_element(&library.store, "social", "twitter_newsroom");
//! assert_eq!(element.description, "Twitter da redação");
//!
//! let document = as_document(json!({"meta_basico": {"title": "Keynote"}}));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::element::{Document, Element};
use crate::library::{DEFAULT_LIBRARY_FILE, Library};
use crate::store::ElementStore;
use crate::warning::Warnings;
use serde_json::Value;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture library. Panics if loading produced warnings.
pub fn fixture_library(tmp: &TempDir) -> Library {
    let mut warnings = Warnings::new();
    let library = Library::load(&tmp.path().join(DEFAULT_LIBRARY_FILE), &mut warnings);
    assert!(warnings.is_empty(), "fixture library warnings: {warnings:?}");
    library
}

// =========================================================================
// Builders and lookups
// =========================================================================

/// Unwrap a `json!` object into a document. Panics on anything else.
pub fn as_document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Find an element. Panics with the category's names if not found.
pub fn find_element<'a>(store: &'a ElementStore, category: &str, name: &str) -> &'a Element {
    store.get(category, name).unwrap_or_else(|| {
        let names: Vec<String> = store.list_category(category).into_keys().collect();
        panic!("element '{category}/{name}' not found. Available: {names:?}")
    })
}

/// Section names of an element, in order.
pub fn section_names(element: &Element) -> Vec<&str> {
    element.sections().map(|(key, _)| key).collect()
}
