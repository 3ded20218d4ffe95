//! Merge engine: applying elements to documents.
//!
//! ## Rules
//!
//! For each section of the element, except `description`:
//!
//! - **`content`** is appended to the document's `content_snippets` list as
//!   `{name: "<category>_<name>", content: <text>}`. Applying the same
//!   element twice appends twice.
//! - **Mapping sections** are merged field by field. A field is written only
//!   when the document lacks it, or when `overwrite` is set.
//! - **Other sections** (lists, scalars) are written as a whole under the
//!   same absent-or-overwrite rule applied to the section key.
//!
//! A document section that exists with the wrong shape (a string where the
//! element has a mapping) is left alone unless `overwrite` is set, in which
//! case it is replaced by a copy of the element's mapping.
//!
//! Every entry point borrows the caller's document and returns a new one.

use crate::element::{CONTENT_SNIPPETS_KEY, Document, Element, Reference, Section};
use crate::store::ElementStore;
use crate::warning::{Warning, Warnings};
use serde_json::{Map, Value, json};

impl ElementStore {
    /// Apply the element `(category, name)` to a copy of `document`.
    ///
    /// An unknown element leaves the copy unchanged and records a warning.
    pub fn apply(
        &self,
        document: &Document,
        category: &str,
        name: &str,
        overwrite: bool,
        warnings: &mut Warnings,
    ) -> Document {
        let mut result = document.clone();
        self.apply_in_place(&mut result, category, name, overwrite, warnings);
        result
    }

    /// Apply the stored preset `preset` to a copy of `document`.
    pub fn apply_preset(
        &self,
        document: &Document,
        preset: &str,
        overwrite: bool,
        warnings: &mut Warnings,
    ) -> Document {
        let mut result = document.clone();
        self.apply_reference(
            &mut result,
            &Reference::Preset(preset.to_string()),
            overwrite,
            warnings,
        );
        result
    }

    /// Apply a list of `category/name` and `preset:name` tokens, in order.
    ///
    /// Malformed tokens and unknown references are reported and skipped; the
    /// rest of the list is still applied.
    pub fn apply_references<S: AsRef<str>>(
        &self,
        document: &Document,
        tokens: &[S],
        overwrite: bool,
        warnings: &mut Warnings,
    ) -> Document {
        let mut result = document.clone();
        for token in tokens {
            let token = token.as_ref();
            match Reference::parse(token) {
                Some(reference) => {
                    self.apply_reference(&mut result, &reference, overwrite, warnings)
                }
                None => warnings.push(Warning::MalformedReference(token.to_string())),
            }
        }
        result
    }

    fn apply_reference(
        &self,
        document: &mut Document,
        reference: &Reference,
        overwrite: bool,
        warnings: &mut Warnings,
    ) {
        match reference {
            Reference::Element { category, name } => {
                self.apply_in_place(document, category, name, overwrite, warnings)
            }
            Reference::Preset(name) => {
                let (category, key) = reference.key();
                match self.get(category, key) {
                    Some(element) => {
                        merge_element(document, category, key, element, overwrite);
                        tracing::debug!("applied preset '{name}'");
                    }
                    None => warnings.push(Warning::PresetNotFound(name.clone())),
                }
            }
        }
    }

    fn apply_in_place(
        &self,
        document: &mut Document,
        category: &str,
        name: &str,
        overwrite: bool,
        warnings: &mut Warnings,
    ) {
        match self.get(category, name) {
            Some(element) => {
                merge_element(document, category, name, element, overwrite);
                tracing::debug!("applied element '{category}/{name}'");
            }
            None => warnings.push(Warning::ElementNotFound {
                category: category.to_string(),
                name: name.to_string(),
            }),
        }
    }
}

/// Merge `element`'s sections into `document` in place.
///
/// `category` and `name` only label appended content snippets.
pub fn merge_element(
    document: &mut Document,
    category: &str,
    name: &str,
    element: &Element,
    overwrite: bool,
) {
    for (key, section) in element.sections() {
        match section {
            Section::Content(text) => append_snippet(document, category, name, text),
            Section::Fields(fields) => merge_fields(document, key, fields, overwrite),
            Section::Whole(value) => {
                if overwrite || !document.contains_key(key) {
                    document.insert(key.to_string(), value.clone());
                }
            }
        }
    }
}

fn merge_fields(document: &mut Document, key: &str, fields: &Map<String, Value>, overwrite: bool) {
    let slot = document
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    match slot {
        Value::Object(existing) => {
            for (field, value) in fields {
                if overwrite || !existing.contains_key(field) {
                    existing.insert(field.clone(), value.clone());
                }
            }
        }
        other if overwrite => *other = Value::Object(fields.clone()),
        _ => tracing::debug!("section '{key}' is not a mapping in the document, left as is"),
    }
}

fn append_snippet(document: &mut Document, category: &str, name: &str, text: &Value) {
    let entry = json!({
        "name": format!("{category}_{name}"),
        "content": text,
    });
    let slot = document
        .entry(CONTENT_SNIPPETS_KEY.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    match slot {
        Value::Array(snippets) => snippets.push(entry),
        // A scalar left by the author is kept as the first entry.
        other => {
            let previous = other.take();
            *other = Value::Array(vec![previous, entry]);
        }
    }
}
