//! The element store.
//!
//! An [`ElementStore`] is an explicit value: build one, hand it to whatever
//! needs to enrich documents, and build another for an isolated test or a
//! second catalogue. There is no process-wide instance.
//!
//! Mutation (`save`, `import`, `extend`) takes `&mut self`, so the borrow
//! checker enforces the single-writer rule; a shared `&ElementStore` can be
//! read from many threads at once.
//!
//! ## Collisions
//!
//! Extending the store with external definitions is last-write-wins per
//! element name: an external `social/twitter_completo` replaces the built-in
//! one entirely, there is no field-level merge at this level. Replacements
//! are logged at debug level.

use crate::builtin::{self, Catalogue};
use crate::element::{Element, PRESETS_CATEGORY, Reference};
use crate::warning::{Warning, Warnings};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("Unsupported library format: {0}")]
    UnsupportedFormat(String),
}

/// A preset as declared: its description and the tokens it was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetInfo {
    pub description: String,
    pub references: Vec<String>,
}

/// Category → name → element table with lookup, search and mutation.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Catalogue,
    presets: BTreeMap<String, PresetInfo>,
}

impl ElementStore {
    /// A store seeded with the built-in catalogue.
    pub fn builtin() -> Self {
        Self {
            elements: builtin::catalogue(),
            presets: BTreeMap::new(),
        }
    }

    /// A store with no elements at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All categories.
    pub fn list(&self) -> &Catalogue {
        &self.elements
    }

    /// Elements of one category; empty when the category does not exist.
    pub fn list_category(&self, category: &str) -> BTreeMap<String, Element> {
        self.elements.get(category).cloned().unwrap_or_default()
    }

    /// Category names with their element counts.
    pub fn categories(&self) -> Vec<(&str, usize)> {
        self.elements
            .iter()
            .map(|(name, elements)| (name.as_str(), elements.len()))
            .collect()
    }

    pub fn get(&self, category: &str, name: &str) -> Option<&Element> {
        self.elements.get(category)?.get(name)
    }

    /// Resolve a parsed reference.
    pub fn resolve(&self, reference: &Reference) -> Option<&Element> {
        let (category, name) = reference.key();
        self.get(category, name)
    }

    /// Elements whose name or description contains `term`, ignoring case,
    /// grouped by category. Categories without a hit are omitted.
    pub fn search(&self, term: &str) -> Catalogue {
        let needle = term.to_lowercase();
        let mut found = Catalogue::new();
        for (category, elements) in &self.elements {
            let hits: BTreeMap<String, Element> = elements
                .iter()
                .filter(|(name, element)| element.matches_term(name, &needle))
                .map(|(name, element)| (name.clone(), element.clone()))
                .collect();
            if !hits.is_empty() {
                found.insert(category.clone(), hits);
            }
        }
        found
    }

    /// Insert or replace an element, creating its category if needed.
    ///
    /// A non-empty `description` overrides the one carried by `definition`.
    pub fn save(
        &mut self,
        category: &str,
        name: &str,
        definition: Element,
        description: Option<&str>,
    ) {
        let mut element = definition;
        if let Some(text) = description.filter(|d| !d.is_empty()) {
            element.description = text.to_string();
        }
        self.insert(category, name, element);
        tracing::debug!("saved element '{category}/{name}'");
    }

    /// Merge whole categories into the store, last-write-wins per name.
    pub fn extend(&mut self, categories: Catalogue) {
        for (category, elements) in categories {
            for (name, element) in elements {
                self.insert(&category, &name, element);
            }
        }
    }

    /// Compose `references` into one element and store it as a preset.
    ///
    /// Malformed tokens are reported; unresolved ones are skipped by the
    /// composer. Returns the composed element.
    pub fn save_preset(
        &mut self,
        name: &str,
        references: &[String],
        description: &str,
        warnings: &mut Warnings,
    ) -> Element {
        let parsed: Vec<Reference> = references
            .iter()
            .filter_map(|token| {
                let reference = Reference::parse(token);
                if reference.is_none() {
                    warnings.push(Warning::MalformedReference(token.clone()));
                }
                reference
            })
            .collect();
        let element = self.compose(&parsed, description);
        self.insert(PRESETS_CATEGORY, name, element.clone());
        self.presets.insert(
            name.to_string(),
            PresetInfo {
                description: description.to_string(),
                references: references.to_vec(),
            },
        );
        element
    }

    /// Declared presets in name order.
    pub fn presets(&self) -> &BTreeMap<String, PresetInfo> {
        &self.presets
    }

    /// Merge an element file (category → name → element) into the store.
    pub fn import(&mut self, path: &Path) -> Result<usize, StoreError> {
        let content = fs::read_to_string(path)?;
        let categories: Catalogue = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(StoreError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ));
            }
        };
        let count = categories.values().map(BTreeMap::len).sum();
        self.extend(categories);
        tracing::info!("imported {count} elements from {}", path.display());
        Ok(count)
    }

    /// Write every category to a YAML or TOML file, chosen by extension.
    pub fn export(&self, path: &Path) -> Result<(), StoreError> {
        let content = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::to_string(&self.elements)?,
            Some("toml") => toml::to_string_pretty(&self.elements)?,
            other => {
                return Err(StoreError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ));
            }
        };
        fs::write(path, content)?;
        tracing::info!("exported library to {}", path.display());
        Ok(())
    }

    fn insert(&mut self, category: &str, name: &str, element: Element) {
        let replaced = self
            .elements
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), element);
        if replaced.is_some() {
            tracing::debug!("element '{category}/{name}' replaced by a newer definition");
        }
    }
}

/// Turn a raw content block or element mapping into a snippet element.
pub(crate) fn snippet_element(value: Value) -> Element {
    match value {
        Value::Object(map) => Element::from_map(map),
        other => Element::default().with_section(crate::element::CONTENT_KEY, other),
    }
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn element(value: Value) -> Element {
        match value {
            Value::Object(map) => Element::from_map(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn list_category_returns_elements() {
        let store = ElementStore::builtin();
        let social = store.list_category("social");
        assert!(social.contains_key("twitter_completo"));
        assert!(social.contains_key("og_artigo"));
    }

    #[test]
    fn list_unknown_category_is_empty() {
        let store = ElementStore::builtin();
        assert!(store.list_category("nope").is_empty());
    }

    #[test]
    fn get_returns_none_for_unknown() {
        let store = ElementStore::builtin();
        assert!(store.get("social", "twitter_completo").is_some());
        assert!(store.get("social", "nope").is_none());
        assert!(store.get("nope", "nope").is_none());
    }

    #[test]
    fn names_are_case_sensitive() {
        let store = ElementStore::builtin();
        assert!(store.get("Social", "twitter_completo").is_none());
        assert!(store.get("social", "Twitter_Completo").is_none());
    }

    #[test]
    fn search_is_case_insensitive_on_name_and_description() {
        let store = ElementStore::builtin();
        let found = store.search("Twitter");
        let social = &found["social"];
        // name match
        assert!(social.contains_key("twitter_completo"));
        // og elements do not mention twitter at all
        assert!(!social.contains_key("og_artigo"));

        let mut store = ElementStore::builtin();
        store.save(
            "custom",
            "cartao",
            Element::new("Cartões para Twitter Cards"),
            None,
        );
        let found = store.search("twitter cards");
        assert!(found["custom"].contains_key("cartao"));
        assert!(found["social"].contains_key("twitter_completo"));
    }

    #[test]
    fn search_matches_description_alone_with_capitalised_term() {
        let mut store = ElementStore::builtin();
        store.save(
            "custom",
            "cartao",
            Element::new("Cartões para Twitter Cards"),
            None,
        );
        let found = store.search("Twitter");
        assert!(found["custom"].contains_key("cartao"));
        let found = store.search("CARDS");
        assert!(found["custom"].contains_key("cartao"));
        assert!(store.search("Mastodon").get("custom").is_none());
    }

    #[test]
    fn search_without_hits_is_empty() {
        let store = ElementStore::builtin();
        assert!(store.search("zzz-nothing").is_empty());
    }

    #[test]
    fn save_creates_category_and_overrides_description() {
        let mut store = ElementStore::empty();
        let definition = element(json!({
            "description": "old",
            "analytics": {"s_channel": "blog"}
        }));
        store.save("custom", "blog", definition, Some("new"));
        let saved = store.get("custom", "blog").unwrap();
        assert_eq!(saved.description, "new");
        assert_eq!(saved.sections["analytics"]["s_channel"], "blog");
    }

    #[test]
    fn save_without_description_keeps_definition_description() {
        let mut store = ElementStore::empty();
        store.save("custom", "a", Element::new("kept"), None);
        store.save("custom", "b", Element::new("kept"), Some(""));
        assert_eq!(store.get("custom", "a").unwrap().description, "kept");
        assert_eq!(store.get("custom", "b").unwrap().description, "kept");
    }

    #[test]
    fn extend_replaces_colliding_names_wholesale() {
        let mut store = ElementStore::builtin();
        let mut social = BTreeMap::new();
        social.insert(
            "twitter_completo".to_string(),
            element(json!({"twitter": {"card": "summary"}})),
        );
        social.insert("novo".to_string(), Element::new("novo"));
        let mut categories = Catalogue::new();
        categories.insert("social".to_string(), social);
        store.extend(categories);

        let replaced = store.get("social", "twitter_completo").unwrap();
        assert_eq!(replaced.sections["twitter"]["card"], "summary");
        // no deep merge: built-in fields are gone
        assert!(replaced.sections["twitter"].get("creator").is_none());
        assert!(store.get("social", "novo").is_some());
        // untouched elements survive
        assert!(store.get("social", "og_artigo").is_some());
    }

    #[test]
    fn save_preset_stores_composed_element() {
        let mut store = ElementStore::builtin();
        let mut warnings = Warnings::new();
        store.save_preset(
            "lancamento_completo",
            &[
                "navegacao/header_completo".to_string(),
                "social/twitter_completo".to_string(),
                "bogus".to_string(),
            ],
            "Lançamento",
            &mut warnings,
        );
        let preset = store.get("presets", "lancamento_completo").unwrap();
        assert_eq!(preset.description, "Lançamento");
        assert!(preset.sections.contains_key("includes"));
        assert!(preset.sections.contains_key("twitter"));
        assert_eq!(
            warnings.into_vec(),
            vec![Warning::MalformedReference("bogus".into())]
        );
        assert_eq!(store.presets()["lancamento_completo"].references.len(), 3);
    }

    #[test]
    fn export_then_import_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("biblioteca.yaml");
        let mut store = ElementStore::builtin();
        store.save("custom", "x", Element::new("exportado"), None);
        store.export(&path).unwrap();

        let mut fresh = ElementStore::empty();
        let count = fresh.import(&path).unwrap();
        assert_eq!(count, store.list().values().map(BTreeMap::len).sum::<usize>());
        assert_eq!(fresh.get("custom", "x").unwrap().description, "exportado");
        assert_eq!(
            fresh.get("social", "twitter_completo"),
            store.get("social", "twitter_completo")
        );
    }

    #[test]
    fn export_toml_is_readable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("biblioteca.toml");
        ElementStore::builtin().export(&path).unwrap();
        let mut fresh = ElementStore::empty();
        fresh.import(&path).unwrap();
        let layout = fresh.get("layout", "artigo_padrao").unwrap();
        assert_eq!(layout.sections["stylesheets"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn import_rejects_unknown_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("elements.ini");
        fs::write(&path, "x").unwrap();
        let result = ElementStore::empty().import(&path);
        assert!(matches!(result, Err(StoreError::UnsupportedFormat(_))));
    }

    #[test]
    fn import_invalid_yaml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("elements.yaml");
        fs::write(&path, "social: [unclosed").unwrap();
        let mut store = ElementStore::builtin();
        assert!(matches!(store.import(&path), Err(StoreError::Yaml(_))));
        // failed import leaves the store untouched
        assert!(store.get("social", "twitter_completo").is_some());
    }

    #[test]
    fn snippet_element_wraps_plain_text() {
        let snippet = snippet_element(json!("**Aviso**"));
        assert_eq!(snippet.sections["content"], "**Aviso**");
        let snippet = snippet_element(json!({"description": "d", "content": "c"}));
        assert_eq!(snippet.description, "d");
        assert_eq!(snippet.sections["content"], "c");
    }
}
