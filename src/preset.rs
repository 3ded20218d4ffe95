//! Preset composition.
//!
//! A preset is several elements folded into one ahead of time. Folding is
//! last-wins: composing `[A, B]` where both define `og.title` keeps B's value.
//! This is the opposite of [`ElementStore::apply`](crate::store::ElementStore),
//! which preserves whatever the document already holds. Presets are composed
//! first and applied afterwards, so both rules take part in one enrichment:
//!
//! ```text
//! compose([A, B])  → preset.og.title = B      (later reference wins)
//! apply(doc, preset) → doc.og.title kept if the document already had one
//! ```

use crate::element::{Element, Reference, Section};
use crate::store::ElementStore;
use serde_json::{Map, Value};

impl ElementStore {
    /// Fold the referenced elements into one element, in order.
    ///
    /// Mapping sections are shallow-updated field by field; any other section
    /// is replaced wholesale. References that do not resolve are skipped.
    pub fn compose(&self, references: &[Reference], description: &str) -> Element {
        let mut preset = Element::new(description);
        for reference in references {
            let Some(element) = self.resolve(reference) else {
                tracing::debug!("preset skips unresolved reference '{reference}'");
                continue;
            };
            fold(&mut preset, element);
        }
        preset
    }
}

/// Fold one element's sections into the running preset.
fn fold(preset: &mut Element, element: &Element) {
    for (key, section) in element.sections() {
        let slot = preset
            .sections
            .entry(key.to_string())
            .or_insert_with(|| match section {
                Section::Fields(_) => Value::Object(Map::new()),
                Section::Content(_) | Section::Whole(_) => Value::Null,
            });
        match (section, slot) {
            (Section::Fields(fields), Value::Object(running)) => {
                for (field, value) in fields {
                    running.insert(field.clone(), value.clone());
                }
            }
            (Section::Fields(fields), slot) => *slot = Value::Object(fields.clone()),
            (Section::Content(value) | Section::Whole(value), slot) => *slot = value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(value: Value) -> Element {
        match value {
            Value::Object(map) => Element::from_map(map),
            _ => unreachable!(),
        }
    }

    fn reference(token: &str) -> Reference {
        Reference::parse(token).unwrap()
    }

    fn store_with_a_b() -> ElementStore {
        let mut store = ElementStore::empty();
        store.save(
            "t",
            "a",
            element(json!({
                "og": {"title": "A", "type": "article"},
                "stylesheets": ["/a.css"]
            })),
            None,
        );
        store.save(
            "t",
            "b",
            element(json!({
                "og": {"title": "B"},
                "stylesheets": ["/b.css"]
            })),
            None,
        );
        store
    }

    #[test]
    fn later_reference_wins_on_field_collision() {
        let store = store_with_a_b();
        let preset = store.compose(&[reference("t/a"), reference("t/b")], "ab");
        assert_eq!(preset.sections["og"]["title"], "B");
        // fields only A defines survive
        assert_eq!(preset.sections["og"]["type"], "article");
    }

    #[test]
    fn order_reversed_flips_winner() {
        let store = store_with_a_b();
        let preset = store.compose(&[reference("t/b"), reference("t/a")], "ba");
        assert_eq!(preset.sections["og"]["title"], "A");
    }

    #[test]
    fn non_mapping_sections_are_replaced_wholesale() {
        let store = store_with_a_b();
        let preset = store.compose(&[reference("t/a"), reference("t/b")], "");
        assert_eq!(preset.sections["stylesheets"], json!(["/b.css"]));
    }

    #[test]
    fn unresolved_references_are_skipped() {
        let store = store_with_a_b();
        let preset = store.compose(&[reference("nope/nope"), reference("t/a")], "d");
        assert_eq!(preset.description, "d");
        assert_eq!(preset.sections["og"]["title"], "A");
    }

    #[test]
    fn description_comes_from_caller_only() {
        let store = ElementStore::builtin();
        let preset = store.compose(&[reference("social/twitter_completo")], "meu preset");
        assert_eq!(preset.description, "meu preset");
        assert!(!preset.sections.contains_key("description"));
    }

    #[test]
    fn lancamento_completo_has_includes_and_twitter() {
        let store = ElementStore::builtin();
        let preset = store.compose(
            &[
                reference("navegacao/header_completo"),
                reference("social/twitter_completo"),
            ],
            "Lançamento completo",
        );
        let header = store.get("navegacao", "header_completo").unwrap();
        let twitter = store.get("social", "twitter_completo").unwrap();
        assert_eq!(preset.sections["includes"], header.sections["includes"]);
        assert_eq!(preset.sections["twitter"], twitter.sections["twitter"]);
    }

    #[test]
    fn content_sections_are_last_wins() {
        let store = ElementStore::builtin();
        let preset = store.compose(
            &[
                reference("snippets/cta_newsletter"),
                reference("snippets/rodape_social"),
            ],
            "",
        );
        let rodape = store.get("snippets", "rodape_social").unwrap();
        assert_eq!(preset.sections["content"], rodape.sections["content"]);
    }

    #[test]
    fn mapping_replaces_earlier_non_mapping() {
        let mut store = ElementStore::empty();
        store.save("t", "list", element(json!({"x": [1, 2]})), None);
        store.save("t", "map", element(json!({"x": {"k": 1}})), None);
        let preset = store.compose(&[reference("t/list"), reference("t/map")], "");
        assert_eq!(preset.sections["x"], json!({"k": 1}));
    }

    #[test]
    fn nested_presets_resolve_through_presets_category() {
        let mut store = store_with_a_b();
        let mut warnings = crate::warning::Warnings::new();
        store.save_preset("base", &["t/a".to_string()], "", &mut warnings);
        let preset = store.compose(&[reference("preset:base"), reference("t/b")], "");
        assert_eq!(preset.sections["og"]["title"], "B");
        assert!(warnings.is_empty());
    }
}
