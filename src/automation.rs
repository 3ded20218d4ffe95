//! Keyword-triggered automation rules.
//!
//! A rule pairs a free-text condition with a list of reference tokens:
//!
//! ```yaml
//! automatizacoes:
//!   regras_auto:
//!     - condicao: "titulo contém keynote ou evento"
//!       aplicar: ["preset:keynote_evento"]
//!     - condicao: "descrição menciona beta"
//!       aplicar: ["snippets/disclaimer_padrao"]
//! ```
//!
//! The condition text is classified into one [`Trigger`] by the first keyword
//! group it mentions. Rules are evaluated independently, in declaration
//! order, so several can fire for one document.

use crate::element::{Document, str_at};
use crate::store::ElementStore;
use crate::warning::{Warning, Warnings};
use serde::{Deserialize, Serialize};

/// One automation rule as written in the library file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    #[serde(rename = "condicao", default)]
    pub condition: String,
    #[serde(rename = "aplicar", default)]
    pub apply: Vec<String>,
}

/// The coarse keyword groups a condition can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// `keynote` or `evento` in the title.
    Event,
    /// `produto` or `lançamento` in the title.
    ProductLaunch,
    /// `tutorial` or `como fazer` in the title.
    Tutorial,
    /// `beta` in the description.
    Beta,
}

impl Trigger {
    /// Classify a condition by the first keyword group it mentions.
    pub fn from_condition(condition: &str) -> Option<Self> {
        let condition = condition.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| condition.contains(*w));
        if mentions(&["keynote", "evento"]) {
            Some(Trigger::Event)
        } else if mentions(&["produto", "lançamento"]) {
            Some(Trigger::ProductLaunch)
        } else if mentions(&["tutorial"]) {
            Some(Trigger::Tutorial)
        } else if mentions(&["beta"]) {
            Some(Trigger::Beta)
        } else {
            None
        }
    }

    pub fn matches(self, title: &str, description: &str) -> bool {
        let title = title.to_lowercase();
        let description = description.to_lowercase();
        let any_in = |text: &str, words: &[&str]| words.iter().any(|w| text.contains(*w));
        match self {
            Trigger::Event => any_in(&title, &["keynote", "evento"]),
            Trigger::ProductLaunch => any_in(&title, &["produto", "lançamento"]),
            Trigger::Tutorial => any_in(&title, &["tutorial", "como fazer"]),
            Trigger::Beta => any_in(&description, &["beta"]),
        }
    }
}

/// Title and description as the rules see them: `meta_basico.*` first,
/// then the top-level keys.
pub fn title_and_description(document: &Document) -> (&str, &str) {
    let pick = |key: &str| {
        str_at(document, &format!("meta_basico.{key}"))
            .filter(|s| !s.is_empty())
            .or_else(|| str_at(document, key))
            .unwrap_or("")
    };
    (pick("title"), pick("description"))
}

/// Run every rule against `document` and apply the actions of those that fire.
///
/// With no rules the document is returned unchanged.
pub fn apply_rules(
    store: &ElementStore,
    rules: &[AutomationRule],
    document: &Document,
    warnings: &mut Warnings,
) -> Document {
    let (title, description) = title_and_description(document);
    let (title, description) = (title.to_string(), description.to_string());

    let mut result = document.clone();
    for rule in rules {
        let Some(trigger) = Trigger::from_condition(&rule.condition) else {
            warnings.push(Warning::UnknownCondition(rule.condition.clone()));
            continue;
        };
        if rule.apply.is_empty() || !trigger.matches(&title, &description) {
            continue;
        }
        tracing::info!("automation fired: {}", rule.condition);
        result = store.apply_references(&result, rule.apply.as_slice(), false, warnings);
    }
    result
}
