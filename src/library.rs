//! External library source.
//!
//! A library file extends the built-in catalogue. YAML and TOML are accepted,
//! picked by extension:
//!
//! ```yaml
//! elementos_personalizados:        # category → name → element
//!   social:
//!     linkedin:
//!       description: "LinkedIn"
//!       linkedin: {company: estatistica-pro}
//! presets:                         # name → composed ahead of time
//!   keynote_evento:
//!     description: "Keynote"
//!     elementos: [categorias/evento, social/twitter_completo]
//! snippets:                        # name → content block
//!   aviso_beta: "**Versão beta**"
//! automatizacoes:
//!   regras_auto:
//!     - condicao: "keynote ou evento"
//!       aplicar: ["preset:keynote_evento"]
//! ```
//!
//! Presets may refer to other presets of the same file; those are composed
//! first, whatever their names.
//!
//! Every section is optional. A missing file means built-ins only; a file
//! that cannot be read or parsed is reported as a warning and skipped as a
//! whole.

use crate::automation::{self, AutomationRule};
use crate::builtin::Catalogue;
use crate::element::{Document, Element, PRESETS_CATEGORY, Reference};
use crate::store::{self, ElementStore};
use crate::warning::{Warning, Warnings};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default library file name, looked up in the base directory.
pub const DEFAULT_LIBRARY_FILE: &str = "biblioteca_config.yaml";

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unsupported library format: {0}")]
    UnsupportedFormat(String),
}

/// The library file as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LibraryFile {
    #[serde(rename = "elementos_personalizados")]
    pub custom_elements: Catalogue,
    pub presets: BTreeMap<String, PresetDefinition>,
    pub snippets: BTreeMap<String, Value>,
    #[serde(rename = "automatizacoes")]
    pub automations: Automations,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PresetDefinition {
    pub description: String,
    #[serde(rename = "elementos")]
    pub elements: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Automations {
    #[serde(rename = "regras_auto")]
    pub rules: Vec<AutomationRule>,
}

impl LibraryFile {
    /// Parse a library file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, LibraryError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let library = match store::extension(path).as_deref() {
            Some("yaml") | Some("yml") => {
                // An empty YAML file is a valid, empty library.
                serde_yaml::from_str::<Option<Self>>(&content)?.unwrap_or_default()
            }
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(LibraryError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ));
            }
        };
        Ok(Some(library))
    }
}

/// An element store together with the automation rules of its library.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub store: ElementStore,
    pub rules: Vec<AutomationRule>,
}

impl Library {
    /// Built-in elements, no presets, no rules.
    pub fn builtin() -> Self {
        Self {
            store: ElementStore::builtin(),
            rules: Vec::new(),
        }
    }

    /// Built-ins extended by the library file at `path`, if there is one.
    ///
    /// Never fails: an unreadable or malformed file is recorded in
    /// `warnings` and the built-ins are returned as they are.
    pub fn load(path: &Path, warnings: &mut Warnings) -> Self {
        let mut library = Self::builtin();
        match LibraryFile::load(path) {
            Ok(Some(file)) => {
                library.extend(file, warnings);
                tracing::info!("loaded custom elements from {}", path.display());
            }
            Ok(None) => {
                tracing::debug!("{} not found, using built-in elements only", path.display())
            }
            Err(e) => warnings.push(Warning::LibraryUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
        library
    }

    /// Layer a parsed library file on top of this library.
    ///
    /// Custom elements and snippets go in first so that presets can refer
    /// to them; presets are then composed in [`composition_order`].
    pub fn extend(&mut self, file: LibraryFile, warnings: &mut Warnings) {
        self.store.extend(file.custom_elements);

        if !file.snippets.is_empty() {
            let snippets: BTreeMap<String, Element> = file
                .snippets
                .into_iter()
                .map(|(name, value)| (name, store::snippet_element(value)))
                .collect();
            let mut categories = Catalogue::new();
            categories.insert("snippets".to_string(), snippets);
            self.store.extend(categories);
        }

        for (name, preset) in composition_order(file.presets) {
            self.store
                .save_preset(&name, &preset.elements, &preset.description, warnings);
        }

        self.rules.extend(file.automations.rules);
    }

    /// Apply reference tokens to a copy of `document`.
    pub fn apply_references<S: AsRef<str>>(
        &self,
        document: &Document,
        tokens: &[S],
        overwrite: bool,
        warnings: &mut Warnings,
    ) -> Document {
        self.store
            .apply_references(document, tokens, overwrite, warnings)
    }

    /// Run the automation rules against a copy of `document`.
    pub fn apply_automations(&self, document: &Document, warnings: &mut Warnings) -> Document {
        automation::apply_rules(&self.store, &self.rules, document, warnings)
    }
}

/// Order presets so that each one is composed after the presets it refers
/// to (`preset:x` or `presets/x`). Otherwise name order.
///
/// Presets caught in a reference cycle are composed last, in name order;
/// their references to each other resolve only as far as the cycle allows.
pub fn composition_order(
    presets: BTreeMap<String, PresetDefinition>,
) -> Vec<(String, PresetDefinition)> {
    let mut pending = presets;
    let mut ordered = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let ready: Vec<String> = pending
            .iter()
            .filter(|(_, preset)| {
                !preset.elements.iter().any(|token| {
                    Reference::parse(token).is_some_and(|reference| {
                        let (category, name) = reference.key();
                        category == PRESETS_CATEGORY && pending.contains_key(name)
                    })
                })
            })
            .map(|(name, _)| name.clone())
            .collect();
        let batch = if ready.is_empty() {
            tracing::debug!("preset reference cycle among {:?}", pending.keys());
            pending.keys().cloned().collect()
        } else {
            ready
        };
        for name in batch {
            if let Some(preset) = pending.remove(&name) {
                ordered.push((name, preset));
            }
        }
    }
    ordered
}
