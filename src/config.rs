//! Tool configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user `config.toml` placed in the base directory:
//!
//! ```text
//! newsroom/
//! ├── config.toml               # Overrides stock defaults
//! ├── biblioteca_config.yaml    # Element library (see `library`)
//! ├── components/               # Include fragments
//! │   ├── globalheader.html
//! │   └── localnav.html
//! └── templates/artigo/html/body.html
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! library = "biblioteca_config.yaml"  # Element library, relative to the base dir
//! components_dir = "components"        # Include fragments
//! output_dir = "output"                # Fallback output directory for renders
//!
//! [render]
//! lang = "pt-BR"
//! site_name = "Newsroom"
//! default_elements = []                # Tokens applied to every rendered file
//! auto_apply = false                   # Run automation rules on render
//!
//! [article]
//! template = "templates/artigo/html/body.html"
//!
//! [processing]
//! max_processes = 4                    # Max parallel renders (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::element::Reference;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsroomConfig {
    /// Element library file, relative to the base directory.
    pub library: String,
    /// Directory holding include fragments, relative to the base directory.
    pub components_dir: String,
    /// Output directory used when the input has no sibling `output/`.
    pub output_dir: String,
    /// Markdown rendering settings.
    pub render: RenderConfig,
    /// Article post-processing settings.
    pub article: ArticleConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for NewsroomConfig {
    fn default() -> Self {
        Self {
            library: crate::library::DEFAULT_LIBRARY_FILE.to_string(),
            components_dir: "components".to_string(),
            output_dir: "output".to_string(),
            render: RenderConfig::default(),
            article: ArticleConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl NewsroomConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.trim().is_empty() {
            return Err(ConfigError::Validation("library must not be empty".into()));
        }
        if self.render.lang.trim().is_empty() {
            return Err(ConfigError::Validation(
                "render.lang must not be empty".into(),
            ));
        }
        if let Some(token) = self
            .render
            .default_elements
            .iter()
            .find(|t| Reference::parse(t).is_none())
        {
            return Err(ConfigError::Validation(format!(
                "render.default_elements: '{token}' is not 'category/name' or 'preset:name'"
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the configured paths against `base`.
    pub fn paths(&self, base: &Path) -> ResolvedPaths {
        ResolvedPaths {
            library: base.join(&self.library),
            components: base.join(&self.components_dir),
            output: base.join(&self.output_dir),
            template: base.join(&self.article.template),
        }
    }
}

/// Configured locations, joined onto the base directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub library: PathBuf,
    pub components: PathBuf,
    pub output: PathBuf,
    pub template: PathBuf,
}

/// Markdown rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// `lang` attribute of rendered pages.
    pub lang: String,
    /// Appended to page titles and used for `og:site_name` when absent.
    pub site_name: String,
    /// Reference tokens applied to every rendered document.
    pub default_elements: Vec<String>,
    /// Run the library's automation rules on every rendered document.
    pub auto_apply: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lang: "pt-BR".to_string(),
            site_name: "Newsroom".to_string(),
            default_elements: Vec::new(),
            auto_apply: false,
        }
    }
}

/// Article post-processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArticleConfig {
    /// Template page the article is poured into, relative to the base directory.
    pub template: String,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            template: "templates/artigo/html/body.html".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(NewsroomConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<NewsroomConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NewsroomConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<NewsroomConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!("configuration resolved for {}", root.display());
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Newsroom Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as config.toml in the base directory (--base-dir).
# Unknown keys will cause an error.

# Element library with custom elements, presets, snippets and automation
# rules. YAML (.yaml/.yml) or TOML (.toml). A missing file is fine.
library = "biblioteca_config.yaml"

# Directory with the HTML fragments loaded by `includes`.
components_dir = "components"

# Where rendered pages go when the input has no sibling output/ directory.
output_dir = "output"

# ---------------------------------------------------------------------------
# Markdown rendering
# ---------------------------------------------------------------------------
[render]
# lang attribute of the generated <html>.
lang = "pt-BR"

# Appended to page titles; also the og:site_name fallback.
site_name = "Newsroom"

# Elements applied to every rendered file, e.g.
# ["analytics/newsroom_padrao", "preset:lancamento_completo"]
default_elements = []

# Run the library's automation rules on every rendered file.
auto_apply = false

# ---------------------------------------------------------------------------
# Article post-processing
# ---------------------------------------------------------------------------
[article]
# Template page the rendered article is poured into.
template = "templates/artigo/html/body.html"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel renders in batch mode.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
