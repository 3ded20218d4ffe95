//! CLI output formatting.
//!
//! # Identity First
//!
//! Every listed entity leads with its positional index and identity
//! (`category/name`, preset name, input file). Details follow as indented
//! context lines:
//!
//! ```text
//! Categories
//! 001 analytics (3 elements)
//! 002 categorias (3 elements)
//!
//! social
//! 001 og_artigo
//!     Description: Open Graph para artigos
//!     Sections: og
//! ```
//!
//! ## Render
//!
//! ```text
//! artigos/artigo.md → public/index.html
//!     Includes: header_global, local_nav
//!     Images: 1
//!     Warning: image not found: artigos/falta.png
//!
//! Rendered 2 of 3 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::article::ArticleReport;
use crate::builtin::Catalogue;
use crate::element::Element;
use crate::render::{BatchOutcome, RenderReport};
use crate::store::PresetInfo;
use crate::warning::Warnings;
use std::collections::BTreeMap;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + identity, with optional count.
///
/// ```text
/// 001 social (4 elements)
/// 001 twitter_completo
/// ```
fn entity_header(index: usize, identity: &str, count: Option<(usize, &str)>) -> String {
    match count {
        Some((n, noun)) => format!("{} {} ({} {})", format_index(index), identity, n, noun),
        None => format!("{} {}", format_index(index), identity),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// Description and section lines for one element, at `depth`.
fn element_context(element: &Element, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if !element.description.is_empty() {
        lines.push(format!(
            "{}Description: {}",
            indent(depth),
            truncate_desc(&element.description, 72)
        ));
    }
    let sections: Vec<&str> = element.sections().map(|(key, _)| key).collect();
    if !sections.is_empty() {
        lines.push(format!("{}Sections: {}", indent(depth), sections.join(", ")));
    }
    lines
}

// ============================================================================
// Element store listings
// ============================================================================

/// Categories with their element counts.
pub fn format_categories(categories: &[(&str, usize)]) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, (category, count)) in categories.iter().enumerate() {
        lines.push(entity_header(i + 1, category, Some((*count, "elements"))));
    }
    if categories.is_empty() {
        lines.push(format!("{}(empty)", indent(1)));
    }
    lines
}

/// Every element of one category.
pub fn format_category(category: &str, elements: &BTreeMap<String, Element>) -> Vec<String> {
    let mut lines = vec![category.to_string()];
    if elements.is_empty() {
        lines.push(format!("{}(no elements)", indent(1)));
    }
    for (i, (name, element)) in elements.iter().enumerate() {
        lines.push(entity_header(i + 1, name, None));
        lines.extend(element_context(element, 1));
    }
    lines
}

/// Full definition of one element, sections rendered as YAML.
pub fn format_element(category: &str, name: &str, element: &Element) -> Vec<String> {
    let mut lines = vec![format!("{category}/{name}")];
    if !element.description.is_empty() {
        lines.push(format!("{}Description: {}", indent(1), element.description));
    }
    match serde_yaml::to_string(&element.sections) {
        Ok(yaml) => lines.extend(yaml.lines().map(|line| format!("{}{}", indent(1), line))),
        Err(e) => lines.push(format!("{}(unprintable: {e})", indent(1))),
    }
    lines
}

/// Search matches, grouped by category.
pub fn format_search(term: &str, results: &Catalogue) -> Vec<String> {
    let total: usize = results.values().map(BTreeMap::len).sum();
    let mut lines = vec![format!("Search \"{term}\" ({total} matches)")];
    let mut index = 0;
    for (category, elements) in results {
        for (name, element) in elements {
            index += 1;
            lines.push(entity_header(index, &format!("{category}/{name}"), None));
            lines.extend(element_context(element, 1));
        }
    }
    lines
}

/// Presets loaded from the library, with the references they compose.
pub fn format_presets(presets: &BTreeMap<String, PresetInfo>) -> Vec<String> {
    let mut lines = vec!["Presets".to_string()];
    if presets.is_empty() {
        lines.push(format!("{}(none defined)", indent(1)));
    }
    for (i, (name, info)) in presets.iter().enumerate() {
        lines.push(entity_header(i + 1, name, Some((info.references.len(), "elements"))));
        if !info.description.is_empty() {
            lines.push(format!("{}Description: {}", indent(1), info.description));
        }
        lines.push(format!("{}Elements: {}", indent(1), info.references.join(", ")));
    }
    lines
}

// ============================================================================
// Warnings
// ============================================================================

pub fn format_warnings(warnings: &Warnings, depth: usize) -> Vec<String> {
    warnings
        .iter()
        .map(|w| format!("{}Warning: {w}", indent(depth)))
        .collect()
}

// ============================================================================
// Render and article reports
// ============================================================================

pub fn format_render_report(report: &RenderReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} → {}",
        report.input.display(),
        report.output.display()
    )];
    if !report.includes.is_empty() {
        lines.push(format!("{}Includes: {}", indent(1), report.includes.join(", ")));
    }
    if report.images > 0 {
        lines.push(format!("{}Images: {}", indent(1), report.images));
    }
    lines.extend(format_warnings(&report.warnings, 1));
    lines
}

/// Per-file lines followed by a one-line summary.
pub fn format_batch(outcomes: &[BatchOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rendered = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => {
                rendered += 1;
                lines.extend(format_render_report(report));
            }
            Err(e) => lines.push(format!("{}: FAILED ({e})", outcome.input.display())),
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("Rendered {} of {} files", rendered, outcomes.len()));
    lines
}

pub fn format_article_report(report: &ArticleReport) -> Vec<String> {
    let header = &report.header;
    let mut lines = vec![format!("Article → {}", report.output.display())];
    let fields = [
        ("Title", &header.title),
        ("Subtitle", &header.subtitle),
        ("Category", &header.category),
        ("Date", &header.date),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("{}{label}: {value}", indent(1)));
        }
    }
    if report.figures_fixed > 0 {
        lines.push(format!("{}Figures fixed: {}", indent(1), report.figures_fixed));
    }
    if report.assets_copied > 0 {
        lines.push(format!("{}Assets copied: {}", indent(1), report.assets_copied));
    }
    lines.extend(format_warnings(&report.warnings, 1));
    lines
}

// ============================================================================
// Print wrappers
// ============================================================================

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_categories(categories: &[(&str, usize)]) {
    print_lines(&format_categories(categories));
}

pub fn print_category(category: &str, elements: &BTreeMap<String, Element>) {
    print_lines(&format_category(category, elements));
}

pub fn print_element(category: &str, name: &str, element: &Element) {
    print_lines(&format_element(category, name, element));
}

pub fn print_search(term: &str, results: &Catalogue) {
    print_lines(&format_search(term, results));
}

pub fn print_presets(presets: &BTreeMap<String, PresetInfo>) {
    print_lines(&format_presets(presets));
}

pub fn print_render_report(report: &RenderReport) {
    print_lines(&format_render_report(report));
}

pub fn print_batch(outcomes: &[BatchOutcome]) {
    print_lines(&format_batch(outcomes));
}

pub fn print_article_report(report: &ArticleReport) {
    print_lines(&format_article_report(report));
}
