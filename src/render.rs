//! Markdown rendering.
//!
//! ```text
//! artigo.md ──► frontmatter ──► elements/automations ──► Converter ──► includes ──► images ──► index.html
//! ```
//!
//! 1. The frontmatter is parsed into a [`Document`] and enriched with the
//!    configured default elements, the caller's reference tokens and, when
//!    enabled, the library's automation rules.
//! 2. A [`Converter`] turns the body and the enriched document into a page.
//!    [`MarkdownConverter`] is the stock one: pulldown-cmark for the body,
//!    maud for the page shell.
//! 3. `includes` entries pour component fragments into their placeholders.
//! 4. Relative images are copied next to the output and their `src` rewritten.
//!
//! [`render_batch`] renders every `*.md` of a directory in parallel. One
//! failing file never stops the others.

use crate::dom::{self, NodeRef};
use crate::element::{Document, str_at};
use crate::frontmatter;
use crate::library::Library;
use crate::warning::{Warning, Warnings};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Conversion failed: {0}")]
    Convert(String),
}

/// Turns a Markdown body plus its document variables into an HTML page.
pub trait Converter: Send + Sync {
    fn convert(&self, body: &str, document: &Document) -> Result<String, RenderError>;
}

/// Settings for one render run.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Applied before `elements`.
    pub default_elements: Vec<String>,
    /// Reference tokens given by the caller.
    pub elements: Vec<String>,
    pub overwrite: bool,
    /// Run the library's automation rules after the elements.
    pub auto_apply: bool,
    pub components_dir: PathBuf,
    /// Fallback output directory.
    pub output_dir: PathBuf,
}

/// What one render produced.
#[derive(Debug)]
pub struct RenderReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub includes: Vec<String>,
    pub images: usize,
    pub warnings: Warnings,
}

/// Per-file result of a batch render.
#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub result: Result<RenderReport, RenderError>,
}

// =============================================================================
// Stock converter
// =============================================================================

const VIEWPORT: &str = "width=device-width, initial-scale=1, viewport-fit=cover";

/// pulldown-cmark body inside a maud page.
///
/// The page carries empty placeholders for every include position and a
/// title block (`h1.title`, `p.subtitle.lead`, `div.description`, `p.date`)
/// the article post-processor reads back.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    pub lang: String,
    pub site_name: String,
}

impl MarkdownConverter {
    pub fn new(lang: impl Into<String>, site_name: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            site_name: site_name.into(),
        }
    }
}

impl Converter for MarkdownConverter {
    fn convert(&self, body: &str, document: &Document) -> Result<String, RenderError> {
        Ok(self.page(body, document).into_string())
    }
}

impl MarkdownConverter {
    fn page(&self, body: &str, document: &Document) -> Markup {
        let title = field(document, "title");
        let page_title = match title {
            Some(t) => format!("{t} - {}", self.site_name),
            None => self.site_name.clone(),
        };
        let lang = field(document, "lang").unwrap_or(self.lang.as_str());

        let mut og = scalar_entries(document.get("og"));
        if !og.iter().any(|(k, _)| k == "site_name") {
            og.push(("site_name".to_string(), self.site_name.clone()));
        }
        let twitter = scalar_entries(document.get("twitter"));
        let analytics = scalar_entries(document.get("analytics"));
        let stylesheets = string_list(document.get("stylesheets"));
        let snippets = content_snippets(document);

        html! {
            (DOCTYPE)
            html lang=(lang) prefix="og: http://ogp.me/ns#" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content=(VIEWPORT);
                    title { (page_title) }
                    @if let Some(description) = field(document, "description") {
                        meta name="description" content=(description);
                    }
                    @for (key, value) in &og {
                        meta property={ "og:" (key) } content=(value);
                    }
                    @for (key, value) in &twitter {
                        meta name={ "twitter:" (key) } content=(value);
                    }
                    @for (key, value) in &analytics {
                        meta name={ "analytics-" (key) } content=(value);
                    }
                    @for href in &stylesheets {
                        link rel="stylesheet" href=(href);
                    }
                }
                body {
                    div id="globalheader" {}
                    nav class="localnav" {}
                    main id="main" class="main" {
                        (title_block(document))
                        div class="article-header-extended" {}
                        (PreEscaped(markdown_to_html(body)))
                        @for (name, content) in &snippets {
                            section class="content-snippet" data-snippet=(name) {
                                (PreEscaped(markdown_to_html(content)))
                            }
                        }
                    }
                    footer id="globalfooter" {}
                }
            }
        }
    }
}

fn title_block(document: &Document) -> Markup {
    html! {
        header id="title-block-header" {
            @if let Some(title) = field(document, "title") {
                h1 class="title" { (title) }
            }
            @if let Some(subtitle) = field(document, "subtitle") {
                p class="subtitle lead" { (subtitle) }
            }
            @if let Some(category) = field(document, "category") {
                div class="description" { (category) }
            }
            @if let Some(date) = field(document, "date") {
                p class="date" { (date) }
            }
        }
    }
}

/// Render a Markdown string to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Non-empty string at `meta_basico.<key>`, else at `<key>`.
fn field<'a>(document: &'a Document, key: &str) -> Option<&'a str> {
    str_at(document, &format!("meta_basico.{key}"))
        .filter(|s| !s.is_empty())
        .or_else(|| str_at(document, key).filter(|s| !s.is_empty()))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Scalar fields of a mapping section, in document order.
fn scalar_entries(section: Option<&Value>) -> Vec<(String, String)> {
    match section {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| scalar_text(v).map(|text| (k.clone(), text)))
            .collect(),
        _ => Vec::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// `(name, content)` of each `content_snippets` entry; bare strings are
/// accepted with an empty name.
fn content_snippets(document: &Document) -> Vec<(String, String)> {
    let entry = |value: &Value| match value {
        Value::Object(map) => map.get("content").and_then(scalar_text).map(|content| {
            let name = map.get("name").and_then(scalar_text).unwrap_or_default();
            (name, content)
        }),
        other => scalar_text(other).map(|content| (String::new(), content)),
    };
    match document.get(crate::element::CONTENT_SNIPPETS_KEY) {
        Some(Value::Array(items)) => items.iter().filter_map(entry).collect(),
        Some(other) => entry(other).into_iter().collect(),
        None => Vec::new(),
    }
}

// =============================================================================
// Includes
// =============================================================================

/// Include positions and the placeholder each one fills.
pub const INCLUDE_POSITIONS: &[(&str, &str)] = &[
    ("header_global", "div#globalheader"),
    ("footer_global", "footer#globalfooter"),
    ("local_nav", "nav.localnav"),
    ("article_header", "div.article-header-extended"),
];

/// One enabled `includes` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub position: String,
    pub file: String,
    pub priority: i64,
}

/// Enabled `includes` entries, sorted by ascending priority.
///
/// An entry is `true` (file `<position>.html`) or a mapping with optional
/// `enabled`, `file` and `priority`. Entries without a priority go last;
/// ties keep document order.
pub fn includes(document: &Document) -> Vec<Include> {
    let Some(Value::Object(entries)) = document.get("includes") else {
        return Vec::new();
    };
    let mut found: Vec<Include> = entries
        .iter()
        .filter_map(|(position, entry)| {
            let default_file = format!("{position}.html");
            let (file, priority) = match entry {
                Value::Bool(true) => (default_file, i64::MAX),
                Value::Object(settings) => {
                    if settings.get("enabled") == Some(&Value::Bool(false)) {
                        return None;
                    }
                    let file = settings
                        .get("file")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or(default_file);
                    let priority = settings
                        .get("priority")
                        .and_then(Value::as_i64)
                        .unwrap_or(i64::MAX);
                    (file, priority)
                }
                _ => return None,
            };
            Some(Include {
                position: position.clone(),
                file,
                priority,
            })
        })
        .collect();
    found.sort_by_key(|include| include.priority);
    found
}

/// Pour component fragments into their placeholders.
///
/// Returns the positions that were filled. A missing component leaves an
/// HTML comment in the placeholder.
pub fn apply_includes(
    page: &NodeRef,
    document: &Document,
    components_dir: &Path,
    warnings: &mut Warnings,
) -> Vec<String> {
    let mut filled = Vec::new();
    for include in includes(document) {
        let Some(selector) = INCLUDE_POSITIONS
            .iter()
            .find(|(position, _)| *position == include.position)
            .map(|(_, selector)| *selector)
        else {
            warnings.push(Warning::UnknownIncludePosition(include.position));
            continue;
        };
        let Some(placeholder) = dom::select_first(page, selector) else {
            warnings.push(Warning::TemplateSlotMissing(selector.to_string()));
            continue;
        };

        let path = components_dir.join(&include.file);
        dom::clear_children(&placeholder);
        match fs::read_to_string(&path) {
            Ok(fragment) => {
                for node in dom::parse_fragment(&fragment) {
                    placeholder.append(node);
                }
                tracing::debug!("include {} ← {}", include.position, path.display());
                filled.push(include.position);
            }
            Err(_) => {
                placeholder.append(NodeRef::new_comment(format!(
                    " component {} not found ",
                    include.file
                )));
                warnings.push(Warning::ComponentNotFound(path));
            }
        }
    }
    filled
}

// =============================================================================
// Images
// =============================================================================

fn is_external(src: &str) -> bool {
    ["http://", "https://", "//", "data:", "/"]
        .iter()
        .any(|prefix| src.starts_with(prefix))
}

/// Copy relative images into `<output_dir>/src/` and point `src` there.
///
/// Returns the number of images copied.
pub fn process_images(
    page: &NodeRef,
    source_dir: &Path,
    output_dir: &Path,
    warnings: &mut Warnings,
) -> Result<usize, RenderError> {
    let mut copied = 0;
    for img in dom::select_all(page, "img[src]") {
        let Some(src) = dom::attribute(&img, "src") else {
            continue;
        };
        if is_external(&src) {
            continue;
        }
        let source = source_dir.join(&src);
        let Some(file_name) = source.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if !source.is_file() {
            warnings.push(Warning::ImageNotFound(source));
            continue;
        }
        let target_dir = output_dir.join("src");
        fs::create_dir_all(&target_dir)?;
        fs::copy(&source, target_dir.join(&file_name))?;
        dom::set_attribute(&img, "src", &format!("src/{file_name}"));
        tracing::debug!("image {} → src/{file_name}", source.display());
        copied += 1;
    }
    Ok(copied)
}

// =============================================================================
// Files
// =============================================================================

/// Where a render of `input` lands.
///
/// An explicit path wins. Otherwise `<input dir>/output/` when that directory
/// exists, else `output_dir`. The stem `artigo` becomes `index`.
pub fn output_path(input: &Path, explicit: Option<&Path>, output_dir: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = if stem == "artigo" { "index".to_string() } else { stem };
    let local = input.parent().unwrap_or(Path::new(".")).join("output");
    let dir = if local.is_dir() { local } else { output_dir.to_path_buf() };
    dir.join(format!("{stem}.html"))
}

/// Render one Markdown file.
pub fn render_file(
    library: &Library,
    converter: &dyn Converter,
    options: &RenderOptions,
    input: &Path,
    output: Option<&Path>,
) -> Result<RenderReport, RenderError> {
    if !input.is_file() {
        return Err(RenderError::InputNotFound(input.to_path_buf()));
    }
    let mut warnings = Warnings::new();
    let content = fs::read_to_string(input)?;
    let (document, body) = frontmatter::parse(&content, &mut warnings);

    let tokens: Vec<&String> = options
        .default_elements
        .iter()
        .chain(&options.elements)
        .collect();
    let mut document = library.apply_references(&document, &tokens, options.overwrite, &mut warnings);
    if options.auto_apply {
        document = library.apply_automations(&document, &mut warnings);
    }

    let html = converter.convert(body, &document)?;
    let page = dom::parse_html(&html);
    let includes = apply_includes(&page, &document, &options.components_dir, &mut warnings);

    let output = output_path(input, output, &options.output_dir);
    let output_dir = output.parent().unwrap_or(Path::new(".")).to_path_buf();
    fs::create_dir_all(&output_dir)?;
    let source_dir = input.parent().unwrap_or(Path::new("."));
    let images = process_images(&page, source_dir, &output_dir, &mut warnings)?;

    fs::write(&output, dom::to_html(&page))?;
    tracing::info!("rendered {} → {}", input.display(), output.display());

    Ok(RenderReport {
        input: input.to_path_buf(),
        output,
        includes,
        images,
        warnings,
    })
}

/// `*.md` files directly inside `dir`, sorted by name.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    if !dir.is_dir() {
        return Err(RenderError::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Render every `*.md` in `dir` in parallel.
///
/// Outcomes come back in file-name order.
pub fn render_batch(
    library: &Library,
    converter: &dyn Converter,
    options: &RenderOptions,
    dir: &Path,
) -> Result<Vec<BatchOutcome>, RenderError> {
    let files = markdown_files(dir)?;
    tracing::info!("rendering {} files from {}", files.len(), dir.display());
    Ok(files
        .into_par_iter()
        .map(|input| {
            let result = render_file(library, converter, options, &input, None);
            if let Err(e) = &result {
                tracing::error!("{}: {e}", input.display());
            }
            BatchOutcome { input, result }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{as_document, setup_fixtures};
    use serde_json::json;
    use tempfile::TempDir;

    fn options(components: &Path, output: &Path) -> RenderOptions {
        RenderOptions {
            default_elements: Vec::new(),
            elements: Vec::new(),
            overwrite: false,
            auto_apply: false,
            components_dir: components.to_path_buf(),
            output_dir: output.to_path_buf(),
        }
    }

    fn converter() -> MarkdownConverter {
        MarkdownConverter::new("pt-BR", "Newsroom")
    }

    fn meta_content(page: &NodeRef, selector: &str) -> Option<String> {
        dom::select_first(page, selector).and_then(|meta| dom::attribute(&meta, "content"))
    }

    // =========================================================================
    // Converter
    // =========================================================================

    #[test]
    fn page_carries_head_metadata() {
        let document = as_document(json!({
            "meta_basico": {"title": "Keynote", "description": "Resumo"},
            "og": {"type": "article", "title": "OG"},
            "twitter": {"card": "summary"},
            "analytics": {"s_channel": "newsroom"},
            "stylesheets": ["/a.css", "/b.css"]
        }));
        let html = converter().convert("corpo", &document).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Keynote - Newsroom</title>"));
        assert!(html.contains(r#"<meta name="description" content="Resumo">"#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"<meta property="og:site_name" content="Newsroom">"#));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary">"#));
        assert!(html.contains(r#"<meta name="analytics-s_channel" content="newsroom">"#));
        assert!(html.contains(r#"<link rel="stylesheet" href="/b.css">"#));
    }

    #[test]
    fn page_without_title_uses_site_name() {
        let html = converter().convert("x", &Document::new()).unwrap();
        assert!(html.contains("<title>Newsroom</title>"));
        assert!(html.contains(r#"lang="pt-BR""#));
    }

    #[test]
    fn page_renders_markdown_and_snippets() {
        let document = as_document(json!({
            "content_snippets": [
                {"name": "snippets_cta", "content": "**Assine**"},
                "texto solto"
            ]
        }));
        let html = converter().convert("# Título\n\nTexto", &document).unwrap();
        assert!(html.contains("<h1>Título</h1>"));
        assert!(html.contains(r#"data-snippet="snippets_cta""#));
        assert!(html.contains("<strong>Assine</strong>"));
        assert!(html.contains("texto solto"));
    }

    #[test]
    fn page_escapes_metadata() {
        let document = as_document(json!({"title": "<script>x</script>"}));
        let html = converter().convert("", &document).unwrap();
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn title_block_matches_article_selectors() {
        let document = as_document(json!({
            "meta_basico": {
                "title": "T", "subtitle": "S", "category": "release", "date": "1 de maio de 2026"
            }
        }));
        let page = dom::parse_html(&converter().convert("", &document).unwrap());
        assert_eq!(dom::text_of(&page, "main header h1.title").as_deref(), Some("T"));
        assert_eq!(dom::text_of(&page, "p.subtitle.lead").as_deref(), Some("S"));
        assert_eq!(dom::text_of(&page, "div.description").as_deref(), Some("release"));
        assert_eq!(dom::text_of(&page, "p.date").as_deref(), Some("1 de maio de 2026"));
    }

    // =========================================================================
    // Includes
    // =========================================================================

    #[test]
    fn includes_sorted_by_priority() {
        let document = as_document(json!({
            "includes": {
                "local_nav": {"enabled": true, "file": "localnav.html", "priority": 2},
                "footer_global": true,
                "header_global": {"file": "globalheader.html", "priority": 1},
                "article_header": {"enabled": false},
                "ignored": "yes"
            }
        }));
        let found = includes(&document);
        let positions: Vec<_> = found.iter().map(|i| i.position.as_str()).collect();
        assert_eq!(positions, vec!["header_global", "local_nav", "footer_global"]);
        assert_eq!(found[2].file, "footer_global.html");
    }

    #[test]
    fn includes_fill_placeholders() {
        let tmp = setup_fixtures();
        let components = tmp.path().join("components");
        let document = as_document(json!({
            "includes": {
                "header_global": {"file": "globalheader.html", "priority": 1},
                "local_nav": {"file": "localnav.html", "priority": 2},
                "footer_global": {"file": "nao_existe.html"},
                "sidebar": true
            }
        }));
        let page = dom::parse_html(&converter().convert("", &document).unwrap());
        let mut warnings = Warnings::new();
        let filled = apply_includes(&page, &document, &components, &mut warnings);

        assert_eq!(filled, vec!["header_global", "local_nav"]);
        let header = dom::select_first(&page, "div#globalheader").unwrap();
        assert!(dom::select_first(&header, "nav#globalnav").is_some());
        let html = dom::to_html(&page);
        assert!(html.contains("<!-- component nao_existe.html not found -->"));
        let warnings = warnings.into_vec();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.contains(&Warning::UnknownIncludePosition("sidebar".into())));
        assert!(warnings.contains(&Warning::ComponentNotFound(components.join("nao_existe.html"))));
    }

    #[test]
    fn includes_without_entries_do_nothing() {
        let page = dom::parse_html("<div id='globalheader'>x</div>");
        let mut warnings = Warnings::new();
        let filled = apply_includes(&page, &Document::new(), Path::new("/nope"), &mut warnings);
        assert!(filled.is_empty());
        assert!(warnings.is_empty());
        assert_eq!(dom::text_of(&page, "#globalheader").as_deref(), Some("x"));
    }

    // =========================================================================
    // Images
    // =========================================================================

    #[test]
    fn images_copied_and_rewritten() {
        let tmp = setup_fixtures();
        let source = tmp.path().join("artigos");
        let out = TempDir::new().unwrap();
        let page = dom::parse_html(
            r#"<img src="img/grafico.png"><img src="https://x.test/a.png"><img src="falta.png">"#,
        );
        let mut warnings = Warnings::new();
        let copied = process_images(&page, &source, out.path(), &mut warnings).unwrap();

        assert_eq!(copied, 1);
        assert!(out.path().join("src/grafico.png").is_file());
        let srcs: Vec<_> = dom::select_all(&page, "img")
            .iter()
            .filter_map(|img| dom::attribute(img, "src"))
            .collect();
        assert_eq!(srcs, vec!["src/grafico.png", "https://x.test/a.png", "falta.png"]);
        assert_eq!(
            warnings.into_vec(),
            vec![Warning::ImageNotFound(source.join("falta.png"))]
        );
    }

    // =========================================================================
    // Output paths
    // =========================================================================

    #[test]
    fn output_path_rules() {
        let tmp = TempDir::new().unwrap();
        let fallback = tmp.path().join("out");
        let input = tmp.path().join("artigo.md");
        assert_eq!(output_path(&input, None, &fallback), fallback.join("index.html"));

        let other = tmp.path().join("nota.md");
        assert_eq!(output_path(&other, None, &fallback), fallback.join("nota.html"));

        fs::create_dir(tmp.path().join("output")).unwrap();
        assert_eq!(
            output_path(&input, None, &fallback),
            tmp.path().join("output/index.html")
        );

        let explicit = tmp.path().join("x/y.html");
        assert_eq!(output_path(&input, Some(&explicit), &fallback), explicit);
    }

    // =========================================================================
    // render_file / render_batch
    // =========================================================================

    #[test]
    fn render_file_applies_elements_and_writes_page() {
        let tmp = setup_fixtures();
        let library = Library::builtin();
        let mut opts = options(&tmp.path().join("components"), &tmp.path().join("public"));
        opts.elements = vec!["navegacao/header_completo".into(), "social/twitter_simples".into()];

        let input = tmp.path().join("artigos/artigo.md");
        let report = render_file(&library, &converter(), &opts, &input, None).unwrap();

        assert_eq!(report.output, tmp.path().join("public/index.html"));
        assert_eq!(report.includes, vec!["header_global", "local_nav"]);
        assert_eq!(report.images, 1);
        let page = dom::parse_html(&fs::read_to_string(&report.output).unwrap());
        assert_eq!(meta_content(&page, r#"meta[name="twitter:card"]"#).as_deref(), Some("summary"));
        let img = dom::select_first(&page, "main img").unwrap();
        assert_eq!(dom::attribute(&img, "src").as_deref(), Some("src/grafico.png"));
        assert!(tmp.path().join("public/src/grafico.png").is_file());
    }

    #[test]
    fn render_file_runs_automations_when_enabled() {
        let tmp = setup_fixtures();
        let mut warnings = Warnings::new();
        let library = Library::load(&tmp.path().join("biblioteca_config.yaml"), &mut warnings);
        assert!(warnings.is_empty(), "{warnings:?}");
        let mut opts = options(&tmp.path().join("components"), &tmp.path().join("public"));
        opts.auto_apply = true;

        let input = tmp.path().join("artigos/artigo.md");
        let report = render_file(&library, &converter(), &opts, &input, None).unwrap();
        let page = dom::parse_html(&fs::read_to_string(&report.output).unwrap());
        assert_eq!(
            meta_content(&page, r#"meta[name="twitter:site"]"#).as_deref(),
            Some("@estatistica")
        );
    }

    #[test]
    fn render_file_missing_input_is_error() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path(), tmp.path());
        let result = render_file(
            &Library::builtin(),
            &converter(),
            &opts,
            &tmp.path().join("nada.md"),
            None,
        );
        assert!(matches!(result, Err(RenderError::InputNotFound(_))));
    }

    #[test]
    fn render_file_without_frontmatter_warns_and_renders() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("nota.md");
        fs::write(&input, "# Só corpo\n").unwrap();
        let opts = options(tmp.path(), &tmp.path().join("out"));
        let report = render_file(&Library::builtin(), &converter(), &opts, &input, None).unwrap();
        assert_eq!(report.warnings.into_vec(), vec![Warning::MissingFrontmatter]);
        assert!(fs::read_to_string(report.output).unwrap().contains("<h1>Só corpo</h1>"));
    }

    struct FailingConverter;

    impl Converter for FailingConverter {
        fn convert(&self, body: &str, _document: &Document) -> Result<String, RenderError> {
            if body.contains("falha") {
                Err(RenderError::Convert("recusado".into()))
            } else {
                Ok(format!("<p>{body}</p>"))
            }
        }
    }

    #[test]
    fn batch_continues_past_failures() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "---\ntitle: A\n---\nok").unwrap();
        fs::write(tmp.path().join("b.md"), "---\ntitle: B\n---\nfalha").unwrap();
        fs::write(tmp.path().join("c.md"), "---\ntitle: C\n---\nok").unwrap();
        fs::write(tmp.path().join("notas.txt"), "ignorado").unwrap();
        let opts = options(tmp.path(), &tmp.path().join("out"));

        let outcomes =
            render_batch(&Library::builtin(), &FailingConverter, &opts, tmp.path()).unwrap();
        let names: Vec<_> = outcomes
            .iter()
            .map(|o| o.input.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "c.md"]);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(RenderError::Convert(_))));
        assert!(outcomes[2].result.is_ok());
        assert!(tmp.path().join("out/c.html").is_file());
    }

    #[test]
    fn batch_requires_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.md");
        fs::write(&file, "x").unwrap();
        let opts = options(tmp.path(), tmp.path());
        let result = render_batch(&Library::builtin(), &converter(), &opts, &file);
        assert!(matches!(result, Err(RenderError::NotADirectory(_))));
    }
}
