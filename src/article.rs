//! Article post-processing.
//!
//! Takes a rendered article page (the stock converter's output or a
//! Quarto-style page) and pours it into the newsroom article template:
//!
//! ```text
//! rendered page                        template body.html
//! ─────────────                        ──────────────────
//! main > header h1.title          ──►  h1.hero-headline
//!        header p.subtitle.lead   ──►  div.article-subhead div.component-content
//!        header div.description   ──►  span.category-eyebrow-category
//!        header p.date            ──►  span.category-eyebrow-date
//! main > (everything but header)  ──►  article.article (after div.article-header)
//! ```
//!
//! The result is written as `<output>/index.html`; `img/` and `src/`
//! directories next to the input are copied along.

use crate::dom::{self, NodeRef};
use crate::warning::{Warning, Warnings};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),
}

/// Header fields read from a rendered page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleHeader {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// What one post-processing run produced.
#[derive(Debug)]
pub struct ArticleReport {
    pub output: PathBuf,
    pub header: ArticleHeader,
    pub figures_fixed: usize,
    pub assets_copied: usize,
    pub warnings: Warnings,
}

/// Lower-case a category label, spelling out the known short forms.
pub fn normalize_category(raw: &str) -> String {
    let category = raw.trim().to_lowercase();
    match category.as_str() {
        "quickread" => "QUICK READ".to_string(),
        "release" => "RELEASE".to_string(),
        "update" => "UPDATE".to_string(),
        _ => category,
    }
}

pub fn extract_header(page: &NodeRef) -> ArticleHeader {
    let text = |selector| dom::text_of(page, selector).filter(|t| !t.is_empty());
    ArticleHeader {
        title: text("h1.title"),
        subtitle: text("p.subtitle.lead"),
        category: text("div.description").map(|c| normalize_category(&c)),
        date: text("p.date"),
    }
}

/// Lift images out of the paragraph wrapping them inside `figure.figure`,
/// placing each right before its `figcaption`.
///
/// Returns the number of figures rewritten.
pub fn fix_figcaptions(root: &NodeRef) -> usize {
    let mut fixed = 0;
    for figure in dom::select_all(root, "figure.figure") {
        let (Some(paragraph), Some(caption)) = (
            dom::select_first(&figure, "p"),
            dom::select_first(&figure, "figcaption"),
        ) else {
            continue;
        };
        let Some(img) = dom::select_first(&paragraph, "img") else {
            continue;
        };
        img.detach();
        paragraph.detach();
        caption.insert_before(img);
        fixed += 1;
    }
    fixed
}

/// Element children of the page's `<main>`, its `<header>` removed.
///
/// `None` when the page has no `<main>`.
pub fn main_without_header(page: &NodeRef) -> Option<Vec<NodeRef>> {
    let main = dom::select_first(page, "main")?;
    if let Some(header) = dom::select_first(&main, "header") {
        header.detach();
    }
    Some(dom::element_children(&main))
}

/// Write the header into the template and replace the article body with
/// `content`, keeping only `div.article-header`.
pub fn fill_template(
    template: &NodeRef,
    header: &ArticleHeader,
    content: Vec<NodeRef>,
    warnings: &mut Warnings,
) {
    let slots = [
        ("span.category-eyebrow-category", &header.category),
        ("span.category-eyebrow-date", &header.date),
        ("h1.hero-headline", &header.title),
        ("div.article-subhead div.component-content", &header.subtitle),
    ];
    for (selector, value) in slots {
        match dom::select_first(template, selector) {
            Some(slot) => dom::set_text(&slot, value.as_deref().unwrap_or("")),
            None => warnings.push(Warning::TemplateSlotMissing(selector.to_string())),
        }
    }

    let Some(article) = dom::select_first(template, "article.article") else {
        warnings.push(Warning::TemplateSlotMissing("article.article".to_string()));
        return;
    };
    let stale: Vec<NodeRef> = article
        .children()
        .filter(|child| {
            !(dom::tag_name(child).as_deref() == Some("div") && dom::has_class(child, "article-header"))
        })
        .collect();
    for node in stale {
        node.detach();
    }
    for node in content {
        article.append(node);
    }
}

/// Copy a directory tree into `target`, overwriting files that exist.
///
/// Returns the number of files copied.
pub fn copy_tree(source: &Path, target: &Path) -> Result<usize, ArticleError> {
    let mut copied = 0;
    for entry in WalkDir::new(source)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &destination)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Post-process `input` into `<output_dir>/index.html` using `template`.
pub fn post_process(
    input: &Path,
    output_dir: &Path,
    template: &Path,
) -> Result<ArticleReport, ArticleError> {
    if !input.is_file() {
        return Err(ArticleError::InputNotFound(input.to_path_buf()));
    }
    if !template.is_file() {
        return Err(ArticleError::TemplateNotFound(template.to_path_buf()));
    }
    let mut warnings = Warnings::new();

    let page = dom::parse_html(&fs::read_to_string(input)?);
    let header = extract_header(&page);
    let figures_fixed = fix_figcaptions(&page);
    let content = main_without_header(&page).unwrap_or_else(|| {
        warnings.push(Warning::ArticleMainMissing);
        Vec::new()
    });

    let document = dom::parse_html(&fs::read_to_string(template)?);
    fill_template(&document, &header, content, &mut warnings);

    fs::create_dir_all(output_dir)?;
    let output = output_dir.join("index.html");
    fs::write(&output, dom::to_html(&document))?;

    let mut assets_copied = 0;
    let input_dir = input.parent().unwrap_or(Path::new("."));
    for assets in ["img", "src"] {
        let source = input_dir.join(assets);
        if source.is_dir() {
            assets_copied += copy_tree(&source, &output_dir.join(assets))?;
        }
    }
    tracing::info!("article {} → {}", input.display(), output.display());

    Ok(ArticleReport {
        output,
        header,
        figures_fixed,
        assets_copied,
        warnings,
    })
}
