//! YAML frontmatter codec.
//!
//! A Markdown file may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! meta_basico:
//!   title: "Novo Keynote"
//! ---
//! # Corpo do artigo
//! ```
//!
//! The block becomes a [`Document`]; the rest of the file is the body.

use crate::element::Document;
use crate::warning::{Warning, Warnings};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("frontmatter is not a mapping")]
    NotAMapping,
}

/// Split `content` into the raw YAML block and the body.
///
/// Returns `None` when the content does not open with a `---` line or the
/// block is never closed.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(FENCE)?;
    let newline = rest.find('\n')?;
    if !rest[..newline].trim().is_empty() {
        return None;
    }
    let rest = &rest[newline + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Strict parse: `Ok(None)` when there is no frontmatter block.
pub fn try_parse(content: &str) -> Result<Option<(Document, &str)>, FrontmatterError> {
    let Some((yaml, body)) = split(content) else {
        return Ok(None);
    };
    let document = match serde_yaml::from_str::<Option<Value>>(yaml)? {
        None => Document::new(),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(FrontmatterError::NotAMapping),
    };
    Ok(Some((document, body)))
}

/// Lenient parse used by the renderer and the CLI.
///
/// A missing or unreadable block is a warning; the whole content is then
/// treated as body and the document starts empty.
pub fn parse<'a>(content: &'a str, warnings: &mut Warnings) -> (Document, &'a str) {
    match try_parse(content) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            warnings.push(Warning::MissingFrontmatter);
            (Document::new(), content)
        }
        Err(e) => {
            warnings.push(Warning::InvalidFrontmatter(e.to_string()));
            (Document::new(), content)
        }
    }
}

/// Serialize `document` back in front of `body`.
///
/// An empty document produces the body alone.
pub fn join(document: &Document, body: &str) -> Result<String, FrontmatterError> {
    if document.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(document)?;
    Ok(format!("{FENCE}\n{yaml}{FENCE}\n{body}"))
}

/// Read a Markdown file whose frontmatter is about to be rewritten.
///
/// A file without a block is a warning and starts from an empty document.
/// A block that is present but does not parse is an error: the file must
/// not be written back with a second block stacked on the broken one.
pub fn read_file(path: &Path, warnings: &mut Warnings) -> Result<(Document, String), FrontmatterError> {
    let content = fs::read_to_string(path)?;
    let parsed = try_parse(&content)?.map(|(document, body)| (document, body.to_string()));
    match parsed {
        Some(parsed) => Ok(parsed),
        None => {
            warnings.push(Warning::MissingFrontmatter);
            Ok((Document::new(), content))
        }
    }
}
