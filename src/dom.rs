//! Small helpers over the `kuchikiki` HTML tree.
//!
//! [`NodeRef`] is reference-counted; detaching and re-appending a node moves
//! it between trees without copying.

use kuchikiki::traits::TendrilSink;
pub use kuchikiki::NodeRef;

/// Parse a complete HTML document.
///
/// Missing `<html>`, `<head>` and `<body>` are synthesised by the parser.
pub fn parse_html(html: &str) -> NodeRef {
    kuchikiki::parse_html().one(html)
}

/// Parse an HTML fragment into its top-level nodes, detached and in order.
///
/// The fragment is parsed as a document, so elements the parser hoists into
/// `<head>` (`<link>`, `<style>`, `<meta>`) come first.
pub fn parse_fragment(html: &str) -> Vec<NodeRef> {
    let document = parse_html(html);
    let mut nodes = Vec::new();
    for container in ["head", "body"] {
        if let Ok(parent) = document.select_first(container) {
            nodes.extend(parent.as_node().children());
        }
    }
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// First element matching `selector`, if any.
pub fn select_first(root: &NodeRef, selector: &str) -> Option<NodeRef> {
    root.select_first(selector)
        .ok()
        .map(|found| found.as_node().clone())
}

/// Every element matching `selector`, collected up front so the caller may
/// mutate the tree while iterating.
pub fn select_all(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    root.select(selector)
        .map(|found| found.map(|n| n.as_node().clone()).collect())
        .unwrap_or_default()
}

/// Element children of `node`, skipping text and comments.
pub fn element_children(node: &NodeRef) -> Vec<NodeRef> {
    node.children()
        .filter(|child| child.as_element().is_some())
        .collect()
}

pub fn clear_children(node: &NodeRef) {
    while let Some(child) = node.first_child() {
        child.detach();
    }
}

/// Replace the contents of `node` with a single text node.
pub fn set_text(node: &NodeRef, text: &str) {
    clear_children(node);
    node.append(NodeRef::new_text(text));
}

/// Trimmed text content of the first match, if present.
pub fn text_of(root: &NodeRef, selector: &str) -> Option<String> {
    select_first(root, selector).map(|node| node.text_contents().trim().to_string())
}

pub fn attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
}

pub fn set_attribute(node: &NodeRef, name: &str, value: &str) {
    if let Some(element) = node.as_element() {
        element
            .attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attribute(node, "class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

/// Serialize a node (or a whole document) back to HTML.
pub fn to_html(node: &NodeRef) -> String {
    node.to_string()
}
