//! HTML parsing support.
//!
//! Parses an HTML fragment with scraper (html5ever underneath) and converts the
//! result to the owned [`Node`] tree used by the normalizer and translator.

use scraper::node::Element;
use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;
use crate::{ConvertError, Result};

/// Parse an HTML fragment into a Node tree rooted at an `html` element.
///
/// The parser is permissive: malformed markup is repaired the way browsers do
/// and the recovered errors are only logged. The one hard failure is a parse
/// that produces no root element at all.
///
/// # Example
///
/// ```rust
/// use clipdown::parse_html;
///
/// let root = parse_html("<h1>Hello <em>World</em></h1>").unwrap();
/// assert_eq!(root.tag_name(), "html");
/// assert_eq!(root.text_content(), "Hello World");
/// ```
pub fn parse_html(html: &str) -> Result<Node> {
    let document = Html::parse_fragment(html);

    if !document.errors.is_empty() {
        tracing::debug!(
            count = document.errors.len(),
            first = %document.errors[0],
            "recovered from malformed HTML"
        );
    }

    let root = document
        .tree
        .root()
        .children()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| ConvertError::ParseFailure("document has no root element".to_string()))?;

    Ok(scraper_to_node(root))
}

/// Deepest element nesting kept in the tree. Elements below this depth are
/// dropped and their content is attached to the deepest kept ancestor.
pub const MAX_DEPTH: usize = 256;

fn element_node(element: &Element) -> Node {
    Node::element_with_attrs(element.name(), element.attrs().collect())
}

/// Convert a scraper element and its subtree to our Node structure.
///
/// Walks the tree with an explicit stack so input depth never reaches the
/// call stack.
fn scraper_to_node(element: ElementRef) -> Node {
    let mut root = element_node(element.value());
    // Elements still being filled, below `root`
    let mut open: Vec<Node> = Vec::new();
    // Remaining children per level, and whether the level owns an `open` entry
    let mut frames = vec![(false, element.children())];
    let mut flattened = 0usize;

    while let Some(frame) = frames.last_mut() {
        let owns_node = frame.0;
        let Some(child) = frame.1.next() else {
            frames.pop();
            if owns_node {
                if let Some(finished) = open.pop() {
                    open.last_mut().unwrap_or(&mut root).add_child(finished);
                }
            }
            continue;
        };

        match child.value() {
            ScraperNode::Text(text) => {
                open.last_mut()
                    .unwrap_or(&mut root)
                    .add_child(Node::text(&text.text));
            }
            ScraperNode::Element(child_element) => {
                let owns_node = open.len() + 1 < MAX_DEPTH;
                if owns_node {
                    open.push(element_node(child_element));
                } else {
                    flattened += 1;
                }
                frames.push((owns_node, child.children()));
            }
            _ => {}
        }
    }

    if flattened > 0 {
        tracing::debug!(flattened, max_depth = MAX_DEPTH, "flattened deeply nested elements");
    }
    root
}
