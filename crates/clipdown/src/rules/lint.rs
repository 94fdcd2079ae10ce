//! Override rules that keep translator output close to markdownlint defaults.
//!
//! Registered through [`Translator::use_plugin`], so they are consulted before
//! the CommonMark rules for the same elements.

use super::commonmark::code_text;
use super::{Filter, Rule};
use crate::normalize::code_block_language;
use crate::translator::Translator;
use crate::utilities::longest_run;

/// Heading level used for bold-only paragraphs
pub const BOLD_HEADING_LEVEL: usize = 3;

/// Bold-only paragraphs at or above this length stay paragraphs
pub const MAX_BOLD_HEADING_CHARS: usize = 100;

/// Register the lint overrides on a translator
pub fn lint_rules(translator: &mut Translator) {
    translator
        .add_rule("fencedCodeBlock", fenced_code_block_rule())
        .add_rule("list", list_rule())
        .add_rule("boldParagraphHeading", bold_paragraph_heading_rule());
}

/// Fence longer than any run of the fence character inside the code
fn fence_for(code: &str, fence: &str) -> String {
    let fence_char = fence.chars().next().unwrap_or('`');
    let size = fence.chars().count().max(3);
    let size = size.max(longest_run(code, fence_char) + 1);
    fence_char.to_string().repeat(size)
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::tag_where("pre", |node, _| node.element_children().any(|c| c.is("code"))),
        |node, _, options| {
            let code = code_text(node);
            let language = code_block_language(node.node).unwrap_or("");
            let fence = fence_for(&code, &options.fence);

            format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
        },
    )
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        let content = content.trim_matches('\n');
        if node.parent_tag() == Some("li") {
            format!("\n{}\n", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

/// Inner text of a short paragraph made only of one strong span
fn bold_heading_text(content: &str, delimiter: &str) -> Option<String> {
    if delimiter.is_empty() || content.chars().count() >= MAX_BOLD_HEADING_CHARS {
        return None;
    }
    let inner = content.strip_prefix(delimiter)?.strip_suffix(delimiter)?;
    let inner = inner.trim();
    if inner.is_empty() || inner.contains(delimiter) || inner.contains('\n') {
        return None;
    }
    Some(inner.to_string())
}

fn bold_paragraph_heading_rule() -> Rule {
    Rule::for_tag("p", |_, content, options| {
        let content = content.trim();
        match bold_heading_text(content, &options.strong_delimiter) {
            Some(text) => format!("\n\n{} {}\n\n", "#".repeat(BOLD_HEADING_LEVEL), text),
            None => format!("\n\n{}\n\n", content),
        }
    })
}
