//! CommonMark rules for HTML to Markdown conversion.

use super::{Filter, Rule};
use crate::node::{Node, NodeRef};
use crate::translator::{CodeBlockStyle, HeadingStyle};
use crate::utilities::{clean_attribute, is_block, longest_run};

/// Indentation applied to continuation lines of a list item
pub const LIST_ITEM_INDENT: &str = "  ";

/// Create all CommonMark rules
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        indented_code_block_rule(),
        fenced_code_block_rule(),
        horizontal_rule(),
        inline_link_rule(),
        emphasis_rule(),
        strong_rule(),
        code_rule(),
        image_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |node, _, options| {
        if ends_block(node) {
            String::new()
        } else {
            format!("{}\n", options.br)
        }
    })
}

/// A break followed only by more breaks or whitespace inside a block
fn ends_block(node: &NodeRef) -> bool {
    let is_blank = |sibling: &Node| {
        sibling.is("br") || (sibling.is_text() && sibling.text_content().trim().is_empty())
    };
    node.parent().is_some_and(|parent| is_block(parent.tag_name()))
        && node.next_siblings().all(is_blank)
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, options| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

        let content = content.trim().replace('\n', " ");
        if content.is_empty() {
            return String::new();
        }

        match options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!(
                    "\n\n{}\n{}\n\n",
                    content,
                    underline.repeat(content.chars().count())
                )
            }
            _ => format!("\n\n{} {}\n\n", "#".repeat(level), content),
        }
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim_matches('\n');
        if content.trim().is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        let is_last_in_item = node.parent_tag() == Some("li")
            && node
                .parent()
                .and_then(|p| p.element_children().last())
                .is_some_and(|last| std::ptr::eq(last, node.node));

        if is_last_in_item {
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let prefix = match node.parent() {
            Some(parent) if parent.is("ol") => {
                let start: usize = parent
                    .attr("start")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(1);
                format!("{}. ", start + node.element_index())
            }
            _ => format!("{} ", options.bullet_list_marker),
        };

        let body = content.trim_start_matches('\n').trim_end();
        let mut item = String::with_capacity(prefix.len() + body.len() + 8);
        item.push_str(&prefix);
        for (i, line) in body.split('\n').enumerate() {
            if i > 0 {
                item.push('\n');
                if !line.trim().is_empty() {
                    item.push_str(LIST_ITEM_INDENT);
                }
            }
            item.push_str(line);
        }
        item.push('\n');
        item
    })
}

fn has_code_child(node: &NodeRef) -> bool {
    node.element_children().any(|c| c.is("code"))
}

/// Text of every `code` child of a `pre`, joined by newlines
pub(crate) fn code_text(pre: &NodeRef) -> String {
    pre.element_children()
        .filter(|c| c.is("code"))
        .map(|code| code.text_content().trim_end_matches('\n').to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        Filter::tag_where("pre", |node, options| {
            has_code_child(node) && options.code_block_style == CodeBlockStyle::Indented
        }),
        |node, _, _| {
            let code = node.text_content();
            let indented: Vec<String> = code
                .trim_end_matches('\n')
                .lines()
                .map(|line| format!("    {}", line))
                .collect();
            format!("\n\n{}\n\n", indented.join("\n"))
        },
    )
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::tag_where("pre", |node, options| {
            has_code_child(node) && options.code_block_style == CodeBlockStyle::Fenced
        }),
        |node, _, options| {
            let language = node
                .element_children()
                .filter(|c| c.is("code"))
                .find_map(|code| code.classes().find_map(|c| c.strip_prefix("language-")))
                .unwrap_or("");

            format!(
                "\n\n{fence}{}\n{}\n{fence}\n\n",
                language,
                code_text(node),
                fence = options.fence
            )
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::tag_where("a", |node, _| node.attr("href").is_some()),
        |node, content, _| {
            let href = clean_attribute(node.attr("href"));
            let title = clean_attribute(node.attr("title"));

            if href.is_empty() {
                return content.to_string();
            }

            let title_part = if title.is_empty() {
                String::new()
            } else {
                format!(" \"{}\"", title.replace('"', "\\\""))
            };

            format!("[{}]({}{})", content.trim(), href.replace(' ', "%20"), title_part)
        },
    )
}

/// Wrap content in a delimiter, keeping flanking whitespace outside of it
fn delimit(content: &str, delimiter: &str) -> String {
    let inner = content.trim();
    if inner.is_empty() {
        return String::new();
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    let leading = if leading.is_empty() { "" } else { " " };
    let trailing = if trailing.is_empty() { "" } else { " " };
    format!("{leading}{delimiter}{inner}{delimiter}{trailing}")
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        delimit(content, &options.em_delimiter.to_string())
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, options| {
        delimit(content, &options.strong_delimiter)
    })
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::tag_where("code", |node, _| node.parent_tag() != Some("pre")),
        |node, _, _| {
            let content = node.text_content().replace(['\r', '\n'], " ");
            if content.is_empty() {
                return String::new();
            }

            let backticks = "`".repeat(longest_run(&content, '`') + 1);
            let space = if content.starts_with('`') || content.ends_with('`') {
                " "
            } else {
                ""
            };

            format!("{backticks}{space}{content}{space}{backticks}")
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.attr("alt"));
        let src = clean_attribute(node.attr("src"));
        let title = clean_attribute(node.attr("title"));

        if src.is_empty() {
            return String::new();
        }

        let title_part = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title.replace('"', "\\\""))
        };

        format!("![{}]({}{})", alt, src, title_part)
    })
}
