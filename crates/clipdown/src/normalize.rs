//! Tree normalization run before translation.
//!
//! [`normalize`] mutates the parsed tree in place. Its passes run in a fixed
//! order: list paragraphs are unwrapped first, then code blocks are trimmed
//! and tagged with a language.

use crate::language::detect_language;
use crate::node::Node;

/// Class prefixes recognised as a language annotation
const LANGUAGE_CLASS_PREFIXES: &[&str] = &["language-", "lang-"];

/// Bring a parsed tree into the canonical form the translator expects.
pub fn normalize(root: &mut Node) {
    unwrap_list_paragraphs(root);
    tag_code_blocks(root);
}

/// Replace every `p` directly inside an `li` with the paragraph's children.
///
/// Without this the translator renders such items as loose list items. When
/// an item holds several paragraphs a `br` keeps their text on separate lines.
pub fn unwrap_list_paragraphs(node: &mut Node) {
    for child in node.children.iter_mut() {
        unwrap_list_paragraphs(child);
    }

    if !node.is("li") || !node.children.iter().any(|c| c.is("p")) {
        return;
    }

    let children = std::mem::take(&mut node.children);
    let mut previous_was_paragraph = false;
    for child in children {
        if child.is("p") {
            if previous_was_paragraph {
                node.children.push(Node::element("br"));
            }
            node.children.extend(child.children);
            previous_was_paragraph = true;
        } else {
            if child.is_element() || !child.text_content().trim().is_empty() {
                previous_was_paragraph = false;
            }
            node.children.push(child);
        }
    }
}

/// Trim every `pre > code` block and make sure it carries a language class.
///
/// A `pre` without a `code` child gets its content wrapped in one first.
/// Annotations already present on the `code` or its `pre` are kept as they are.
pub fn tag_code_blocks(node: &mut Node) {
    if node.is("pre") {
        wrap_bare_pre(node);

        let container_language = language_annotation(node).map(str::to_string);
        for code in node.children.iter_mut().filter(|c| c.is("code")) {
            let trimmed = code.text_content().trim().to_string();
            code.set_text(&trimmed);

            if container_language.is_none() && language_annotation(code).is_none() {
                let language = detect_language(&trimmed);
                tracing::trace!(language, "tagged code block");
                code.add_class(&format!("language-{}", language));
            }
        }
        return;
    }

    for child in node.children.iter_mut() {
        tag_code_blocks(child);
    }
}

fn wrap_bare_pre(pre: &mut Node) {
    if pre.children.iter().any(|c| c.is("code")) {
        return;
    }
    let mut code = Node::element("code");
    code.children = std::mem::take(&mut pre.children);
    pre.add_child(code);
}

/// Language annotation carried by an element itself, if any.
///
/// Looks at `language-*` / `lang-*` classes, then `data-language`.
pub fn language_annotation(node: &Node) -> Option<&str> {
    node.classes()
        .find_map(|class| {
            LANGUAGE_CLASS_PREFIXES
                .iter()
                .find_map(|prefix| class.strip_prefix(prefix))
        })
        .filter(|language| !language.is_empty())
        .or_else(|| node.attr("data-language").map(str::trim).filter(|l| !l.is_empty()))
}

/// Language for a `pre` block: the first annotated `code` wins over the
/// container's own annotation.
pub fn code_block_language(pre: &Node) -> Option<&str> {
    pre.element_children()
        .filter(|c| c.is("code"))
        .find_map(language_annotation)
        .or_else(|| language_annotation(pre))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    fn first_element(node: &Node) -> &Node {
        node.element_children().next().unwrap()
    }

    #[test]
    fn test_unwrap_single_paragraph() {
        let mut root = parse_html("<ul><li><p>One</p></li><li><p>Two <em>2</em></p></li></ul>")
            .unwrap();
        unwrap_list_paragraphs(&mut root);

        let ul = first_element(&root);
        for li in ul.element_children() {
            assert!(li.children.iter().all(|c| !c.is("p")));
        }
        let second = ul.element_children().nth(1).unwrap();
        assert_eq!(second.children.len(), 2);
        assert!(second.children[1].is("em"));
    }

    #[test]
    fn test_unwrap_separates_consecutive_paragraphs() {
        let mut root = parse_html("<ol><li><p>First</p><p>Second</p></li></ol>").unwrap();
        unwrap_list_paragraphs(&mut root);

        let li = first_element(first_element(&root));
        let tags: Vec<_> = li.children.iter().map(|c| c.tag_name()).collect();
        assert_eq!(tags, ["#text", "br", "#text"]);
    }

    #[test]
    fn test_unwrap_ignores_paragraphs_outside_lists() {
        let mut root = parse_html("<div><p>Keep</p></div>").unwrap();
        unwrap_list_paragraphs(&mut root);
        assert!(first_element(first_element(&root)).is("p"));
    }

    #[test]
    fn test_unwrap_nested_items() {
        let mut root =
            parse_html("<ul><li><p>Outer</p><ul><li><p>Inner</p></li></ul></li></ul>").unwrap();
        unwrap_list_paragraphs(&mut root);

        let outer = first_element(first_element(&root));
        assert!(outer.children[0].is_text());
        let inner = first_element(&outer.children[1]);
        assert!(inner.children[0].is_text());
    }

    #[test]
    fn test_tag_trims_and_detects() {
        let mut root = parse_html("<pre><code>\n\ngit status\n\n</code></pre>").unwrap();
        tag_code_blocks(&mut root);

        let code = first_element(first_element(&root));
        assert_eq!(code.text_content(), "git status");
        assert_eq!(code.attr("class"), Some("language-shell"));
    }

    #[test]
    fn test_tag_keeps_existing_annotation() {
        let mut root =
            parse_html(r#"<pre><code class="hljs language-rust">let x = 1;</code></pre>"#)
                .unwrap();
        tag_code_blocks(&mut root);

        let code = first_element(first_element(&root));
        assert_eq!(code.attr("class"), Some("hljs language-rust"));
    }

    #[test]
    fn test_tag_respects_container_annotation() {
        let mut root =
            parse_html(r#"<pre class="lang-go"><code>fmt.Println("hi")</code></pre>"#).unwrap();
        tag_code_blocks(&mut root);

        let pre = first_element(&root);
        assert_eq!(first_element(pre).attr("class"), None);
        assert_eq!(code_block_language(pre), Some("go"));
    }

    #[test]
    fn test_tag_empty_code_as_text() {
        let mut root = parse_html("<pre><code>   \n </code></pre>").unwrap();
        tag_code_blocks(&mut root);

        let code = first_element(first_element(&root));
        assert_eq!(code.text_content(), "");
        assert_eq!(language_annotation(code), Some("text"));
    }

    #[test]
    fn test_tag_wraps_bare_pre() {
        let mut root = parse_html("<pre>{\"a\": 1}</pre>").unwrap();
        tag_code_blocks(&mut root);

        let pre = first_element(&root);
        let code = first_element(pre);
        assert!(code.is("code"));
        assert_eq!(code_block_language(pre), Some("json"));
    }

    #[test]
    fn test_first_annotated_code_sets_block_language() {
        let pre = Node::element("pre")
            .with_child(Node::element("code").with_child(Node::text("a")))
            .with_child(
                Node::element_with_attrs("code", vec![("class", "language-sql")])
                    .with_child(Node::text("b")),
            );
        assert_eq!(code_block_language(&pre), Some("sql"));
    }

    #[test]
    fn test_data_language_annotation() {
        let code = Node::element_with_attrs("code", vec![("data-language", "ts")]);
        assert_eq!(language_annotation(&code), Some("ts"));
    }

    #[test]
    fn test_normalize_runs_both_passes() {
        let mut root =
            parse_html("<ul><li><p>Run</p><pre><code>npm test</code></pre></li></ul>").unwrap();
        normalize(&mut root);

        let li = first_element(first_element(&root));
        assert!(li.children[0].is_text());
        let pre = &li.children[1];
        assert_eq!(code_block_language(pre), Some("shell"));
    }
}
