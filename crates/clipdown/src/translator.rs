//! Translator - turns a normalized node tree into raw Markdown.

use crate::html::parse_html;
use crate::node::{Node, NodeRef};
use crate::rules::{lint_rules, Filter, Rule, Rules};
use crate::utilities::{collapse_whitespace, escape_markdown, is_block, join};
use crate::Result;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    Setext,
    /// Use ATX-style headings (prefixed with #)
    #[default]
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    Indented,
    /// Use fenced code blocks (```)
    #[default]
    Fenced,
}

/// Options for the Translator
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Heading style (setext or atx)
    pub heading_style: HeadingStyle,

    /// Thematic break string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Marker placed before the newline of a hard line break
    pub br: String,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "---".to_string(),
            bullet_list_marker: '-',
            code_block_style: CodeBlockStyle::Fenced,
            fence: "```".to_string(),
            em_delimiter: '*',
            strong_delimiter: "**".to_string(),
            br: "\\".to_string(),
        }
    }
}

/// Elements dropped together with their content by [`Translator::standard`]
const REMOVED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Converts node trees to Markdown by applying rules bottom-up
pub struct Translator {
    options: TranslatorOptions,
    rules: Rules,
}

impl Translator {
    /// Create a Translator with default options and the CommonMark rules only
    pub fn new() -> Self {
        Self::with_options(TranslatorOptions::default())
    }

    /// Create a Translator with custom options
    pub fn with_options(options: TranslatorOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Translator used by the conversion pipeline: default options, lint
    /// overrides, and non-content elements removed.
    pub fn standard() -> Self {
        let mut translator = Self::new();
        translator
            .use_plugin(lint_rules)
            .remove(Filter::tags(REMOVED_ELEMENTS));
        translator
    }

    /// Translate a node tree to raw Markdown
    pub fn translate(&self, root: &Node) -> Result<String> {
        let output = self.replacement_for_node(NodeRef::new(root));
        Ok(output
            .trim_start_matches(['\t', '\r', '\n'])
            .trim_end()
            .to_string())
    }

    /// Parse an HTML fragment and translate it as is (no normalization)
    pub fn translate_html(&self, html: &str) -> Result<String> {
        let root = parse_html(html)?;
        self.translate(&root)
    }

    /// Add an override rule, checked before the CommonMark rules
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Remove elements matching the filter, content included
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Get the current options
    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Get the registered rules
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Convert the children of a node and join their output
    fn process(&self, parent: NodeRef) -> String {
        let mut output = String::new();

        for (index, child) in parent.node.children.iter().enumerate() {
            let replacement = if child.is_text() {
                text_replacement(parent.node, index)
            } else {
                self.replacement_for_node(NodeRef::with_parent(child, parent.node))
            };
            join(&mut output, &replacement);
        }

        output
    }

    /// Convert a single element
    fn replacement_for_node(&self, node: NodeRef) -> String {
        if self.rules.should_remove(&node, &self.options) {
            return String::new();
        }

        let content = self.process(node);

        match self.rules.for_node(&node, &self.options) {
            Some(rule) => rule.replace(&node, &content, &self.options),
            None if is_block(node.tag_name()) => format!("\n\n{}\n\n", content),
            None => content,
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a sibling position sits on a block boundary
fn is_boundary(parent: &Node, sibling: Option<&Node>) -> bool {
    match sibling {
        None => is_block(parent.tag_name()),
        Some(node) if node.is_element() => is_block(node.tag_name()) || node.is("br"),
        Some(_) => false,
    }
}

/// Markdown for the text child at `index`: collapsed, trimmed at block
/// boundaries, escaped.
fn text_replacement(parent: &Node, index: usize) -> String {
    let raw = parent.children[index].node_value.as_deref().unwrap_or("");
    let mut text = collapse_whitespace(raw);

    let previous = index.checked_sub(1).and_then(|i| parent.children.get(i));
    let next = parent.children.get(index + 1);

    if is_boundary(parent, previous) {
        text = text.trim_start().to_string();
    }
    if is_boundary(parent, next) {
        text = text.trim_end().to_string();
    }

    escape_markdown(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(html: &str) -> String {
        Translator::new().translate_html(html).unwrap()
    }

    fn translate_standard(html: &str) -> String {
        Translator::standard().translate_html(html).unwrap()
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(translate("<p>Hello World</p>"), "Hello World");
    }

    #[test]
    fn test_paragraphs_separated_by_one_blank_line() {
        assert_eq!(translate("<p>One</p>\n\n<p>Two</p>"), "One\n\nTwo");
    }

    #[test]
    fn test_heading_atx() {
        assert_eq!(translate("<h2>Title</h2>"), "## Title");
    }

    #[test]
    fn test_heading_setext() {
        let options = TranslatorOptions {
            heading_style: HeadingStyle::Setext,
            ..Default::default()
        };
        let result = Translator::with_options(options)
            .translate_html("<h1>Title</h1>")
            .unwrap();
        assert_eq!(result, "Title\n=====");
    }

    #[test]
    fn test_heading_numeral_is_escaped() {
        assert_eq!(translate("<h2>1. Intro</h2>"), "## 1\\. Intro");
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(translate("<em>emphasized</em>"), "*emphasized*");
        assert_eq!(translate("<p>Hello <strong>World</strong></p>"), "Hello **World**");
        assert_eq!(translate("<p>a<b> bold </b>b</p>"), "a **bold** b");
        assert_eq!(translate("<p>a<b> </b>b</p>"), "ab");
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(
            translate(r#"<a href="https://example.com" title="Ex">Link</a>"#),
            "[Link](https://example.com \"Ex\")"
        );
        assert_eq!(translate("<a>plain</a>"), "plain");
    }

    #[test]
    fn test_image() {
        assert_eq!(translate(r#"<img src="test.png" alt="Alt">"#), "![Alt](test.png)");
        assert_eq!(translate(r#"<img alt="Alt">"#), "");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(translate("<p>Run <code>cargo test</code></p>"), "Run `cargo test`");
        assert_eq!(translate("<code>a`b</code>"), "``a`b``");
        assert_eq!(translate("<code>`tick</code>"), "`` `tick ``");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(translate("<p>one<br>two</p>"), "one\\\ntwo");
    }

    #[test]
    fn test_break_at_block_end_is_dropped() {
        assert_eq!(translate("<p>line<br></p>"), "line");
        assert_eq!(translate("<div>line<br><br>\n</div>"), "line");
        assert_eq!(translate("<p>a<br><span>b</span></p>"), "a\\\nb");
    }

    #[test]
    fn test_code_children_are_joined() {
        assert_eq!(
            translate(r#"<pre><code class="language-sh">one</code><code>two</code></pre>"#),
            "```sh\none\ntwo\n```"
        );
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(translate("<p>a</p><hr><p>b</p>"), "a\n\n---\n\nb");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            translate("<blockquote><p>One</p><p>Two</p></blockquote>"),
            "> One\n>\n> Two"
        );
    }

    #[test]
    fn test_fenced_code_block_default_rule() {
        assert_eq!(
            translate(r#"<pre><code class="language-rust">let x = 1;</code></pre>"#),
            "```rust\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_indented_code_block() {
        let options = TranslatorOptions {
            code_block_style: CodeBlockStyle::Indented,
            ..Default::default()
        };
        let result = Translator::with_options(options)
            .translate_html("<pre><code>fn main() {}</code></pre>")
            .unwrap();
        assert_eq!(result, "    fn main() {}");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            translate("<ul>\n  <li>One</li>\n  <li>Two</li>\n</ul>"),
            "- One\n- Two"
        );
    }

    #[test]
    fn test_ordered_list_numbers_from_start() {
        assert_eq!(
            translate(r#"<ol start="3"><li>Three</li><li>Four</li></ol>"#),
            "3. Three\n4. Four"
        );
    }

    #[test]
    fn test_nested_list_uses_two_space_indent() {
        assert_eq!(
            translate("<ul><li>One<ul><li>A</li><li>B</li></ul></li><li>Two</li></ul>"),
            "- One\n  - A\n  - B\n- Two"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(translate("<p>snake_case and *stars*</p>"), "snake\\_case and \\*stars\\*");
        assert_eq!(translate("<p>- not a list</p>"), "\\- not a list");
    }

    #[test]
    fn test_block_containers_separate_content() {
        assert_eq!(translate("<div>a</div><div>b</div>"), "a\n\nb");
        assert_eq!(translate("<span>a</span> <span>b</span>"), "a b");
    }

    #[test]
    fn test_standard_removes_scripts() {
        assert_eq!(
            translate_standard("<p>Shown</p><script>alert(1)</script><style>p{}</style>"),
            "Shown"
        );
    }

    #[test]
    fn test_standard_promotes_bold_paragraph() {
        assert_eq!(
            translate_standard("<p><strong>Section Title</strong></p><p>Body</p>"),
            "### Section Title\n\nBody"
        );
        assert_eq!(
            translate_standard("<p><strong>Note:</strong> details</p>"),
            "**Note:** details"
        );
    }

    #[test]
    fn test_standard_fenced_block_uses_annotation() {
        assert_eq!(
            translate_standard(r#"<pre class="lang-go"><code>fmt.Println()</code></pre>"#),
            "```go\nfmt.Println()\n```"
        );
        assert_eq!(
            translate_standard("<pre><code>```\ninner\n```</code></pre>"),
            "````\n```\ninner\n```\n````"
        );
    }

    #[test]
    fn test_standard_nested_list_is_tight() {
        assert_eq!(
            translate_standard("<ol><li>One<ul><li>A</li></ul></li><li>Two</li></ol>"),
            "1. One\n  - A\n2. Two"
        );
    }

    #[test]
    fn test_standard_registers_overrides_in_order() {
        let translator = Translator::standard();
        let keys: Vec<_> = translator.rules().override_keys().collect();
        assert_eq!(keys, ["fencedCodeBlock", "list", "boldParagraphHeading"]);
    }
}
