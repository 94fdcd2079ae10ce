//! End-to-end conversion scenarios
//!
//! Each test feeds a selection-sized HTML fragment through `clipdown::convert`
//! and checks the exact Markdown that comes out.

use clipdown::{convert, detect_language, post_process};

fn fence(language: &str, code: &str) -> String {
    format!("```{language}\n{code}\n```\n")
}

#[test]
fn test_bold_paragraph_becomes_heading() {
    assert_eq!(
        convert("<p><strong>Section Title</strong></p>").unwrap(),
        "### Section Title\n"
    );
    assert_eq!(
        convert("<p><b>Usage</b></p><p>Call it.</p>").unwrap(),
        "### Usage\n\nCall it.\n"
    );
}

#[test]
fn test_ordered_list_markers_are_all_one() {
    assert_eq!(
        convert("<ol><li>a</li><li>b</li><li>c</li></ol>").unwrap(),
        "1. a\n1. b\n1. c\n"
    );
    assert_eq!(
        convert(r#"<ol start="7"><li>a</li><li>b</li></ol>"#).unwrap(),
        "1. a\n1. b\n"
    );
    assert_eq!(post_process("1. a\n2. b\n3. c"), "1. a\n1. b\n1. c\n");
    assert_eq!(post_process("1. a\n1. b\n1. c"), "1. a\n1. b\n1. c\n");
}

#[test]
fn test_wrapped_list_paragraphs_stay_tight() {
    assert_eq!(
        convert("<ul><li><p>One</p></li><li><p>Two</p></li></ul>").unwrap(),
        "- One\n- Two\n"
    );
}

#[test]
fn test_item_with_two_paragraphs_uses_hard_break() {
    assert_eq!(
        convert("<ul><li><p>First</p><p>Second</p></li></ul>").unwrap(),
        "- First\\\n  Second\n"
    );
}

#[test]
fn test_nested_list_is_reindented() {
    assert_eq!(
        convert("<ul><li>One<ul><li>A</li></ul></li><li>Two</li></ul>").unwrap(),
        "- One\n    - A\n- Two\n"
    );
    assert_eq!(
        convert("<ol><li>One<ol><li>A</li><li>B</li></ol></li></ol>").unwrap(),
        "1. One\n    1. A\n    1. B\n"
    );
}

#[test]
fn test_language_inference() {
    assert_eq!(detect_language("const x = 1;\nconsole.log(x);"), "javascript");
    assert_eq!(detect_language("git status"), "shell");
    assert_eq!(detect_language(r#"{"a":1}"#), "json");

    assert_eq!(
        convert("<pre><code>const x = 1;\nconsole.log(x);</code></pre>").unwrap(),
        fence("javascript", "const x = 1;\nconsole.log(x);")
    );
    assert_eq!(
        convert("<pre><code>git status</code></pre>").unwrap(),
        fence("shell", "git status")
    );
    assert_eq!(
        convert(r#"<pre><code>{"a":1}</code></pre>"#).unwrap(),
        fence("json", r#"{"a":1}"#)
    );
    assert_eq!(
        convert("<pre><code>&lt;div&gt;hi&lt;/div&gt;</code></pre>").unwrap(),
        fence("html", "<div>hi</div>")
    );
}

#[test]
fn test_existing_language_is_kept() {
    assert_eq!(
        convert(r#"<pre><code class="language-rust">fn main() {}</code></pre>"#).unwrap(),
        fence("rust", "fn main() {}")
    );
    assert_eq!(
        convert(r#"<pre data-language="toml"><code>[package]</code></pre>"#).unwrap(),
        fence("toml", "[package]")
    );
}

#[test]
fn test_code_is_trimmed_and_not_escaped() {
    assert_eq!(
        convert("<pre><code>\n\n$ echo *_*\n\n</code></pre>").unwrap(),
        fence("shell", "$ echo *_*")
    );
}

#[test]
fn test_bare_pre_gets_a_fence() {
    assert_eq!(
        convert("<pre>npm run build</pre>").unwrap(),
        fence("shell", "npm run build")
    );
}

#[test]
fn test_code_blocks_are_padded() {
    assert_eq!(
        convert("<p>Install:</p><pre><code>cargo build</code></pre><p>Then run it.</p>")
            .unwrap(),
        "Install:\n\n```shell\ncargo build\n```\n\nThen run it.\n"
    );
}

#[test]
fn test_inline_formatting() {
    assert_eq!(
        convert(r#"<p>See <a href="https://example.com">the <em>docs</em></a> or run <code>make</code>.</p>"#)
            .unwrap(),
        "See [the *docs*](https://example.com) or run `make`.\n"
    );
}

#[test]
fn test_non_content_elements_are_dropped() {
    assert_eq!(
        convert("<p>Kept</p><script>alert(1)</script><style>p { color: red }</style>").unwrap(),
        "Kept\n"
    );
}

#[test]
fn test_trailing_form() {
    let samples = [
        "",
        "<p>text</p>",
        "<p>a</p>\n\n\n<p>b</p>\n\n",
        "<pre><code>x  \n</code></pre>",
        "<ul><li>one</li></ul>",
    ];
    for html in samples {
        let markdown = convert(html).unwrap();
        assert!(markdown.ends_with('\n'), "{markdown:?}");
        assert!(!markdown.ends_with("\n\n"), "{markdown:?}");
        assert!(markdown.lines().all(|line| line == line.trim_end()), "{markdown:?}");
    }
}

#[test]
fn test_malformed_html_still_converts() {
    assert_eq!(
        convert("<ul><li>one<li>two</ul><p>unclosed").unwrap(),
        "- one\n- two\n\nunclosed\n"
    );
}

#[test]
fn test_every_code_child_is_kept() {
    assert_eq!(
        convert("<pre><code>let a = 1;</code><code>let b = 2;</code></pre>").unwrap(),
        fence("javascript", "let a = 1;\nlet b = 2;")
    );
}

#[test]
fn test_trailing_break_is_dropped() {
    assert_eq!(convert("<p>line<br></p>").unwrap(), "line\n");
    assert_eq!(convert("<p>a<br>b<br><br> </p>").unwrap(), "a\\\nb\n");
    assert_eq!(convert("<ul><li>item<br></li></ul>").unwrap(), "- item\n");
}

#[test]
fn test_deeply_nested_markup_converts() {
    let html = format!("{}x{}", "<div>".repeat(4000), "</div>".repeat(4000));
    assert_eq!(convert(&html).unwrap(), "x\n");
}
