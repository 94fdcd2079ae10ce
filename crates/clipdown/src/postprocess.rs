//! Text-level lint repairs applied to translator output.
//!
//! [`post_process`] runs every entry of [`LINT_RULES`] in order. Each rule is
//! a plain `&str -> String` function so it can be exercised on its own. Rules
//! that rewrite lines leave the content of fenced code blocks untouched.
//!
//! Running the pipeline on its own output changes nothing.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\*\*([^*\s](?:[^*]*[^*\s])?)\*\*\s*$").expect("bold line pattern is valid")
});

static ORDERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)[0-9]+\.(\s)").expect("ordered marker pattern is valid"));

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^( *)(?:[-*+]|[0-9]+\.)\s").expect("list marker pattern is valid")
});

static HEADING_NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6}\s+[0-9]+)\\\.").expect("heading numeral pattern is valid")
});

/// A named rewrite over the whole document
pub struct LintRule {
    /// Rule name, for logging and tests
    pub name: &'static str,
    /// The rewrite
    pub apply: fn(&str) -> String,
}

/// Lint rewrites in the order they run; later rules rely on earlier ones
pub static LINT_RULES: &[LintRule] = &[
    LintRule {
        name: "promote-bold-lines",
        apply: promote_bold_lines,
    },
    LintRule {
        name: "renumber-ordered-lists",
        apply: renumber_ordered_lists,
    },
    LintRule {
        name: "reindent-nested-lists",
        apply: reindent_nested_lists,
    },
    LintRule {
        name: "unescape-heading-numerals",
        apply: unescape_heading_numerals,
    },
    LintRule {
        name: "pad-code-fences",
        apply: pad_code_fences,
    },
    LintRule {
        name: "tidy-whitespace",
        apply: tidy_whitespace,
    },
];

/// Run all lint rewrites over raw Markdown.
///
/// The result has no trailing whitespace on any line and ends with exactly
/// one newline.
pub fn post_process(markdown: &str) -> String {
    LINT_RULES.iter().fold(markdown.to_string(), |text, rule| {
        let rewritten = (rule.apply)(&text);
        if rewritten != text {
            tracing::trace!(rule = rule.name, "lint rule rewrote document");
        }
        rewritten
    })
}

/// Where a line sits relative to fenced code blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// Ordinary Markdown
    Text,
    /// Opening fence delimiter
    Open,
    /// Closing fence delimiter
    Close,
    /// Inside a fenced block
    Code,
}

/// Fence character and length when the line is a fence delimiter
fn fence_of(line: &str) -> Option<(char, usize)> {
    let line = line.trim_start();
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// Split a document into lines and classify each one.
///
/// A block closes only on a bare run of its own fence character at least as
/// long as the opening run.
fn classify(markdown: &str) -> Vec<(&str, LineKind)> {
    let mut open: Option<(char, usize)> = None;
    markdown
        .split('\n')
        .map(|line| {
            let kind = match (open, fence_of(line)) {
                (None, Some(fence)) => {
                    open = Some(fence);
                    LineKind::Open
                }
                (None, None) => LineKind::Text,
                (Some((ch, len)), Some((c, l)))
                    if c == ch && l >= len && line.trim().len() == l =>
                {
                    open = None;
                    LineKind::Close
                }
                (Some(_), _) => LineKind::Code,
            };
            (line, kind)
        })
        .collect()
}

/// Rewrite every line outside fenced blocks
fn map_text_lines<F>(markdown: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    classify(markdown)
        .into_iter()
        .map(|(line, kind)| match kind {
            LineKind::Text => f(line),
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `**Title**` alone on a line becomes `### Title`
pub fn promote_bold_lines(markdown: &str) -> String {
    map_text_lines(markdown, |line| {
        BOLD_LINE.replace(line, "### $1").into_owned()
    })
}

/// Every ordered-list marker becomes `1.`
pub fn renumber_ordered_lists(markdown: &str) -> String {
    map_text_lines(markdown, |line| {
        ORDERED_MARKER.replace(line, "${1}1.$2").into_owned()
    })
}

/// Move list markers from a 2-space nesting unit to a 4-space one.
///
/// Applies only when some list marker sits at exactly two spaces; marker
/// lines at two spaces move to four and those at four move to eight. Deeper
/// levels are left alone.
pub fn reindent_nested_lists(markdown: &str) -> String {
    let marker_indent = |line: &str| {
        LIST_MARKER
            .captures(line)
            .map(|caps| caps.get(1).map_or(0, |m| m.as_str().len()))
    };

    let uses_two_space_unit = classify(markdown)
        .iter()
        .any(|&(line, kind)| kind == LineKind::Text && marker_indent(line) == Some(2));
    if !uses_two_space_unit {
        return markdown.to_string();
    }

    map_text_lines(markdown, |line| match marker_indent(line) {
        Some(2) => format!("  {}", line),
        Some(4) => format!("    {}", line),
        _ => line.to_string(),
    })
}

/// `## 1\. Intro` becomes `## 1. Intro`
pub fn unescape_heading_numerals(markdown: &str) -> String {
    map_text_lines(markdown, |line| {
        HEADING_NUMERAL.replace(line, "$1.").into_owned()
    })
}

/// One blank line before each opening fence and after each closing fence
pub fn pad_code_fences(markdown: &str) -> String {
    let lines = classify(markdown);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 4);

    for (i, &(line, kind)) in lines.iter().enumerate() {
        let previous_is_text = out.last().is_some_and(|prev| !prev.trim().is_empty());
        let after_close = i > 0 && lines[i - 1].1 == LineKind::Close;

        if (kind == LineKind::Open && previous_is_text)
            || (after_close && !line.trim().is_empty())
        {
            out.push("");
        }
        out.push(line);
    }

    out.join("\n")
}

/// Strip trailing whitespace, collapse blank-line runs outside fenced
/// blocks, drop blank lines at both ends, and finish with a single newline.
pub fn tidy_whitespace(markdown: &str) -> String {
    let mut out: Vec<&str> = Vec::new();

    for (line, kind) in classify(markdown) {
        let line = line.trim_end();
        let collapsible = kind != LineKind::Code;
        if line.is_empty() && collapsible && out.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }

    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }

    let mut result = out.join("\n");
    result.push('\n');
    result
}
