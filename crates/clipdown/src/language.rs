//! Heuristic language detection for code blocks.
//!
//! Detection walks [`DETECTION_RULES`] in order and returns the tag of the
//! first rule whose predicate accepts the snippet. The rules look at surface
//! features only (leading keywords, a few tell-tale tokens, bracket shape), so
//! misclassification is expected now and then; the result only drives syntax
//! highlighting of the emitted fence.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag used when nothing else matches
pub const FALLBACK_LANGUAGE: &str = "shell";

static SHELL_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:\$|(?:npm|npx|yarn|pnpm|git|cd|ls|mkdir|rm|cp|mv|curl|wget|pip3?|python3?|node|docker|brew|sudo|apt(?:-get)?|cargo|make|chmod|echo)(?:\s|$))",
    )
    .expect("shell command pattern is valid")
});

static SCRIPT_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:import|export|const|let|function|class|async|interface|type)\b")
        .expect("script keyword pattern is valid")
});

static DOM_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:document|window)\.\w+|\.(?:querySelector(?:All)?|getElementById|addEventListener)\(")
        .expect("dom call pattern is valid")
});

static PYTHON_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:def|class|import|from)\b|^\s*if __name__")
        .expect("python keyword pattern is valid")
});

static CSS_SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:body|div|span|h[1-6])\b|[#.])").expect("css selector pattern is valid")
});

/// The parts of a snippet the rules inspect
#[derive(Debug, Clone, Copy)]
pub struct Snippet<'a> {
    /// Full snippet text
    pub text: &'a str,
    /// Snippet with surrounding whitespace removed
    pub trimmed: &'a str,
    /// First line that is not blank, or empty
    pub first_line: &'a str,
}

impl<'a> Snippet<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            trimmed: text.trim(),
            first_line: text.lines().find(|l| !l.trim().is_empty()).unwrap_or(""),
        }
    }
}

/// One entry of the detection table
pub struct DetectionRule {
    /// Rule name, for logging and tests
    pub name: &'static str,
    /// Tag emitted when the rule matches
    pub language: &'static str,
    /// Predicate over the snippet
    pub matches: fn(&Snippet) -> bool,
}

/// Detection rules in priority order; the first match wins
pub static DETECTION_RULES: &[DetectionRule] = &[
    DetectionRule {
        name: "blank",
        language: "text",
        matches: |s| s.trimmed.is_empty(),
    },
    DetectionRule {
        name: "shell-command",
        language: "shell",
        matches: |s| SHELL_COMMAND.is_match(s.first_line),
    },
    DetectionRule {
        name: "script-keywords",
        language: "javascript",
        matches: |s| {
            SCRIPT_KEYWORD.is_match(s.first_line)
                || s.text.contains("console.log")
                || s.text.contains("=>")
                || DOM_CALL.is_match(s.text)
        },
    },
    DetectionRule {
        name: "python-blocks",
        language: "python",
        matches: |s| {
            PYTHON_KEYWORD.is_match(s.first_line)
                || (s.first_line.contains(':')
                    && !s.first_line.contains('{')
                    && !s.first_line.contains(';'))
        },
    },
    DetectionRule {
        name: "markup",
        language: "html",
        matches: |s| s.trimmed.starts_with('<') && s.trimmed.ends_with('>'),
    },
    DetectionRule {
        name: "object-literal",
        language: "json",
        matches: |s| s.trimmed.starts_with('{') && s.trimmed.ends_with('}'),
    },
    DetectionRule {
        name: "stylesheet",
        language: "css",
        matches: |s| s.text.contains('{') && CSS_SELECTOR.is_match(s.first_line),
    },
];

/// Guess the language of a code snippet.
///
/// Always returns a tag: `text` for blank input, [`FALLBACK_LANGUAGE`] when no
/// rule matches.
pub fn detect_language(code: &str) -> &'static str {
    let snippet = Snippet::new(code);
    match DETECTION_RULES.iter().find(|rule| (rule.matches)(&snippet)) {
        Some(rule) => {
            tracing::trace!(rule = rule.name, language = rule.language, "detected code language");
            rule.language
        }
        None => FALLBACK_LANGUAGE,
    }
}
