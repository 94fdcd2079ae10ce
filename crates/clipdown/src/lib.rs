//! # clipdown
//!
//! Convert HTML selected in a browser into lint-clean Markdown.
//!
//! The conversion runs in four stages:
//!
//! - **Parse**: the HTML fragment becomes an owned [`Node`] tree ([`parse_html`])
//! - **Normalize**: list paragraphs are unwrapped and every code block is
//!   trimmed and tagged with a language ([`normalize`], [`detect_language`])
//! - **Translate**: rules turn the tree into raw Markdown ([`Translator`])
//! - **Post-process**: text rewrites repair what markdownlint would flag
//!   ([`post_process`])
//!
//! [`convert`] runs all of them with the default configuration.
//!
//! ## Example
//!
//! ```rust
//! let html = "<p><strong>Install</strong></p><pre><code>npm install</code></pre>";
//! let markdown = clipdown::convert(html).unwrap();
//! assert_eq!(markdown, "### Install\n\n```shell\nnpm install\n```\n");
//! ```
//!
//! ## Example (reusing a converter)
//!
//! ```rust
//! use clipdown::Converter;
//!
//! let converter = Converter::new();
//! let markdown = converter.convert("<ol><li>One</li><li>Two</li></ol>").unwrap();
//! assert_eq!(markdown, "1. One\n1. Two\n");
//! ```

mod convert;
pub mod html;
pub mod language;
pub mod node;
pub mod normalize;
pub mod postprocess;
mod rules;
mod translator;
mod utilities;

pub use convert::{convert, Converter};
pub use html::parse_html;
pub use language::detect_language;
pub use node::{Node, NodeRef, NodeType};
pub use normalize::normalize;
pub use postprocess::post_process;
pub use rules::{Filter, PredicateFn, ReplacementFn, Rule, Rules};
pub use translator::{CodeBlockStyle, HeadingStyle, Translator, TranslatorOptions};

/// Error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Parse failure: {0}")]
    ParseFailure(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
