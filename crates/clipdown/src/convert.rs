//! Conversion facade: HTML string in, final Markdown out.

use once_cell::sync::Lazy;

use crate::html::parse_html;
use crate::normalize::normalize;
use crate::postprocess::post_process;
use crate::translator::Translator;
use crate::Result;

/// Shared converter behind [`convert`]
static DEFAULT: Lazy<Converter> = Lazy::new(Converter::new);

/// Convert an HTML fragment to lint-clean Markdown.
///
/// Uses a shared [`Converter`]; see [`Converter::convert`].
pub fn convert(html: &str) -> Result<String> {
    DEFAULT.convert(html)
}

/// Runs the full pipeline: parse, normalize, translate, post-process.
///
/// A converter holds only its rule set, so one instance can serve any number
/// of threads.
pub struct Converter {
    translator: Translator,
}

impl Converter {
    pub fn new() -> Self {
        Self {
            translator: Translator::standard(),
        }
    }

    /// Convert an HTML fragment.
    ///
    /// The result ends with exactly one newline and carries no trailing
    /// whitespace. The only error is a parse that yields no root element.
    pub fn convert(&self, html: &str) -> Result<String> {
        let span = tracing::debug_span!("convert", input_len = html.len());
        let _guard = span.enter();

        let mut root = parse_html(html)?;
        normalize(&mut root);
        let raw = self.translator.translate(&root)?;
        let markdown = post_process(&raw);

        tracing::debug!(output_len = markdown.len(), "converted selection");
        Ok(markdown)
    }

    /// The translator used for the middle stage
    pub fn translator(&self) -> &Translator {
        &self.translator
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
