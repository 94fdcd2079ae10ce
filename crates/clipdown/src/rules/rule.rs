//! Rules pair a [`Filter`] that selects elements with the Markdown they
//! produce.

use crate::node::NodeRef;
use crate::translator::TranslatorOptions;

/// Markdown for a matched element, given its already converted content
pub type ReplacementFn = Box<dyn Fn(&NodeRef, &str, &TranslatorOptions) -> String + Send + Sync>;

/// Element test used by [`Filter::Predicate`]
pub type PredicateFn = Box<dyn Fn(&NodeRef, &TranslatorOptions) -> bool + Send + Sync>;

/// Selects the elements a rule applies to
pub enum Filter {
    /// Elements with one of these lowercase tag names
    Tags(Vec<String>),
    /// Elements accepted by a predicate
    Predicate(PredicateFn),
}

impl Filter {
    pub fn tag(name: &str) -> Self {
        Self::tags(&[name])
    }

    pub fn tags(names: &[&str]) -> Self {
        Filter::Tags(names.iter().map(|name| name.to_lowercase()).collect())
    }

    /// Match elements of `tag` that also pass `test`
    pub fn tag_where<F>(tag: &str, test: F) -> Self
    where
        F: Fn(&NodeRef, &TranslatorOptions) -> bool + Send + Sync + 'static,
    {
        let tag = tag.to_lowercase();
        Self::predicate(move |node, options| node.is(&tag) && test(node, options))
    }

    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(&NodeRef, &TranslatorOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(test))
    }

    pub fn matches(&self, node: &NodeRef, options: &TranslatorOptions) -> bool {
        match self {
            Filter::Tags(tags) => tags.iter().any(|tag| node.is(tag)),
            Filter::Predicate(test) => test(node, options),
        }
    }
}

/// A conversion rule: which elements, and what they become
pub struct Rule {
    pub filter: Filter,
    pub replacement: ReplacementFn,
}

impl Rule {
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TranslatorOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TranslatorOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TranslatorOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Produce the Markdown for `node` from its converted `content`
    pub fn replace(&self, node: &NodeRef, content: &str, options: &TranslatorOptions) -> String {
        (self.replacement)(node, content, options)
    }
}
