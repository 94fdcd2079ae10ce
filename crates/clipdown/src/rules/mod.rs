//! Rule system for HTML to Markdown conversion.

mod commonmark;
mod lint;
mod rule;

pub use commonmark::commonmark_rules;
pub use lint::lint_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::translator::TranslatorOptions;

/// Collection of rules for conversion
pub struct Rules {
    /// Override rules, checked first in insertion order
    overrides: IndexMap<String, Rule>,
    /// Remove rules (drop element and content)
    remove_rules: Vec<Filter>,
    /// Built-in CommonMark rules
    commonmark_rules: Vec<Rule>,
}

impl Rules {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        Self {
            overrides: IndexMap::new(),
            remove_rules: Vec::new(),
            commonmark_rules: commonmark_rules(),
        }
    }

    /// Add an override rule; a rule added under an existing key replaces it
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.overrides.insert(key.to_string(), rule);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Keys of the registered overrides, in lookup order
    pub fn override_keys(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    /// Find the appropriate rule for a node
    pub fn for_node<'a>(&'a self, node: &NodeRef, options: &TranslatorOptions) -> Option<&'a Rule> {
        self.overrides
            .values()
            .chain(self.commonmark_rules.iter())
            .find(|rule| rule.filter.matches(node, options))
    }

    /// Check if a node should be dropped together with its content
    pub fn should_remove(&self, node: &NodeRef, options: &TranslatorOptions) -> bool {
        self.remove_rules
            .iter()
            .any(|filter| filter.matches(node, options))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
