//! Owned DOM tree used between parsing, normalization and translation.
//!
//! Elements and text are the only node kinds that survive parsing (comments,
//! doctypes and processing instructions are dropped by
//! [`crate::html::parse_html`]). Nodes own their children so the normalizer
//! can rewrite the tree in place before it is translated.

/// Node kinds kept in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node
    Element,
    /// Text node
    Text,
}

/// A DOM node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type
    pub node_type: NodeType,

    /// Lowercase tag name for elements, `#text` for text nodes
    pub node_name: String,

    /// Text content for text nodes
    pub node_value: Option<String>,

    /// Attributes in document order
    pub attributes: Vec<(String, String)>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_lowercase(),
            node_value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        node.attributes = attrs
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_string()))
            .collect();
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style child append, handy for assembling trees in tests
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Tag name (lowercase); `#text` for text nodes
    pub fn tag_name(&self) -> &str {
        &self.node_name
    }

    /// Check whether this is an element with the given tag
    pub fn is(&self, tag: &str) -> bool {
        self.is_element() && self.node_name == tag
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value of the same name
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .push((name.to_lowercase(), value.to_string())),
        }
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Append a class, keeping any classes already present
    pub fn add_class(&mut self, class: &str) {
        let value = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", &value);
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|n| n.is_element())
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, content: &str) {
        self.children = vec![Node::text(content)];
    }

    /// Text content of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or("")),
            NodeType::Element => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// A borrowed node together with its parent.
///
/// Rules see nodes through this type so they can ask about their position
/// (nesting inside a list item, index among siblings) without the tree
/// carrying parent pointers.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a Node>,
}

impl<'a> NodeRef<'a> {
    /// Create a NodeRef for a root node
    pub fn new(node: &'a Node) -> Self {
        Self { node, parent: None }
    }

    /// Create a NodeRef with its parent
    pub fn with_parent(node: &'a Node, parent: &'a Node) -> Self {
        Self {
            node,
            parent: Some(parent),
        }
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.parent
    }

    /// Parent tag name if known
    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent.map(|p| p.tag_name())
    }

    /// Position among the parent's element children
    pub fn element_index(&self) -> usize {
        self.parent
            .and_then(|p| {
                p.element_children()
                    .position(|sibling| std::ptr::eq(sibling, self.node))
            })
            .unwrap_or(0)
    }

    /// Siblings after this node, in document order
    pub fn next_siblings(&self) -> impl Iterator<Item = &'a Node> {
        let node = self.node;
        self.parent
            .map(|p| p.children.as_slice())
            .unwrap_or_default()
            .iter()
            .skip_while(move |sibling| !std::ptr::eq(*sibling, node))
            .skip(1)
    }

    /// Check whether this is an element with the given tag
    pub fn is(&self, tag: &str) -> bool {
        self.node.is(tag)
    }

    pub fn tag_name(&self) -> &'a str {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children.iter().filter(|n| n.is_element())
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}
