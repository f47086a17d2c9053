use std::collections::BTreeMap;

/// Parsed body of a post: the top-level nodes in document order.
pub type Document = Vec<Node>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(ElementNode),
    /// Author text, escaped when serialized.
    Text(String),
    /// Text taken verbatim from embedded HTML.
    Raw(String),
}

impl From<ElementNode> for Node {
    fn from(element: ElementNode) -> Self {
        Node::Element(element)
    }
}

/// A markup element: tag name, attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementNode {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Appends text, merging with a trailing text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        push_text(&mut self.children, text.into());
    }

    /// Concatenated text of the children, or `None` if any child is an
    /// element.
    pub fn text_content(&self) -> Option<String> {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) | Node::Raw(text) => out.push_str(text),
                Node::Element(_) => return None,
            }
        }
        Some(out)
    }

    /// Text of the whole subtree, elements flattened away.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

pub(crate) fn push_text(children: &mut Vec<Node>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = children.last_mut() {
        last.push_str(&text);
    } else {
        children.push(Node::Text(text));
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::Raw(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_text_is_merged() {
        let node = ElementNode::new("p").with_text("Hello, ").with_text("world");
        assert_eq!(node.children, vec![Node::Text("Hello, world".into())]);
    }

    #[test]
    fn text_content_rejects_element_children() {
        let code = ElementNode::new("code").with_child(ElementNode::new("b").with_text("x"));
        assert_eq!(code.text_content(), None);
        assert_eq!(code.plain_text(), "x");
    }
}
