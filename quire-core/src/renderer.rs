use std::sync::Arc;

use crate::document::{ElementNode, Node};
use crate::error::Result;
use crate::html::is_void;
use crate::markdown::INLINE_CODE;
use crate::substitution::SubstitutionTable;

/// Applies the substitution table to a document and serializes it to a
/// static HTML fragment.
#[derive(Debug, Clone)]
pub struct Renderer {
    table: Arc<SubstitutionTable>,
}

impl Renderer {
    pub fn new(table: SubstitutionTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    pub fn render(&self, document: &[Node]) -> Result<String> {
        let mut html = String::new();
        for node in document {
            let node = self.substitute(node)?;
            write_node(&node, &mut html);
        }
        Ok(html)
    }

    /// Depth-first: children first, then the element itself.
    fn substitute(&self, node: &Node) -> Result<Node> {
        match node {
            Node::Element(element) => {
                let children = element
                    .children
                    .iter()
                    .map(|child| self.substitute(child))
                    .collect::<Result<Vec<_>>>()?;
                let element = ElementNode {
                    tag: element.tag.clone(),
                    attrs: element.attrs.clone(),
                    children,
                };
                Ok(Node::Element(self.table.apply(element)?))
            }
            other => Ok(other.clone()),
        }
    }
}

/// Serializes nodes without any substitution.
pub fn to_html(nodes: &[Node]) -> String {
    let mut html = String::new();
    for node in nodes {
        write_node(node, &mut html);
    }
    html
}

fn write_node(node: &Node, html: &mut String) {
    match node {
        Node::Text(text) => html.push_str(&html_escape::encode_text(text)),
        Node::Raw(raw) => html.push_str(raw),
        Node::Element(element) => write_element(element, html),
    }
}

fn write_element(element: &ElementNode, html: &mut String) {
    let tag = if element.tag == INLINE_CODE {
        "code"
    } else {
        element.tag.as_str()
    };

    html.push('<');
    html.push_str(tag);
    for (name, value) in &element.attrs {
        html.push(' ');
        html.push_str(name);
        html.push_str("=\"");
        html.push_str(&html_escape::encode_double_quoted_attribute(value));
        html.push('"');
    }

    if is_void(tag) {
        html.push_str("/>");
        return;
    }

    html.push('>');
    for child in &element.children {
        write_node(child, html);
    }
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}
