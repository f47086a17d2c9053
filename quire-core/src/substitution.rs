//! Per-tag presentation rules.
//!
//! The table is the one place where rendered output is styled. Tags without
//! an entry pass through unchanged.

use std::collections::BTreeMap;

use crate::document::ElementNode;
use crate::embed;
use crate::error::{Error, Result};
use crate::highlight::Highlighter;
use crate::markdown::INLINE_CODE;

/// Fixed attributes added to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Class used when the author did not set one.
    pub class: &'static str,
    /// Tag emitted instead of the source tag.
    pub rename: Option<&'static str>,
    /// Extra attributes, again only where the author did not set them.
    pub extra: &'static [(&'static str, &'static str)],
    /// When set, every other source attribute is dropped.
    pub keep: Option<&'static [&'static str]>,
}

impl Presentation {
    pub const fn class(class: &'static str) -> Self {
        Self {
            class,
            rename: None,
            extra: &[],
            keep: None,
        }
    }

    fn apply(&self, mut node: ElementNode) -> ElementNode {
        if let Some(keep) = self.keep {
            node.attrs.retain(|name, _| keep.contains(&name.as_str()));
        }
        for (name, value) in self.extra {
            node.attrs
                .entry((*name).to_string())
                .or_insert_with(|| (*value).to_string());
        }
        node.attrs
            .entry("class".to_string())
            .or_insert_with(|| self.class.to_string());
        if let Some(tag) = self.rename {
            node.tag = tag.to_string();
        }
        node
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionRule {
    /// Pass through with added attributes.
    Decorate(Presentation),
    /// Tokenized highlight for allowed languages, plain block otherwise.
    Highlight,
    /// Responsive wrapper for video embeds.
    Embed,
}

#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    rules: BTreeMap<String, SubstitutionRule>,
    highlighter: Highlighter,
}

impl SubstitutionTable {
    pub fn empty(highlighter: Highlighter) -> Self {
        Self {
            rules: BTreeMap::new(),
            highlighter,
        }
    }

    /// The blog's presentation rules.
    pub fn standard(highlighter: Highlighter) -> Self {
        use SubstitutionRule::*;

        Self::empty(highlighter)
            .with_rule("a", Decorate(Presentation::class("underline break-all")))
            .with_rule("blockquote", Decorate(Presentation::class("pl-3 my-4")))
            .with_rule("code", Highlight)
            .with_rule(
                INLINE_CODE,
                Decorate(Presentation {
                    rename: Some("code"),
                    ..Presentation::class("font-mono")
                }),
            )
            .with_rule(
                "img",
                Decorate(Presentation {
                    extra: &[("loading", "lazy")],
                    keep: Some(&["src", "alt"]),
                    ..Presentation::class("border")
                }),
            )
            .with_rule("li", Decorate(Presentation::class("mb-2 pl-1")))
            .with_rule("ol", Decorate(Presentation::class("list-decimal pl-6 mb-5 mt-4")))
            .with_rule("ul", Decorate(Presentation::class("list-disc pl-6 mb-5 mt-4")))
            .with_rule("h3", Decorate(Presentation::class("mt-4 mb-1 font-medium text-xl")))
            .with_rule("iframe", Embed)
            .with_rule("p", Decorate(Presentation::class("mb-4")))
            .with_rule("strong", Decorate(Presentation::class("font-medium")))
    }

    pub fn with_rule(mut self, tag: impl Into<String>, rule: SubstitutionRule) -> Self {
        self.rules.insert(tag.into(), rule);
        self
    }

    pub fn rule(&self, tag: &str) -> Option<&SubstitutionRule> {
        self.rules.get(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Rewrites one element. Children are expected to be substituted
    /// already; the result is not fed back through the table.
    pub fn apply(&self, node: ElementNode) -> Result<ElementNode> {
        match self.rules.get(&node.tag) {
            None => Ok(node),
            Some(SubstitutionRule::Decorate(presentation)) => Ok(presentation.apply(node)),
            Some(SubstitutionRule::Embed) => Ok(embed::normalize(node)),
            Some(SubstitutionRule::Highlight) => {
                let code = node.text_content().ok_or_else(|| {
                    Error::invalid_input("code block must contain only text")
                })?;
                Ok(self.highlighter.highlight(node.attr("class"), &code))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use pretty_assertions::assert_eq;

    fn table() -> SubstitutionTable {
        SubstitutionTable::standard(Highlighter::new(&HighlightConfig::default()).unwrap())
    }

    #[test]
    fn covers_every_presentational_tag() {
        let binding = table();
        let tags: Vec<&str> = binding.tags().collect();
        assert_eq!(
            tags,
            vec![
                "a",
                "blockquote",
                "code",
                "h3",
                "iframe",
                "img",
                "inlineCode",
                "li",
                "ol",
                "p",
                "strong",
                "ul"
            ]
        );
    }

    #[test]
    fn decorate_adds_class() {
        let out = table().apply(ElementNode::new("p").with_text("hi")).unwrap();
        assert_eq!(out, ElementNode::new("p").with_attr("class", "mb-4").with_text("hi"));
    }

    #[test]
    fn author_class_wins() {
        let out = table()
            .apply(ElementNode::new("a").with_attr("class", "button"))
            .unwrap();
        assert_eq!(out.attr("class"), Some("button"));
    }

    #[test]
    fn inline_code_becomes_code_element() {
        let out = table()
            .apply(ElementNode::new(INLINE_CODE).with_text("x"))
            .unwrap();
        assert_eq!(out.tag, "code");
        assert_eq!(out.attr("class"), Some("font-mono"));
    }

    #[test]
    fn images_keep_only_src_and_alt() {
        let out = table()
            .apply(
                ElementNode::new("img")
                    .with_attr("src", "a.png")
                    .with_attr("alt", "A")
                    .with_attr("title", "dropped"),
            )
            .unwrap();
        assert_eq!(
            out,
            ElementNode::new("img")
                .with_attr("src", "a.png")
                .with_attr("alt", "A")
                .with_attr("loading", "lazy")
                .with_attr("class", "border")
        );
    }

    #[test]
    fn unmapped_tags_pass_through() {
        let node = ElementNode::new("h2").with_attr("id", "x").with_text("Title");
        assert_eq!(table().apply(node.clone()).unwrap(), node);
    }

    #[test]
    fn code_with_element_children_is_invalid() {
        let node = ElementNode::new("code")
            .with_attr("class", "language-python")
            .with_child(ElementNode::new("b").with_text("x"));
        assert!(matches!(table().apply(node), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn custom_rules_override_standard_ones() {
        let table = table().with_rule("p", SubstitutionRule::Decorate(Presentation::class("lead")));
        let out = table.apply(ElementNode::new("p")).unwrap();
        assert_eq!(out.attr("class"), Some("lead"));
    }
}
