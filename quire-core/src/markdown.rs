//! Folds pulldown-cmark events into an element tree.
//!
//! Markdown constructs map onto the MDX element vocabulary (`p`, `h3`,
//! `inlineCode`, ...). Embedded HTML is lexed by [`crate::html`] and its
//! elements are spliced into the same tree, so a `<div>` opened in one HTML
//! block can wrap Markdown that follows it.

use pulldown_cmark::{CodeBlockKind, Event, MetadataBlockKind, Options, Parser, Tag, TagEnd};

use crate::document::{Document, ElementNode, Node, push_text};
use crate::html::{self, HtmlToken};

/// Tag name used for inline code spans, distinct from fenced `code` blocks.
pub const INLINE_CODE: &str = "inlineCode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
}

/// Raw front-matter block found at the top of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub format: FrontMatterFormat,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ParsedSource {
    pub front_matter: Option<FrontMatter>,
    pub document: Document,
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
        | Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS
}

pub fn parse_source(source: &str) -> ParsedSource {
    let mut builder = TreeBuilder::default();

    for event in Parser::new_ext(source, options()) {
        match event {
            // HTML blocks are transparent; their tags are handled token by token
            Event::Start(Tag::HtmlBlock) | Event::End(TagEnd::HtmlBlock) => {}
            Event::Start(tag) => builder.open(tag),
            Event::End(_) => builder.close_markdown(),
            Event::Text(text) => builder.text(&text),
            Event::Code(code) => {
                builder.attach(ElementNode::new(INLINE_CODE).with_text(code.to_string()).into())
            }
            Event::Html(fragment) | Event::InlineHtml(fragment) => builder.html(&fragment),
            Event::FootnoteReference(label) => {
                let link = ElementNode::new("a")
                    .with_attr("href", format!("#{label}"))
                    .with_text(label.to_string());
                builder.attach(
                    ElementNode::new("sup")
                        .with_attr("class", "footnote-reference")
                        .with_child(link)
                        .into(),
                );
            }
            Event::SoftBreak => builder.text("\n"),
            Event::HardBreak => builder.attach(ElementNode::new("br").into()),
            Event::Rule => builder.attach(ElementNode::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = ElementNode::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input = input.with_attr("checked", "");
                }
                builder.attach(input.into());
            }
            _ => {}
        }
    }

    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Markdown,
    Html,
    Image,
    TableHead,
    Table,
    Metadata(FrontMatterFormat),
}

#[derive(Debug)]
struct Frame {
    element: ElementNode,
    kind: FrameKind,
}

#[derive(Debug, Default)]
struct TreeBuilder {
    root: Document,
    stack: Vec<Frame>,
    front_matter: Option<FrontMatter>,
}

impl TreeBuilder {
    fn open(&mut self, tag: Tag) {
        let (element, kind) = match tag {
            Tag::Paragraph => (ElementNode::new("p"), FrameKind::Markdown),
            Tag::Heading {
                level, id, classes, attrs, ..
            } => {
                let mut heading = ElementNode::new(format!("h{}", level as u32));
                if let Some(id) = id {
                    heading = heading.with_attr("id", id.to_string());
                }
                if !classes.is_empty() {
                    let classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
                    heading = heading.with_attr("class", classes.join(" "));
                }
                for (name, value) in attrs {
                    heading = heading.with_attr(
                        name.to_string(),
                        value.map(|v| v.to_string()).unwrap_or_default(),
                    );
                }
                (heading, FrameKind::Markdown)
            }
            Tag::BlockQuote(_) => (ElementNode::new("blockquote"), FrameKind::Markdown),
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                let mut code = ElementNode::new("code");
                if let Some(lang) = info.split_whitespace().next() {
                    code = code.with_attr("class", format!("language-{lang}"));
                }
                (code, FrameKind::Markdown)
            }
            Tag::CodeBlock(CodeBlockKind::Indented) => {
                (ElementNode::new("code"), FrameKind::Markdown)
            }
            Tag::List(Some(start)) => {
                let mut list = ElementNode::new("ol");
                if start != 1 {
                    list = list.with_attr("start", start.to_string());
                }
                (list, FrameKind::Markdown)
            }
            Tag::List(None) => (ElementNode::new("ul"), FrameKind::Markdown),
            Tag::Item => (ElementNode::new("li"), FrameKind::Markdown),
            Tag::FootnoteDefinition(label) => (
                ElementNode::new("div")
                    .with_attr("class", "footnote-definition")
                    .with_attr("id", label.to_string()),
                FrameKind::Markdown,
            ),
            Tag::Table(_) => (ElementNode::new("table"), FrameKind::Table),
            Tag::TableHead => (ElementNode::new("thead"), FrameKind::TableHead),
            Tag::TableRow => (ElementNode::new("tr"), FrameKind::Markdown),
            Tag::TableCell => {
                let in_head = self.stack.iter().any(|f| f.kind == FrameKind::TableHead);
                let cell = if in_head { "th" } else { "td" };
                (ElementNode::new(cell), FrameKind::Markdown)
            }
            Tag::Emphasis => (ElementNode::new("em"), FrameKind::Markdown),
            Tag::Strong => (ElementNode::new("strong"), FrameKind::Markdown),
            Tag::Strikethrough => (ElementNode::new("del"), FrameKind::Markdown),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = ElementNode::new("a").with_attr("href", dest_url.to_string());
                if !title.is_empty() {
                    link = link.with_attr("title", title.to_string());
                }
                (link, FrameKind::Markdown)
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut image = ElementNode::new("img").with_attr("src", dest_url.to_string());
                if !title.is_empty() {
                    image = image.with_attr("title", title.to_string());
                }
                (image, FrameKind::Image)
            }
            Tag::MetadataBlock(kind) => {
                let format = match kind {
                    MetadataBlockKind::YamlStyle => FrontMatterFormat::Yaml,
                    MetadataBlockKind::PlusesStyle => FrontMatterFormat::Toml,
                };
                (ElementNode::default(), FrameKind::Metadata(format))
            }
            _ => (ElementNode::new("div"), FrameKind::Markdown),
        };

        self.stack.push(Frame { element, kind });
    }

    /// Closes the innermost Markdown frame, first closing any HTML elements
    /// left open inside it.
    fn close_markdown(&mut self) {
        while matches!(self.stack.last(), Some(f) if f.kind == FrameKind::Html) {
            self.close_top();
        }
        self.close_top();
    }

    fn close_top(&mut self) {
        let Some(Frame { mut element, kind }) = self.stack.pop() else {
            return;
        };

        match kind {
            FrameKind::Metadata(format) => {
                if self.front_matter.is_none() {
                    self.front_matter = Some(FrontMatter {
                        format,
                        text: element.plain_text(),
                    });
                }
                return;
            }
            FrameKind::Image => {
                let alt = element.plain_text();
                element.children.clear();
                element.attrs.insert("alt".to_string(), alt);
            }
            FrameKind::TableHead => {
                let row = ElementNode {
                    tag: "tr".to_string(),
                    children: std::mem::take(&mut element.children),
                    ..Default::default()
                };
                element.children.push(row.into());
            }
            FrameKind::Table => {
                let (head, rows): (Vec<Node>, Vec<Node>) = std::mem::take(&mut element.children)
                    .into_iter()
                    .partition(|n| matches!(n, Node::Element(e) if e.tag == "thead"));
                element.children = head;
                if !rows.is_empty() {
                    element.children.push(
                        ElementNode {
                            tag: "tbody".to_string(),
                            children: rows,
                            ..Default::default()
                        }
                        .into(),
                    );
                }
            }
            FrameKind::Markdown | FrameKind::Html => {}
        }

        self.attach(element.into());
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.element.children.push(node),
            None => self.root.push(node),
        }
    }

    fn text(&mut self, text: &str) {
        let children = match self.stack.last_mut() {
            Some(frame) => &mut frame.element.children,
            None => &mut self.root,
        };
        push_text(children, text.to_string());
    }

    fn html(&mut self, fragment: &str) {
        for token in html::tokenize(fragment) {
            match token {
                HtmlToken::Start {
                    tag,
                    attrs,
                    self_closing,
                } => {
                    let element = ElementNode {
                        tag,
                        attrs,
                        children: Vec::new(),
                    };
                    if self_closing {
                        self.attach(element.into());
                    } else {
                        self.stack.push(Frame {
                            element,
                            kind: FrameKind::Html,
                        });
                    }
                }
                HtmlToken::End { tag } => self.close_html(&tag),
                HtmlToken::Text(text) => self.attach(Node::Raw(text.to_string())),
            }
        }
    }

    /// Closes the nearest open HTML element named `tag`. HTML end tags never
    /// close Markdown constructs; a stray end tag is ignored.
    fn close_html(&mut self, tag: &str) {
        let depth = self
            .stack
            .iter()
            .rev()
            .take_while(|f| f.kind == FrameKind::Html)
            .position(|f| f.element.tag == tag);

        if let Some(depth) = depth {
            for _ in 0..=depth {
                self.close_top();
            }
        }
    }

    fn finish(mut self) -> ParsedSource {
        while !self.stack.is_empty() {
            self.close_top();
        }
        ParsedSource {
            front_matter: self.front_matter,
            document: self.root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn el(tag: &str) -> ElementNode {
        ElementNode::new(tag)
    }

    #[test]
    fn paragraph_with_emphasis_and_link() {
        let parsed = parse_source("Hello **bold** [site](https://example.com)\n");
        assert_eq!(
            parsed.document,
            vec![
                el("p")
                    .with_text("Hello ")
                    .with_child(el("strong").with_text("bold"))
                    .with_text(" ")
                    .with_child(
                        el("a")
                            .with_attr("href", "https://example.com")
                            .with_text("site")
                    )
                    .into()
            ]
        );
    }

    #[test]
    fn fenced_code_carries_language_class() {
        let parsed = parse_source("```python title=x\nprint(1)\n```\n");
        assert_eq!(
            parsed.document,
            vec![
                el("code")
                    .with_attr("class", "language-python")
                    .with_text("print(1)\n")
                    .into()
            ]
        );
    }

    #[test]
    fn inline_code_is_distinct_from_blocks() {
        let parsed = parse_source("use `x`\n");
        assert_eq!(
            parsed.document,
            vec![
                el("p")
                    .with_text("use ")
                    .with_child(el(INLINE_CODE).with_text("x"))
                    .into()
            ]
        );
    }

    #[test]
    fn image_alt_comes_from_label() {
        let parsed = parse_source("![a *cat*](cat.png)\n");
        assert_eq!(
            parsed.document,
            vec![
                el("p")
                    .with_child(el("img").with_attr("src", "cat.png").with_attr("alt", "a cat"))
                    .into()
            ]
        );
    }

    #[test]
    fn yaml_front_matter_is_extracted() {
        let parsed = parse_source("---\ntitle: Hi\ndate: 2020-01-01\n---\n\nBody\n");
        let fm = parsed.front_matter.expect("front matter");
        assert_eq!(fm.format, FrontMatterFormat::Yaml);
        assert!(fm.text.contains("title: Hi"));
        assert!(fm.text.contains("date: 2020-01-01"));
        assert_eq!(parsed.document, vec![el("p").with_text("Body").into()]);
    }

    #[test]
    fn toml_front_matter_is_extracted() {
        let parsed = parse_source("+++\ntitle = \"Hi\"\n+++\n");
        let fm = parsed.front_matter.unwrap();
        assert_eq!(fm.format, FrontMatterFormat::Toml);
        assert!(fm.text.contains("title = \"Hi\""));
    }

    #[test]
    fn embedded_iframe_becomes_element() {
        let parsed = parse_source(
            "Intro\n\n<iframe src=\"https://www.youtube.com/embed/x\" allowfullscreen></iframe>\n",
        );
        let iframe = parsed.document.iter().find_map(|n| match n {
            Node::Element(e) if e.tag == "iframe" => Some(e),
            _ => None,
        });
        let iframe = iframe.expect("iframe element");
        assert_eq!(iframe.attr("src"), Some("https://www.youtube.com/embed/x"));
        assert_eq!(iframe.attr("allowfullscreen"), Some(""));
    }

    #[test]
    fn html_wrapper_contains_following_markdown() {
        let parsed = parse_source("<div className=\"note\">\n\nInside **md**\n\n</div>\n");
        let div = match &parsed.document[0] {
            Node::Element(e) => e,
            other => panic!("expected element, got {other:?}"),
        };
        assert_eq!(div.tag, "div");
        assert_eq!(div.attr("class"), Some("note"));
        assert!(div.children.iter().any(|n| matches!(n, Node::Element(e) if e.tag == "p")));
    }

    #[test]
    fn unclosed_inline_html_closes_with_its_paragraph() {
        let parsed = parse_source("a <span>b\n\nnext\n");
        assert_eq!(parsed.document.len(), 2);
        match &parsed.document[0] {
            Node::Element(p) => {
                assert_eq!(p.tag, "p");
                assert!(matches!(p.children.last(), Some(Node::Element(s)) if s.tag == "span"));
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn tables_get_head_and_body() {
        let parsed = parse_source("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let table = match &parsed.document[0] {
            Node::Element(e) => e,
            other => panic!("expected table, got {other:?}"),
        };
        let tags: Vec<&str> = table
            .children
            .iter()
            .filter_map(|n| match n {
                Node::Element(e) => Some(e.tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tags, vec!["thead", "tbody"]);
    }

    #[test]
    fn lists_map_to_ul_and_ol() {
        let parsed = parse_source("- one\n\n3. three\n");
        let tags: Vec<&str> = parsed
            .document
            .iter()
            .filter_map(|n| match n {
                Node::Element(e) => Some(e.tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tags, vec!["ul", "ol"]);
        match &parsed.document[1] {
            Node::Element(ol) => assert_eq!(ol.attr("start"), Some("3")),
            _ => unreachable!(),
        }
    }
}
