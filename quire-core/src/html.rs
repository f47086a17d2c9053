//! Tag-level lexer for HTML embedded in post bodies.
//!
//! This is not an HTML parser. It splits a fragment into start tags, end
//! tags and the text between them, which is all the element tree needs.
//! Comments are dropped.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<(?P<close>/)?(?P<name>[A-Za-z][A-Za-z0-9:-]*)(?P<attrs>(?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(?P<self_close>/)?>"#,
    )
    .expect("tag pattern is valid")
});

static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlToken<'a> {
    Start {
        tag: String,
        attrs: BTreeMap<String, String>,
        self_closing: bool,
    },
    End {
        tag: String,
    },
    Text(&'a str),
}

pub fn tokenize(fragment: &str) -> Vec<HtmlToken<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for caps in TAG.captures_iter(fragment) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            tokens.push(HtmlToken::Text(&fragment[cursor..whole.start()]));
        }
        cursor = whole.end();

        let Some(name) = caps.name("name") else {
            continue; // comment
        };
        let tag = name.as_str().to_ascii_lowercase();

        if caps.name("close").is_some() {
            tokens.push(HtmlToken::End { tag });
        } else {
            let attrs = caps
                .name("attrs")
                .map(|m| parse_attrs(m.as_str()))
                .unwrap_or_default();
            let self_closing = caps.name("self_close").is_some() || is_void(&tag);
            tokens.push(HtmlToken::Start {
                tag,
                attrs,
                self_closing,
            });
        }
    }

    if cursor < fragment.len() {
        tokens.push(HtmlToken::Text(&fragment[cursor..]));
    }

    tokens
}

fn parse_attrs(source: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();

    for caps in ATTR.captures_iter(source) {
        let name = match caps[1].to_ascii_lowercase().as_str() {
            // JSX spellings used in MDX posts
            "classname" => "class".to_string(),
            "htmlfor" => "for".to_string(),
            other => other.to_string(),
        };
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
            .unwrap_or_default();
        attrs.insert(name, value);
    }

    attrs
}
