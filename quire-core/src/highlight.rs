//! Lexical highlighting for fenced code blocks.
//!
//! Only languages on the allow-list are tokenized. Everything else renders
//! as a plain `<pre><code>` block, which is the normal path rather than a
//! failure.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::warn;

use crate::config::HighlightConfig;
use crate::document::ElementNode;
use crate::error::{Error, Result};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

pub const LANGUAGE_PREFIX: &str = "language-";

/// Classes shared by the plain and highlighted code block.
pub const CODE_CLASSES: &str =
    "mb-4 w-full block overflow-x-auto font-mono text-sm border border-gray-400 p-3";

pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Languages highlighted out of the box.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "markup",
    "bash",
    "clike",
    "c",
    "cpp",
    "css",
    "javascript",
    "jsx",
    "coffeescript",
    "actionscript",
    "css-extr",
    "diff",
    "git",
    "go",
    "graphql",
    "handlebars",
    "json",
    "less",
    "makefile",
    "markdown",
    "objectivec",
    "ocaml",
    "python",
    "reason",
    "sass",
    "scss",
    "sql",
    "stylus",
    "tsx",
    "typescript",
    "wasm",
    "yaml",
];

/// Plain text colour forced onto every theme.
const PLAIN_FOREGROUND: Color = Color {
    r: 0xff,
    g: 0x00,
    b: 0x00,
    a: 0xff,
};

/// Plain background forced onto every theme.
const PLAIN_BACKGROUND: Color = Color {
    r: 0xff,
    g: 0xff,
    b: 0xff,
    a: 0xff,
};

/// Language named by a `language-*` class, if any.
pub fn language_from_class(class: Option<&str>) -> Option<&str> {
    class?
        .split_whitespace()
        .find_map(|c| c.strip_prefix(LANGUAGE_PREFIX))
        .filter(|lang| !lang.is_empty())
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    languages: BTreeSet<String>,
    base_theme: Theme,
}

impl Highlighter {
    pub fn new(config: &HighlightConfig) -> Result<Self> {
        let base_theme = THEME_SET.themes.get(&config.theme).cloned().ok_or_else(|| {
            let known: Vec<&str> = THEME_SET.themes.keys().map(String::as_str).collect();
            Error::invalid_input(format!(
                "unknown highlight theme {:?}, expected one of: {}",
                config.theme,
                known.join(", ")
            ))
        })?;

        Ok(Self {
            languages: config.languages.iter().cloned().collect(),
            base_theme,
        })
    }

    pub fn is_supported(&self, language: &str) -> bool {
        self.languages.contains(language)
    }

    /// Renders a code block from its `class` attribute and text.
    pub fn highlight(&self, class: Option<&str>, code: &str) -> ElementNode {
        match language_from_class(class) {
            Some(lang) if self.is_supported(lang) => self.tokenized(lang, code.trim()),
            _ => plain(code),
        }
    }

    /// Base theme with the plain colours overridden. Built per call so no
    /// render ever sees another render's theme.
    fn compose_theme(&self) -> Theme {
        let mut theme = self.base_theme.clone();
        theme.settings.foreground = Some(PLAIN_FOREGROUND);
        theme.settings.background = Some(PLAIN_BACKGROUND);
        theme
    }

    fn tokenized(&self, lang: &str, code: &str) -> ElementNode {
        let theme = self.compose_theme();
        let syntax = syntax_for(lang);
        let mut highlighter = HighlightLines::new(syntax, &theme);

        let pre_style = format!(
            "color: {}; background-color: {}",
            css_color(theme.settings.foreground.unwrap_or(PLAIN_FOREGROUND)),
            css_color(theme.settings.background.unwrap_or(PLAIN_BACKGROUND)),
        );
        let mut pre = ElementNode::new("pre")
            .with_attr("class", format!("{CODE_CLASSES} prism-code language-{lang}"))
            .with_attr("style", pre_style);

        for line in LinesWithEndings::from(code) {
            let mut row = ElementNode::new("div").with_attr("class", "token-line");

            let tokens = match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(tokens) => tokens,
                Err(err) => {
                    warn!(lang, %err, "tokenizer failed on line, emitting it unstyled");
                    let unstyled = Style {
                        foreground: PLAIN_FOREGROUND,
                        background: PLAIN_BACKGROUND,
                        font_style: FontStyle::empty(),
                    };
                    vec![(unstyled, line)]
                }
            };

            for (style, text) in tokens {
                let text = text.trim_end_matches(['\n', '\r']);
                if text.is_empty() {
                    continue;
                }
                row = row.with_child(
                    ElementNode::new("span")
                        .with_attr("class", "token")
                        .with_attr("style", token_style(style))
                        .with_text(text),
                );
            }

            if row.children.is_empty() {
                row = row.with_child(
                    ElementNode::new("span")
                        .with_attr("class", "token plain")
                        .with_attr("style", "display: inline-block")
                        .with_text("\n"),
                );
            }

            pre = pre.with_child(row);
        }

        pre
    }
}

/// Untokenized block: `pre > code`, whitespace kept as written.
fn plain(code: &str) -> ElementNode {
    ElementNode::new("pre").with_child(
        ElementNode::new("code")
            .with_attr("class", CODE_CLASSES)
            .with_text(code),
    )
}

fn grammar_name(lang: &str) -> Option<&'static str> {
    Some(match lang {
        "markup" | "handlebars" => "HTML",
        "bash" => "Bourne Again Shell (bash)",
        "clike" | "c" => "C",
        "cpp" => "C++",
        "css" | "css-extr" | "less" | "sass" | "scss" | "stylus" => "CSS",
        "javascript" | "jsx" | "typescript" | "tsx" | "coffeescript" | "actionscript" => {
            "JavaScript"
        }
        "diff" | "git" => "Diff",
        "go" => "Go",
        "json" => "JSON",
        "makefile" => "Makefile",
        "markdown" => "Markdown",
        "objectivec" => "Objective-C",
        "ocaml" | "reason" => "OCaml",
        "python" => "Python",
        "sql" => "SQL",
        "yaml" => "YAML",
        _ => return None,
    })
}

fn syntax_for(lang: &str) -> &'static SyntaxReference {
    grammar_name(lang)
        .and_then(|name| SYNTAX_SET.find_syntax_by_name(name))
        .or_else(|| SYNTAX_SET.find_syntax_by_token(lang))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

fn css_color(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn token_style(style: Style) -> String {
    let mut css = format!("color: {}", css_color(style.foreground));
    if style.font_style.contains(FontStyle::BOLD) {
        css.push_str("; font-weight: bold");
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        css.push_str("; font-style: italic");
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        css.push_str("; text-decoration: underline");
    }
    css
}
