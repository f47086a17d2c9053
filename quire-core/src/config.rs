use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::highlight::{DEFAULT_LANGUAGES, DEFAULT_THEME};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub highlight: HighlightConfig,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub author: String,
    /// Prefix for absolute links, without a trailing slash.
    pub base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Daniel O’Connor".into(),
            author: "Daniel O’Connor".into(),
            base_url: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HighlightConfig {
    /// Languages eligible for tokenized highlighting.
    pub languages: Vec<String>,
    /// Name of a bundled syntect theme.
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.highlight.languages.iter().any(|l| l == "python"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [site]
            title = "Notes"

            [highlight]
            languages = ["rust", "python"]
            "#,
        )
        .unwrap();
        assert_eq!(config.site.title, "Notes");
        assert_eq!(config.site.author, SiteConfig::default().author);
        assert_eq!(config.highlight.languages, vec!["rust", "python"]);
        assert_eq!(config.highlight.theme, DEFAULT_THEME);
    }

    #[test]
    fn read_reports_parse_errors() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[site\n").unwrap();
        assert!(matches!(Config::read(file.path()), Err(crate::Error::Config(_))));
    }
}
