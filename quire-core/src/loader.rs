use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::markdown::{FrontMatter, FrontMatterFormat, parse_source};
use crate::store::ContentStore;

/// Front-matter fields every post declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub title: String,
    /// ISO-8601 date, optionally with a time part.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

impl PostMetadata {
    /// Calendar date the post was published on.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// `Sun Jan 05 2020` style rendering of the publish date.
    pub fn display_date(&self) -> String {
        match self.published_on() {
            Some(day) => day.format("%a %b %d %Y").to_string(),
            None => self.date.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedPost {
    pub document: Document,
    pub metadata: PostMetadata,
}

/// Reads and parses content units on demand.
///
/// Nothing is cached: every call re-reads and re-parses the source.
#[derive(Clone)]
pub struct Loader {
    store: Arc<dyn ContentStore>,
}

impl Loader {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn load(&self, identifier: &str) -> Result<LoadedPost> {
        let source = self.store.read(identifier)?;
        let post = parse_post(identifier, &source)?;
        debug!(identifier, title = %post.metadata.title, "loaded post");
        Ok(post)
    }
}

/// Parses one post source into its document and metadata.
pub fn parse_post(identifier: &str, source: &str) -> Result<LoadedPost> {
    let parsed = parse_source(source);

    let front_matter = parsed
        .front_matter
        .ok_or_else(|| Error::load(identifier, "missing front matter block"))?;
    let metadata = parse_metadata(&front_matter).map_err(|reason| Error::load(identifier, reason))?;

    if metadata.title.trim().is_empty() {
        return Err(Error::load(identifier, "front matter title is empty"));
    }
    if metadata.published_on().is_none() {
        return Err(Error::load(
            identifier,
            format!("front matter date is not ISO-8601: {:?}", metadata.date),
        ));
    }

    Ok(LoadedPost {
        document: parsed.document,
        metadata,
    })
}

fn parse_metadata(front_matter: &FrontMatter) -> std::result::Result<PostMetadata, String> {
    match front_matter.format {
        FrontMatterFormat::Yaml => {
            serde_yaml::from_str(&front_matter.text).map_err(|e| e.to_string())
        }
        FrontMatterFormat::Toml => {
            let table: toml::Table = toml::from_str(&front_matter.text).map_err(|e| e.to_string())?;
            // TOML dates are their own type; posts only ever want the text
            let table: toml::Table = table
                .into_iter()
                .map(|(key, value)| match value {
                    toml::Value::Datetime(dt) => (key, toml::Value::String(dt.to_string())),
                    other => (key, other),
                })
                .collect();
            toml::Value::Table(table)
                .try_into()
                .map_err(|e: toml::de::Error| e.to_string())
        }
    }
}
