use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::loader::{Loader, PostMetadata};
use crate::paths;
use crate::renderer::Renderer;
use crate::scanner::Scanner;
use crate::store::ContentStore;
use crate::substitution::SubstitutionTable;

/// One post, rendered and ready for page assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    pub slug: String,
    pub identifier: String,
    pub markup: String,
    pub metadata: PostMetadata,
}

/// resolve → load → render, for one slug or for the whole store.
#[derive(Clone)]
pub struct Pipeline {
    scanner: Scanner,
    loader: Loader,
    renderer: Renderer,
}

impl Pipeline {
    pub fn new(store: Arc<dyn ContentStore>, renderer: Renderer) -> Self {
        Self {
            scanner: Scanner::new(store.clone()),
            loader: Loader::new(store),
            renderer,
        }
    }

    /// Pipeline with the standard substitution table.
    pub fn from_config(store: Arc<dyn ContentStore>, config: &Config) -> Result<Self> {
        let highlighter = Highlighter::new(&config.highlight)?;
        let renderer = Renderer::new(SubstitutionTable::standard(highlighter));
        Ok(Self::new(store, renderer))
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn enumerate(&self) -> Result<Vec<String>> {
        paths::enumerate(&self.scanner)
    }

    pub fn render_slug(&self, slug: &str) -> Result<RenderedPage> {
        let identifier = self.scanner.resolve(slug)?;
        let post = self.loader.load(&identifier)?;
        let markup = self.renderer.render(&post.document)?;

        debug!(slug, bytes = markup.len(), "rendered post");
        Ok(RenderedPage {
            slug: slug.to_string(),
            identifier,
            markup,
            metadata: post.metadata,
        })
    }

    /// Renders every enumerated slug in parallel, in enumeration order.
    /// The first failure aborts the whole pass.
    pub fn build_all(&self) -> Result<Vec<RenderedPage>> {
        let started = Instant::now();
        let slugs = self.enumerate()?;

        let pages = slugs
            .par_iter()
            .map(|slug| self.render_slug(slug))
            .collect::<Result<Vec<_>>>()?;

        info!(
            posts = pages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered all posts"
        );
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn post(title: &str, date: &str, body: &str) -> String {
        format!("---\ntitle: {title}\ndate: {date}\n---\n\n{body}")
    }

    fn pipeline(store: MemoryStore) -> Pipeline {
        Pipeline::from_config(Arc::new(store), &Config::default()).unwrap()
    }

    #[test]
    fn renders_one_slug() {
        let store = MemoryStore::new().with_unit("2020-01-01-a", post("A", "2020-01-01", "Hi\n"));
        let page = pipeline(store).render_slug("a").unwrap();

        assert_eq!(page.identifier, "2020-01-01-a");
        assert_eq!(page.markup, r#"<p class="mb-4">Hi</p>"#);
        assert_eq!(page.metadata.title, "A");
    }

    #[test]
    fn build_all_keeps_enumeration_order() {
        let store = MemoryStore::new()
            .with_unit("2019-05-05-b", post("B", "2019-05-05", "b\n"))
            .with_unit("2020-01-01-a", post("A", "2020-01-01", "a\n"))
            .with_unit("2018-01-01-c", post("C", "2018-01-01", "c\n"));
        let pages = pipeline(store).build_all().unwrap();

        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn one_broken_post_fails_the_build() {
        let store = MemoryStore::new()
            .with_unit("2020-01-01-a", post("A", "2020-01-01", "a\n"))
            .with_unit("2019-01-01-broken", "no front matter\n");
        let err = pipeline(store).build_all().unwrap_err();
        assert!(matches!(err, Error::Load { identifier, .. } if identifier == "2019-01-01-broken"));
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let store = MemoryStore::new().with_unit("2020-01-01-a", post("A", "2020-01-01", "a\n"));
        assert!(matches!(
            pipeline(store).render_slug("b"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn rendered_page_serializes_for_json_output() {
        let store = MemoryStore::new().with_unit("2020-01-01-a", post("A", "2020-01-01", "a\n"));
        let page = pipeline(store).render_slug("a").unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["metadata"]["title"], "A");
        assert_eq!(json["slug"], "a");
        assert!(json["metadata"].get("canonical").is_none());
    }
}
