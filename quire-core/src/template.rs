use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::pipeline::RenderedPage;

const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../templates/base.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("index.html", include_str!("../templates/index.html")),
];

/// Index entry for one post.
#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    slug: &'a str,
    title: &'a str,
    date: &'a str,
    published: String,
}

/// Wraps rendered fragments in full HTML documents.
///
/// Templates in a theme directory replace the built-in ones by name; any
/// name the theme does not provide falls back to the built-in template.
pub struct PageAssembler {
    tera: Tera,
    site: SiteConfig,
}

impl PageAssembler {
    pub fn new(site: SiteConfig) -> Result<Self> {
        Ok(Self {
            tera: builtin()?,
            site,
        })
    }

    pub fn with_theme<P: AsRef<Path>>(site: SiteConfig, theme_dir: P) -> Result<Self> {
        let theme_dir = theme_dir.as_ref();
        let mut tera = builtin()?;
        let files = theme_templates(theme_dir)?;

        debug!(
            theme = %theme_dir.display(),
            templates = files.len(),
            "loading theme templates"
        );
        tera.add_template_files(files)?;

        Ok(Self { tera, site })
    }

    pub fn render_post(&self, page: &RenderedPage) -> Result<String> {
        let mut context = self.base_context();
        context.insert("page", page);
        context.insert("published", &page.metadata.display_date());

        Ok(self.tera.render("post.html", &context)?)
    }

    pub fn render_index(&self, pages: &[RenderedPage]) -> Result<String> {
        let posts: Vec<IndexEntry> = pages
            .iter()
            .map(|page| IndexEntry {
                slug: &page.slug,
                title: &page.metadata.title,
                date: &page.metadata.date,
                published: page.metadata.display_date(),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("posts", &posts);

        Ok(self.tera.render("index.html", &context)?)
    }

    /// Writes every post page plus the index under `<out_dir>/blog/`.
    /// Returns the written paths, index last.
    pub fn write_site<P: AsRef<Path>>(
        &self,
        out_dir: P,
        pages: &[RenderedPage],
    ) -> Result<Vec<PathBuf>> {
        let blog_dir = out_dir.as_ref().join("blog");
        let mut written = Vec::with_capacity(pages.len() + 1);

        for page in pages {
            let path = blog_dir.join(&page.slug).join("index.html");
            write_file(&path, &self.render_post(page)?)?;
            written.push(path);
        }

        let index = blog_dir.join("index.html");
        write_file(&index, &self.render_index(pages)?)?;
        written.push(index);

        info!(
            pages = written.len(),
            out = %out_dir.as_ref().display(),
            "wrote site"
        );
        Ok(written)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert(
            "base_url",
            self.site.base_url.as_deref().unwrap_or_default(),
        );
        context
    }
}

fn builtin() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(BUILTIN_TEMPLATES)?;
    Ok(tera)
}

/// `.html` files under `theme_dir`, named by their path relative to it.
fn theme_templates(theme_dir: &Path) -> Result<Vec<(PathBuf, Option<String>)>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(theme_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }

        let name = path
            .strip_prefix(theme_dir)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((path.to_path_buf(), Some(name)));
    }

    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
