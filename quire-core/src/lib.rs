//! Static rendering pipeline for a date-prefixed blog content store.
//!
//! A slug is resolved to a content unit, its Markdown/HTML source is parsed
//! into an element tree, the tree is rewritten through a per-tag
//! [`SubstitutionTable`] and serialized to an HTML fragment. [`Pipeline`]
//! drives that for one slug or the whole store, and [`PageAssembler`] wraps
//! the fragments in complete pages.

pub mod config;
pub mod document;
pub mod embed;
pub mod error;
pub mod highlight;
pub mod html;
pub mod loader;
pub mod markdown;
pub mod paths;
pub mod pipeline;
pub mod renderer;
pub mod scanner;
pub mod slug;
pub mod store;
pub mod substitution;
pub mod template;

pub use config::{Config, HighlightConfig, SiteConfig};
pub use document::{Document, ElementNode, Node};
pub use error::{Error, Result};
pub use highlight::Highlighter;
pub use loader::{LoadedPost, Loader, PostMetadata};
pub use paths::enumerate;
pub use pipeline::{Pipeline, RenderedPage};
pub use renderer::Renderer;
pub use scanner::Scanner;
pub use store::{ContentStore, FsContentStore, MemoryStore};
pub use substitution::{Presentation, SubstitutionRule, SubstitutionTable};
pub use template::PageAssembler;
