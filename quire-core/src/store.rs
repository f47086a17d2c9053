//! Content store capability.
//!
//! The pipeline never touches the filesystem directly. It asks a
//! [`ContentStore`] for identifiers and raw sources, so posts can live in a
//! directory tree, in memory, or anywhere else that can list and read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File names probed, in order, inside a post directory.
pub const ENTRY_FILES: &[&str] = &["index.mdx", "index.md"];

pub trait ContentStore: Send + Sync {
    /// Lists every content-unit identifier, in no particular order.
    fn list_identifiers(&self) -> Result<Vec<String>>;

    /// Returns the raw source of one content unit.
    fn read(&self, identifier: &str) -> Result<String>;
}

/// Posts stored as `<root>/<identifier>/index.mdx`.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_file(&self, dir: &Path) -> Option<PathBuf> {
        ENTRY_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}

impl ContentStore for FsContentStore {
    fn list_identifiers(&self) -> Result<Vec<String>> {
        let mut identifiers = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            identifiers.push(name);
        }

        debug!(root = %self.root.display(), count = identifiers.len(), "listed content store");
        Ok(identifiers)
    }

    fn read(&self, identifier: &str) -> Result<String> {
        if identifier.is_empty() || identifier.contains(['/', '\\']) || identifier == ".." {
            return Err(Error::load(identifier, "not a content directory name"));
        }

        let dir = self.root.join(identifier);
        let path = self.entry_file(&dir).ok_or_else(|| {
            Error::load(
                identifier,
                format!("no {} in {}", ENTRY_FILES.join(" or "), dir.display()),
            )
        })?;

        std::fs::read_to_string(&path).map_err(|e| Error::load(identifier, e))
    }
}

/// In-memory store keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    units: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, identifier: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(identifier, source);
        self
    }

    pub fn insert(&mut self, identifier: impl Into<String>, source: impl Into<String>) {
        self.units.insert(identifier.into(), source.into());
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn list_identifiers(&self) -> Result<Vec<String>> {
        Ok(self.units.keys().cloned().collect())
    }

    fn read(&self, identifier: &str) -> Result<String> {
        self.units
            .get(identifier)
            .cloned()
            .ok_or_else(|| Error::load(identifier, "no such content unit"))
    }
}
