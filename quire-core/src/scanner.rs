use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::slug::{derive_slug, validate_slug};
use crate::store::ContentStore;

/// Maps public slugs onto content-unit identifiers.
#[derive(Clone)]
pub struct Scanner {
    store: Arc<dyn ContentStore>,
}

impl Scanner {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Identifiers sorted descending, so date-prefixed names come out
    /// most recent first.
    pub fn identifiers(&self) -> Result<Vec<String>> {
        let mut identifiers = self.store.list_identifiers()?;
        identifiers.sort_by(|a, b| b.cmp(a));
        Ok(identifiers)
    }

    pub fn list_slugs(&self) -> Result<Vec<String>> {
        Ok(self
            .identifiers()?
            .iter()
            .map(|id| derive_slug(id).to_string())
            .collect())
    }

    /// Returns the first identifier whose slug matches, scanning in
    /// ascending store order. A slug shared by several units resolves to
    /// the oldest one.
    pub fn resolve(&self, slug: &str) -> Result<String> {
        validate_slug(slug)?;

        let mut identifiers = self.store.list_identifiers()?;
        identifiers.sort();

        let identifier = identifiers
            .into_iter()
            .find(|id| derive_slug(id) == slug)
            .ok_or_else(|| Error::NotFound {
                slug: slug.to_string(),
            })?;

        debug!(slug, identifier, "resolved slug");
        Ok(identifier)
    }
}
