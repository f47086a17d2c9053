//! Identifier ↔ slug mapping.
//!
//! Post directories are named `YYYY-MM-DD-<slug>`. The public slug is the
//! directory name with that date prefix cut off, nothing more: no
//! lowercasing, no character filtering.

use crate::error::{Error, Result};

/// Length of the `YYYY-MM-DD-` prefix removed from an identifier.
pub const SLUG_PREFIX_LEN: usize = 11;

/// Derives the public slug for a content identifier.
///
/// Identifiers shorter than the prefix derive the empty slug.
///
/// ```
/// use quire_core::slug::derive_slug;
///
/// assert_eq!(derive_slug("2020-01-01-hello-world"), "hello-world");
/// assert_eq!(derive_slug("notes"), "");
/// ```
pub fn derive_slug(identifier: &str) -> &str {
    match identifier.char_indices().nth(SLUG_PREFIX_LEN) {
        Some((offset, _)) => &identifier[offset..],
        None => "",
    }
}

/// Rejects slugs that can never name a post.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.trim().is_empty() {
        return Err(Error::invalid_input("post slug not provided"));
    }

    if slug.contains(['/', '\\']) {
        return Err(Error::invalid_input(format!(
            "post slug must be a single path segment: {slug:?}"
        )));
    }

    Ok(())
}
