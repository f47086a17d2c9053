use std::collections::BTreeSet;

use tracing::warn;

use crate::error::Result;
use crate::scanner::Scanner;

/// Every slug that may be rendered, most recent first.
///
/// The list is closed: a slug missing from it is a not-found page, never a
/// dynamic lookup.
pub fn enumerate(scanner: &Scanner) -> Result<Vec<String>> {
    let slugs = scanner.list_slugs()?;
    let total = slugs.len();

    let slugs: Vec<String> = slugs.into_iter().filter(|slug| !slug.is_empty()).collect();
    if slugs.len() != total {
        warn!(
            skipped = total - slugs.len(),
            "content directories without a date prefix have no slug"
        );
    }

    // One page per slug; resolve picks which unit backs a shared slug
    let mut seen = BTreeSet::new();
    let mut unique = Vec::with_capacity(slugs.len());
    for slug in slugs {
        if seen.contains(&slug) {
            warn!(slug, "several content directories share this slug");
            continue;
        }
        seen.insert(slug.clone());
        unique.push(slug);
    }

    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn descending_identifier_order() {
        let store = MemoryStore::new()
            .with_unit("2019-05-05-b", "")
            .with_unit("2020-01-01-a", "");
        let scanner = Scanner::new(Arc::new(store));
        assert_eq!(enumerate(&scanner).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn one_slug_per_unit() {
        let store = MemoryStore::new()
            .with_unit("2021-02-03-c", "")
            .with_unit("2020-01-01-a", "")
            .with_unit("2019-05-05-b", "");
        let count = store.len();
        let scanner = Scanner::new(Arc::new(store));

        let slugs = enumerate(&scanner).unwrap();
        let unique: std::collections::BTreeSet<_> = slugs.iter().collect();
        assert_eq!(unique.len(), count);
    }

    #[test]
    fn undated_units_are_left_out() {
        let store = MemoryStore::new()
            .with_unit("drafts", "")
            .with_unit("2020-01-01-a", "");
        let scanner = Scanner::new(Arc::new(store));
        assert_eq!(enumerate(&scanner).unwrap(), vec!["a"]);
    }

    #[test]
    fn shared_slug_is_listed_once() {
        let store = MemoryStore::new()
            .with_unit("2021-01-01-same", "")
            .with_unit("2020-06-01-other", "")
            .with_unit("2019-01-01-same", "");
        let scanner = Scanner::new(Arc::new(store));

        assert_eq!(enumerate(&scanner).unwrap(), vec!["same", "other"]);
        assert_eq!(scanner.resolve("same").unwrap(), "2019-01-01-same");
    }

    #[test]
    fn empty_store_enumerates_nothing() {
        let scanner = Scanner::new(Arc::new(MemoryStore::new()));
        assert!(enumerate(&scanner).unwrap().is_empty());
    }
}
