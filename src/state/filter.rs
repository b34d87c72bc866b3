use crate::models::Item;

use super::catalog::{CatalogIndex, TaxonomyKind, ALL_SENTINEL};

/// Active taxonomy selector plus free-text search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub selector: String,
    pub search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selector: ALL_SENTINEL.to_string(),
            search: String::new(),
        }
    }
}

impl FilterState {
    pub fn new(selector: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            search: search.into(),
        }
    }
}

/// Derives the visible subset of the catalog
///
/// Recomputed from scratch on every call. A selector the catalog does not
/// (or no longer) know about behaves like "All". Order follows the catalog.
pub fn visible_items<'a>(
    catalog: &'a CatalogIndex,
    filter: &FilterState,
    kind: TaxonomyKind,
) -> Vec<&'a Item> {
    let selector = effective_selector(catalog, &filter.selector);
    let needle = filter.search.to_lowercase();

    catalog
        .items()
        .iter()
        .filter(|item| match selector {
            Some(selector) => matches_selector(catalog, item, selector, kind),
            None => true,
        })
        .filter(|item| needle.is_empty() || item.label().to_lowercase().contains(&needle))
        .collect()
}

/// `None` means no taxonomy narrowing
fn effective_selector<'s>(catalog: &CatalogIndex, selector: &'s str) -> Option<&'s str> {
    if selector == ALL_SENTINEL {
        return None;
    }
    if !catalog.has_taxonomy_value(selector) {
        tracing::debug!(selector = %selector, "Stale taxonomy selector, showing all items");
        return None;
    }
    Some(selector)
}

fn matches_selector(
    catalog: &CatalogIndex,
    item: &Item,
    selector: &str,
    kind: TaxonomyKind,
) -> bool {
    match kind {
        TaxonomyKind::Category => catalog.category_of(&item.code) == Some(selector),
        TaxonomyKind::Brand => item
            .label()
            .to_lowercase()
            .contains(&selector.to_lowercase()),
    }
}
