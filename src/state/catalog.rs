use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{Item, ItemCode};

use super::sequence::Resource;

/// Selector value that disables taxonomy filtering
pub const ALL_SENTINEL: &str = "Semua";

/// Which taxonomy the catalog filter is driven by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    /// Filter through the code → category map
    #[default]
    Category,
    /// Filter by brand name appearing in the item label
    Brand,
}

impl TaxonomyKind {
    pub fn needs_category_map(&self) -> bool {
        matches!(self, TaxonomyKind::Category)
    }
}

/// Load state of one slice of the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SliceState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

impl SliceState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, SliceState::Pending)
    }
}

/// Everything the session knows about the catalog
///
/// The three slices are loaded independently and may resolve in any order,
/// so every accessor works on a partially populated index.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    items: Vec<Item>,
    taxonomy: Vec<String>,
    category_map: HashMap<ItemCode, String>,
    items_state: SliceState,
    taxonomy_state: SliceState,
    category_map_state: SliceState,
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            taxonomy: vec![ALL_SENTINEL.to_string()],
            category_map: HashMap::new(),
            items_state: SliceState::Pending,
            taxonomy_state: SliceState::Pending,
            category_map_state: SliceState::Pending,
        }
    }

    /// Replaces the item list from `"<code> - <name>"` labels
    pub fn apply_items(&mut self, labels: Vec<String>) {
        self.items = labels.iter().map(|label| Item::from_label(label)).collect();
        self.items_state = SliceState::Loaded;
    }

    /// Replaces the taxonomy values, applying the ordering policy
    pub fn apply_taxonomy(&mut self, values: Vec<String>, kind: TaxonomyKind, catch_all: &str) {
        self.taxonomy = order_taxonomy(values, kind, catch_all);
        self.taxonomy_state = SliceState::Loaded;
    }

    /// Category names are trimmed the same way taxonomy values are
    pub fn apply_category_map(&mut self, map: HashMap<String, String>) {
        self.category_map = map
            .into_iter()
            .map(|(code, category)| (ItemCode::new(code), category.trim().to_string()))
            .collect();
        self.category_map_state = SliceState::Loaded;
    }

    /// Degrades a slice to empty after a failed load
    pub fn fail(&mut self, resource: Resource) {
        match resource {
            Resource::Items => {
                self.items.clear();
                self.items_state = SliceState::Failed;
            }
            Resource::Taxonomy => {
                self.taxonomy = vec![ALL_SENTINEL.to_string()];
                self.taxonomy_state = SliceState::Failed;
            }
            Resource::CategoryMap => {
                self.category_map.clear();
                self.category_map_state = SliceState::Failed;
            }
            Resource::Recommendation => {}
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Taxonomy values, always starting with the "All" sentinel
    pub fn taxonomy(&self) -> &[String] {
        &self.taxonomy
    }

    pub fn has_taxonomy_value(&self, value: &str) -> bool {
        self.taxonomy.iter().any(|v| v == value)
    }

    pub fn category_of(&self, code: &ItemCode) -> Option<&str> {
        self.category_map.get(code).map(String::as_str)
    }

    pub fn find(&self, code: &ItemCode) -> Option<&Item> {
        self.items.iter().find(|item| &item.code == code)
    }

    pub fn slice_state(&self, resource: Resource) -> SliceState {
        match resource {
            Resource::Items => self.items_state,
            Resource::Taxonomy => self.taxonomy_state,
            Resource::CategoryMap => self.category_map_state,
            Resource::Recommendation => SliceState::Pending,
        }
    }

    /// Whether every slice needed for `kind` has resolved, successfully or not
    pub fn is_complete(&self, kind: TaxonomyKind) -> bool {
        self.items_state.is_resolved()
            && self.taxonomy_state.is_resolved()
            && (!kind.needs_category_map() || self.category_map_state.is_resolved())
    }
}

/// Orders raw taxonomy values for display
///
/// Categories: ordinary values sorted lexicographically, the catch-all last.
/// Brands keep the server's order. Both are de-duplicated and always start
/// with the "All" sentinel.
pub fn order_taxonomy(values: Vec<String>, kind: TaxonomyKind, catch_all: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordinary: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != ALL_SENTINEL)
        .filter(|v| seen.insert(v.clone()))
        .collect();

    let mut ordered = vec![ALL_SENTINEL.to_string()];
    match kind {
        TaxonomyKind::Category => {
            let has_catch_all = ordinary.iter().any(|v| v == catch_all);
            ordinary.retain(|v| v != catch_all);
            ordinary.sort();
            ordered.extend(ordinary);
            if has_catch_all {
                ordered.push(catch_all.to_string());
            }
        }
        TaxonomyKind::Brand => ordered.extend(ordinary),
    }

    ordered
}
