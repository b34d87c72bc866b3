//! Client-side shopping state
//!
//! All mutations go through [`reduce`], which takes the current state and an
//! [`Action`] and returns the next state plus an optional [`Effect`] for the
//! driver to perform. [`transition`] is the same step applied through a
//! `&mut` borrow, for callers that own the state behind a lock. Nothing in
//! here does I/O, so every transition can be tested without a backend.

use std::collections::HashMap;

use crate::{
    config::Config,
    error::AppResult,
    models::{Item, ItemCode, RecommendRequest, RecommendedItem, Strategy},
};

pub mod catalog;
pub mod filter;
pub mod selection;
pub mod sequence;
pub mod session;

pub use catalog::{CatalogIndex, SliceState, TaxonomyKind, ALL_SENTINEL};
pub use filter::{visible_items, FilterState};
pub use selection::{CartEntry, Quantity, SelectionStore};
pub use sequence::{RequestTicket, Resource, Sequencer};
pub use session::{Outcome, RecommendationSession, RecommendationStatus};

/// Everything a single shopping session holds in memory
#[derive(Debug, Clone)]
pub struct ShopState {
    pub catalog: CatalogIndex,
    pub filter: FilterState,
    pub selection: SelectionStore,
    pub session: RecommendationSession,
    pub strategy: Strategy,
    taxonomy: TaxonomyKind,
    catch_all: String,
    sequencer: Sequencer,
}

impl Default for ShopState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ShopState {
    pub fn new(taxonomy: TaxonomyKind, catch_all: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            catalog: CatalogIndex::new(),
            filter: FilterState::default(),
            selection: SelectionStore::new(),
            session: RecommendationSession::new(),
            strategy,
            taxonomy,
            catch_all: catch_all.into(),
            sequencer: Sequencer::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.taxonomy,
            config.catch_all_category.clone(),
            config.preference,
        )
    }

    pub fn taxonomy_kind(&self) -> TaxonomyKind {
        self.taxonomy
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        visible_items(&self.catalog, &self.filter, self.taxonomy)
    }

    pub fn can_submit(&self) -> bool {
        self.session.can_submit(&self.selection)
    }

    pub fn cart_visible(&self) -> bool {
        self.selection.is_visible()
    }

    /// Catalog resources this session needs, in load order
    pub fn catalog_resources(&self) -> Vec<Resource> {
        let mut resources = vec![Resource::Items, Resource::Taxonomy];
        if self.taxonomy.needs_category_map() {
            resources.push(Resource::CategoryMap);
        }
        resources
    }
}

/// Everything that can happen to a [`ShopState`]
#[derive(Debug)]
pub enum Action {
    /// Start loading one catalog resource
    BeginLoad(Resource),
    ItemsLoaded {
        ticket: RequestTicket,
        result: AppResult<Vec<String>>,
    },
    TaxonomyLoaded {
        ticket: RequestTicket,
        result: AppResult<Vec<String>>,
    },
    CategoryMapLoaded {
        ticket: RequestTicket,
        result: AppResult<HashMap<String, String>>,
    },
    SelectTaxonomy(String),
    Search(String),
    Toggle(Item),
    SetQuantity { code: ItemCode, raw: String },
    Remove(ItemCode),
    ClearCart,
    ChooseStrategy(Strategy),
    Submit,
    RecommendationsReceived {
        ticket: RequestTicket,
        result: AppResult<Vec<RecommendedItem>>,
    },
    Accept(ItemCode),
}

/// Work the driver must perform after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(RequestTicket),
    Recommend {
        ticket: RequestTicket,
        request: RecommendRequest,
    },
}

/// Applies `action` to `state`
///
/// Never fails: rejected input and stale responses are logged and leave the
/// state as it was.
pub fn reduce(mut state: ShopState, action: Action) -> (ShopState, Option<Effect>) {
    let effect = transition(&mut state, action);
    (state, effect)
}

/// In-place form of [`reduce`]
pub fn transition(state: &mut ShopState, action: Action) -> Option<Effect> {
    match action {
        Action::BeginLoad(Resource::Recommendation) => {
            tracing::warn!("Recommendations are requested through Submit, not BeginLoad");
            None
        }
        Action::BeginLoad(resource) => {
            let ticket = state.sequencer.issue(resource);
            tracing::debug!(resource = %resource, seq = ticket.seq, "Loading catalog resource");
            Some(Effect::Fetch(ticket))
        }
        Action::ItemsLoaded { ticket, result } => {
            if accept_load(state, &ticket, result.as_ref().err()) {
                if let Ok(labels) = result {
                    state.catalog.apply_items(labels);
                    tracing::info!(count = state.catalog.items().len(), "Items loaded");
                }
            }
            None
        }
        Action::TaxonomyLoaded { ticket, result } => {
            if accept_load(state, &ticket, result.as_ref().err()) {
                if let Ok(values) = result {
                    state
                        .catalog
                        .apply_taxonomy(values, state.taxonomy, &state.catch_all);
                    tracing::info!(
                        count = state.catalog.taxonomy().len() - 1,
                        kind = ?state.taxonomy,
                        "Taxonomy loaded"
                    );
                }
            }
            None
        }
        Action::CategoryMapLoaded { ticket, result } => {
            if accept_load(state, &ticket, result.as_ref().err()) {
                if let Ok(map) = result {
                    let count = map.len();
                    state.catalog.apply_category_map(map);
                    tracing::info!(count, "Category map loaded");
                }
            }
            None
        }
        Action::SelectTaxonomy(value) => {
            state.filter.selector = value;
            None
        }
        Action::Search(query) => {
            state.filter.search = query;
            None
        }
        Action::Toggle(item) => {
            state.selection.toggle(item);
            None
        }
        Action::SetQuantity { code, raw } => {
            if let Err(e) = state.selection.set_quantity_input(&code, &raw) {
                tracing::warn!(code = %code, error = %e, "Ignoring quantity input");
            }
            None
        }
        Action::Remove(code) => {
            state.selection.remove(&code);
            None
        }
        Action::ClearCart => {
            state.selection.clear();
            None
        }
        Action::ChooseStrategy(strategy) => {
            state.strategy = strategy;
            None
        }
        Action::Submit => submit(state),
        Action::RecommendationsReceived { ticket, result } => {
            if state.sequencer.is_latest(&ticket) {
                state.session.settle(ticket, result);
            } else {
                tracing::debug!(seq = ticket.seq, "Discarding stale recommendation response");
            }
            None
        }
        Action::Accept(code) => {
            state.session.accept(&code, &mut state.selection);
            None
        }
    }
}

fn submit(state: &mut ShopState) -> Option<Effect> {
    if !state.can_submit() {
        tracing::warn!(
            cart_size = state.selection.len(),
            pending = state.session.is_pending(),
            "Recommendation submission rejected"
        );
        return None;
    }

    let ticket = state.sequencer.issue(Resource::Recommendation);
    match state.session.submit(&state.selection, state.strategy, ticket) {
        Ok(request) => {
            tracing::info!(
                seq = ticket.seq,
                items = request.selected_items.len(),
                strategy = %state.strategy,
                "Submitting recommendation request"
            );
            Some(Effect::Recommend { ticket, request })
        }
        Err(e) => {
            tracing::warn!(error = %e, "Recommendation submission rejected");
            None
        }
    }
}

/// Checks a catalog response against the sequencer; on failure degrades the slice
///
/// Returns true when a successful, current response should be applied.
fn accept_load(
    state: &mut ShopState,
    ticket: &RequestTicket,
    error: Option<&crate::error::AppError>,
) -> bool {
    if !state.sequencer.is_latest(ticket) {
        tracing::debug!(
            resource = %ticket.resource,
            seq = ticket.seq,
            "Discarding stale catalog response"
        );
        return false;
    }

    if let Some(e) = error {
        tracing::error!(resource = %ticket.resource, error = %e, "Catalog load failed");
        state.catalog.fail(ticket.resource);
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn begin(state: ShopState, resource: Resource) -> (ShopState, RequestTicket) {
        match reduce(state, Action::BeginLoad(resource)) {
            (state, Some(Effect::Fetch(ticket))) => (state, ticket),
            other => panic!("expected fetch effect, got {:?}", other.1),
        }
    }

    fn loaded_fruit_state() -> ShopState {
        let state = ShopState::default();
        let (state, items) = begin(state, Resource::Items);
        let (state, taxonomy) = begin(state, Resource::Taxonomy);
        let (state, map) = begin(state, Resource::CategoryMap);

        // Responses land in a different order than they were issued
        let (state, _) = reduce(
            state,
            Action::CategoryMapLoaded {
                ticket: map,
                result: Ok(HashMap::from([
                    ("A1".to_string(), "Fruit".to_string()),
                    ("B2".to_string(), "Fruit".to_string()),
                ])),
            },
        );
        let (state, _) = reduce(
            state,
            Action::TaxonomyLoaded {
                ticket: taxonomy,
                result: Ok(strings(&["Fruit"])),
            },
        );
        let (state, _) = reduce(
            state,
            Action::ItemsLoaded {
                ticket: items,
                result: Ok(strings(&["A1 - Apple", "B2 - Banana"])),
            },
        );
        state
    }

    fn visible_labels(state: &ShopState) -> Vec<String> {
        state.visible_items().into_iter().map(Item::label).collect()
    }

    #[test]
    fn test_catalog_loads_in_any_order() {
        let state = loaded_fruit_state();
        assert!(state.catalog.is_complete(TaxonomyKind::Category));
        assert_eq!(state.catalog.taxonomy(), &strings(&["Semua", "Fruit"])[..]);
        assert_eq!(visible_labels(&state), vec!["A1 - Apple", "B2 - Banana"]);
    }

    #[test]
    fn test_filter_scenario() {
        let state = loaded_fruit_state();
        let (state, _) = reduce(state, Action::SelectTaxonomy("Fruit".to_string()));
        assert_eq!(visible_labels(&state), vec!["A1 - Apple", "B2 - Banana"]);

        let (state, _) = reduce(state, Action::Search("ban".to_string()));
        assert_eq!(visible_labels(&state), vec!["B2 - Banana"]);
    }

    #[test]
    fn test_stale_catalog_response_is_discarded() {
        let state = ShopState::default();
        let (state, old) = begin(state, Resource::Items);
        let (state, new) = begin(state, Resource::Items);

        let (state, _) = reduce(
            state,
            Action::ItemsLoaded {
                ticket: new,
                result: Ok(strings(&["N1 - New"])),
            },
        );
        let (state, _) = reduce(
            state,
            Action::ItemsLoaded {
                ticket: old,
                result: Ok(strings(&["O1 - Old"])),
            },
        );

        assert_eq!(visible_labels(&state), vec!["N1 - New"]);
    }

    #[test]
    fn test_failed_load_degrades_only_that_slice() {
        let state = ShopState::default();
        let (state, items) = begin(state, Resource::Items);
        let (state, taxonomy) = begin(state, Resource::Taxonomy);

        let (state, _) = reduce(
            state,
            Action::TaxonomyLoaded {
                ticket: taxonomy,
                result: Err(AppError::ExternalApi("API returned status 503".to_string())),
            },
        );
        let (state, _) = reduce(
            state,
            Action::ItemsLoaded {
                ticket: items,
                result: Ok(strings(&["A1 - Apple"])),
            },
        );

        assert_eq!(state.catalog.slice_state(Resource::Taxonomy), SliceState::Failed);
        assert_eq!(state.catalog.taxonomy(), &strings(&["Semua"])[..]);
        assert_eq!(visible_labels(&state), vec!["A1 - Apple"]);
    }

    #[test]
    fn test_begin_load_rejects_recommendation() {
        let (_, effect) = reduce(
            ShopState::default(),
            Action::BeginLoad(Resource::Recommendation),
        );
        assert_eq!(effect, None);
    }

    #[test]
    fn test_submit_with_empty_cart_has_no_effect() {
        let state = loaded_fruit_state();
        assert!(!state.can_submit());

        let (state, effect) = reduce(state, Action::Submit);
        assert_eq!(effect, None);
        assert_eq!(state.session.status(), &RecommendationStatus::Idle);
    }

    #[test]
    fn test_submit_builds_request() {
        let state = loaded_fruit_state();
        let (state, _) = reduce(state, Action::Toggle(Item::from_label("A1 - Apple")));
        let (state, _) = reduce(state, Action::ChooseStrategy(Strategy::Item));

        let (state, effect) = reduce(state, Action::Submit);
        match effect {
            Some(Effect::Recommend { request, .. }) => {
                assert_eq!(request.selected_items, strings(&["A1"]));
                assert_eq!(request.preference_type, Strategy::Item);
            }
            other => panic!("expected recommend effect, got {:?}", other),
        }
        assert!(state.session.is_pending());
        assert!(!state.can_submit());
    }

    #[test]
    fn test_receive_and_accept_recommendation() {
        let state = loaded_fruit_state();
        let (state, _) = reduce(state, Action::Toggle(Item::from_label("A1 - Apple")));
        let (state, effect) = reduce(state, Action::Submit);
        let ticket = match effect {
            Some(Effect::Recommend { ticket, .. }) => ticket,
            other => panic!("expected recommend effect, got {:?}", other),
        };

        let (state, _) = reduce(
            state,
            Action::RecommendationsReceived {
                ticket,
                result: Ok(vec![RecommendedItem {
                    kode: "C3".to_string(),
                    nama: "Cherry".to_string(),
                    harga: 5000.0,
                }]),
            },
        );
        let (state, _) = reduce(state, Action::Accept(ItemCode::new("C3")));
        let (state, _) = reduce(state, Action::Accept(ItemCode::new("C3")));

        let labels: Vec<String> = state.selection.entries().iter().map(CartEntry::label).collect();
        assert_eq!(labels, vec!["A1 - Apple", "C3 - Cherry"]);
        assert_eq!(
            state.selection.get(&ItemCode::new("C3")).unwrap().quantity,
            Quantity::ONE
        );
        assert!(state.can_submit());
    }

    #[test]
    fn test_invalid_quantity_input_is_ignored() {
        let state = ShopState::default();
        let (state, _) = reduce(state, Action::Toggle(Item::from_label("A1 - Apple")));
        let (state, _) = reduce(
            state,
            Action::SetQuantity {
                code: ItemCode::new("A1"),
                raw: "-4".to_string(),
            },
        );
        assert_eq!(state.selection.total_quantity(), 1);

        let (state, _) = reduce(
            state,
            Action::SetQuantity {
                code: ItemCode::new("A1"),
                raw: "3".to_string(),
            },
        );
        assert_eq!(state.selection.total_quantity(), 3);
    }

    #[test]
    fn test_remove_and_clear_hide_cart() {
        let state = ShopState::default();
        let (state, _) = reduce(state, Action::Toggle(Item::from_label("A1 - Apple")));
        let (state, _) = reduce(state, Action::Toggle(Item::from_label("B2 - Banana")));
        assert!(state.cart_visible());

        let (state, _) = reduce(state, Action::Remove(ItemCode::new("A1")));
        assert_eq!(state.selection.len(), 1);

        let (state, _) = reduce(state, Action::ClearCart);
        assert!(!state.cart_visible());
    }

    #[test]
    fn test_brand_session_skips_category_map() {
        let state = ShopState::new(TaxonomyKind::Brand, "Lainnya", Strategy::Brand);
        assert_eq!(
            state.catalog_resources(),
            vec![Resource::Items, Resource::Taxonomy]
        );
        assert_eq!(
            ShopState::default().catalog_resources(),
            vec![Resource::Items, Resource::Taxonomy, Resource::CategoryMap]
        );
    }

    #[test]
    fn test_transition_updates_borrowed_state() {
        let mut state = ShopState::new(TaxonomyKind::Brand, "Lainnya", Strategy::User);
        let (ticket_state, ticket) = begin(state.clone(), Resource::Items);

        assert!(transition(&mut state, Action::Toggle(Item::from_label("A1 - Apple"))).is_none());
        assert!(matches!(
            transition(&mut state, Action::BeginLoad(Resource::Items)),
            Some(Effect::Fetch(t)) if t == ticket
        ));
        assert_eq!(state.selection.len(), 1);
        assert_eq!(state.taxonomy_kind(), TaxonomyKind::Brand);
        assert_eq!(state.strategy, Strategy::User);
        assert_eq!(ticket_state.selection.len(), 0);

        let effect = transition(&mut state, Action::Submit);
        assert!(matches!(effect, Some(Effect::Recommend { .. })));
        assert!(state.session.is_pending());
    }
}
