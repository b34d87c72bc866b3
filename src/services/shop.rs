use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Item, ItemCode, RecommendRequest, RecommendedItem, Strategy},
    services::providers::RecommendationApi,
    state::{transition, Action, Effect, RequestTicket, Resource, ShopState, TaxonomyKind},
};

/// Drives a [`ShopState`] against a recommendation backend
///
/// Transitions are applied under a write lock that is never held across a
/// network call; responses are fed back in as actions whenever they land.
#[derive(Clone)]
pub struct ShopSession {
    api: Arc<dyn RecommendationApi>,
    state: Arc<RwLock<ShopState>>,
}

impl ShopSession {
    pub fn new(api: Arc<dyn RecommendationApi>, state: ShopState) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn from_config(api: Arc<dyn RecommendationApi>, config: &Config) -> Self {
        Self::new(api, ShopState::from_config(config))
    }

    /// Applies one action and returns the effect it requested, without running it
    pub async fn dispatch(&self, action: Action) -> Option<Effect> {
        let mut guard = self.state.write().await;
        transition(&mut guard, action)
    }

    /// Applies one action and runs whatever effect follows from it
    pub async fn apply(&self, action: Action) {
        if let Some(effect) = self.dispatch(action).await {
            self.run(effect).await;
        }
    }

    pub async fn snapshot(&self) -> ShopState {
        self.state.read().await.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&ShopState) -> R) -> R {
        let guard = self.state.read().await;
        f(&guard)
    }

    /// Loads every catalog resource concurrently
    ///
    /// Each response is applied as soon as it arrives; a failed resource is
    /// left empty and the rest of the catalog is still usable.
    pub async fn load_catalog(&self) {
        let resources = self.read(ShopState::catalog_resources).await;

        let mut tickets = Vec::new();
        for resource in resources {
            if let Some(Effect::Fetch(ticket)) = self.dispatch(Action::BeginLoad(resource)).await {
                tickets.push(ticket);
            }
        }

        let mut tasks = Vec::new();
        for ticket in tickets {
            let session = self.clone();
            tasks.push(tokio::spawn(async move { session.fetch(ticket).await }));
        }

        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Catalog load task join error");
            }
        }

        self.read(|state| {
            tracing::info!(
                items = state.catalog.items().len(),
                taxonomy = state.catalog.taxonomy().len() - 1,
                provider = self.api.name(),
                "Catalog load finished"
            );
        })
        .await;
    }

    /// Requests recommendations for the current cart
    ///
    /// Rejected with `InvalidInput` when the cart is empty or a request is
    /// already in flight. A backend failure is not an error here: the results
    /// are simply empty afterwards.
    pub async fn submit(&self) -> AppResult<Vec<RecommendedItem>> {
        match self.dispatch(Action::Submit).await {
            Some(Effect::Recommend { ticket, request }) => {
                self.recommend(ticket, request).await;
                Ok(self.read(|state| state.session.results().to_vec()).await)
            }
            _ => Err(AppError::InvalidInput(
                "Recommendations cannot be requested right now".to_string(),
            )),
        }
    }

    pub async fn toggle(&self, item: Item) {
        self.apply(Action::Toggle(item)).await;
    }

    pub async fn set_quantity(&self, code: ItemCode, raw: impl Into<String>) {
        self.apply(Action::SetQuantity {
            code,
            raw: raw.into(),
        })
        .await;
    }

    pub async fn select_taxonomy(&self, value: impl Into<String>) {
        self.apply(Action::SelectTaxonomy(value.into())).await;
    }

    pub async fn search(&self, query: impl Into<String>) {
        self.apply(Action::Search(query.into())).await;
    }

    pub async fn choose_strategy(&self, strategy: Strategy) {
        self.apply(Action::ChooseStrategy(strategy)).await;
    }

    pub async fn accept(&self, code: ItemCode) {
        self.apply(Action::Accept(code)).await;
    }

    /// Currently visible catalog items
    pub async fn visible_items(&self) -> Vec<Item> {
        self.read(|state| state.visible_items().into_iter().cloned().collect())
            .await
    }

    async fn run(&self, effect: Effect) {
        match effect {
            Effect::Fetch(ticket) => self.fetch(ticket).await,
            Effect::Recommend { ticket, request } => self.recommend(ticket, request).await,
        }
    }

    async fn fetch(&self, ticket: RequestTicket) {
        let action = match ticket.resource {
            Resource::Items => Action::ItemsLoaded {
                ticket,
                result: self.api.fetch_items().await,
            },
            Resource::Taxonomy => {
                let kind = self.read(ShopState::taxonomy_kind).await;
                let result = match kind {
                    TaxonomyKind::Category => self.api.fetch_categories().await,
                    TaxonomyKind::Brand => self.api.fetch_brands().await,
                };
                Action::TaxonomyLoaded { ticket, result }
            }
            Resource::CategoryMap => Action::CategoryMapLoaded {
                ticket,
                result: self.api.fetch_category_map().await,
            },
            Resource::Recommendation => {
                tracing::warn!(seq = ticket.seq, "Recommendation tickets are not fetched directly");
                return;
            }
        };

        self.dispatch(action).await;
    }

    async fn recommend(&self, ticket: RequestTicket, request: RecommendRequest) {
        let result = self.api.recommend(request).await;
        self.dispatch(Action::RecommendationsReceived { ticket, result })
            .await;
    }
}
