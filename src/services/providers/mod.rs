//! Recommendation backend abstraction
//!
//! The session only talks to the backend through this trait, so the state
//! machine can be driven by the real HTTP client or by a mock in tests.

use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{RecommendRequest, RecommendedItem},
};

pub mod http;

pub use http::HttpRecommendationApi;

/// Trait for recommendation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    /// Full item list, each entry formatted as `"<code> - <name>"`
    async fn fetch_items(&self) -> AppResult<Vec<String>>;

    /// Category names, unordered
    async fn fetch_categories(&self) -> AppResult<Vec<String>>;

    /// Brand names in the backend's order
    async fn fetch_brands(&self) -> AppResult<Vec<String>>;

    /// Item code → category name
    async fn fetch_category_map(&self) -> AppResult<HashMap<String, String>>;

    /// Ranked recommendations for the given cart codes and strategy
    ///
    /// Returned verbatim; callers must not re-rank or filter.
    async fn recommend(&self, request: RecommendRequest) -> AppResult<Vec<RecommendedItem>>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
