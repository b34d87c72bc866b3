/// HTTP recommendation backend
///
/// Endpoints:
/// 1. GET /items, /categories, /brands, /kodebara-kategori for the catalog
/// 2. POST /recommend for ranked suggestions
///
/// Every request carries an `x-request-id` so calls can be matched with
/// backend logs.
use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        BrandsResponse, CategoriesResponse, CategoryMapResponse, ItemsResponse, RecommendRequest,
        RecommendResponse, RecommendedItem,
    },
    services::providers::RecommendationApi,
};

/// HTTP header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct HttpRecommendationApi {
    http_client: HttpClient,
    api_url: String,
}

impl HttpRecommendationApi {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Sends a request tagged with a fresh request ID and decodes a 2xx JSON body
    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let request_id = Uuid::new_v4();
        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: T = response.json().await?;

        tracing::debug!(
            request_id = %request_id,
            path = %path,
            provider = self.name(),
            "Backend request completed"
        );

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let request = self.http_client.get(self.url(path));
        self.send_json(path, request).await
    }
}

async fn check_status(response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalApi(format!(
        "API returned status {}: {}",
        status, body
    )))
}

#[async_trait::async_trait]
impl RecommendationApi for HttpRecommendationApi {
    async fn fetch_items(&self) -> AppResult<Vec<String>> {
        let response: ItemsResponse = self.get_json("items").await?;
        Ok(response.items)
    }

    async fn fetch_categories(&self) -> AppResult<Vec<String>> {
        let response: CategoriesResponse = self.get_json("categories").await?;
        Ok(response.categories)
    }

    async fn fetch_brands(&self) -> AppResult<Vec<String>> {
        let response: BrandsResponse = self.get_json("brands").await?;
        Ok(response.brands)
    }

    async fn fetch_category_map(&self) -> AppResult<HashMap<String, String>> {
        let response: CategoryMapResponse = self.get_json("kodebara-kategori").await?;
        Ok(response.map)
    }

    async fn recommend(&self, request: RecommendRequest) -> AppResult<Vec<RecommendedItem>> {
        let builder = self.http_client.post(self.url("recommend")).json(&request);
        let response: RecommendResponse = self.send_json("recommend", builder).await?;

        tracing::info!(
            strategy = %request.preference_type,
            selected = request.selected_items.len(),
            results = response.recommendations.len(),
            provider = self.name(),
            "Recommendations fetched"
        );

        Ok(response.recommendations)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
