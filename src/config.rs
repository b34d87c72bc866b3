use serde::Deserialize;

use crate::models::Strategy;
use crate::state::TaxonomyKind;

/// Client configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommendation backend base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Which taxonomy drives the catalog filter (category or brand)
    #[serde(default)]
    pub taxonomy: TaxonomyKind,

    /// Reserved catch-all category, always ordered last
    #[serde(default = "default_catch_all_category")]
    pub catch_all_category: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Strategy selected when a session starts
    #[serde(default)]
    pub preference: Strategy,
}

fn default_api_url() -> String {
    "https://rekomendasi-backend-production.up.railway.app".to_string()
}

fn default_catch_all_category() -> String {
    "Lainnya".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            taxonomy: TaxonomyKind::default(),
            catch_all_category: default_catch_all_category(),
            request_timeout_secs: default_request_timeout_secs(),
            preference: Strategy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Build a config from an explicit set of variables, ignoring the process environment
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
