pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{HttpRecommendationApi, RecommendationApi, ShopSession};
pub use state::{reduce, transition, Action, Effect, ShopState};
