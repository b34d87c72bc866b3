pub mod providers;
pub mod shop;

pub use providers::{HttpRecommendationApi, RecommendationApi};
pub use shop::ShopSession;
