use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod item;
mod strategy;

pub use item::{Item, ItemCode, LABEL_DELIMITER};
pub use strategy::Strategy;

// ============================================================================
// Recommendation backend wire types
// ============================================================================

/// Response from GET /items, each entry pre-formatted as `"<code> - <name>"`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<String>,
}

/// Response from GET /categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Response from GET /brands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandsResponse {
    pub brands: Vec<String>,
}

/// Response from GET /kodebara-kategori: item code → category name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMapResponse {
    pub map: HashMap<String, String>,
}

/// Body of POST /recommend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub selected_items: Vec<String>,
    pub preference_type: Strategy,
}

/// Response from POST /recommend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendedItem>,
}

/// A single ranked suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub kode: String,
    pub nama: String,
    pub harga: f64,
}

impl RecommendedItem {
    pub fn code(&self) -> ItemCode {
        ItemCode::new(&self.kode)
    }

    /// Price formatted for display, e.g. "Rp5.000"
    pub fn display_price(&self) -> String {
        format_rupiah(self.harga)
    }
}

impl From<&RecommendedItem> for Item {
    fn from(rec: &RecommendedItem) -> Self {
        Item::new(rec.kode.as_str(), rec.nama.as_str()).with_price(rec.harga)
    }
}

/// Formats an amount the way the id-ID locale does: `.` groups thousands,
/// `,` separates up to three fraction digits
pub fn format_rupiah(amount: f64) -> String {
    let scaled = (amount.abs() * 1000.0).round() as u64;
    let whole = scaled / 1000;
    let fraction = scaled % 1000;

    let digits = whole.to_string();
    let mut out = String::from("Rp");
    if amount < 0.0 && scaled > 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    if fraction > 0 {
        let fraction = format!("{:03}", fraction);
        out.push(',');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out
}
