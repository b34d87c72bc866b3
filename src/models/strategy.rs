use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Similarity signal the backend uses to rank recommendations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Items similar to the ones already in the cart
    #[default]
    Item,
    /// Items bought by users with similar carts
    User,
    /// Items from brands similar to the ones in the cart
    Brand,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Item, Strategy::User, Strategy::Brand];

    /// Wire tag sent as `preference_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Item => "item",
            Strategy::User => "user",
            Strategy::Brand => "brand",
        }
    }

    /// Tooltip shown next to the strategy picker
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Item => {
                "Direkomendasikan produk berdasarkan preferensi item dari barang yang telah dipilih di keranjang."
            }
            Strategy::User => {
                "Direkomendasikan produk berdasarkan preferensi pembelian user lain yang serupa dari barang yang telah dipilih di keranjang."
            }
            Strategy::Brand => {
                "Direkomendasikan produk berdasarkan preferensi brand sejenis dari barang yang telah dipilih di keranjang."
            }
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "item" => Ok(Strategy::Item),
            "user" => Ok(Strategy::User),
            "brand" => Ok(Strategy::Brand),
            other => Err(AppError::InvalidInput(format!(
                "Unknown preference type: {}",
                other
            ))),
        }
    }
}
