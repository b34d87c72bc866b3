use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Separator between code and name in a display label
pub const LABEL_DELIMITER: &str = " - ";

/// Stable item code (e.g. "A123"), the primary key of an item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(String);

impl ItemCode {
    /// Creates a code, trimming surrounding whitespace
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ItemCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

/// A purchasable item
///
/// The code is the identity; the name is only used for display. Items loaded
/// from the catalog have no price, items built from recommendations do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub code: ItemCode,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Item {
    /// Creates an item without a price
    pub fn new(code: impl Into<ItemCode>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into().trim().to_string(),
            price: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Parses a `"<code> - <name>"` label
    ///
    /// Splits on the first delimiter only, so a name containing `" - "` stays
    /// intact. A label without the delimiter is treated as a bare code.
    pub fn from_label(label: &str) -> Self {
        match label.split_once(LABEL_DELIMITER) {
            Some((code, name)) => Self::new(code, name),
            None => Self::new(label, ""),
        }
    }

    /// Display label, `"<code> - <name>"`
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.code.to_string()
        } else {
            format!("{}{}{}", self.code, LABEL_DELIMITER, self.name)
        }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
