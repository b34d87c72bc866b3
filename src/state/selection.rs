use serde::Serialize;
use std::num::NonZeroU32;

use crate::{
    error::{AppError, AppResult},
    models::{Item, ItemCode},
};

/// Cart quantity, at least 1 by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    pub fn new(qty: u32) -> AppResult<Self> {
        NonZeroU32::new(qty)
            .map(Self)
            .ok_or_else(|| AppError::InvalidInput("Quantity must be at least 1".to_string()))
    }

    /// Parses raw text from a quantity input
    pub fn parse(raw: &str) -> AppResult<Self> {
        let qty = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid quantity: {:?}", raw)))?;
        Self::new(qty)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

/// One row of the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub item: Item,
    pub quantity: Quantity,
}

impl CartEntry {
    pub fn label(&self) -> String {
        self.item.label()
    }
}

/// The cart: insertion-ordered entries, unique by item code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStore {
    entries: Vec<CartEntry>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the item if present, otherwise appends it with quantity 1
    ///
    /// Returns whether the item is in the cart afterwards.
    pub fn toggle(&mut self, item: Item) -> bool {
        if self.remove(&item.code) {
            false
        } else {
            self.push(item);
            true
        }
    }

    /// Inserts with quantity 1 unless already present; never removes
    pub fn add_if_absent(&mut self, item: Item) -> bool {
        if self.contains(&item.code) {
            return false;
        }
        self.push(item);
        true
    }

    /// Replaces the quantity of an existing entry; absent codes are ignored
    pub fn set_quantity(&mut self, code: &ItemCode, qty: u32) -> AppResult<()> {
        let quantity = Quantity::new(qty)?;
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.item.code == code) {
            entry.quantity = quantity;
        }
        Ok(())
    }

    /// Like [`set_quantity`](Self::set_quantity) but from raw text input
    pub fn set_quantity_input(&mut self, code: &ItemCode, raw: &str) -> AppResult<()> {
        let quantity = Quantity::parse(raw)?;
        self.set_quantity(code, quantity.get())
    }

    pub fn remove(&mut self, code: &ItemCode) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.item.code != code);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, code: &ItemCode) -> bool {
        self.get(code).is_some()
    }

    pub fn get(&self, code: &ItemCode) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.item.code == code)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity.get())).sum()
    }

    /// Item codes in cart order
    pub fn codes(&self) -> Vec<ItemCode> {
        self.entries.iter().map(|e| e.item.code.clone()).collect()
    }

    /// The cart panel is only shown when something is in it
    pub fn is_visible(&self) -> bool {
        !self.is_empty()
    }

    fn push(&mut self, item: Item) {
        self.entries.push(CartEntry {
            item,
            quantity: Quantity::ONE,
        });
    }
}
