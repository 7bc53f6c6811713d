//! Cart Store
//!
//! Per-session mutable order-in-progress. The cart owns its line items until
//! submission, holds no network state, and performs no validation against
//! current menu availability (menu truth lives in the menu provider).
//! All operations are synchronous and side-effect-free beyond the cart's own
//! state; submission-time validation is the caller's responsibility.

use crate::money;
use serde::{Deserialize, Serialize};
use shared::models::MenuItem;

/// One line of an order-in-progress, unique per `item_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    /// Unit price in currency unit
    pub unit_price: f64,
    pub quantity: u32,
}

/// Order-in-progress owned exclusively by one table session
///
/// Lines keep insertion order so the submitted item snapshot reads the way
/// the diner built it.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line with quantity 1, or increment an existing line by 1
    pub fn add_item(&mut self, item_id: &str, name: &str, unit_price: f64) {
        match self.lines.iter_mut().find(|l| l.item_id == item_id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                item_id: item_id.to_string(),
                name: name.to_string(),
                unit_price,
                quantity: 1,
            }),
        }
    }

    /// Add a menu item using its localized display name
    pub fn add_menu_item(&mut self, item: &MenuItem, lang: &str) {
        self.add_item(&item.id, item.name(lang), item.price);
    }

    /// Set the quantity of an existing line; 0 removes the line.
    /// Unknown `item_id` is a no-op.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(item_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = quantity;
        }
    }

    /// Remove a line entirely
    pub fn remove_item(&mut self, item_id: &str) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    /// Sum of quantities over all lines
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of unit_price x quantity over all lines
    pub fn total_price(&self) -> f64 {
        money::total(self.lines.iter().map(|l| (l.unit_price, l.quantity)))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines in insertion order
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}
