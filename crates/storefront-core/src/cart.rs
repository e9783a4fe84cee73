//! # Cart
//!
//! The shopping cart aggregate and its derived totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action                Cart Method            State Change           │
//! │  ─────────                ───────────            ────────────           │
//! │                                                                         │
//! │  "Add to bag" ──────────► add(p, n) ──────────► qty += n | push line   │
//! │                                                                         │
//! │  Quantity stepper ──────► update_quantity() ──► qty = n | remove (≤0)  │
//! │                                                                         │
//! │  Trash icon ────────────► remove(id) ─────────► retain(id != x)        │
//! │                                                                         │
//! │  "Clear bag" ───────────► clear() ────────────► items.clear()          │
//! │                                                                         │
//! │  Header badge ──────────► total_item_count() ─► (read only, Σ qty)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never stored: every read recomputes them from the lines.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CartLineItem, Product, ProductId};
use crate::MAX_CART_QUANTITY;

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `id` (adding the same product increases quantity)
/// - Every line has `1 <= quantity <= MAX_CART_QUANTITY`
///
/// Deserialization re-establishes both invariants, so a hand-edited or
/// corrupted payload cannot smuggle in a zero-quantity row or a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "CartPayload")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

#[derive(Deserialize)]
struct CartPayload {
    #[serde(default)]
    items: Vec<CartLineItem>,
}

impl From<CartPayload> for Cart {
    fn from(payload: CartPayload) -> Self {
        Cart::from_items(payload.items)
    }
}

impl Cart {
    /// Builds a cart from arbitrary lines, merging duplicates, dropping
    /// non-positive quantities and clamping the rest to the line cap.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Cart::default();
        for mut item in items {
            if item.quantity <= 0 {
                continue;
            }
            match cart.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = capped_sum(existing.quantity, item.quantity);
                }
                None => {
                    item.quantity = item.quantity.min(MAX_CART_QUANTITY);
                    cart.items.push(item);
                }
            }
        }
        cart
    }

    /// Adds a product, or increases its quantity if already present.
    ///
    /// ## Behavior
    /// - Present: `quantity += quantity`, price and metadata untouched
    /// - Absent: new line snapshotting the product
    /// - `quantity <= 0`: nothing changes
    /// - The line quantity clamps at [`MAX_CART_QUANTITY`]
    ///
    /// Returns `true` if the cart changed.
    pub fn add(&mut self, product: &Product, quantity: i64) -> bool {
        if quantity <= 0 {
            return false;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            let updated = capped_sum(item.quantity, quantity);
            let changed = updated != item.quantity;
            item.quantity = updated;
            return changed;
        }

        let quantity = quantity.min(MAX_CART_QUANTITY);
        self.items.push(CartLineItem::from_product(product, quantity));
        true
    }

    /// Removes the line for `id`. Returns `true` if a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != initial_len
    }

    /// Sets the quantity for `id`.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: identical to [`Cart::remove`]
    /// - `id` absent: no-op
    /// - Clamped to [`MAX_CART_QUANTITY`]
    ///
    /// Returns `true` if the cart changed.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = quantity.min(MAX_CART_QUANTITY);

        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Quantity of `id` in the cart, 0 when absent.
    pub fn quantity_of(&self, id: ProductId) -> i64 {
        self.get(id).map_or(0, |i| i.quantity)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Σ quantity over all lines (the header badge number).
    pub fn total_item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit_price × quantity over all lines.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn capped_sum(current: i64, added: i64) -> i64 {
    current.saturating_add(added).min(MAX_CART_QUANTITY)
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_item_count: i64,
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_item_count: cart.total_item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, price_cents: i64) -> Product {
        Product::new(
            ProductId(id),
            format!("Product {}", id),
            Money::from_cents(price_cents),
            "rings",
        )
        .unwrap()
    }

    #[test]
    fn test_add_then_increment_then_zero_removes() {
        let mut cart = Cart::default();
        let ring = product(1, 999);

        cart.add(&ring, 1);
        assert_eq!(cart.total_item_count(), 1);
        assert_eq!(cart.subtotal().cents(), 999);

        cart.add(&ring, 1);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);

        cart.update_quantity(ProductId(1), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_keeps_frozen_price() {
        let mut cart = Cart::default();
        cart.add(&product(1, 999), 1);
        cart.add(&product(1, 5000), 2);

        let line = cart.get(ProductId(1)).unwrap();
        assert_eq!(line.unit_price.cents(), 999);
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_add_non_positive_quantity_is_noop() {
        let mut cart = Cart::default();
        assert!(!cart.add(&product(1, 999), 0));
        assert!(!cart.add(&product(1, 999), -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let mut a = Cart::default();
        let mut b = Cart::default();
        for cart in [&mut a, &mut b] {
            cart.add(&product(1, 100), 2);
            cart.add(&product(2, 250), 1);
        }

        a.update_quantity(ProductId(1), 0);
        b.remove(ProductId(1));
        assert_eq!(a, b);

        a.update_quantity(ProductId(2), -5);
        b.remove(ProductId(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_and_remove_absent_are_noops() {
        let mut cart = Cart::default();
        cart.add(&product(1, 100), 1);
        let before = cart.clone();

        assert!(!cart.update_quantity(ProductId(9), 4));
        assert!(!cart.remove(ProductId(9)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_totals_match_sums_over_mixed_sequence() {
        let mut cart = Cart::default();
        cart.add(&product(1, 999), 1);
        cart.add(&product(2, 1500), 3);
        cart.add(&product(1, 999), 2);
        cart.remove(ProductId(3));
        cart.add(&product(3, 10), 7);
        cart.remove(ProductId(2));

        let expected_count: i64 = cart.items().iter().map(|i| i.quantity).sum();
        let expected_subtotal: i64 = cart
            .items()
            .iter()
            .map(|i| i.unit_price.cents() * i.quantity)
            .sum();

        assert_eq!(cart.total_item_count(), expected_count);
        assert_eq!(cart.subtotal().cents(), expected_subtotal);
        assert_eq!(cart.total_item_count(), 10);
        assert_eq!(cart.subtotal().cents(), 999 * 3 + 10 * 7);
    }

    #[test]
    fn test_deserialize_repairs_invariants() {
        let json = r#"{"items":[
            {"id":1,"name":"A","unitPrice":100,"image":"","category":"c","quantity":1},
            {"id":1,"name":"A","unitPrice":100,"image":"","category":"c","quantity":2},
            {"id":2,"name":"B","unitPrice":50,"image":"","category":"c","quantity":0}
        ]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.quantity_of(ProductId(1)), 3);
        assert!(!cart.contains(ProductId(2)));
    }

    #[test]
    fn test_quantity_clamps_at_line_cap() {
        let mut cart = Cart::default();
        let ring = product(1, 999);

        assert!(cart.add(&ring, i64::MAX / 2));
        assert_eq!(cart.quantity_of(ProductId(1)), MAX_CART_QUANTITY);
        assert_eq!(cart.subtotal().cents(), 999 * MAX_CART_QUANTITY);

        // already at the cap
        assert!(!cart.add(&ring, i64::MAX / 2 + 2));
        assert_eq!(cart.quantity_of(ProductId(1)), MAX_CART_QUANTITY);

        cart.update_quantity(ProductId(1), 5);
        cart.update_quantity(ProductId(1), i64::MAX);
        assert_eq!(cart.quantity_of(ProductId(1)), MAX_CART_QUANTITY);
    }

    #[test]
    fn test_deserialize_clamps_huge_quantities() {
        let json = r#"{"items":[
            {"id":1,"name":"A","unitPrice":100,"image":"","category":"c","quantity":9223372036854775807},
            {"id":1,"name":"A","unitPrice":100,"image":"","category":"c","quantity":9223372036854775807},
            {"id":2,"name":"B","unitPrice":9223372036854775807,"image":"","category":"c","quantity":3}
        ]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.quantity_of(ProductId(1)), MAX_CART_QUANTITY);
        assert_eq!(cart.total_item_count(), MAX_CART_QUANTITY + 3);
        assert_eq!(cart.subtotal().cents(), i64::MAX);
    }

    #[test]
    fn test_cart_totals_summary() {
        let mut cart = Cart::default();
        cart.add(&product(1, 999), 2);
        cart.add(&product(2, 1), 1);

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_item_count, 3);
        assert_eq!(totals.subtotal.cents(), 1999);
    }
}
