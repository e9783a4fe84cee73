//! # Cart Store
//!
//! Persisted handle around the [`Cart`] aggregate.
//!
//! ## Thread Safety
//! The store is a cheap `Clone` handle over `Arc<PersistedStore<Cart>>`.
//! Every mutation takes the store lock, mutates the cart and writes
//! `cart-storage` before releasing it, so concurrent callers observe (and
//! storage receives) mutations in a single order.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add / remove / update_quantity / clear                                 │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  PersistedStore::set ──► Cart (storefront-core) ──► set_item(key)       │
//! │                                                                         │
//! │  items / totals / subtotal / total_item_count                           │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  PersistedStore::read ──► recomputed from lines on every call           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use storefront_core::{Cart, CartLineItem, CartTotals, Money, Product, ProductId};
use tracing::debug;

use crate::persist::{PersistFailure, PersistedStore, VersionedJson};
use crate::storage::SharedStorage;

/// Default storage key for the cart.
pub const CART_STORAGE_KEY: &str = "cart-storage";

#[derive(Debug, Clone)]
pub struct CartStore {
    inner: Arc<PersistedStore<Cart>>,
}

impl CartStore {
    pub fn new(storage: SharedStorage, key: impl Into<String>, codec: VersionedJson) -> Self {
        CartStore {
            inner: Arc::new(PersistedStore::new(key, storage, codec)),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`.
    pub fn add(&self, product: &Product) {
        self.add_with_quantity(product, 1);
    }

    /// Adds `quantity` units of `product`. A quantity ≤ 0 leaves the cart
    /// unchanged (the unchanged cart is still written).
    pub fn add_with_quantity(&self, product: &Product, quantity: i64) {
        let changed = self.inner.set(|cart| cart.add(product, quantity));
        debug!(product_id = %product.id, quantity, changed, "Cart add");
    }

    pub fn remove(&self, id: ProductId) {
        let removed = self.inner.set(|cart| cart.remove(id));
        debug!(product_id = %id, removed, "Cart remove");
    }

    /// Sets a line's quantity; `quantity <= 0` removes the line.
    pub fn update_quantity(&self, id: ProductId, quantity: i64) {
        let changed = self.inner.set(|cart| cart.update_quantity(id, quantity));
        debug!(product_id = %id, quantity, changed, "Cart update quantity");
    }

    pub fn clear(&self) {
        self.inner.set(Cart::clear);
        debug!("Cart cleared");
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    /// Snapshot of the cart aggregate.
    pub fn get(&self) -> Cart {
        self.inner.get()
    }

    pub fn items(&self) -> Vec<CartLineItem> {
        self.inner.read(|cart| cart.items().to_vec())
    }

    pub fn total_item_count(&self) -> i64 {
        self.inner.read(Cart::total_item_count)
    }

    pub fn subtotal(&self) -> Money {
        self.inner.read(Cart::subtotal)
    }

    pub fn line_count(&self) -> usize {
        self.inner.read(Cart::line_count)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read(Cart::is_empty)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.inner.read(|cart| cart.contains(id))
    }

    pub fn quantity_of(&self, id: ProductId) -> i64 {
        self.inner.read(|cart| cart.quantity_of(id))
    }

    pub fn totals(&self) -> CartTotals {
        self.inner.read(|cart| CartTotals::from(cart))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn rehydrate(&self) {
        self.inner.rehydrate();
    }

    pub fn has_hydrated(&self) -> bool {
        self.inner.has_hydrated()
    }

    pub fn last_persist_error(&self) -> Option<PersistFailure> {
        self.inner.last_persist_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use storefront_core::MAX_CART_QUANTITY;

    fn product(id: u32, price_cents: i64) -> Product {
        Product::new(
            ProductId(id),
            format!("Product {}", id),
            Money::from_cents(price_cents),
            "rings",
        )
        .unwrap()
    }

    fn store(storage: &MemoryStorage) -> CartStore {
        CartStore::new(
            Arc::new(storage.clone()),
            CART_STORAGE_KEY,
            VersionedJson::default(),
        )
    }

    #[test]
    fn test_add_twice_then_zero_scenario() {
        let storage = MemoryStorage::new();
        let cart = store(&storage);
        let ring = product(1, 999);

        cart.add(&ring);
        cart.add(&ring);
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);
        assert_eq!(cart.line_count(), 1);

        cart.update_quantity(ProductId(1), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_huge_quantities_clamp_instead_of_overflowing() {
        let storage = MemoryStorage::new();
        let cart = store(&storage);
        let ring = product(1, 999);

        cart.add_with_quantity(&ring, i64::MAX / 2);
        cart.add_with_quantity(&ring, i64::MAX / 2 + 2);
        assert_eq!(cart.quantity_of(ProductId(1)), MAX_CART_QUANTITY);
        assert_eq!(cart.totals().subtotal.cents(), 999 * MAX_CART_QUANTITY);

        storage
            .set_item(
                CART_STORAGE_KEY,
                r#"{"state":{"items":[{"id":1,"name":"A","unitPrice":999,"image":"","category":"c","quantity":9223372036854775807}]},"version":0}"#,
            )
            .unwrap();
        let reloaded = store(&storage);
        reloaded.rehydrate();
        assert_eq!(reloaded.total_item_count(), MAX_CART_QUANTITY);
    }

    #[test]
    fn test_update_quantity_zero_matches_remove() {
        let storage_a = MemoryStorage::new();
        let storage_b = MemoryStorage::new();
        let a = store(&storage_a);
        let b = store(&storage_b);

        for cart in [&a, &b] {
            cart.add_with_quantity(&product(1, 500), 3);
            cart.add(&product(2, 250));
        }
        a.update_quantity(ProductId(1), 0);
        b.remove(ProductId(1));

        assert_eq!(a.get(), b.get());
        assert_eq!(
            storage_a.get_item(CART_STORAGE_KEY).unwrap(),
            storage_b.get_item(CART_STORAGE_KEY).unwrap()
        );
    }

    #[test]
    fn test_totals_match_persisted_quantities() {
        let storage = MemoryStorage::new();
        let cart = store(&storage);

        cart.add_with_quantity(&product(1, 1000), 2);
        cart.add(&product(2, 350));
        cart.add(&product(3, 125));
        cart.remove(ProductId(3));
        cart.update_quantity(ProductId(2), 4);

        let totals = cart.totals();
        assert_eq!(totals.total_item_count, 6);
        assert_eq!(totals.subtotal.cents(), 2 * 1000 + 4 * 350);

        let reloaded = store(&storage);
        reloaded.rehydrate();
        let persisted = reloaded.get();
        let qty_sum: i64 = persisted.items().iter().map(|i| i.quantity).sum();
        let price_sum: i64 = persisted
            .items()
            .iter()
            .map(|i| i.unit_price.cents() * i.quantity)
            .sum();
        assert_eq!(qty_sum, totals.total_item_count);
        assert_eq!(price_sum, totals.subtotal.cents());
    }

    #[test]
    fn test_every_mutation_writes() {
        let storage = MemoryStorage::new();
        let cart = store(&storage);
        assert!(storage.is_empty());

        cart.remove(ProductId(42));
        assert_eq!(
            storage.get_item(CART_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"state":{"items":[]},"version":0}"#)
        );
    }

    #[test]
    fn test_quota_failure_keeps_memory_state() {
        let storage = MemoryStorage::with_quota(64);
        let cart = store(&storage);

        cart.add(&product(1, 999));
        assert_eq!(cart.total_item_count(), 1);
        assert!(cart.last_persist_error().is_some());
        assert_eq!(storage.get_item(CART_STORAGE_KEY).unwrap(), None);

        cart.clear();
        assert!(cart.last_persist_error().is_none());
    }
}
