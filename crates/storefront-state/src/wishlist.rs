//! Wishlist store: persisted set of saved products under `wishlist-storage`.

use std::sync::Arc;

use storefront_core::{Product, ProductId, Wishlist, WishlistEntry};
use tracing::debug;

use crate::persist::{PersistFailure, PersistedStore, VersionedJson};
use crate::storage::SharedStorage;

/// Default storage key for the wishlist.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist-storage";

#[derive(Debug, Clone)]
pub struct WishlistStore {
    inner: Arc<PersistedStore<Wishlist>>,
}

impl WishlistStore {
    pub fn new(storage: SharedStorage, key: impl Into<String>, codec: VersionedJson) -> Self {
        WishlistStore {
            inner: Arc::new(PersistedStore::new(key, storage, codec)),
        }
    }

    pub fn add(&self, product: &Product) {
        let added = self.inner.set(|wishlist| wishlist.add(product));
        debug!(product_id = %product.id, added, "Wishlist add");
    }

    pub fn remove(&self, id: ProductId) {
        let removed = self.inner.set(|wishlist| wishlist.remove(id));
        debug!(product_id = %id, removed, "Wishlist remove");
    }

    /// Adds the product if absent, removes it if present, under one lock.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&self, product: &Product) -> bool {
        let saved = self.inner.set(|wishlist| wishlist.toggle(product));
        debug!(product_id = %product.id, saved, "Wishlist toggle");
        saved
    }

    pub fn clear(&self) {
        self.inner.set(Wishlist::clear);
        debug!("Wishlist cleared");
    }

    pub fn has(&self, id: ProductId) -> bool {
        self.inner.read(|wishlist| wishlist.has(id))
    }

    pub fn entries(&self) -> Vec<WishlistEntry> {
        self.inner.read(|wishlist| wishlist.entries().to_vec())
    }

    pub fn len(&self) -> usize {
        self.inner.read(Wishlist::len)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read(Wishlist::is_empty)
    }

    pub fn get(&self) -> Wishlist {
        self.inner.get()
    }

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
    use storefront_core::Money;

    fn necklace() -> Product {
        Product::new(ProductId(7), "Pearl Necklace", Money::from_cents(4500), "necklaces").unwrap()
    }

    fn store(storage: &MemoryStorage) -> WishlistStore {
        WishlistStore::new(
            Arc::new(storage.clone()),
            WISHLIST_STORAGE_KEY,
            VersionedJson::default(),
        )
    }

    #[test]
    fn test_double_add_keeps_one_entry() {
        let wishlist = store(&MemoryStorage::new());
        wishlist.add(&necklace());
        wishlist.add(&necklace());
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.has(ProductId(7)));
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let storage = MemoryStorage::new();
        let wishlist = store(&storage);
        let before = storage.get_item(WISHLIST_STORAGE_KEY).unwrap();

        assert!(wishlist.toggle(&necklace()));
        assert!(!wishlist.toggle(&necklace()));
        assert!(wishlist.is_empty());
        assert_eq!(before, None);
        assert_eq!(
            storage.get_item(WISHLIST_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"state":{"items":[]},"version":0}"#)
        );
    }

    #[test]
    fn test_toggle_restores_prior_bytes_for_first_entry() {
        let storage = MemoryStorage::new();
        let wishlist = store(&storage);
        let ring = Product::new(ProductId(2), "Gold Ring", Money::from_cents(900), "rings").unwrap();
        wishlist.add(&ring);
        wishlist.add(&necklace());
        let before = (wishlist.get(), storage.get_item(WISHLIST_STORAGE_KEY).unwrap());

        assert!(!wishlist.toggle(&ring));
        assert!(wishlist.toggle(&ring));

        assert_eq!(wishlist.entries()[0].id, ProductId(2));
        assert_eq!(
            (wishlist.get(), storage.get_item(WISHLIST_STORAGE_KEY).unwrap()),
            before
        );
    }

    #[test]
    fn test_reload_restores_entries() {
        let storage = MemoryStorage::new();
        let wishlist = store(&storage);
        wishlist.add(&necklace());
        wishlist.remove(ProductId(99));

        let reloaded = store(&storage);
        assert!(!reloaded.has(ProductId(7)));
        reloaded.rehydrate();
        assert_eq!(reloaded.get(), wishlist.get());
    }
}
