//! # Wishlist
//!
//! Saved products with set semantics keyed by [`ProductId`]. Entries are
//! kept sorted by id, so the stored form depends only on which products
//! are saved, never on the order they were saved in.

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId, WishlistEntry};

/// The wishlist.
///
/// ## Invariants
/// - No two entries share `id`; adding a present id is a no-op
/// - Entries are sorted by `id`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "WishlistPayload")]
pub struct Wishlist {
    items: Vec<WishlistEntry>,
}

#[derive(Deserialize)]
struct WishlistPayload {
    #[serde(default)]
    items: Vec<WishlistEntry>,
}

impl From<WishlistPayload> for Wishlist {
    fn from(payload: WishlistPayload) -> Self {
        let mut wishlist = Wishlist::default();
        for entry in payload.items {
            wishlist.insert(entry);
        }
        wishlist
    }
}

impl Wishlist {
    /// Saves a product. Returns `true` if it was not already saved.
    pub fn add(&mut self, product: &Product) -> bool {
        if self.has(product.id) {
            return false;
        }
        self.insert(WishlistEntry::from_product(product))
    }

    fn insert(&mut self, entry: WishlistEntry) -> bool {
        match self.position(entry.id) {
            Ok(_) => false,
            Err(index) => {
                self.items.insert(index, entry);
                true
            }
        }
    }

    fn position(&self, id: ProductId) -> Result<usize, usize> {
        self.items.binary_search_by_key(&id, |e| e.id)
    }

    /// Removes a saved product. Returns `true` if it was present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        match self.position(id) {
            Ok(index) => {
                self.items.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Removes the product if saved, saves it otherwise.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        match self.position(product.id) {
            Ok(index) => {
                self.items.remove(index);
                false
            }
            Err(index) => {
                self.items.insert(index, WishlistEntry::from_product(product));
                true
            }
        }
    }

    pub fn has(&self, id: ProductId) -> bool {
        self.position(id).is_ok()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: u32) -> Product {
        Product::new(
            ProductId(id),
            format!("Necklace {}", id),
            Money::from_cents(2500),
            "necklaces",
        )
        .unwrap()
    }

    #[test]
    fn test_double_add_keeps_one_entry() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.add(&product(1)));
        assert!(!wishlist.add(&product(1)));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut wishlist = Wishlist::default();
        wishlist.add(&product(1));
        wishlist.add(&product(2));
        wishlist.add(&product(4));

        for id in [1, 2, 4, 3, 0, 9] {
            let before = wishlist.clone();
            let before_json = serde_json::to_string(&before).unwrap();
            wishlist.toggle(&product(id));
            assert_ne!(wishlist, before);
            wishlist.toggle(&product(id));
            assert_eq!(wishlist, before);
            assert_eq!(serde_json::to_string(&wishlist).unwrap(), before_json);
        }
    }

    #[test]
    fn test_entries_sorted_regardless_of_save_order() {
        let mut a = Wishlist::default();
        let mut b = Wishlist::default();
        for id in [3, 1, 2] {
            a.add(&product(id));
        }
        for id in [2, 3, 1] {
            b.toggle(&product(id));
        }

        assert_eq!(a, b);
        let ids: Vec<u32> = a.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_toggle_reports_membership() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.toggle(&product(5)));
        assert!(wishlist.has(ProductId(5)));
        assert!(!wishlist.toggle(&product(5)));
        assert!(!wishlist.has(ProductId(5)));
    }

    #[test]
    fn test_remove_absent_and_clear() {
        let mut wishlist = Wishlist::default();
        assert!(!wishlist.remove(ProductId(1)));
        wishlist.add(&product(1));
        wishlist.clear();
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let json = r#"{"items":[
            {"id":5,"name":"E","unitPrice":1,"image":"","category":"c"},
            {"id":1,"name":"A","unitPrice":1,"image":"","category":"c"},
            {"id":1,"name":"A again","unitPrice":1,"image":"","category":"c"}
        ]}"#;
        let wishlist: Wishlist = serde_json::from_str(json).unwrap();
        assert_eq!(wishlist.len(), 2);
        assert_eq!(wishlist.entries()[0].name, "A");
        assert_eq!(wishlist.entries()[1].id, ProductId(5));
    }
}
