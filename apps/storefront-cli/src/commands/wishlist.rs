//! # Wishlist Commands
//!
//! Saved products are a set keyed by product id; adding a saved product
//! changes nothing.

use serde::Serialize;
use storefront_core::{ProductId, WishlistEntry};
use storefront_state::{StoreOrchestrator, WishlistStore};
use tracing::debug;

use super::persist_warning;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub items: Vec<WishlistEntry>,
    pub count: usize,

    /// Set by `toggle`: whether the product is saved afterwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_warning: Option<String>,
}

impl From<&WishlistStore> for WishlistResponse {
    fn from(wishlist: &WishlistStore) -> Self {
        let items = wishlist.entries();
        WishlistResponse {
            count: items.len(),
            items,
            saved: None,
            persist_warning: persist_warning(wishlist.last_persist_error()),
        }
    }
}

pub fn get_wishlist(orchestrator: &StoreOrchestrator) -> WishlistResponse {
    debug!("get_wishlist command");
    WishlistResponse::from(orchestrator.wishlist())
}

pub fn add_to_wishlist(
    orchestrator: &StoreOrchestrator,
    product_id: ProductId,
) -> Result<WishlistResponse, ApiError> {
    debug!(product_id = %product_id, "add_to_wishlist command");
    let product = orchestrator.catalog().require(product_id)?;
    let wishlist = orchestrator.wishlist();
    wishlist.add(product);
    Ok(WishlistResponse::from(wishlist))
}

pub fn remove_from_wishlist(
    orchestrator: &StoreOrchestrator,
    product_id: ProductId,
) -> WishlistResponse {
    debug!(product_id = %product_id, "remove_from_wishlist command");
    let wishlist = orchestrator.wishlist();
    wishlist.remove(product_id);
    WishlistResponse::from(wishlist)
}

/// Saves the product if absent, unsaves it if present.
pub fn toggle_wishlist(
    orchestrator: &StoreOrchestrator,
    product_id: ProductId,
) -> Result<WishlistResponse, ApiError> {
    debug!(product_id = %product_id, "toggle_wishlist command");
    let product = orchestrator.catalog().require(product_id)?;
    let wishlist = orchestrator.wishlist();
    let saved = wishlist.toggle(product);
    Ok(WishlistResponse {
        saved: Some(saved),
        ..WishlistResponse::from(wishlist)
    })
}

pub fn clear_wishlist(orchestrator: &StoreOrchestrator) -> WishlistResponse {
    debug!("clear_wishlist command");
    let wishlist = orchestrator.wishlist();
    wishlist.clear();
    WishlistResponse::from(wishlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        add_to_wishlist(&orchestrator, ProductId(3)).unwrap();
        let response = add_to_wishlist(&orchestrator, ProductId(3)).unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.items[0].id, ProductId(3));
    }

    #[tokio::test]
    async fn test_toggle_reports_saved_state() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        let response = toggle_wishlist(&orchestrator, ProductId(5)).unwrap();
        assert_eq!(response.saved, Some(true));
        assert_eq!(response.count, 1);

        let response = toggle_wishlist(&orchestrator, ProductId(5)).unwrap();
        assert_eq!(response.saved, Some(false));
        assert_eq!(response.count, 0);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        add_to_wishlist(&orchestrator, ProductId(1)).unwrap();
        add_to_wishlist(&orchestrator, ProductId(2)).unwrap();

        let response = remove_from_wishlist(&orchestrator, ProductId(1));
        assert_eq!(response.count, 1);
        // absent id is a no-op
        let response = remove_from_wishlist(&orchestrator, ProductId(1));
        assert_eq!(response.count, 1);

        assert_eq!(clear_wishlist(&orchestrator).count, 0);
    }
}
