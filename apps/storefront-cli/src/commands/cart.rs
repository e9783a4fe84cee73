//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  cart add   ┌──────────┐  cart clear  ┌──────────┐        │
//! │  │  Empty   │────────────►│ In Cart  │─────────────►│  Empty   │        │
//! │  │  Cart    │             │          │              │  Cart    │        │
//! │  └──────────┘             └──────────┘              └──────────┘        │
//! │                            │   ▲                                        │
//! │                  cart set  │   │ cart add (increments)                  │
//! │                  cart remove   │                                        │
//! │                            ▼   │                                        │
//! │                     (persisted after every action)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::validation::validate_quantity;
use storefront_core::{CartLineItem, CartTotals, ProductId};
use storefront_state::{CartStore, StoreOrchestrator};
use tracing::debug;

use super::persist_warning;
use crate::error::ApiError;

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub totals: CartTotals,

    /// Present when the last write to storage failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_warning: Option<String>,
}

impl From<&CartStore> for CartResponse {
    fn from(cart: &CartStore) -> Self {
        let snapshot = cart.get();
        CartResponse {
            items: snapshot.items().to_vec(),
            totals: CartTotals::from(&snapshot),
            persist_warning: persist_warning(cart.last_persist_error()),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(orchestrator: &StoreOrchestrator) -> CartResponse {
    debug!("get_cart command");
    CartResponse::from(orchestrator.cart())
}

/// Adds a catalog product to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases
/// - If product not in cart: added as new line
/// - Price is frozen at time of adding
pub fn add_to_cart(
    orchestrator: &StoreOrchestrator,
    product_id: ProductId,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "add_to_cart command");
    validate_quantity(quantity)?;

    let product = orchestrator.catalog().require(product_id)?;
    let cart = orchestrator.cart();
    cart.add_with_quantity(product, quantity);

    Ok(CartResponse::from(cart))
}

/// Sets a line's quantity. Zero removes the line.
pub fn update_cart_item(
    orchestrator: &StoreOrchestrator,
    product_id: ProductId,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");
    if quantity != 0 {
        validate_quantity(quantity)?;
    }

    let cart = orchestrator.cart();
    if !cart.contains(product_id) {
        return Err(ApiError::not_found("Cart item", &product_id.to_string()));
    }
    cart.update_quantity(product_id, quantity);

    Ok(CartResponse::from(cart))
}

/// Removes a line. Removing an absent product is not an error.
pub fn remove_from_cart(orchestrator: &StoreOrchestrator, product_id: ProductId) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");
    let cart = orchestrator.cart();
    cart.remove(product_id);
    CartResponse::from(cart)
}

pub fn clear_cart(orchestrator: &StoreOrchestrator) -> CartResponse {
    debug!("clear_cart command");
    let cart = orchestrator.cart();
    cart.clear();
    CartResponse::from(cart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::ErrorCode;
    use std::sync::Arc;
    use storefront_core::{Money, MAX_CART_QUANTITY};
    use storefront_state::MemoryStorage;

    #[tokio::test]
    async fn test_add_increments_and_freezes_price() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        add_to_cart(&orchestrator, ProductId(4), 1).unwrap();
        let response = add_to_cart(&orchestrator, ProductId(4), 2).unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].quantity, 3);
        let price = orchestrator.catalog().require(ProductId(4)).unwrap().price;
        assert_eq!(response.items[0].unit_price, price);
        assert_eq!(response.totals.subtotal, price.multiply_quantity(3));
        assert!(response.persist_warning.is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        let err = add_to_cart(&orchestrator, ProductId(4), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_to_cart(&orchestrator, ProductId(404), 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert!(get_cart(&orchestrator).items.is_empty());
    }

    #[tokio::test]
    async fn test_quantity_above_line_cap_is_rejected() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        let err = add_to_cart(&orchestrator, ProductId(1), i64::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = add_to_cart(&orchestrator, ProductId(1), MAX_CART_QUANTITY + 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        add_to_cart(&orchestrator, ProductId(1), MAX_CART_QUANTITY).unwrap();
        let err = update_cart_item(&orchestrator, ProductId(1), i64::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // another add at the cap clamps rather than overflowing
        let response = add_to_cart(&orchestrator, ProductId(1), 1).unwrap();
        assert_eq!(response.totals.total_item_count, MAX_CART_QUANTITY);
    }

    #[tokio::test]
    async fn test_set_zero_removes_line() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        add_to_cart(&orchestrator, ProductId(1), 2).unwrap();
        add_to_cart(&orchestrator, ProductId(2), 1).unwrap();

        let response = update_cart_item(&orchestrator, ProductId(1), 0).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id, ProductId(2));

        let err = update_cart_item(&orchestrator, ProductId(1), 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_cart_survives_remount() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let orchestrator = test_support::orchestrator_on(Arc::clone(&storage));
            let _guard = orchestrator.mount();
            add_to_cart(&orchestrator, ProductId(7), 2).unwrap();
        }

        let orchestrator = test_support::orchestrator_on(storage);
        let _guard = orchestrator.mount();
        let response = get_cart(&orchestrator);
        assert_eq!(response.totals.total_item_count, 2);
        assert_eq!(response.items[0].name, "Pearl Strand Necklace");

        let response = clear_cart(&orchestrator);
        assert!(response.items.is_empty());
        assert_eq!(response.totals.subtotal, Money::zero());
    }
}
