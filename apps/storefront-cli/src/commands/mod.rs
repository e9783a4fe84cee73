//! # Commands Module
//!
//! One function per CLI action, each running against a mounted
//! [`StoreOrchestrator`] and returning a serializable response.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch)
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── wishlist.rs  ◄─── Saved products
//! ├── search.rs    ◄─── Debounced search, recent log
//! ├── theme.rs     ◄─── Theme preference
//! └── catalog.rs   ◄─── Product listing
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  storefront cart add 3 -q 2                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch(&orchestrator, Command::Cart { .. })                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  cart::add_to_cart(&orchestrator, ProductId(3), 2)                      │
//! │      -> Result<CartResponse, ApiError>                                  │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: { "items": [...], "totals": {...} }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod search;
pub mod theme;
pub mod wishlist;

use storefront_state::{PersistFailure, StoreOrchestrator};

use crate::args::{CartAction, Command, SearchAction, ThemeAction, WishlistAction};
use crate::error::ApiError;

/// Runs one command and encodes its response as pretty JSON.
pub async fn dispatch(
    orchestrator: &StoreOrchestrator,
    command: Command,
) -> Result<String, ApiError> {
    let json = match command {
        Command::Cart { action } => {
            let response = match action {
                CartAction::Show => cart::get_cart(orchestrator),
                CartAction::Add { id, quantity } => cart::add_to_cart(orchestrator, id, quantity)?,
                CartAction::Remove { id } => cart::remove_from_cart(orchestrator, id),
                CartAction::Set { id, quantity } => {
                    cart::update_cart_item(orchestrator, id, quantity)?
                }
                CartAction::Clear => cart::clear_cart(orchestrator),
            };
            serde_json::to_string_pretty(&response)?
        }
        Command::Wishlist { action } => {
            let response = match action {
                WishlistAction::Show => wishlist::get_wishlist(orchestrator),
                WishlistAction::Add { id } => wishlist::add_to_wishlist(orchestrator, id)?,
                WishlistAction::Remove { id } => wishlist::remove_from_wishlist(orchestrator, id),
                WishlistAction::Toggle { id } => wishlist::toggle_wishlist(orchestrator, id)?,
                WishlistAction::Clear => wishlist::clear_wishlist(orchestrator),
            };
            serde_json::to_string_pretty(&response)?
        }
        Command::Search(args) => {
            let response = match (args.action, args.query) {
                (Some(SearchAction::Recent), _) => search::recent_searches(orchestrator),
                (Some(SearchAction::ClearRecent), _) => search::clear_recent_searches(orchestrator),
                (Some(SearchAction::Forget { query }), _) => {
                    search::forget_recent_search(orchestrator, &query)
                }
                (None, Some(query)) => search::run_search(orchestrator, &query).await?,
                (None, None) => search::recent_searches(orchestrator),
            };
            serde_json::to_string_pretty(&response)?
        }
        Command::Theme { action } => {
            let response = match action {
                ThemeAction::Show => theme::get_theme(orchestrator),
                ThemeAction::Set { preference } => theme::set_theme(orchestrator, preference),
            };
            serde_json::to_string_pretty(&response)?
        }
        Command::Catalog => serde_json::to_string_pretty(&catalog::list_products(orchestrator))?,
    };
    Ok(json)
}

/// Surfaces a swallowed write failure on the response.
pub(crate) fn persist_warning(failure: Option<PersistFailure>) -> Option<String> {
    failure.map(|f| f.to_string())
}
