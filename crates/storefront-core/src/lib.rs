//! # storefront-core: Pure Domain Logic for the Storefront State Layer
//!
//! This crate holds the domain rules behind the storefront's client-side
//! stores as pure data structures with zero I/O dependencies. Persistence,
//! timers and the orchestrator live in `storefront-state`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront State Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentational UI (out of scope)                   │   │
//! │  │    Product cards ──► Cart drawer ──► Search bar ──► Theme menu  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ selectors + mutations                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-state (persisted stores)                │   │
//! │  │    CartStore, WishlistStore, SearchStore, ThemeStore            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │ wishlist  │  │  catalog  │  │   │
//! │  │   │  Product  │  │   Cart    │  │ Wishlist  │  │  filter   │  │   │
//! │  │   │  Money    │  │ LineItem  │  │  Entry    │  │  suggest  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductId, Product, line items, theme enums)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart aggregate and derived totals
//! - [`wishlist`] - Wishlist aggregate with set semantics
//! - [`recent`] - Capped recent-search log
//! - [`catalog`] - Product catalog filtering and query suggestions
//! - [`error`] - Domain error types
//! - [`validation`] - Input shape checks
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Money, Product, ProductId};
//!
//! let ring = Product::new(ProductId(1), "Solitaire Ring", Money::from_cents(999), "rings").unwrap();
//!
//! let mut cart = Cart::default();
//! cart.add(&ring, 1);
//! cart.add(&ring, 1);
//!
//! assert_eq!(cart.total_item_count(), 2);
//! assert_eq!(cart.subtotal().cents(), 1998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod recent;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use recent::{RecentSearchPolicy, RecentSearches};
pub use types::*;
pub use wishlist::Wishlist;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of entries kept in the recent-search log.
///
/// ## Eviction
/// When a sixth distinct query is recorded, the oldest entry is dropped.
pub const RECENT_SEARCH_LIMIT: usize = 5;

/// Debounce window between the last keystroke and the search computation.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Longest accepted search query (after trimming).
pub const MAX_QUERY_LENGTH: usize = 100;

/// Largest quantity a single cart line can hold.
///
/// Adds and updates clamp to it, and the CLI rejects larger input, so a
/// line total can never approach the `i64` range.
pub const MAX_CART_QUANTITY: i64 = 999;
