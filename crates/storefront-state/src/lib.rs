//! # storefront-state: Persisted Client Stores
//!
//! The durable half of the storefront state layer: a key-value storage
//! binding, the generic persisted-store pattern, the four stores built on
//! it, and the orchestrator that rehydrates them before the UI is shown.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     storefront-state Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    StoreOrchestrator                            │   │
//! │  │   mount() ──► rehydrate all ──► subscribe system theme          │   │
//! │  └───────┬──────────────┬──────────────┬──────────────┬────────────┘   │
//! │          ▼              ▼              ▼              ▼                 │
//! │   ┌───────────┐  ┌────────────┐  ┌────────────┐  ┌────────────┐        │
//! │   │ CartStore │  │ Wishlist   │  │ Search     │  │ Theme      │        │
//! │   │           │  │ Store      │  │ Store      │  │ Store      │        │
//! │   └─────┬─────┘  └─────┬──────┘  └──┬──────┬──┘  └─────┬──────┘        │
//! │         │              │            │      │ debounce  │ applier       │
//! │         ▼              ▼            ▼      ▼           ▼               │
//! │   ┌─────────────────────────────────────┐ ┌──────────────────────┐     │
//! │   │   PersistedStore<T> + Codec<T>      │ │ Scheduler (tokio)    │     │
//! │   └─────────────────┬───────────────────┘ └──────────────────────┘     │
//! │                     ▼                                                   │
//! │   ┌─────────────────────────────────────┐                               │
//! │   │  KeyValueStorage (memory | file)    │                               │
//! │   └─────────────────────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Every store mutation performs exactly one storage write, in order
//! - Store mutations never return errors or panic; failures are logged
//! - A superseded search never writes results
//! - Single process per data directory: concurrent processes are not
//!   coordinated and the last writer wins
//!
//! ## Modules
//! - [`storage`] - Durable key-value binding (memory, file)
//! - [`persist`] - Codecs and the generic persisted store
//! - [`cart`], [`wishlist`], [`search`], [`theme`] - The stores
//! - [`system_theme`] - System color-scheme signal
//! - [`orchestrator`] - Composition root and mount lifecycle
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Error types

pub mod cart;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod persist;
pub mod search;
pub mod storage;
pub mod system_theme;
pub mod theme;
pub mod wishlist;

pub use cart::{CartStore, CART_STORAGE_KEY};
pub use config::{StateConfig, StorageBackend};
pub use error::{CodecError, StateError, StateResult, StorageError, StorageResult};
pub use orchestrator::{open_storage, MountGuard, OrchestratorBuilder, StoreOrchestrator};
pub use persist::{Codec, PersistFailure, PersistedStore, PlainJson, VersionedJson};
pub use search::{
    CancelHandle, CancelToken, CatalogSearch, Scheduler, SearchBackend, SearchError, SearchPhase,
    SearchSettings, SearchSnapshot, SearchStore, TokioScheduler, RECENT_SEARCHES_KEY,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, SharedStorage};
pub use system_theme::{ColorSchemeSource, SystemThemeSignal, ThemeSubscription};
pub use theme::{ThemeApplier, ThemeSettings, ThemeStore, THEME_STORAGE_KEY};
pub use wishlist::{WishlistStore, WISHLIST_STORAGE_KEY};
