//! # Durable Key-Value Binding
//!
//! The storage contract every store persists through: synchronous,
//! string-keyed, string-valued, scoped to one browsing context (here, one
//! data directory or one in-memory map).
//!
//! ## Key Namespacing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One binding, many stores                            │
//! │                                                                         │
//! │   CartStore      ──► "cart-storage"      ──┐                            │
//! │   WishlistStore  ──► "wishlist-storage"  ──┤                            │
//! │   SearchStore    ──► "recentSearches"    ──┼──► KeyValueStorage         │
//! │   ThemeStore     ──► "theme-storage"     ──┘                            │
//! │                                                                         │
//! │   Each store owns exactly one key. No locking across keys is needed.    │
//! │   Two processes sharing a data directory are NOT coordinated: the last  │
//! │   writer wins and neither is notified.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backends
//! - [`MemoryStorage`] - process-local map, optional byte quota (tests, demos)
//! - [`FileStorage`] - one file per key under a directory, atomic writes

mod file;
mod memory;

use std::fmt;
use std::sync::Arc;

use storefront_core::validation::validate_storage_key;

use crate::error::{StorageError, StorageResult};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Synchronous durable key-value storage.
///
/// Implementations must be `Send + Sync`: stores are shared with the async
/// tasks that settle searches.
pub trait KeyValueStorage: Send + Sync + fmt::Debug {
    /// Reads the value for `key`; `Ok(None)` when absent.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`. Deleting an absent key succeeds.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Shared handle to a storage backend.
pub type SharedStorage = Arc<dyn KeyValueStorage>;

/// Rejects keys that are not safe to use as file names.
pub(crate) fn check_key(key: &str) -> StorageResult<()> {
    validate_storage_key(key).map_err(|e| StorageError::InvalidKey {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
