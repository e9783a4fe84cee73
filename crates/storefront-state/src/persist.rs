//! # Persisted Store
//!
//! The generic pattern every store is built from: an in-memory value, a
//! storage key, a codec, and the rule that each mutation is followed by one
//! synchronous write.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    PersistedStore<T> Lifecycle                          │
//! │                                                                         │
//! │  new() ──► state = T::default(), hydrated = false                      │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  rehydrate() ──► get_item(key)                                         │
//! │    │               ├── None ──────────────► T::default()               │
//! │    │               ├── decode error ──────► T::default()  (warn!)      │
//! │    │               ├── read error ────────► T::default()  (warn!)      │
//! │    │               └── Ok(value) ─────────► value                      │
//! │    ▼                                                                    │
//! │  set(f) ──► lock ─► f(&mut state) ─► encode ─► set_item(key) ─► unlock │
//! │                                          │                              │
//! │                                          └── failure: warn! + recorded │
//! │                                              in last_persist_error()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Failure Policy
//! A failed write (quota exceeded, I/O) is swallowed: the in-memory mutation
//! stands, the failure is logged at `warn`, and it is kept as a non-fatal
//! notification the UI may poll. The next successful write clears it.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::CodecError;
use crate::storage::SharedStorage;

// =============================================================================
// Codecs
// =============================================================================

/// Converts store state to and from its persisted string form.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, state: &T) -> Result<String, CodecError>;

    /// Any error here makes rehydration fall back to the default state.
    fn decode(&self, raw: &str) -> Result<T, CodecError>;
}

/// Envelope codec: `{"state": <T>, "version": N}`.
///
/// Payloads carrying a different `version` are treated as unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedJson {
    pub version: u32,
}

impl VersionedJson {
    pub const fn new(version: u32) -> Self {
        VersionedJson { version }
    }
}

impl Default for VersionedJson {
    fn default() -> Self {
        VersionedJson::new(0)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

impl<T> Codec<T> for VersionedJson
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, state: &T) -> Result<String, CodecError> {
        serde_json::to_string(&EnvelopeRef {
            state,
            version: self.version,
        })
        .map_err(CodecError::Serialize)
    }

    fn decode(&self, raw: &str) -> Result<T, CodecError> {
        let envelope: Envelope<T> = serde_json::from_str(raw).map_err(CodecError::Deserialize)?;
        if envelope.version != self.version {
            return Err(CodecError::VersionMismatch {
                expected: self.version,
                found: envelope.version,
            });
        }
        Ok(envelope.state)
    }
}

/// Bare JSON value, no envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainJson;

impl<T> Codec<T> for PlainJson
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, state: &T) -> Result<String, CodecError> {
        serde_json::to_string(state).map_err(CodecError::Serialize)
    }

    fn decode(&self, raw: &str) -> Result<T, CodecError> {
        serde_json::from_str(raw).map_err(CodecError::Deserialize)
    }
}

// =============================================================================
// Persist Failure Notification
// =============================================================================

/// A swallowed write failure, kept for the UI to surface if it wants to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    pub key: String,
    pub message: String,
}

impl fmt::Display for PersistFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to persist '{}': {}", self.key, self.message)
    }
}

// =============================================================================
// Persisted Store
// =============================================================================

type Normalizer<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// In-memory state mirrored to one storage key.
pub struct PersistedStore<T, C = VersionedJson> {
    key: String,
    storage: SharedStorage,
    codec: C,
    state: Mutex<T>,
    hydrated: AtomicBool,
    last_failure: Mutex<Option<PersistFailure>>,
    normalize: Option<Normalizer<T>>,
    _codec_for: PhantomData<fn() -> T>,
}

impl<T, C> fmt::Debug for PersistedStore<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedStore")
            .field("key", &self.key)
            .field("hydrated", &self.hydrated.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl<T, C> PersistedStore<T, C>
where
    T: Default + Clone + Send,
    C: Codec<T>,
{
    /// Creates a store holding `T::default()`. Nothing is read until
    /// [`PersistedStore::rehydrate`].
    pub fn new(key: impl Into<String>, storage: SharedStorage, codec: C) -> Self {
        PersistedStore {
            key: key.into(),
            storage,
            codec,
            state: Mutex::new(T::default()),
            hydrated: AtomicBool::new(false),
            last_failure: Mutex::new(None),
            normalize: None,
            _codec_for: PhantomData,
        }
    }

    /// Registers a fix-up applied to freshly decoded state (e.g. re-capping
    /// a list after the cap was lowered). Not applied on mutations.
    pub fn with_normalizer(mut self, normalize: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.normalize = Some(Box::new(normalize));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the current state.
    pub fn get(&self) -> T {
        self.lock().clone()
    }

    /// Borrows the current state for a read-only computation.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.lock())
    }

    /// Applies `mutator`, then writes the new state. One write per call.
    ///
    /// The write happens before the lock is released, so storage always
    /// receives states in mutation order.
    pub fn set<F, R>(&self, mutator: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut state = self.lock();
        let result = mutator(&mut state);
        self.persist(&state);
        result
    }

    /// Restores state from storage, falling back to `T::default()`.
    ///
    /// Idempotent: with no intervening mutation, a second call yields the
    /// same state as the first.
    pub fn rehydrate(&self) {
        let restored = match self.storage.get_item(&self.key) {
            Ok(None) => {
                debug!(key = %self.key, "No persisted state, using default");
                T::default()
            }
            Ok(Some(raw)) => match self.codec.decode(&raw) {
                Ok(mut value) => {
                    if let Some(normalize) = &self.normalize {
                        normalize(&mut value);
                    }
                    value
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Persisted state unreadable, using default");
                    T::default()
                }
            },
            Err(e) => {
                warn!(key = %self.key, error = %e, "Storage read failed, using default");
                T::default()
            }
        };

        *self.lock() = restored;
        self.hydrated.store(true, Ordering::Release);
        info!(key = %self.key, "Store rehydrated");
    }

    pub fn has_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Most recent swallowed write failure, cleared by the next good write.
    pub fn last_persist_error(&self) -> Option<PersistFailure> {
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn persist(&self, state: &T) {
        let outcome = self
            .codec
            .encode(state)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                self.storage
                    .set_item(&self.key, &raw)
                    .map_err(|e| e.to_string())
            });

        let mut last_failure = self
            .last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match outcome {
            Ok(()) => *last_failure = None,
            Err(message) => {
                warn!(key = %self.key, error = %message, "Persist failed, keeping in-memory state");
                *last_failure = Some(PersistFailure {
                    key: self.key.clone(),
                    message,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use std::sync::Arc;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: i64,
    }

    fn store(storage: &MemoryStorage) -> PersistedStore<Counter> {
        PersistedStore::new("counter", Arc::new(storage.clone()), VersionedJson::default())
    }

    #[test]
    fn test_every_set_writes_envelope() {
        let storage = MemoryStorage::new();
        let counter = store(&storage);

        counter.set(|c| c.value += 2);
        assert_eq!(
            storage.get_item("counter").unwrap().as_deref(),
            Some(r#"{"state":{"value":2},"version":0}"#)
        );
    }

    #[test]
    fn test_rehydrate_absent_and_garbage_fall_back() {
        let storage = MemoryStorage::new();
        let counter = store(&storage);
        assert!(!counter.has_hydrated());

        counter.rehydrate();
        assert!(counter.has_hydrated());
        assert_eq!(counter.get(), Counter::default());

        storage.set_item("counter", "{not json").unwrap();
        counter.rehydrate();
        assert_eq!(counter.get(), Counter::default());
    }

    #[test]
    fn test_rehydrate_is_idempotent() {
        let storage = MemoryStorage::new();
        store(&storage).set(|c| c.value = 7);

        let reloaded = store(&storage);
        reloaded.rehydrate();
        let first = reloaded.get();
        reloaded.rehydrate();
        assert_eq!(reloaded.get(), first);
        assert_eq!(first.value, 7);
    }

    #[test]
    fn test_version_mismatch_falls_back() {
        let storage = MemoryStorage::new();
        storage
            .set_item("counter", r#"{"state":{"value":5},"version":3}"#)
            .unwrap();

        let counter = store(&storage);
        counter.rehydrate();
        assert_eq!(counter.get().value, 0);

        let v3: PersistedStore<Counter> =
            PersistedStore::new("counter", Arc::new(storage.clone()), VersionedJson::new(3));
        v3.rehydrate();
        assert_eq!(v3.get().value, 5);
    }

    #[test]
    fn test_write_failure_is_swallowed_and_reported() {
        let storage = MemoryStorage::with_quota(40);
        let counter = store(&storage);

        counter.set(|c| c.value = 1);
        assert!(counter.last_persist_error().is_none());

        counter.set(|c| c.value = i64::MAX);
        assert_eq!(counter.get().value, i64::MAX);
        let failure = counter.last_persist_error().unwrap();
        assert_eq!(failure.key, "counter");

        counter.set(|c| c.value = 2);
        assert!(counter.last_persist_error().is_none());
    }

    #[test]
    fn test_plain_json_and_normalizer() {
        let storage = MemoryStorage::new();
        storage.set_item("list", r#"["a","b","c"]"#).unwrap();

        let list = PersistedStore::<Vec<String>, PlainJson>::new(
            "list",
            Arc::new(storage.clone()),
            PlainJson,
        )
        .with_normalizer(|v| v.truncate(2));
        list.rehydrate();
        assert_eq!(list.get(), vec!["a", "b"]);

        list.set(|v| v.push("z".to_string()));
        assert_eq!(
            storage.get_item("list").unwrap().as_deref(),
            Some(r#"["a","b","z"]"#)
        );
    }
}
