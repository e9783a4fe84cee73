//! # Search Store
//!
//! Transient query, debounced result computation, and the persisted
//! recent-search log.
//!
//! ## Phase Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │           set_query(non-empty)         timer elapsed                    │
//! │   Idle ─────────────────────► Debouncing ──────────► Loading            │
//! │    ▲                           │    ▲                   │               │
//! │    │ set_query("")             │    │ set_query(q')     │ backend done  │
//! │    │ (any phase, no debounce)  │    └───── cancels ─────┤               │
//! │    └───────────────────────────┘                        ▼               │
//! │                                                      Settled            │
//! │                                          results + suggestions | error  │
//! │                                          (success records the query)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation
//! Every non-empty `set_query` cancels the pending computation and issues a
//! fresh [`CancelToken`]. The debounce task checks its token while holding
//! the search state lock before each write, so once a newer query has taken
//! the lock, the older task can no longer touch state. No timestamps are
//! compared.

mod backend;
mod debounce;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_search_query;
use storefront_core::{Product, RecentSearchPolicy, RecentSearches, RECENT_SEARCH_LIMIT};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::persist::{PersistFailure, PersistedStore, PlainJson};
use crate::storage::SharedStorage;

pub use backend::{CatalogSearch, SearchBackend, SearchError, SearchOutcome};
pub use debounce::{CancelHandle, CancelToken, ScheduledTask, Scheduler, TokioScheduler};

/// Default storage key for the recent-search log.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// Where the search store is in its per-keystroke cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Loading,
    Settled,
}

/// Everything the search UI renders, minus the recent log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<Product>,
    pub suggestions: Vec<String>,
    pub phase: SearchPhase,
    /// Set when the last computation failed or the query was rejected.
    pub error: Option<String>,
}

impl SearchSnapshot {
    /// True while a computation is pending or running.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Debouncing | SearchPhase::Loading)
    }
}

/// Tunables for [`SearchStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub recent_limit: usize,
    pub recent_policy: RecentSearchPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            debounce: Duration::from_millis(storefront_core::DEFAULT_DEBOUNCE_MS),
            recent_limit: RECENT_SEARCH_LIMIT,
            recent_policy: RecentSearchPolicy::default(),
        }
    }
}

#[derive(Debug, Default)]
struct SearchState {
    snapshot: SearchSnapshot,
    pending: Option<CancelHandle>,
}

#[derive(Debug)]
struct SearchInner {
    state: Mutex<SearchState>,
    phase_tx: watch::Sender<SearchPhase>,
    recent: PersistedStore<RecentSearches, PlainJson>,
    backend: Arc<dyn SearchBackend>,
    scheduler: Arc<dyn Scheduler>,
    settings: SearchSettings,
}

impl SearchInner {
    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, phase: SearchPhase) {
        self.phase_tx.send_replace(phase);
    }

    fn record_recent(&self, query: &str) {
        let SearchSettings {
            recent_limit,
            recent_policy,
            ..
        } = self.settings;
        let recorded = self
            .recent
            .set(|log| log.record(query, recent_limit, recent_policy));
        debug!(query, recorded, "Recent search recorded");
    }
}

/// Debounced search over a [`SearchBackend`], with a persisted recent log.
#[derive(Debug, Clone)]
pub struct SearchStore {
    inner: Arc<SearchInner>,
}

impl SearchStore {
    pub fn new(
        storage: SharedStorage,
        recent_key: impl Into<String>,
        backend: Arc<dyn SearchBackend>,
        scheduler: Arc<dyn Scheduler>,
        settings: SearchSettings,
    ) -> Self {
        let limit = settings.recent_limit;
        let recent = PersistedStore::new(recent_key, storage, PlainJson)
            .with_normalizer(move |log: &mut RecentSearches| log.truncate(limit));
        let (phase_tx, _) = watch::channel(SearchPhase::Idle);

        SearchStore {
            inner: Arc::new(SearchInner {
                state: Mutex::new(SearchState::default()),
                phase_tx,
                recent,
                backend,
                scheduler,
                settings,
            }),
        }
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// Updates the query and (re)starts the debounce window.
    ///
    /// A blank query resets to `Idle` immediately. A query over the length
    /// limit settles at once with an error and no computation.
    pub fn set_query(&self, query: &str) {
        let mut state = self.inner.lock();
        if let Some(pending) = state.pending.take() {
            pending.cancel();
        }

        let trimmed = query.trim();
        if trimmed.is_empty() {
            state.snapshot = SearchSnapshot {
                query: query.to_string(),
                ..SearchSnapshot::default()
            };
            self.inner.publish(SearchPhase::Idle);
            debug!("Search query cleared");
            return;
        }

        let trimmed = match validate_search_query(trimmed) {
            Ok(q) => q,
            Err(e) => {
                state.snapshot = SearchSnapshot {
                    query: query.to_string(),
                    phase: SearchPhase::Settled,
                    error: Some(e.to_string()),
                    ..SearchSnapshot::default()
                };
                self.inner.publish(SearchPhase::Settled);
                warn!(error = %e, "Search query rejected");
                return;
            }
        };

        state.snapshot.query = query.to_string();
        state.snapshot.phase = SearchPhase::Debouncing;
        state.snapshot.error = None;
        self.inner.publish(SearchPhase::Debouncing);

        let token = CancelToken::new();
        let task = Self::computation(Arc::clone(&self.inner), token.clone(), trimmed.clone());
        let handle = self
            .inner
            .scheduler
            .schedule(self.inner.settings.debounce, token, task);
        state.pending = Some(handle);
        debug!(query = %trimmed, "Search debounce started");
    }

    fn computation(inner: Arc<SearchInner>, token: CancelToken, query: String) -> ScheduledTask {
        Box::pin(async move {
            {
                let mut state = inner.lock();
                if token.is_cancelled() {
                    return;
                }
                state.snapshot.phase = SearchPhase::Loading;
                inner.publish(SearchPhase::Loading);
            }

            debug!(query = %query, "Search computation started");
            let outcome = inner.backend.search(&query).await;

            let mut state = inner.lock();
            if token.is_cancelled() {
                debug!(query = %query, "Stale search result dropped");
                return;
            }

            match outcome {
                Ok(SearchOutcome {
                    results,
                    suggestions,
                }) => {
                    debug!(query = %query, results = results.len(), "Search settled");
                    state.snapshot.results = results;
                    state.snapshot.suggestions = suggestions;
                    state.snapshot.error = None;
                    inner.record_recent(&query);
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Search failed");
                    state.snapshot.results.clear();
                    state.snapshot.suggestions.clear();
                    state.snapshot.error = Some(e.to_string());
                }
            }
            state.snapshot.phase = SearchPhase::Settled;
            state.pending = None;
            inner.publish(SearchPhase::Settled);
        })
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.lock().snapshot.clone()
    }

    pub fn query(&self) -> String {
        self.inner.lock().snapshot.query.clone()
    }

    pub fn results(&self) -> Vec<Product> {
        self.inner.lock().snapshot.results.clone()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.inner.lock().snapshot.suggestions.clone()
    }

    pub fn phase(&self) -> SearchPhase {
        self.inner.lock().snapshot.phase
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().snapshot.is_loading()
    }

    /// Receiver notified on every phase change.
    pub fn subscribe(&self) -> watch::Receiver<SearchPhase> {
        self.inner.phase_tx.subscribe()
    }

    // =========================================================================
    // Recent Searches
    // =========================================================================

    /// Recent queries, newest first.
    pub fn recent_searches(&self) -> Vec<String> {
        self.inner.recent.read(|log| log.entries().to_vec())
    }

    /// Empties the recent log. The current query and results are untouched.
    pub fn clear_recent_searches(&self) {
        self.inner.recent.set(RecentSearches::clear);
        debug!("Recent searches cleared");
    }

    pub fn remove_recent_search(&self, query: &str) {
        let removed = self.inner.recent.set(|log| log.remove(query));
        debug!(query, removed, "Recent search removed");
    }

    pub fn rehydrate(&self) {
        self.inner.recent.rehydrate();
    }

    pub fn has_hydrated(&self) -> bool {
        self.inner.recent.has_hydrated()
    }

    pub fn last_persist_error(&self) -> Option<PersistFailure> {
        self.inner.recent.last_persist_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use async_trait::async_trait;
    use storefront_core::Catalog;

    /// Backend that records every query it is asked to compute.
    #[derive(Debug, Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchBackend for RecordingBackend {
        async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
            self.calls.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(SearchError::Unavailable("offline".to_string()));
            }
            CatalogSearch::new(Arc::new(Catalog::builtin()))
                .search(query)
                .await
        }
    }

    fn store_with(storage: &MemoryStorage, backend: Arc<dyn SearchBackend>) -> SearchStore {
        SearchStore::new(
            Arc::new(storage.clone()),
            RECENT_SEARCHES_KEY,
            backend,
            Arc::new(TokioScheduler::current().unwrap()),
            SearchSettings::default(),
        )
    }

    async fn settle(store: &SearchStore) {
        let mut rx = store.subscribe();
        while *rx.borrow_and_update() != SearchPhase::Settled {
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_query_never_computes() {
        let storage = MemoryStorage::new();
        let backend = Arc::new(RecordingBackend::default());
        let search = store_with(&storage, backend.clone());

        search.set_query("ring");
        tokio::time::sleep(Duration::from_millis(150)).await;
        search.set_query("ring2");
        assert_eq!(search.phase(), SearchPhase::Debouncing);

        settle(&search).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(backend.calls(), vec!["ring2".to_string()]);
        assert_eq!(search.query(), "ring2");
        assert!(search.results().is_empty());
        assert_eq!(search.recent_searches(), vec!["ring2".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_then_settle_populates_results() {
        let storage = MemoryStorage::new();
        let search = store_with(&storage, Arc::new(RecordingBackend::default()));

        search.set_query("  Ring ");
        assert!(search.is_loading());
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(search.phase(), SearchPhase::Debouncing);

        settle(&search).await;
        let snapshot = search.snapshot();
        assert!(!snapshot.results.is_empty());
        assert!(snapshot.suggestions.contains(&"rings".to_string()));
        assert_eq!(snapshot.error, None);
        assert_eq!(search.recent_searches(), vec!["Ring".to_string()]);
        assert_eq!(
            storage.get_item(RECENT_SEARCHES_KEY).unwrap().as_deref(),
            Some(r#"["Ring"]"#)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_resets_without_debounce() {
        let backend = Arc::new(RecordingBackend::default());
        let search = store_with(&MemoryStorage::new(), backend.clone());

        search.set_query("gold");
        settle(&search).await;
        assert!(!search.results().is_empty());

        search.set_query("pearl");
        search.set_query("   ");
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(search.results().is_empty());
        assert!(search.suggestions().is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.calls(), vec!["gold".to_string()]);
        assert_eq!(search.recent_searches(), vec!["gold".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_failure_settles_with_error() {
        let backend = Arc::new(RecordingBackend {
            fail: true,
            ..RecordingBackend::default()
        });
        let search = store_with(&MemoryStorage::new(), backend);

        search.set_query("watch");
        settle(&search).await;

        let snapshot = search.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Settled);
        assert!(snapshot.results.is_empty());
        assert!(snapshot.error.unwrap().contains("offline"));
        assert!(search.recent_searches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlong_query_rejected_immediately() {
        let backend = Arc::new(RecordingBackend::default());
        let search = store_with(&MemoryStorage::new(), backend.clone());

        search.set_query(&"x".repeat(101));
        assert_eq!(search.phase(), SearchPhase::Settled);
        assert!(search.snapshot().error.is_some());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recent_log_cap_and_clear() {
        let storage = MemoryStorage::new();
        let search = store_with(&storage, Arc::new(RecordingBackend::default()));

        for q in ["a", "b", "c", "d", "e", "f"] {
            search.set_query(q);
            settle(&search).await;
        }
        assert_eq!(search.recent_searches(), vec!["f", "e", "d", "c", "b"]);

        search.remove_recent_search("d");
        assert_eq!(search.recent_searches(), vec!["f", "e", "c", "b"]);

        search.clear_recent_searches();
        assert!(search.recent_searches().is_empty());
        assert_eq!(search.query(), "f");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rehydrate_caps_oversized_log() {
        let storage = MemoryStorage::new();
        storage
            .set_item(RECENT_SEARCHES_KEY, r#"["1","2","3","4","5","6","7"]"#)
            .unwrap();

        let search = store_with(&storage, Arc::new(RecordingBackend::default()));
        search.rehydrate();
        assert_eq!(search.recent_searches(), vec!["1", "2", "3", "4", "5"]);
    }
}
