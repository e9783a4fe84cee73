//! # Store Orchestrator
//!
//! Composition root for the four stores. Owns their construction, gates
//! readiness on rehydration, and ties the system-theme listener to the
//! mounted lifetime of the application.
//!
//! ## Mount Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        mount() Sequence                                 │
//! │                                                                         │
//! │  1. cart.rehydrate()        ─┐                                          │
//! │  2. wishlist.rehydrate()     │ independent, any order                   │
//! │  3. search.rehydrate()      ─┘                                          │
//! │  4. subscribe to system changes ──► MountGuard                          │
//! │  5. theme: read system once, then theme.rehydrate()                     │
//! │     (applies the resolved scheme)                                       │
//! │  6. ready = true                                                        │
//! │                                                                         │
//! │  drop(MountGuard) ──► listener deregistered, ready = false              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use storefront_core::{Catalog, ColorScheme};
use tracing::{debug, info};

use crate::cart::CartStore;
use crate::config::{StateConfig, StorageBackend};
use crate::error::{StateError, StateResult};
use crate::persist::VersionedJson;
use crate::search::{CatalogSearch, Scheduler, SearchBackend, SearchStore, TokioScheduler};
use crate::storage::{FileStorage, MemoryStorage, SharedStorage};
use crate::system_theme::{ColorSchemeSource, SystemThemeSignal, ThemeSubscription};
use crate::theme::{ThemeApplier, ThemeStore};
use crate::wishlist::WishlistStore;

/// Opens the storage binding selected by `config`.
pub fn open_storage(config: &StateConfig) -> StateResult<SharedStorage> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::File => {
            let dir = config.data_dir().ok_or_else(|| {
                StateError::InvalidConfig("No data directory available for file storage".into())
            })?;
            info!(dir = %dir.display(), "Opening file storage");
            Ok(Arc::new(FileStorage::open(dir)?))
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a [`StoreOrchestrator`]. Every collaborator has a default derived
/// from the [`StateConfig`].
#[derive(Default)]
pub struct OrchestratorBuilder {
    config: StateConfig,
    storage: Option<SharedStorage>,
    catalog: Option<Arc<Catalog>>,
    backend: Option<Arc<dyn SearchBackend>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    system: Option<Arc<dyn ColorSchemeSource>>,
    applier: Option<Arc<dyn ThemeApplier>>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: StateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage(mut self, storage: SharedStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replaces the catalog-backed search.
    pub fn search_backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn color_scheme_source(mut self, source: Arc<dyn ColorSchemeSource>) -> Self {
        self.system = Some(source);
        self
    }

    pub fn theme_applier(mut self, applier: Arc<dyn ThemeApplier>) -> Self {
        self.applier = Some(applier);
        self
    }

    /// Validates the config and wires the stores. Nothing is read from
    /// storage until [`StoreOrchestrator::mount`].
    ///
    /// Without an explicit scheduler this must run inside a tokio runtime.
    pub fn build(self) -> StateResult<StoreOrchestrator> {
        let config = self.config;
        config.validate()?;

        let storage = match self.storage {
            Some(storage) => storage,
            None => open_storage(&config)?,
        };

        let catalog = self.catalog.unwrap_or_else(|| {
            let catalog = Catalog::builtin();
            Arc::new(match &config.search.vocabulary {
                Some(vocabulary) => catalog.with_vocabulary(vocabulary.clone()),
                None => catalog,
            })
        });

        let backend: Arc<dyn SearchBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(
                CatalogSearch::new(Arc::clone(&catalog))
                    .with_latency(config.search.simulated_latency()),
            ),
        };

        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::current()?),
        };

        let system: Arc<dyn ColorSchemeSource> = match self.system {
            Some(system) => system,
            None => Arc::new(SystemThemeSignal::default()),
        };
        let applier: Arc<dyn ThemeApplier> = match self.applier {
            Some(applier) => applier,
            None => Arc::new(|_: ColorScheme| {}),
        };

        let codec = VersionedJson::new(config.persistence.schema_version);
        let keys = &config.keys;

        let orchestrator = StoreOrchestrator {
            cart: CartStore::new(Arc::clone(&storage), keys.cart.clone(), codec),
            wishlist: WishlistStore::new(Arc::clone(&storage), keys.wishlist.clone(), codec),
            search: SearchStore::new(
                Arc::clone(&storage),
                keys.recent_searches.clone(),
                backend,
                scheduler,
                config.search.settings(),
            ),
            theme: ThemeStore::new(Arc::clone(&storage), keys.theme.clone(), codec, applier),
            catalog,
            storage,
            system,
            ready: Arc::new(AtomicBool::new(false)),
            config,
        };

        debug!(backend = %orchestrator.config.storage.backend, "Store orchestrator built");
        Ok(orchestrator)
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Owns the stores and their shared collaborators.
pub struct StoreOrchestrator {
    cart: CartStore,
    wishlist: WishlistStore,
    search: SearchStore,
    theme: ThemeStore,
    catalog: Arc<Catalog>,
    storage: SharedStorage,
    system: Arc<dyn ColorSchemeSource>,
    ready: Arc<AtomicBool>,
    config: StateConfig,
}

impl StoreOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Rehydrates every store and starts following the system theme.
    ///
    /// The returned guard must be held for as long as the application is
    /// mounted.
    pub fn mount(&self) -> MountGuard {
        info!("Mounting stores");

        self.cart.rehydrate();
        self.wishlist.rehydrate();
        self.search.rehydrate();

        // Subscribe before reading so a flip in between is not lost.
        let theme = self.theme.clone();
        let subscription = self
            .system
            .subscribe(Arc::new(move |scheme: ColorScheme| theme.set_system_theme(scheme)));

        self.theme.set_system_theme(self.system.current());
        self.theme.rehydrate();

        self.ready.store(true, Ordering::Release);
        info!(
            cart_lines = self.cart.line_count(),
            wishlist = self.wishlist.len(),
            recent = self.search.recent_searches().len(),
            theme = %self.theme.preference(),
            "Stores ready"
        );

        MountGuard {
            subscription: Some(subscription),
            ready: Arc::clone(&self.ready),
        }
    }

    /// True between a completed [`mount`](Self::mount) and the guard's drop.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub fn search(&self) -> &SearchStore {
        &self.search
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }
}

impl std::fmt::Debug for StoreOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOrchestrator")
            .field("ready", &self.is_ready())
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

/// Mounted lifetime of the application. Dropping it deregisters the system
/// theme listener.
#[must_use = "dropping the guard unmounts immediately"]
#[derive(Debug)]
pub struct MountGuard {
    subscription: Option<ThemeSubscription>,
    ready: Arc<AtomicBool>,
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.ready.store(false, Ordering::Release);
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        debug!("Stores unmounted");
    }
}
