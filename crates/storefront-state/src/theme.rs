//! # Theme Store
//!
//! Persists the shopper's [`ThemePreference`], tracks the observed system
//! scheme, and pushes the resolved scheme to a [`ThemeApplier`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   preference (persisted)   system scheme (observed)                     │
//! │           │                        │                                    │
//! │           └──────► resolve() ◄─────┘                                    │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                ThemeApplier::apply(scheme)   e.g. root class "dark"     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! System changes only re-apply once the store has hydrated; before that
//! the persisted preference is unknown and nothing is rendered yet.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use storefront_core::{ColorScheme, ThemePreference};
use tracing::debug;

use crate::persist::{PersistFailure, PersistedStore, VersionedJson};
use crate::storage::SharedStorage;

/// Default storage key for the theme preference.
pub const THEME_STORAGE_KEY: &str = "theme-storage";

/// Persisted theme state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    #[serde(default)]
    pub theme: ThemePreference,
}

/// Side effect run whenever the resolved scheme is (re)computed.
///
/// Runs with no store lock held except the update-ordering lock, so it may
/// read the store (`resolved_theme`, `system_theme`, `preference`) but must
/// not call its setters.
pub trait ThemeApplier: Send + Sync {
    fn apply(&self, scheme: ColorScheme);
}

impl<F> ThemeApplier for F
where
    F: Fn(ColorScheme) + Send + Sync,
{
    fn apply(&self, scheme: ColorScheme) {
        self(scheme)
    }
}

struct ThemeInner {
    settings: PersistedStore<ThemeSettings>,
    system: Mutex<ColorScheme>,
    /// Serializes update-then-apply so appliers see schemes in update order.
    updates: Mutex<()>,
    applier: Arc<dyn ThemeApplier>,
}

#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<ThemeInner>,
}

impl ThemeStore {
    pub fn new(
        storage: SharedStorage,
        key: impl Into<String>,
        codec: VersionedJson,
        applier: Arc<dyn ThemeApplier>,
    ) -> Self {
        ThemeStore {
            inner: Arc::new(ThemeInner {
                settings: PersistedStore::new(key, storage, codec),
                system: Mutex::new(ColorScheme::default()),
                updates: Mutex::new(()),
                applier,
            }),
        }
    }

    fn system_lock(&self) -> MutexGuard<'_, ColorScheme> {
        self.inner
            .system
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn update_lock(&self) -> MutexGuard<'_, ()> {
        self.inner
            .updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, preference: ThemePreference, system: ColorScheme) {
        let resolved = preference.resolve(system);
        debug!(preference = %preference, system = %system, resolved = %resolved, "Applying theme");
        self.inner.applier.apply(resolved);
    }

    /// Sets the explicit preference, persists it and applies the result.
    pub fn set_theme(&self, preference: ThemePreference) {
        let _update = self.update_lock();
        self.inner.settings.set(|s| s.theme = preference);
        self.apply(preference, self.system_theme());
    }

    /// Records a new observed system scheme. Re-applies only when the
    /// preference follows the system.
    pub fn set_system_theme(&self, scheme: ColorScheme) {
        let _update = self.update_lock();
        *self.system_lock() = scheme;
        let preference = self.preference();
        if preference.follows_system() && self.has_hydrated() {
            self.apply(preference, scheme);
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.inner.settings.read(|s| s.theme)
    }

    pub fn system_theme(&self) -> ColorScheme {
        *self.system_lock()
    }

    pub fn resolved_theme(&self) -> ColorScheme {
        let system = self.system_theme();
        self.preference().resolve(system)
    }

    /// Restores the preference and applies the resolved scheme.
    pub fn rehydrate(&self) {
        let _update = self.update_lock();
        self.inner.settings.rehydrate();
        self.apply(self.preference(), self.system_theme());
    }

    pub fn has_hydrated(&self) -> bool {
        self.inner.settings.has_hydrated()
    }

    pub fn last_persist_error(&self) -> Option<PersistFailure> {
        self.inner.settings.last_persist_error()
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("preference", &self.preference())
            .field("system", &self.system_theme())
            .finish_non_exhaustive()
    }
}
