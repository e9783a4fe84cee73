//! # State Configuration
//!
//! Where the stores persist, under which keys, and how search behaves.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_DATA_DIR=/tmp/storefront                                │
//! │     STOREFRONT_DEBOUNCE_MS=150                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.state/... (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     file backend, 300 ms debounce, 5 recent searches                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [storage]
//! backend = "file"          # file | memory
//! dir = "/var/lib/storefront"
//!
//! [keys]
//! cart = "cart-storage"
//! wishlist = "wishlist-storage"
//! recent_searches = "recentSearches"
//! theme = "theme-storage"
//!
//! [search]
//! debounce_ms = 300
//! simulated_latency_ms = 0
//! recent_limit = 5
//! recent_policy = "deduplicate"   # deduplicate | skip_repeat_of_newest
//!
//! [persistence]
//! schema_version = 0
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_storage_key;
use storefront_core::{RecentSearchPolicy, DEFAULT_DEBOUNCE_MS, RECENT_SEARCH_LIMIT};
use tracing::{debug, info, warn};

use crate::cart::CART_STORAGE_KEY;
use crate::error::{StateError, StateResult};
use crate::search::{SearchSettings, RECENT_SEARCHES_KEY};
use crate::theme::THEME_STORAGE_KEY;
use crate::wishlist::WISHLIST_STORAGE_KEY;

/// Longest accepted debounce window.
const MAX_DEBOUNCE_MS: u64 = 10_000;

// =============================================================================
// Storage Settings
// =============================================================================

/// Which durable binding the stores persist through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One JSON file per key under the data directory.
    #[default]
    File,

    /// Process-local map; nothing survives a restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "disk" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(StateError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: file, memory",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data directory for the file backend. Defaults to the platform data
    /// directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// =============================================================================
// Key Settings
// =============================================================================

/// Storage key per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySettings {
    #[serde(default = "default_cart_key")]
    pub cart: String,

    #[serde(default = "default_wishlist_key")]
    pub wishlist: String,

    #[serde(default = "default_recent_key")]
    pub recent_searches: String,

    #[serde(default = "default_theme_key")]
    pub theme: String,
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

fn default_wishlist_key() -> String {
    WISHLIST_STORAGE_KEY.to_string()
}

fn default_recent_key() -> String {
    RECENT_SEARCHES_KEY.to_string()
}

fn default_theme_key() -> String {
    THEME_STORAGE_KEY.to_string()
}

impl Default for KeySettings {
    fn default() -> Self {
        KeySettings {
            cart: default_cart_key(),
            wishlist: default_wishlist_key(),
            recent_searches: default_recent_key(),
            theme: default_theme_key(),
        }
    }
}

impl KeySettings {
    fn all(&self) -> [&str; 4] {
        [
            self.cart.as_str(),
            self.wishlist.as_str(),
            self.recent_searches.as_str(),
            self.theme.as_str(),
        ]
    }
}

// =============================================================================
// Search Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Artificial delay of the catalog search (milliseconds).
    #[serde(default)]
    pub simulated_latency_ms: u64,

    /// Maximum recent-search entries.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default)]
    pub recent_policy: RecentSearchPolicy,

    /// Suggestion vocabulary. `None` keeps the built-in terms.
    #[serde(default)]
    pub vocabulary: Option<Vec<String>>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_recent_limit() -> usize {
    RECENT_SEARCH_LIMIT
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: default_debounce_ms(),
            simulated_latency_ms: 0,
            recent_limit: default_recent_limit(),
            recent_policy: RecentSearchPolicy::default(),
            vocabulary: None,
        }
    }
}

impl SearchConfig {
    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            recent_limit: self.recent_limit,
            recent_policy: self.recent_policy,
        }
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

// =============================================================================
// Persistence Settings
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// Version written into (and required from) every envelope.
    #[serde(default)]
    pub schema_version: u32,
}

// =============================================================================
// State Configuration
// =============================================================================

/// Complete configuration of the state layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub keys: KeySettings,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub persistence: PersistenceSettings,
}

impl StateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StateResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading state config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load state config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> StateResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StateError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StateError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| StateError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "State config saved");
        Ok(())
    }

    pub fn validate(&self) -> StateResult<()> {
        for key in self.keys.all() {
            validate_storage_key(key)
                .map_err(|e| StateError::InvalidConfig(format!("storage key '{}': {}", key, e)))?;
        }

        let keys = self.keys.all();
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(StateError::InvalidConfig(format!(
                    "storage key '{}' is used by more than one store",
                    key
                )));
            }
        }

        if self.search.recent_limit == 0 {
            return Err(StateError::InvalidConfig(
                "recent_limit must be greater than 0".into(),
            ));
        }

        if self.search.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(StateError::InvalidConfig(format!(
                "debounce_ms must be at most {}",
                MAX_DEBOUNCE_MS
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("STOREFRONT_DATA_DIR") {
            debug!(dir = %dir, "Overriding data directory from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(backend) = lookup("STOREFRONT_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => self.storage.backend = parsed,
                Err(_) => warn!(backend = %backend, "Unknown storage backend in environment"),
            }
        }

        if let Some(ms) = lookup("STOREFRONT_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                debug!(debounce_ms = ms, "Overriding debounce from environment");
                self.search.debounce_ms = ms;
            }
        }

        if let Some(ms) = lookup("STOREFRONT_SEARCH_LATENCY_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.search.simulated_latency_ms = ms;
            }
        }

        if let Some(limit) = lookup("STOREFRONT_RECENT_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                self.search.recent_limit = limit;
            }
        }

        if let Some(policy) = lookup("STOREFRONT_RECENT_POLICY") {
            match policy.parse() {
                Ok(parsed) => self.search.recent_policy = parsed,
                Err(_) => warn!(policy = %policy, "Unknown recent search policy in environment"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "storefront", "state")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// Data directory for the file backend.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage
            .dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }
}
