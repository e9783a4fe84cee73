//! # State Error Types
//!
//! Error types for the persisted state layer.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       State Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Storage      │  │       Codec             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  QuotaExceeded  │  │  Serialize              │ │
//! │  │  ConfigLoad     │  │  InvalidKey     │  │  Deserialize            │ │
//! │  │  ConfigSave     │  │  Io             │  │  VersionMismatch        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation
//! Store mutations never return these. Storage and codec failures inside a
//! store are logged and recovered (default state on read, swallowed write).
//! Only construction-time paths (config, opening storage, scheduler) fail.

use thiserror::Error;

/// Result type alias for state-layer operations.
pub type StateResult<T> = Result<T, StateError>;

/// Result type alias for storage bindings.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Storage Errors
// =============================================================================

/// Durable key-value binding failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would exceed the storage quota.
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// Key does not satisfy the namespacing rules.
    #[error("Invalid storage key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Underlying file system failure.
    #[error("Storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Codec Errors
// =============================================================================

/// Encoding / decoding failures of persisted payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to deserialize state: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// The envelope was written by a different schema version.
    #[error("Persisted state version {found} does not match expected {expected}")]
    VersionMismatch { expected: u32, found: u32 },
}

// =============================================================================
// State Error
// =============================================================================

/// Top-level error for the state crate.
#[derive(Debug, Error)]
pub enum StateError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// No tokio runtime is available for the debounce scheduler.
    #[error("Scheduler unavailable: {0}")]
    SchedulerUnavailable(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Domain error: {0}")]
    Core(#[from] storefront_core::CoreError),
}

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        StateError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StateError {
    fn from(err: toml::de::Error) -> Self {
        StateError::ConfigLoadFailed(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for StateError {
    fn from(err: toml::ser::Error) -> Self {
        StateError::ConfigSaveFailed(format!("TOML serialize error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::QuotaExceeded {
            key: "cart-storage".to_string(),
            needed: 120,
            limit: 64,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded writing 'cart-storage': 120 bytes needed, 64 allowed"
        );

        let err = CodecError::VersionMismatch {
            expected: 1,
            found: 0,
        };
        assert!(err.to_string().contains("version 0"));
    }

    #[test]
    fn test_storage_error_converts() {
        let err: StateError = StorageError::InvalidKey {
            key: "a b".to_string(),
            reason: "space".to_string(),
        }
        .into();
        assert!(matches!(err, StateError::Storage(_)));
    }
}
