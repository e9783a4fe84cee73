//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront CLI                     │
//! │                                                                         │
//! │  Command Function ── Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── unknown product ──── CoreError::ProductNotFound ──┐         │
//! │         ├── bad input ────────── ValidationError ─────────────┤         │
//! │         ├── config / storage ─── StateError ──────────────────┼► ApiError│
//! │         │                                                     │         │
//! │         ▼                                                     ▼         │
//! │  stdout: response JSON                stderr: {"code","message"}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store mutations themselves never fail; a swallowed write failure shows
//! up as `persistWarning` on the response instead.

use serde::Serialize;
use storefront_core::{CoreError, ValidationError};
use storefront_state::StateError;

/// Error returned from CLI commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Durable storage could not be opened
    StorageError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id.to_string()),
            CoreError::DuplicateProduct(id) => {
                ApiError::validation(format!("Duplicate product id in catalog: {}", id))
            }
            CoreError::InvalidCatalog(e) => {
                tracing::error!("Catalog could not be parsed: {}", e);
                ApiError::validation("Invalid catalog document")
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::InvalidConfig(_)
            | StateError::ConfigLoadFailed(_)
            | StateError::ConfigSaveFailed(_) => {
                ApiError::new(ErrorCode::ConfigError, err.to_string())
            }
            StateError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                ApiError::new(ErrorCode::StorageError, e.to_string())
            }
            StateError::Codec(e) => ApiError::internal(e.to_string()),
            StateError::SchedulerUnavailable(e) => {
                ApiError::internal(format!("Scheduler unavailable: {}", e))
            }
            StateError::Core(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Failed to encode response: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ProductId;

    #[test]
    fn test_not_found_serialization() {
        let err: ApiError = CoreError::ProductNotFound(ProductId(42)).into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 42");
    }

    #[test]
    fn test_state_error_codes() {
        let err: ApiError = StateError::InvalidConfig("recent_limit".into()).into();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let err: ApiError = StateError::Core(CoreError::ProductNotFound(ProductId(1))).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
