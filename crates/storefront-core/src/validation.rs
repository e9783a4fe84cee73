//! # Validation Module
//!
//! Basic shape checks for values that enter the state layer from outside.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms (out of scope)                                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Catalog records (name, price)                                     │
//! │  ├── Search queries (trim, length)                                     │
//! │  ├── Shopper quantities (CLI input)                                    │
//! │  └── Storage keys (namespacing)                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store invariants (quantity ≥ 1, set membership)              │
//! │  └── Enforced structurally by Cart / Wishlist                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CART_QUANTITY, MAX_QUERY_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ```rust
/// use storefront_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Pearl Necklace").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (the search store treats it as "clear")
/// - Maximum [`MAX_QUERY_LENGTH`] characters after trimming
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LENGTH,
        });
    }

    Ok(query.to_string())
}

/// Validates a durable storage key.
///
/// ## Rules
/// - Must not be empty, at most 64 characters
/// - ASCII letters, digits, `-` and `_` only (keys double as file names)
pub fn validate_storage_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "storage key".to_string(),
        });
    }

    if key.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "storage key".to_string(),
            max: 64,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "storage key".to_string(),
            reason: "must contain only ASCII letters, digits, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (free samples)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a quantity supplied by the shopper.
///
/// ## Rules
/// - Must be between 1 and [`MAX_CART_QUANTITY`]
///
/// The stores themselves tolerate any quantity (a non-positive add is a
/// no-op, a non-positive update removes the line, anything larger clamps);
/// this check is for surfaces that should reject such input instead.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_CART_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_CART_QUANTITY,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Gold Hoop Earrings").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  ring ").unwrap(), "ring");
        assert_eq!(validate_search_query("   ").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(MAX_QUERY_LENGTH + 1)).is_err());
        assert!(validate_search_query(&"x".repeat(MAX_QUERY_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("cart-storage").is_ok());
        assert!(validate_storage_key("recentSearches").is_ok());
        assert!(validate_storage_key("").is_err());
        assert!(validate_storage_key("../etc/passwd").is_err());
        assert!(validate_storage_key("has space").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(1099)).is_ok());
        assert!(validate_price(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_CART_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_CART_QUANTITY + 1).is_err());
        assert!(validate_quantity(i64::MAX).is_err());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }
}
