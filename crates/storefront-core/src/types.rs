//! # Domain Types
//!
//! Core domain types shared by every store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │──►│  CartLineItem   │   │  WishlistEntry  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name, image    │   │  unit_price     │   │  unit_price     │       │
//! │  │  price          │   │  quantity ≥ 1   │   │  (no quantity)  │       │
//! │  │  category       │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘            ▲                      ▲               │
//! │           └─────────────────────┴──────────────────────┘               │
//! │                        snapshot at time of adding                       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ ThemePreference │   │   ColorScheme   │                             │
//! │  │  Light | Dark   │──►│  Light | Dark   │  (resolved)                 │
//! │  │  System         │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Line items and wishlist entries copy the product's name, price, image and
//! category when they are created. A later catalog change never rewrites
//! what the shopper already saved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_price, validate_product_name};

// =============================================================================
// Product Identity
// =============================================================================

/// Stable product identity. Unique within a cart and within a wishlist.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(ProductId)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "product id".to_string(),
                reason: format!("'{}' is not a non-negative integer", s),
            })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,

    pub name: String,

    /// Price in cents.
    pub price: Money,

    /// Image reference (URL or asset path), never dereferenced here.
    #[serde(default)]
    pub image: String,

    pub category: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Creates a validated product with no image or description.
    ///
    /// ## Rules
    /// - name must be non-empty and at most 200 characters
    /// - price must be non-negative
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> CoreResult<Self> {
        let product = Product {
            id,
            name: name.into(),
            price,
            image: String::new(),
            category: category.into(),
            description: None,
        };
        product.validate()?;
        Ok(product)
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the shape rules for records that arrive from outside (JSON).
    pub fn validate(&self) -> CoreResult<()> {
        validate_product_name(&self.name)?;
        validate_price(self.price)?;
        Ok(())
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// A line in the shopping cart.
///
/// ## Invariants
/// - `quantity >= 1`; a line that would reach 0 is removed instead
/// - no two lines in a cart share `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    /// Price frozen at time of adding.
    pub unit_price: Money,
    pub image: String,
    pub category: String,
    pub quantity: i64,
}

impl CartLineItem {
    /// Snapshots a product into a new cart line.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLineItem {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            quantity,
        }
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Wishlist Entry
// =============================================================================

/// A saved product reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub image: String,
    pub category: String,
}

impl WishlistEntry {
    pub fn from_product(product: &Product) -> Self {
        WishlistEntry {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
        }
    }
}

// =============================================================================
// Theme
// =============================================================================

/// A concrete color scheme, as observed from the system or as resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Maps the platform's "prefers dark" boolean signal.
    #[inline]
    pub const fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }

    /// Presentation class name the UI toggles on its root element.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shopper's theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the system color scheme.
    #[default]
    System,
}

impl ThemePreference {
    /// Resolves the preference against the observed system scheme.
    ///
    /// ```rust
    /// use storefront_core::{ColorScheme, ThemePreference};
    ///
    /// assert_eq!(ThemePreference::System.resolve(ColorScheme::Dark), ColorScheme::Dark);
    /// assert_eq!(ThemePreference::Light.resolve(ColorScheme::Dark), ColorScheme::Light);
    /// ```
    pub const fn resolve(&self, system: ColorScheme) -> ColorScheme {
        match self {
            ThemePreference::Light => ColorScheme::Light,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::System => system,
        }
    }

    #[inline]
    pub const fn follows_system(&self) -> bool {
        matches!(self, ThemePreference::System)
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemePreference::Light => write!(f, "light"),
            ThemePreference::Dark => write!(f, "dark"),
            ThemePreference::System => write!(f, "system"),
        }
    }
}

impl FromStr for ThemePreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" | "auto" => Ok(ThemePreference::System),
            other => Err(ValidationError::InvalidFormat {
                field: "theme".to_string(),
                reason: format!("unknown theme '{}', expected light, dark or system", other),
            }),
        }
    }
}
