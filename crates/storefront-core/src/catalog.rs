//! # Catalog
//!
//! The product catalog the search store filters, plus the fixed vocabulary
//! that query suggestions are drawn from.
//!
//! ## Matching
//! Both filtering and suggestions are case-insensitive substring matches.
//! A product matches when its name, category or description contains the
//! query; a vocabulary term matches when it contains the query.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId};

/// Suggestion vocabulary shipped with the built-in catalog.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "rings",
    "engagement rings",
    "wedding bands",
    "earrings",
    "necklaces",
    "pendants",
    "bracelets",
    "bangles",
    "watches",
    "gold",
    "silver",
    "diamond",
    "pearl",
];

/// An immutable product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
    #[serde(default)]
    vocabulary: Vec<String>,
}

impl Catalog {
    /// Creates a catalog, rejecting invalid records and duplicate ids.
    pub fn new(products: Vec<Product>, vocabulary: Vec<String>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id) {
                return Err(CoreError::DuplicateProduct(product.id));
            }
        }
        Ok(Catalog {
            products,
            vocabulary,
        })
    }

    /// Parses a catalog document:
    ///
    /// ```json
    /// { "products": [ { "id": 1, "name": "...", "price": 999, "category": "rings" } ],
    ///   "vocabulary": ["rings"] }
    /// ```
    pub fn from_json_str(raw: &str) -> CoreResult<Self> {
        let parsed: Catalog = serde_json::from_str(raw)?;
        Catalog::new(parsed.products, parsed.vocabulary)
    }

    /// The demo catalog the storefront ships with.
    pub fn builtin() -> Self {
        const SEED: &[(u32, &str, i64, &str)] = &[
            (1, "Solitaire Diamond Ring", 129_900, "rings"),
            (2, "Gold Wedding Band", 45_000, "rings"),
            (3, "Sapphire Halo Ring", 89_900, "rings"),
            (4, "Pearl Drop Earrings", 12_500, "earrings"),
            (5, "Diamond Stud Earrings", 59_900, "earrings"),
            (6, "Silver Hoop Earrings", 4_900, "earrings"),
            (7, "Pearl Strand Necklace", 34_900, "necklaces"),
            (8, "Gold Heart Pendant", 18_900, "necklaces"),
            (9, "Tennis Bracelet", 149_900, "bracelets"),
            (10, "Silver Charm Bracelet", 7_900, "bracelets"),
            (11, "Rose Gold Bangle", 22_900, "bracelets"),
            (12, "Classic Dress Watch", 249_900, "watches"),
        ];

        let products = SEED
            .iter()
            .map(|&(id, name, price, category)| Product {
                id: ProductId(id),
                name: name.to_string(),
                price: Money::from_cents(price),
                image: format!("/images/products/{}.jpg", id),
                category: category.to_string(),
                description: None,
            })
            .collect();

        Catalog {
            products,
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replaces the suggestion vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vec<String>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a product, failing with [`CoreError::ProductNotFound`].
    pub fn require(&self, id: ProductId) -> CoreResult<&Product> {
        self.get(id).ok_or(CoreError::ProductNotFound(id))
    }

    /// Products whose name, category or description contain `query`.
    ///
    /// An empty (or blank) query matches nothing.
    pub fn filter(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
                    || p
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Vocabulary terms containing `query`, in vocabulary order.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.vocabulary
            .iter()
            .filter(|term| term.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}
