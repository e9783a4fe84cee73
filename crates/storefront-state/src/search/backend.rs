//! Search backends.
//!
//! The storefront never talks to a real search service; [`CatalogSearch`]
//! filters an in-memory [`Catalog`] after an optional simulated latency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use storefront_core::{Catalog, Product};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Search backend unavailable: {0}")]
    Unavailable(String),

    #[error("Search failed: {0}")]
    Failed(String),
}

/// Result of one search computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub results: Vec<Product>,
    pub suggestions: Vec<String>,
}

#[async_trait]
pub trait SearchBackend: Send + Sync + std::fmt::Debug {
    /// Runs a search for an already trimmed, non-empty query.
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError>;
}

#[derive(Debug, Clone)]
pub struct CatalogSearch {
    catalog: Arc<Catalog>,
    latency: Duration,
}

impl CatalogSearch {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        CatalogSearch {
            catalog,
            latency: Duration::ZERO,
        }
    }

    /// Delays every search by `latency`, as a stand-in for a network call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl SearchBackend for CatalogSearch {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(SearchOutcome {
            results: self.catalog.filter(query),
            suggestions: self.catalog.suggest(query),
        })
    }
}
