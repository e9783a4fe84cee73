//! # Catalog Commands

use serde::Serialize;
use storefront_core::Product;
use storefront_state::StoreOrchestrator;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub products: Vec<Product>,
    pub vocabulary: Vec<String>,
}

pub fn list_products(orchestrator: &StoreOrchestrator) -> CatalogResponse {
    debug!("list_products command");
    let catalog = orchestrator.catalog();
    CatalogResponse {
        products: catalog.products().to_vec(),
        vocabulary: catalog.vocabulary().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[tokio::test]
    async fn test_lists_builtin_catalog() {
        let orchestrator = test_support::orchestrator();
        let response = list_products(&orchestrator);
        assert_eq!(response.products.len(), 12);
        assert!(!response.vocabulary.is_empty());
    }
}
