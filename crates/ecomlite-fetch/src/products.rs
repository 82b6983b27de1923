//! # Product Catalog
//!
//! The product list from `GET {base}/products`, plus the admin dashboard's
//! local edits on top of it.
//!
//! ## Data Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Catalog API ── refresh() ──► FetchResource<Vec<Product>>             │
//! │                                       ▲                                 │
//! │                                       │ replace (no request)            │
//! │                                       │                                 │
//! │   add_product / update_product / remove_product                        │
//! │                                                                         │
//! │   Edits live only in memory. The API is never written to, and the     │
//! │   next refresh() brings back the server's list.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use ecomlite_core::catalog::{self, ProductDraft};
use ecomlite_core::{CoreError, CoreResult, Product, ProductId, ValidationError};
use tracing::info;

use crate::client::Fetcher;
use crate::resource::{FetchMode, FetchResource, ResourceState};

/// The storefront's product list.
#[derive(Clone)]
pub struct ProductCatalog {
    base_url: String,
    fetcher: Arc<dyn Fetcher>,
    products: FetchResource<Vec<Product>>,
}

impl ProductCatalog {
    /// Creates the catalog for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn Fetcher>, mode: FetchMode) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let products = FetchResource::new(
            format!("{}/products", base_url),
            Arc::clone(&fetcher),
            mode,
        );

        ProductCatalog {
            base_url,
            fetcher,
            products,
        }
    }

    /// The current list; empty when nothing has loaded.
    pub fn products(&self) -> Vec<Product> {
        self.products.data().unwrap_or_default()
    }

    pub fn loading(&self) -> bool {
        self.products.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.products.error()
    }

    /// Re-requests the list, discarding local edits on success.
    pub async fn refresh(&self) -> ResourceState<Vec<Product>> {
        self.products.trigger().await
    }

    /// Waits for an in-flight load to finish.
    pub async fn settled(&self) -> ResourceState<Vec<Product>> {
        self.products.settled().await
    }

    /// The underlying resource, for subscribing to changes.
    pub fn resource(&self) -> &FetchResource<Vec<Product>> {
        &self.products
    }

    /// Looks a product up in the current list.
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.products
            .with_data(|list| list?.iter().find(|p| p.id == id).cloned())
    }

    /// A resource for the product detail endpoint, `GET {base}/products/{id}`.
    pub fn product(&self, id: ProductId, mode: FetchMode) -> FetchResource<Product> {
        FetchResource::new(
            format!("{}/products/{}", self.base_url, id),
            Arc::clone(&self.fetcher),
            mode,
        )
    }

    /// Creates a product locally and puts it first in the list.
    ///
    /// The id is the current epoch milliseconds, moved past every existing id.
    pub fn add_product(&self, draft: ProductDraft) -> Result<Product, ValidationError> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);

        let product = self.products.modify(|list| {
            let id = catalog::next_product_id(list.as_deref(), now);
            let product = draft.into_product(id)?;
            *list = Some(catalog::insert_product(list.take(), product.clone()));
            Ok::<_, ValidationError>(product)
        })?;

        info!(id = product.id, title = %product.title, "Product added locally");
        Ok(product)
    }

    /// Applies `draft` to the product with `id`.
    ///
    /// ## Errors
    /// - `CoreError::ProductNotFound` when the list has no such product
    /// - `CoreError::Validation` when the draft is invalid
    pub fn update_product(&self, id: ProductId, draft: ProductDraft) -> CoreResult<Product> {
        let product = self.products.modify(|list| {
            let existing = list
                .as_ref()
                .and_then(|products| products.iter().find(|p| p.id == id))
                .ok_or(CoreError::ProductNotFound(id))?;
            let updated = draft.apply_to(existing)?;
            *list = Some(catalog::update_product(list.take(), updated.clone()));
            Ok::<_, CoreError>(updated)
        })?;

        info!(id, title = %product.title, "Product updated locally");
        Ok(product)
    }

    /// Drops the product with `id`. Returns whether it was in the list.
    pub fn remove_product(&self, id: ProductId) -> bool {
        let removed = self.products.modify(|list| {
            let before = list.as_ref().map_or(0, Vec::len);
            let remaining = catalog::remove_product(list.take(), id);
            let removed = remaining.len() < before;
            *list = Some(remaining);
            removed
        });

        if removed {
            info!(id, "Product removed locally");
        }
        removed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use ecomlite_core::{Money, Rating, PLACEHOLDER_IMAGE};

    use super::*;
    use crate::error::FetchResult;

    /// Serves a fixed body for every URL.
    struct StaticFetcher(&'static str);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn get(&self, _url: &str) -> FetchResult<String> {
            Ok(self.0.to_string())
        }
    }

    const TWO_PRODUCTS: &str = r#"[
        {"id": 1, "title": "Backpack", "price": 109.95, "category": "bags", "image": "https://fakestoreapi.com/img/1.jpg"},
        {"id": 2, "title": "T-Shirt", "price": 22.3}
    ]"#;

    async fn loaded() -> ProductCatalog {
        let catalog = ProductCatalog::new(
            "https://catalog.test/",
            Arc::new(StaticFetcher(TWO_PRODUCTS)),
            FetchMode::Lazy,
        );
        catalog.refresh().await;
        catalog
    }

    fn ids(catalog: &ProductCatalog) -> Vec<ProductId> {
        catalog.products().iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_refresh_loads_list() {
        let catalog = loaded().await;

        assert_eq!(ids(&catalog), vec![1, 2]);
        assert_eq!(catalog.products()[1].price, Money::from_cents(2230));
        assert_eq!(catalog.resource().url(), "https://catalog.test/products");
        assert!(!catalog.loading());
    }

    #[tokio::test]
    async fn test_add_product_prepends_with_fresh_id() {
        let catalog = loaded().await;

        let product = catalog
            .add_product(ProductDraft::new("Desk Lamp", Money::from_cents(2450)))
            .unwrap();

        assert_eq!(ids(&catalog)[0], product.id);
        assert_eq!(catalog.products().len(), 3);
        assert!(product.id > 1_600_000_000_000);
        assert_eq!(product.rating, Some(Rating::default()));
        assert_eq!(product.image, PLACEHOLDER_IMAGE);
    }

    #[tokio::test]
    async fn test_add_to_unloaded_catalog() {
        let catalog = ProductCatalog::new(
            "https://catalog.test",
            Arc::new(StaticFetcher("[]")),
            FetchMode::Lazy,
        );

        catalog
            .add_product(ProductDraft::new("Lamp", Money::from_cents(100)))
            .unwrap();
        assert_eq!(catalog.products().len(), 1);

        let err = catalog
            .add_product(ProductDraft::new("", Money::from_cents(100)))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
        assert_eq!(catalog.products().len(), 1);
    }

    #[tokio::test]
    async fn test_update_product() {
        let catalog = loaded().await;

        let updated = catalog
            .update_product(1, ProductDraft::new("Daypack", Money::from_cents(8999)))
            .unwrap();
        assert_eq!(updated.category, "bags");
        assert_eq!(catalog.find(1).map(|p| p.title), Some("Daypack".to_string()));
        assert_eq!(ids(&catalog), vec![1, 2]);

        let err = catalog
            .update_product(99, ProductDraft::new("Ghost", Money::from_cents(100)))
            .unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(99)));
    }

    #[tokio::test]
    async fn test_remove_product() {
        let catalog = loaded().await;

        assert!(catalog.remove_product(1));
        assert!(!catalog.remove_product(1));
        assert_eq!(ids(&catalog), vec![2]);
    }

    #[tokio::test]
    async fn test_refresh_discards_local_edits() {
        let catalog = loaded().await;
        catalog.remove_product(1);
        catalog.remove_product(2);

        catalog.refresh().await;
        assert_eq!(ids(&catalog), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_product_detail_resource() {
        let catalog = ProductCatalog::new(
            "https://catalog.test",
            Arc::new(StaticFetcher(r#"{"id": 5, "title": "Ring", "price": 9.99}"#)),
            FetchMode::Lazy,
        );

        let detail = catalog.product(5, FetchMode::Immediate);
        assert_eq!(detail.url(), "https://catalog.test/products/5");

        let state = detail.settled().await;
        assert_eq!(state.data.map(|p| p.title), Some("Ring".to_string()));
    }
}
