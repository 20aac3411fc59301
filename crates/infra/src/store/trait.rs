use std::sync::Arc;

use thiserror::Error;

use novelfinder_catalog::{Category, Product, ProductFilter, SearchTerms, Tag};
use novelfinder_core::{DomainError, ProductId};

/// A product joined with its category in a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub product: Product,
    pub category: Category,
}

/// Catalog store operation error.
///
/// These are **infrastructure errors** (storage, integrity of seeded data) as
/// opposed to filter input, which never fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("referential integrity violation: {0}")]
    Integrity(String),

    #[error("invalid fixture: {0}")]
    Fixture(String),

    #[error("store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Read-only access to the catalog tables.
///
/// The listing path is split in two calls so that resolving relations never
/// costs one round-trip per product:
///
/// 1. [`fetch_products`](CatalogStore::fetch_products): products joined with
///    their category, restricted by the filter, each product at most once,
///    ordered by product identifier.
/// 2. [`fetch_tags`](CatalogStore::fetch_tags): every tag association of a
///    batch of products in one go.
///
/// The `search_*` methods back the operator listings.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError>;

    async fn fetch_tags(&self, product_ids: &[ProductId]) -> Result<Vec<(ProductId, Tag)>, StoreError>;

    /// Products whose identifier, name or description satisfy `terms`.
    async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductRow>, StoreError>;

    /// Categories whose identifier or name satisfy `terms`.
    async fn search_categories(&self, terms: &SearchTerms) -> Result<Vec<Category>, StoreError>;

    /// Tags whose identifier or name satisfy `terms`.
    async fn search_tags(&self, terms: &SearchTerms) -> Result<Vec<Tag>, StoreError>;
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError> {
        (**self).fetch_products(filter).await
    }

    async fn fetch_tags(&self, product_ids: &[ProductId]) -> Result<Vec<(ProductId, Tag)>, StoreError> {
        (**self).fetch_tags(product_ids).await
    }

    async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductRow>, StoreError> {
        (**self).search_products(terms).await
    }

    async fn search_categories(&self, terms: &SearchTerms) -> Result<Vec<Category>, StoreError> {
        (**self).search_categories(terms).await
    }

    async fn search_tags(&self, terms: &SearchTerms) -> Result<Vec<Tag>, StoreError> {
        (**self).search_tags(terms).await
    }
}
