use std::sync::Arc;

use novelfinder_catalog::{Category, ProductDetail, ProductFilter, SearchTerms, Tag};
use novelfinder_infra::config::StoreConfig;
use novelfinder_infra::db;
use novelfinder_infra::listing;
use novelfinder_infra::store::{
    CatalogStore, Fixture, InMemoryCatalogStore, PostgresCatalogStore, ProductRow, StoreError,
};

/// Store handle shared by every request.
#[derive(Debug, Clone)]
pub enum AppServices {
    InMemory { store: Arc<InMemoryCatalogStore> },
    Persistent { store: Arc<PostgresCatalogStore> },
}

impl AppServices {
    pub fn in_memory(store: InMemoryCatalogStore) -> Self {
        AppServices::InMemory {
            store: Arc::new(store),
        }
    }

    /// Wire the backend selected by configuration: a Postgres pool, or an
    /// in-memory catalog seeded from the fixture when one is given.
    pub async fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match config {
            StoreConfig::Postgres(db_config) => {
                let pool = db::connect(db_config).await?;
                Ok(AppServices::Persistent {
                    store: Arc::new(PostgresCatalogStore::new(pool)),
                })
            }
            StoreConfig::InMemory { fixture: Some(path) } => {
                let fixture = Fixture::load(path).await?;
                Ok(Self::in_memory(InMemoryCatalogStore::from_fixture(fixture)?))
            }
            StoreConfig::InMemory { fixture: None } => Ok(Self::in_memory(InMemoryCatalogStore::new())),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            AppServices::InMemory { .. } => "in_memory",
            AppServices::Persistent { .. } => "postgres",
        }
    }

    fn store(&self) -> &dyn CatalogStore {
        match self {
            AppServices::InMemory { store } => store.as_ref(),
            AppServices::Persistent { store } => store.as_ref(),
        }
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductDetail>, StoreError> {
        listing::list_products(self.store(), filter).await
    }

    pub async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductRow>, StoreError> {
        self.store().search_products(terms).await
    }

    pub async fn search_categories(&self, terms: &SearchTerms) -> Result<Vec<Category>, StoreError> {
        self.store().search_categories(terms).await
    }

    pub async fn search_tags(&self, terms: &SearchTerms) -> Result<Vec<Tag>, StoreError> {
        self.store().search_tags(terms).await
    }
}
