//! JSON fixtures for seeding the in-memory catalog.
//!
//! ```json
//! {
//!   "categories": [{ "identifier": "…", "name": "Books" }],
//!   "tags":       [{ "identifier": "…", "name": "Fiction" }],
//!   "products":   [{
//!     "identifier": "…", "name": "Dune", "description": "…",
//!     "category": "<category identifier>", "tags": ["<tag identifier>"]
//!   }]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::instrument;

use novelfinder_core::{CategoryId, ProductId, TagId};

use super::r#trait::StoreError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub categories: Vec<FixtureCategory>,
    #[serde(default)]
    pub tags: Vec<FixtureTag>,
    #[serde(default)]
    pub products: Vec<FixtureProduct>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureCategory {
    pub identifier: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureTag {
    pub identifier: TagId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureProduct {
    pub identifier: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: CategoryId,
    #[serde(default)]
    pub tags: Vec<TagId>,
}

impl Fixture {
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Fixture(e.to_string()))
    }

    #[instrument(skip(path), fields(path = %path.display()), err)]
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Fixture(format!("{}: {e}", path.display())))?;
        let fixture = Self::from_json_str(&raw)?;
        tracing::info!(
            categories = fixture.categories.len(),
            tags = fixture.tags.len(),
            products = fixture.products.len(),
            "fixture loaded"
        );
        Ok(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CatalogStore, InMemoryCatalogStore};
    use novelfinder_catalog::ProductFilter;

    const BOOKS: &str = "01920000-0000-7000-8000-000000000001";
    const FICTION: &str = "01920000-0000-7000-8000-000000000002";
    const DUNE: &str = "01920000-0000-7000-8000-000000000003";

    fn sample() -> String {
        format!(
            r#"{{
                "categories": [{{ "identifier": "{BOOKS}", "name": "Books" }}],
                "tags": [{{ "identifier": "{FICTION}", "name": "Fiction" }}],
                "products": [{{
                    "identifier": "{DUNE}",
                    "name": "Dune",
                    "description": "Spice and sandworms",
                    "category": "{BOOKS}",
                    "tags": ["{FICTION}"]
                }}]
            }}"#
        )
    }

    #[tokio::test]
    async fn fixture_seeds_store() {
        let fixture = Fixture::from_json_str(&sample()).unwrap();
        let store = InMemoryCatalogStore::from_fixture(fixture).unwrap();

        let rows = store.fetch_products(&ProductFilter::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product.id_typed().to_string(), DUNE);
        assert_eq!(rows[0].category.name(), "Books");

        let tags = store.fetch_tags(&[rows[0].product.id_typed()]).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].1.name(), "Fiction");
    }

    #[test]
    fn empty_document_is_an_empty_fixture() {
        let fixture = Fixture::from_json_str("{}").unwrap();
        assert!(fixture.products.is_empty());
    }

    #[test]
    fn malformed_json_is_a_fixture_error() {
        let err = Fixture::from_json_str("{ \"products\": 3 }").unwrap_err();
        assert!(matches!(err, StoreError::Fixture(_)));
    }

    #[test]
    fn dangling_category_reference_is_an_integrity_error() {
        let json = sample().replace(
            &format!("\"category\": \"{BOOKS}\""),
            "\"category\": \"01920000-0000-7000-8000-0000000000ff\"",
        );
        let fixture = Fixture::from_json_str(&json).unwrap();
        let err = InMemoryCatalogStore::from_fixture(fixture).unwrap_err();
        assert!(matches!(err, StoreError::Integrity(_)));
    }

    #[test]
    fn invalid_row_is_a_domain_error() {
        let json = sample().replace("\"name\": \"Dune\"", "\"name\": \"\"");
        let fixture = Fixture::from_json_str(&json).unwrap();
        let err = InMemoryCatalogStore::from_fixture(fixture).unwrap_err();
        assert!(matches!(err, StoreError::Domain(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_fixture_error() {
        let err = Fixture::load(Path::new("/nonexistent/novelfinder-fixture.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Fixture(_)));
    }
}
