use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use novelfinder_catalog::{Category, Product, ProductFilter, SearchTerms, Tag};
use novelfinder_core::{CategoryId, ProductId, TagId};

use super::fixture::Fixture;
use super::r#trait::{CatalogStore, ProductRow, StoreError};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Category>,
    tags: BTreeMap<TagId, Tag>,
    products: BTreeMap<ProductId, Product>,
    product_tags: BTreeSet<(ProductId, TagId)>,
}

impl Tables {
    fn tags_of(&self, product_id: ProductId) -> impl Iterator<Item = &Tag> {
        self.product_tags
            .range((product_id, TagId::from_uuid(uuid::Uuid::nil()))..)
            .take_while(move |(owner, _)| *owner == product_id)
            .filter_map(|(_, tag_id)| self.tags.get(tag_id))
    }

    fn row(&self, product: &Product) -> Result<ProductRow, StoreError> {
        let category = self
            .categories
            .get(&product.category_id())
            .ok_or_else(|| {
                StoreError::Integrity(format!(
                    "product {} references missing category {}",
                    product.id_typed(),
                    product.category_id()
                ))
            })?;
        Ok(ProductRow {
            product: product.clone(),
            category: category.clone(),
        })
    }
}

/// In-memory catalog for tests/dev.
///
/// Rows are kept in identifier order, which is also the listing order.
/// Seeding enforces the schema rules a database would: a product needs an
/// existing category, tag associations need existing tags, identifiers are
/// never reused, and deleting a category deletes its products.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a fixture, validating every row and reference.
    pub fn from_fixture(fixture: Fixture) -> Result<Self, StoreError> {
        let store = Self::new();
        for category in fixture.categories {
            store.insert_category(Category::new(category.identifier, category.name)?)?;
        }
        for tag in fixture.tags {
            store.insert_tag(Tag::new(tag.identifier, tag.name)?)?;
        }
        for product in fixture.products {
            let row = Product::new(
                product.identifier,
                product.name,
                product.description,
                product.category,
            )?;
            store.insert_product(row, &product.tags)?;
        }
        Ok(store)
    }

    pub fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        let mut tables = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if tables.categories.contains_key(&category.id_typed()) {
            return Err(StoreError::Integrity(format!(
                "duplicate category identifier {}",
                category.id_typed()
            )));
        }
        tables.categories.insert(category.id_typed(), category);
        Ok(())
    }

    pub fn insert_tag(&self, tag: Tag) -> Result<(), StoreError> {
        let mut tables = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if tables.tags.contains_key(&tag.id_typed()) {
            return Err(StoreError::Integrity(format!(
                "duplicate tag identifier {}",
                tag.id_typed()
            )));
        }
        tables.tags.insert(tag.id_typed(), tag);
        Ok(())
    }

    /// Insert a product with its tag associations. Repeated tag ids collapse
    /// into one association.
    pub fn insert_product(&self, product: Product, tag_ids: &[TagId]) -> Result<(), StoreError> {
        let mut tables = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let product_id = product.id_typed();

        if tables.products.contains_key(&product_id) {
            return Err(StoreError::Integrity(format!(
                "duplicate product identifier {product_id}"
            )));
        }
        if !tables.categories.contains_key(&product.category_id()) {
            return Err(StoreError::Integrity(format!(
                "product {product_id} references unknown category {}",
                product.category_id()
            )));
        }
        if let Some(missing) = tag_ids.iter().find(|id| !tables.tags.contains_key(id)) {
            return Err(StoreError::Integrity(format!(
                "product {product_id} references unknown tag {missing}"
            )));
        }

        tables.products.insert(product_id, product);
        for tag_id in tag_ids {
            tables.product_tags.insert((product_id, *tag_id));
        }
        Ok(())
    }

    /// Delete a category and, by cascade, every product in it. Returns the
    /// number of products removed.
    pub fn delete_category(&self, category_id: CategoryId) -> Result<usize, StoreError> {
        let mut tables = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if tables.categories.remove(&category_id).is_none() {
            return Ok(0);
        }
        let doomed: Vec<ProductId> = tables
            .products
            .values()
            .filter(|p| p.category_id() == category_id)
            .map(Product::id_typed)
            .collect();
        for product_id in &doomed {
            tables.products.remove(product_id);
        }
        tables
            .product_tags
            .retain(|(product_id, _)| !doomed.contains(product_id));
        Ok(doomed.len())
    }

    pub fn product_count(&self) -> Result<usize, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.products.len())
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut rows = Vec::new();
        for product in tables.products.values() {
            let row = tables.row(product)?;
            let tag_names = tables.tags_of(product.id_typed()).map(Tag::name);
            if filter.matches(row.category.name(), tag_names, product.description()) {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    async fn fetch_tags(&self, product_ids: &[ProductId]) -> Result<Vec<(ProductId, Tag)>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut out = Vec::new();
        for product_id in product_ids {
            out.extend(tables.tags_of(*product_id).map(|tag| (*product_id, tag.clone())));
        }
        Ok(out)
    }

    async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductRow>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut rows = Vec::new();
        for product in tables.products.values() {
            let id = product.id_typed().to_string();
            if terms.matches(&[id.as_str(), product.name(), product.description()]) {
                rows.push(tables.row(product)?);
            }
        }
        Ok(rows)
    }

    async fn search_categories(&self, terms: &SearchTerms) -> Result<Vec<Category>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables
            .categories
            .values()
            .filter(|c| terms.matches(&[c.id_typed().to_string().as_str(), c.name()]))
            .cloned()
            .collect())
    }

    async fn search_tags(&self, terms: &SearchTerms) -> Result<Vec<Tag>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables
            .tags
            .values()
            .filter(|t| terms.matches(&[t.id_typed().to_string().as_str(), t.name()]))
            .cloned()
            .collect())
    }
}
