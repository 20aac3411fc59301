//! Postgres-backed catalog store.
//!
//! Reads the tables described in `sql/schema.sql`:
//!
//! | table          | columns                                                  |
//! |----------------|----------------------------------------------------------|
//! | `categories`   | `identifier`, `name`                                     |
//! | `tags`         | `identifier`, `name`                                     |
//! | `products`     | `identifier`, `name`, `description`, `category_id`       |
//! | `product_tags` | `product_id`, `tag_id` (primary key on the pair)         |
//!
//! ## Fetch plan
//!
//! A product listing costs exactly two statements:
//!
//! 1. `products JOIN categories`, with the tag OR-set as an `EXISTS` subquery
//!    so a product carrying several requested tags still yields one row;
//! 2. `product_tags JOIN tags WHERE product_id = ANY($1)` for the whole batch.
//!
//! Filter values are always bound, never interpolated.

use std::sync::Arc;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{instrument, Span};
use uuid::Uuid;

use novelfinder_catalog::{Category, Product, ProductFilter, SearchTerms, Tag};
use novelfinder_core::{CategoryId, ProductId, TagId};

use super::r#trait::{CatalogStore, ProductRow, StoreError};

const PRODUCT_SELECT: &str = r#"
SELECT
    p.identifier AS product_id,
    p.name AS product_name,
    p.description AS product_description,
    c.identifier AS category_id,
    c.name AS category_name
FROM products p
JOIN categories c ON c.identifier = p.category_id
WHERE TRUE"#;

/// Postgres-backed read access to the catalog.
///
/// `Send + Sync`; all statements go through the SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

/// Turn a user term into an `ILIKE` pattern that matches it literally
/// anywhere in the column.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn product_listing_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(PRODUCT_SELECT);

    if let Some(name) = filter.category_name() {
        qb.push(" AND c.name = ").push_bind(name.to_string());
    }

    if !filter.tag_names().is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM product_tags pt JOIN tags t ON t.identifier = pt.tag_id \
             WHERE pt.product_id = p.identifier AND t.name = ANY(",
        )
        .push_bind(filter.tag_names().to_vec())
        .push("))");
    }

    if let Some(term) = filter.description() {
        qb.push(" AND p.description ILIKE ")
            .push_bind(contains_pattern(term))
            .push(" ESCAPE '\\'");
    }

    push_search_terms(&mut qb, &["p.description"], filter.search_terms());

    qb.push(" ORDER BY p.identifier");
    qb
}

/// Append one `AND (col ILIKE $n OR ...)` group per search term.
fn push_search_terms(qb: &mut QueryBuilder<'static, Postgres>, columns: &[&str], terms: &SearchTerms) {
    for term in terms.terms() {
        let pattern = contains_pattern(term);
        qb.push(" AND (");
        for (idx, column) in columns.iter().enumerate() {
            if idx > 0 {
                qb.push(" OR ");
            }
            qb.push(*column)
                .push(" ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        qb.push(")");
    }
}

pub(crate) fn product_search_query(terms: &SearchTerms) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(PRODUCT_SELECT);
    push_search_terms(&mut qb, &["p.identifier::text", "p.name", "p.description"], terms);
    qb.push(" ORDER BY p.identifier");
    qb
}

fn named_search_query(table: &str, terms: &SearchTerms) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT identifier, name FROM {table} WHERE TRUE"));
    push_search_terms(&mut qb, &["identifier::text", "name"], terms);
    qb.push(" ORDER BY identifier");
    qb
}

fn product_row(row: &PgRow) -> Result<ProductRow, StoreError> {
    let category_id = CategoryId::from_uuid(row.try_get::<Uuid, _>("category_id")?);
    Ok(ProductRow {
        product: Product::hydrate(
            ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            row.try_get("product_name")?,
            row.try_get("product_description")?,
            category_id,
        ),
        category: Category::hydrate(category_id, row.try_get("category_name")?),
    })
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self), fields(operation = "fetch_products", row_count = tracing::field::Empty), err)]
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError> {
        let mut qb = product_listing_query(filter);
        let rows = qb.build().fetch_all(&*self.pool).await?;
        let rows = rows.iter().map(product_row).collect::<Result<Vec<_>, _>>()?;
        Span::current().record("row_count", rows.len());
        Ok(rows)
    }

    #[instrument(skip(self, product_ids), fields(operation = "fetch_tags", batch = product_ids.len(), row_count = tracing::field::Empty), err)]
    async fn fetch_tags(&self, product_ids: &[ProductId]) -> Result<Vec<(ProductId, Tag)>, StoreError> {
        if product_ids.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<Uuid> = product_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT
                pt.product_id,
                t.identifier AS tag_id,
                t.name AS tag_name
            FROM product_tags pt
            JOIN tags t ON t.identifier = pt.tag_id
            WHERE pt.product_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&*self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let product_id = ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?);
            let tag = Tag::hydrate(
                TagId::from_uuid(row.try_get::<Uuid, _>("tag_id")?),
                row.try_get("tag_name")?,
            );
            out.push((product_id, tag));
        }
        Span::current().record("row_count", out.len());
        Ok(out)
    }

    #[instrument(skip(self), fields(operation = "search_products"), err)]
    async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductRow>, StoreError> {
        let mut qb = product_search_query(terms);
        let rows = qb.build().fetch_all(&*self.pool).await?;
        rows.iter().map(product_row).collect()
    }

    #[instrument(skip(self), fields(operation = "search_categories"), err)]
    async fn search_categories(&self, terms: &SearchTerms) -> Result<Vec<Category>, StoreError> {
        let mut qb = named_search_query("categories", terms);
        let rows = qb.build().fetch_all(&*self.pool).await?;
        rows.iter()
            .map(|row| -> Result<Category, StoreError> {
                Ok(Category::hydrate(
                    CategoryId::from_uuid(row.try_get::<Uuid, _>("identifier")?),
                    row.try_get("name")?,
                ))
            })
            .collect()
    }

    #[instrument(skip(self), fields(operation = "search_tags"), err)]
    async fn search_tags(&self, terms: &SearchTerms) -> Result<Vec<Tag>, StoreError> {
        let mut qb = named_search_query("tags", terms);
        let rows = qb.build().fetch_all(&*self.pool).await?;
        rows.iter()
            .map(|row| -> Result<Tag, StoreError> {
                Ok(Tag::hydrate(
                    TagId::from_uuid(row.try_get::<Uuid, _>("identifier")?),
                    row.try_get("name")?,
                ))
            })
            .collect()
    }
}
