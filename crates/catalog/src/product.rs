use novelfinder_core::{CategoryId, DomainError, DomainResult, Entity, ProductId};

use crate::{Category, Tag};

/// Maximum length (in characters) of a product description.
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// A catalog product.
///
/// The product owns a reference to exactly one category. Tag associations
/// live beside the product (many-to-many) and are resolved into a
/// [`ProductDetail`] when listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    category_id: CategoryId,
}

impl Product {
    /// Create a product, validating name and description bounds.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        category_id: CategoryId,
    ) -> DomainResult<Self> {
        let name = name.into();
        let description = description.into();
        crate::validate_name("product", &name)?;
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(DomainError::validation(format!(
                "product description exceeds {DESCRIPTION_MAX_LEN} characters"
            )));
        }
        Ok(Self {
            id,
            name,
            description,
            category_id,
        })
    }

    /// Rebuild a product from a stored row without re-validating it.
    pub fn hydrate(id: ProductId, name: String, description: String, category_id: CategoryId) -> Self {
        Self {
            id,
            name,
            description,
            category_id,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// A product with its category and tags already resolved.
///
/// This is what the listing returns and what gets serialized; building one
/// never requires a further lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Category,
    pub tags: Vec<Tag>,
}

impl ProductDetail {
    /// Assemble a detail view. Fails if `category` is not the product's own.
    ///
    /// Tags are sorted by name (then id) so the rendering is deterministic.
    pub fn assemble(product: Product, category: Category, mut tags: Vec<Tag>) -> DomainResult<Self> {
        if product.category_id() != category.id_typed() {
            return Err(DomainError::invariant(format!(
                "product {} references category {}, got {}",
                product.id_typed(),
                product.category_id(),
                category.id_typed()
            )));
        }
        tags.sort_by(|a, b| a.name().cmp(b.name()).then(a.id_typed().cmp(&b.id_typed())));
        tags.dedup_by_key(|t| t.id_typed());
        Ok(Self {
            product,
            category,
            tags,
        })
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(Tag::name)
    }
}
