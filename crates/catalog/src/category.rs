use novelfinder_core::{CategoryId, DomainResult, Entity};

/// A product category. Every product belongs to exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    /// Create a category, validating its name.
    pub fn new(id: CategoryId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        crate::validate_name("category", &name)?;
        Ok(Self { id, name })
    }

    /// Rebuild a category from a stored row without re-validating it.
    pub fn hydrate(id: CategoryId, name: String) -> Self {
        Self { id, name }
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novelfinder_core::DomainError;

    #[test]
    fn new_accepts_regular_name() {
        let category = Category::new(CategoryId::new(), "Books").unwrap();
        assert_eq!(category.name(), "Books");
        assert_eq!(category.label(), "Books");
    }

    #[test]
    fn new_rejects_blank_name() {
        let err = Category::new(CategoryId::new(), "   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_rejects_overlong_name() {
        let name = "x".repeat(crate::NAME_MAX_LEN + 1);
        assert!(Category::new(CategoryId::new(), name).is_err());
    }
}
