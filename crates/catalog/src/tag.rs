use novelfinder_core::{DomainResult, Entity, TagId};

/// A free-form label attached to any number of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    id: TagId,
    name: String,
}

impl Tag {
    /// Create a tag, validating its name.
    pub fn new(id: TagId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        crate::validate_name("tag", &name)?;
        Ok(Self { id, name })
    }

    /// Rebuild a tag from a stored row without re-validating it.
    pub fn hydrate(id: TagId, name: String) -> Self {
        Self { id, name }
    }

    pub fn id_typed(&self) -> TagId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Tag {
    type Id = TagId;

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

    #[test]
    fn name_at_limit_is_accepted() {
        let name = "t".repeat(crate::NAME_MAX_LEN);
        assert!(Tag::new(TagId::new(), name).is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(Tag::new(TagId::new(), "").is_err());
    }
}
