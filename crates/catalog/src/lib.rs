//! Catalog domain module.
//!
//! This crate contains the catalog schema (categories, tags, products) and the
//! listing filter semantics, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod category;
pub mod filter;
pub mod product;
pub mod search;
pub mod tag;

pub use category::Category;
pub use filter::{ProductFilter, CATEGORY_NAME_PARAM, DESCRIPTION_PARAM, SEARCH_PARAM, TAG_NAME_PARAM};
pub use product::{Product, ProductDetail, DESCRIPTION_MAX_LEN};
pub use search::SearchTerms;
pub use tag::Tag;

/// Maximum length (in characters) of any entity name.
pub const NAME_MAX_LEN: usize = 200;

pub(crate) fn validate_name(kind: &str, name: &str) -> novelfinder_core::DomainResult<()> {
    if name.trim().is_empty() {
        return Err(novelfinder_core::DomainError::validation(format!(
            "{kind} name must not be empty"
        )));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(novelfinder_core::DomainError::validation(format!(
            "{kind} name exceeds {NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}
