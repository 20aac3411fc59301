//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two listing
/// filters with the same criteria select the same rows, so they are the same
/// filter; two products with the same name are still two products.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct NameMatch(String);
///
/// impl ValueObject for NameMatch {}
///
/// assert_eq!(NameMatch("Books".into()), NameMatch("Books".into()));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
