//! Catalog storage boundary.
//!
//! Read-only access to categories, tags and products, with an in-memory
//! backend (tests/dev, fixture seeding) and a Postgres backend.

pub mod fixture;
pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use fixture::Fixture;
pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use r#trait::{CatalogStore, ProductRow, StoreError};
