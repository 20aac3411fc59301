//! Infrastructure layer: catalog storage, listing, config.

/// Configuration loading and representation.
pub mod config;

/// Database adapters (connection pool wiring).
pub mod db;

pub mod listing;
pub mod store;

pub use listing::list_products;
