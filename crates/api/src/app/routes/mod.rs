use axum::{routing::get, Router};

pub mod admin;
pub mod products;
pub mod system;

/// Router for every public endpoint. Mounted at the root and under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::api_root))
        .route("/health", get(system::health))
        .merge(products::router())
        .merge(admin::router())
}
