//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: catalog store wiring (in-memory or Postgres)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `admin_site.rs`: read-only admin registrations

use std::sync::Arc;

use axum::http::Method;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod admin_site;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Prefix under which every route is mounted a second time.
pub const API_PREFIX: &str = "/api";

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .merge(routes::router())
        .nest(API_PREFIX, routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(Extension(services)),
        )
}
