use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use novelfinder_catalog::ProductFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/", get(list_products))
}

/// `GET /products/?category__name=..&tags__name=..&tags__name=..&description=..`
///
/// The raw pairs are read in order so repeated `tags__name` values all reach
/// the filter. Unknown or blank parameters impose no restriction.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let filter = ProductFilter::from_query_pairs(params);
    tracing::debug!(?filter, backend = services.backend(), "listing products");

    match services.list_products(&filter).await {
        Ok(details) => Json(details.iter().map(dto::product_to_json).collect::<Vec<_>>()).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
