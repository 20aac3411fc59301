//! Read-only admin listing and search.
//!
//! `GET /admin/` lists the registered models; `GET /admin/{model}/?q=...`
//! lists that model's rows, narrowed by the search terms in `q`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use novelfinder_catalog::SearchTerms;

use crate::app::admin_site::{self, AdminModel, ADMIN_SITE};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/", get(index))
        .route("/admin/:model", get(changelist))
        .route("/admin/:model/", get(changelist))
}

pub async fn index() -> Json<Value> {
    Json(serde_json::json!({
        "models": ADMIN_SITE.iter().map(dto::model_admin_to_json).collect::<Vec<_>>(),
    }))
}

pub async fn changelist(
    Extension(services): Extension<Arc<AppServices>>,
    Path(model): Path<String>,
    Query(query): Query<dto::AdminSearchQuery>,
) -> axum::response::Response {
    let Some(admin) = admin_site::lookup(&model) else {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no admin registered for model {model:?}"),
        );
    };
    let terms = SearchTerms::parse(&query.q);

    let rows: Result<Vec<Value>, _> = match admin.model {
        AdminModel::Product => services.search_products(&terms).await.map(|rows| {
            rows.iter().map(|row| dto::product_admin_row(admin, row)).collect()
        }),
        AdminModel::Category => services.search_categories(&terms).await.map(|rows| {
            rows.iter().map(|c| dto::category_admin_row(admin, c)).collect()
        }),
        AdminModel::Tag => services
            .search_tags(&terms)
            .await
            .map(|rows| rows.iter().map(|t| dto::tag_admin_row(admin, t)).collect()),
    };

    match rows {
        Ok(results) => Json(serde_json::json!({
            "model": admin.name,
            "query": query.q,
            "count": results.len(),
            "results": results,
        }))
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
