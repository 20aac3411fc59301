use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Entry points of the API.
pub async fn api_root() -> Json<Value> {
    Json(json!({
        "products": "/products/",
    }))
}
