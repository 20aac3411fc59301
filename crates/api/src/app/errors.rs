use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use novelfinder_infra::store::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "catalog store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_internal_errors() {
        let res = store_error_to_response(StoreError::Integrity("dangling tag".into()));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn json_error_keeps_status() {
        let res = json_error(StatusCode::NOT_FOUND, "not_found", "nope");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
