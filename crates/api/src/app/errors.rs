use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use todoapi_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "duplicate_id", msg),
        DomainError::NotFound(msg) => json_error(StatusCode::BAD_REQUEST, "unknown_id", msg),
        DomainError::Storage(msg) => {
            tracing::warn!("store access failed: {msg}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
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
