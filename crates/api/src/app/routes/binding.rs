use axum::{http::StatusCode, response::IntoResponse};

use todoapi_items::Todo;

use crate::app::binding::{CaseInsensitiveQuery, QueryPairs};
use crate::app::errors;

/// `names=a&names=b&...` → `"name1: a, name2: b"`. Fewer than two names is a 400.
pub async fn array_binding(pairs: QueryPairs) -> axum::response::Response {
    let names: Vec<&str> = pairs.values_of("names").collect();
    match names.as_slice() {
        [first, second, ..] => format!("name1: {first}, name2: {second}").into_response(),
        _ => errors::json_error(
            StatusCode::BAD_REQUEST,
            "insufficient_names",
            format!("expected at least 2 `names` parameters, got {}", names.len()),
        ),
    }
}

pub async fn bind_todo(CaseInsensitiveQuery(todo): CaseInsensitiveQuery<Todo>) -> axum::response::Response {
    match serde_json::to_string(&todo) {
        Ok(json) => {
            tracing::info!(todo = %json, "bound todo from query");
            StatusCode::OK.into_response()
        }
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "serialize_error", e.to_string()),
    }
}
