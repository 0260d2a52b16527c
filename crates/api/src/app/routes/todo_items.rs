use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use todoapi_core::{DomainError, Entity};
use todoapi_items::{Item, ItemId};

use crate::app::errors;
use crate::app::routes::{filters, RouteGroup};
use crate::app::services::AppServices;

/// Routes under the `/todoItems` group.
pub fn router() -> Router {
    RouteGroup::new("/todoItems")
        .route("/", get(list_items).post(create_item))
        .route("/filters", filters::marker_chain().wrap(get(filters::hello)))
        .route("/:id", get(get_item).put(replace_item).delete(delete_item))
        .into_router()
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.items_list() {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Absent ids answer 200 with a `null` body.
pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<ItemId>,
) -> axum::response::Response {
    match services.items_get(id) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(item): Json<Item>,
) -> axum::response::Response {
    let id = item.id();
    match services.items_get(id) {
        Ok(None) => {}
        Ok(Some(_)) => {
            return errors::domain_error_to_response(DomainError::conflict(format!(
                "item {id} already exists"
            )));
        }
        Err(e) => return errors::domain_error_to_response(e),
    }

    if let Err(e) = services.items_add(item.clone()) {
        return errors::domain_error_to_response(e);
    }

    tracing::info!(item_id = id, "todo item created");
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/items/{id}"))],
        Json(item),
    )
        .into_response()
}

/// Existence is checked against the body id; the path id is bound but not compared.
pub async fn replace_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(_id): Path<ItemId>,
    Json(item): Json<Item>,
) -> axum::response::Response {
    let id = item.id();
    match services.items_replace(item) {
        Ok(()) => {
            tracing::info!(item_id = id, "todo item replaced");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<ItemId>,
) -> axum::response::Response {
    match services.items_remove(id) {
        Ok(_) => {
            tracing::info!(item_id = id, "todo item deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
