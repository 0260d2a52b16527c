//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared handler state (item store, upload destination)
//! - `routes/`: HTTP routes + handlers (one file per endpoint area)
//! - `binding.rs`: query-string extractors
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use todoapi_items::ItemStore;

use crate::config::ApiConfig;

pub mod binding;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// The store is injected so each caller owns its lifetime.
pub fn build_app(config: &ApiConfig, items: Arc<dyn ItemStore>) -> Router {
    let services = Arc::new(services::AppServices::new(config, items));

    routes::router().layer(ServiceBuilder::new().layer(Extension(services)))
}
