use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};

pub mod binding;
pub mod filters;
pub mod system;
pub mod todo_items;
pub mod upload;

/// Router for every application endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(todo_items::router())
        .route("/filterV2", filters::logging_chain().wrap(get(filters::filter_v2)))
        .route("/upload", post(upload::upload).layer(DefaultBodyLimit::disable()))
        .route("/array-binding", get(binding::array_binding))
        .route("/todos", post(binding::bind_todo))
}

/// A set of routes registered under one shared path prefix.
///
/// Paths are joined verbatim (`"/todoItems"` + `"/:id"`). A `"/"` route is
/// also reachable at the bare prefix.
pub struct RouteGroup {
    prefix: String,
    router: Router,
}

impl RouteGroup {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
            router: Router::new(),
        }
    }

    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        if path == "/" && !self.prefix.is_empty() {
            self.router = self.router.route(&self.prefix, method_router.clone());
        }
        self.router = self.router.route(&format!("{}{}", self.prefix, path), method_router);
        self
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}
