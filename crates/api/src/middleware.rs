//! Request filters: ordered interceptors composed around a single route.
//!
//! A [`FilterChain`] is turned into nested axum middleware at registration
//! time. The first registered filter is outermost, so pre-phases run in
//! registration order and post-phases in reverse. A filter that returns
//! without calling `next` short-circuits everything inside it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{from_fn, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::app::errors;

pub type FilterFuture<'a> = Pin<Box<dyn Future<Output = Response> + Send + 'a>>;

/// One link in a filter chain.
///
/// Implementations either delegate with `next.run(req).await` (optionally
/// doing work before and after) or return their own response.
pub trait Filter: Send + Sync + 'static {
    fn intercept<'a>(&'a self, req: Request, next: Next) -> FilterFuture<'a>;
}

/// Ordered list of filters applied to one route.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; it runs inside every filter registered before it.
    pub fn with(mut self, filter: impl Filter) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Compose the chain around `route`.
    pub fn wrap<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // `layer` wraps from the inside out, so the last filter goes on first.
        self.filters.iter().rev().fold(route, |route, filter| {
            let filter = Arc::clone(filter);
            route.layer(from_fn(move |req: Request, next: Next| {
                let filter = Arc::clone(&filter);
                async move { filter.intercept(req, next).await }
            }))
        })
    }
}

/// Rejects requests whose raw query string does not contain `marker`.
#[derive(Debug, Clone)]
pub struct QueryMarkerFilter {
    marker: String,
}

impl QueryMarkerFilter {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Filter for QueryMarkerFilter {
    fn intercept<'a>(&'a self, req: Request, next: Next) -> FilterFuture<'a> {
        Box::pin(async move {
            let query = req.uri().query().unwrap_or("");
            if !query.contains(self.marker.as_str()) {
                tracing::info!(query, "query marker missing; rejecting request");
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "missing_query_marker",
                    "query string does not carry the required marker",
                );
            }
            next.run(req).await
        })
    }
}

/// Logs `Before-<label>` on the way in and `After-<label>` on the way out.
#[derive(Debug, Clone)]
pub struct LoggingFilter {
    label: String,
}

impl LoggingFilter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Filter for LoggingFilter {
    fn intercept<'a>(&'a self, req: Request, next: Next) -> FilterFuture<'a> {
        Box::pin(async move {
            tracing::info!(filter = %self.label, "Before-{}", self.label);
            let res = next.run(req).await;
            tracing::info!(filter = %self.label, "After-{}", self.label);
            res
        })
    }
}
