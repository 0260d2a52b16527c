use axum::response::IntoResponse;

use crate::middleware::{FilterChain, LoggingFilter, QueryMarkerFilter};

/// Substring the raw query must contain to reach [`hello`].
pub const QUERY_MARKER: &str = "meep";

pub fn marker_chain() -> FilterChain {
    FilterChain::new().with(QueryMarkerFilter::new(QUERY_MARKER))
}

/// Three nested logging filters; the handler logs between their phases.
pub fn logging_chain() -> FilterChain {
    FilterChain::new()
        .with(LoggingFilter::new("1"))
        .with(LoggingFilter::new("2"))
        .with(LoggingFilter::new("3"))
}

pub async fn hello() -> impl IntoResponse {
    "Hello World"
}

pub async fn filter_v2() -> impl IntoResponse {
    tracing::info!("Endpoint");
    "Test of multiple filters"
}
