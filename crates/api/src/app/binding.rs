//! Query-string binding extractors.
//!
//! Both extractors read the raw query as ordered `(key, value)` pairs so that
//! repeated keys survive and keys can be matched without regard to case.

use std::collections::HashSet;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::app::errors;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("malformed query string: {0}")]
    Malformed(#[from] serde_urlencoded::de::Error),
    #[error("could not normalize query string: {0}")]
    Normalize(#[from] serde_urlencoded::ser::Error),
}

impl IntoResponse for BindingError {
    fn into_response(self) -> Response {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_query", self.to_string())
    }
}

/// Parse a raw query into pairs, preserving order and repeats.
pub fn parse_pairs(query: &str) -> Result<Vec<(String, String)>, BindingError> {
    Ok(serde_urlencoded::from_str(query)?)
}

/// Bind `T` from pairs whose keys are matched case-insensitively.
///
/// Empty values count as absent, so `serde(default)` fields fall back to
/// their defaults and required fields fail. When a key repeats (in any
/// case) the first value wins.
pub fn bind_case_insensitive<T: DeserializeOwned>(
    pairs: Vec<(String, String)>,
) -> Result<T, BindingError> {
    let mut seen = HashSet::new();
    let normalized: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_ascii_lowercase(), value))
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect();
    let encoded = serde_urlencoded::to_string(&normalized)?;
    Ok(serde_urlencoded::from_str(&encoded)?)
}

/// Every query pair in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl QueryPairs {
    /// Values for `key` (case-insensitive) in the order they appeared.
    pub fn values_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = BindingError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_pairs(parts.uri.query().unwrap_or("")).map(QueryPairs)
    }
}

/// Flat struct bound field-by-field from same-named query parameters.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for CaseInsensitiveQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BindingError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let QueryPairs(pairs) = QueryPairs::from_request_parts(parts, state).await?;
        bind_case_insensitive(pairs).map(CaseInsensitiveQuery)
    }
}
