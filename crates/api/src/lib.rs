//! HTTP API: server, routing, filters, and request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;
