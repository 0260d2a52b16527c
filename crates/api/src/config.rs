//! Runtime configuration for the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "TODOAPI_BIND_ADDR";
pub const UPLOAD_PATH_VAR: &str = "TODOAPI_UPLOAD_PATH";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_PATH: &str = "upload.txt";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },
}

/// Server settings. Every field has a default; environment variables override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Destination the upload endpoint overwrites on every call.
    pub upload_path: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            upload_path: PathBuf::from(DEFAULT_UPLOAD_PATH),
        }
    }
}

impl ApiConfig {
    /// Read `TODOAPI_BIND_ADDR` / `TODOAPI_UPLOAD_PATH`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = value.parse().map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: value.clone(),
            })?;
        } else {
            tracing::debug!("{BIND_ADDR_VAR} not set; using {DEFAULT_BIND_ADDR}");
        }

        if let Some(value) = lookup(UPLOAD_PATH_VAR) {
            config.upload_path = PathBuf::from(value);
        }

        Ok(config)
    }
}
