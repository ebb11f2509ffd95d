//! Application state for the stamping API

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;

use crate::error::ApiError;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Runtime configuration, fixed at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret; `None` disables the check
    pub api_key: Option<String>,
    pub fetch_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            fetch_timeout: Duration::from_secs(60),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Check the presented `x-api-key` header against the configured key
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.api_key.as_deref() else {
            return Ok(());
        };
        let presented = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented == Some(expected) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Outbound client for `file_url` downloads
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: Config, http: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http,
        }
    }
}
