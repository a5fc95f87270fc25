mod client;
mod error;

use std::time::Duration;

pub use client::ApiClient;
pub use error::ApiError;

pub const DEFAULT_API_BASE: &str = "https://api.mackerelio.com";

/// Connection settings for the monitoring API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
