use crate::prelude::*;
use std::time::Duration;

/// Subscribers API configuration from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Default API base URL (local development backend)
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Load configuration from environment variables
    /// Uses SUBDASH_API_URL with default fallback
    /// Uses SUBDASH_TIMEOUT (seconds) with default fallback; unparsable values are ignored
    pub fn from_env() -> Self {
        let timeout = std::env::var("SUBDASH_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);

        Self {
            base_url: std::env::var("SUBDASH_API_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Full URL of the subscriber list endpoint
    pub fn subscribers_url(&self) -> String {
        // Handle base_url that may or may not have trailing slash
        format!("{}/api/subscribers/", self.base_url.trim_end_matches('/'))
    }
}

/// Create an HTTP client for the subscribers API
pub fn create_client(config: &ApiConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}
