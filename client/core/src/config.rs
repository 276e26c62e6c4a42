//! Client Configuration
//!
//! Where the chat service lives and how long requests may take.
//! Read from environment variables, matching the deployment story of the
//! service itself (same-origin in the browser, `TANYA_SERVER_URL` here).

use std::time::Duration;

/// Default service URL (the assistant's development server).
const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the chat client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the chat service (no trailing slash)
    pub server_url: String,
    /// Timeout applied to every service request
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for a specific service URL.
    pub fn new(server_url: impl Into<String>) -> Self {
        let mut url = server_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            server_url: url,
            ..Self::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads `TANYA_SERVER_URL` and `TANYA_REQUEST_TIMEOUT_SECS`; anything
    /// unset or unparsable falls back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let server_url =
            std::env::var("TANYA_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let timeout_secs: u64 = std::env::var("TANYA_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut config = Self::new(server_url);
        config.request_timeout = Duration::from_secs(timeout_secs);
        config
    }
}
