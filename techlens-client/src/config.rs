//! Client configuration
//!
//! Connection settings for the analysis API. A `ClientConfig` is built once
//! and handed to [`crate::AnalysisClient`]; nothing reads the environment
//! behind the caller's back.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Connection settings for the analysis API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Path inserted between the base URL and every endpoint (e.g., "/api/v1")
    pub path_prefix: String,

    /// Timeout applied to each request
    pub request_timeout: Duration,

    /// Bearer token sent with every request
    pub auth_token: Option<String>,
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path_prefix: String::new(),
            request_timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TECHLENS_API_URL (required)
    /// - TECHLENS_API_PREFIX (optional, default: empty)
    /// - TECHLENS_REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - TECHLENS_AUTH_TOKEN (optional)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TECHLENS_API_URL").map_err(|_| {
            ClientError::InvalidConfig("TECHLENS_API_URL environment variable not set".into())
        })?;

        let mut config = Self::new(base_url);

        if let Ok(prefix) = std::env::var("TECHLENS_API_PREFIX") {
            config.path_prefix = prefix;
        }

        if let Some(timeout) = std::env::var("TECHLENS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(timeout);
        }

        config.auth_token = std::env::var("TECHLENS_AUTH_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        Ok(config)
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Base URL and prefix joined, without a trailing slash
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.path_prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, prefix)
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::InvalidConfig("base_url cannot be empty".into()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(
                "base_url must start with http:// or https://".into(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "request_timeout must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.auth_token, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_ok());

        config.base_url = String::new();
        assert!(config.validate().is_err());

        config.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://analysis.example.com".to_string();
        assert!(config.validate().is_ok());

        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_root_joins_prefix() {
        let config = ClientConfig::new("http://localhost:8000/");
        assert_eq!(config.api_root(), "http://localhost:8000");

        let config = config.with_path_prefix("/api/v1/");
        assert_eq!(config.api_root(), "http://localhost:8000/api/v1");
    }
}
