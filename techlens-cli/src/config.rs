//! Configuration module
//!
//! Turns command-line arguments into the client configuration shared by
//! every command.

use anyhow::Result;
use std::time::Duration;
use techlens_client::{AnalysisClient, ClientConfig};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings for the analysis API
    pub client: ClientConfig,
}

impl Config {
    pub fn from_args(
        api_url: String,
        api_prefix: String,
        timeout_secs: u64,
        auth_token: Option<String>,
    ) -> Result<Self> {
        let mut client = ClientConfig::new(api_url)
            .with_path_prefix(api_prefix)
            .with_request_timeout(Duration::from_secs(timeout_secs));
        client.auth_token = auth_token.filter(|token| !token.is_empty());
        client.validate()?;

        Ok(Self { client })
    }

    /// Builds an API client from this configuration
    pub fn api_client(&self) -> Result<AnalysisClient> {
        Ok(AnalysisClient::new(self.client.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let config = Config::from_args(
            "http://localhost:8000/".to_string(),
            "/api/v1".to_string(),
            10,
            Some(String::new()),
        )
        .unwrap();
        assert_eq!(config.client.api_root(), "http://localhost:8000/api/v1");
        assert_eq!(config.client.request_timeout, Duration::from_secs(10));
        assert_eq!(config.client.auth_token, None);
        assert!(config.api_client().is_ok());
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(Config::from_args("localhost".to_string(), String::new(), 10, None).is_err());
        assert!(Config::from_args("http://localhost".to_string(), String::new(), 0, None).is_err());
    }
}
