//! Techlens HTTP Client
//!
//! A type-safe client for the technology-analysis API, plus the
//! [`StatusPoller`] that follows an analysis until every stage has finished.
//!
//! # Example
//!
//! ```no_run
//! use techlens_client::{AnalysisClient, ClientConfig};
//! use techlens_core::validation::TechnologyForm;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AnalysisClient::new(ClientConfig::new("http://localhost:8000"))?;
//!
//!     let request = TechnologyForm::new(
//!         "Smart bandage",
//!         "A flexible adhesive patch that measures wound temperature and pH continuously.",
//!         "4",
//!     )
//!     .into_request()?;
//!
//!     let technology = client.create_technology(&request).await?;
//!     println!("Created technology: {}", technology.id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod poller;
mod report;
mod results;
mod sections;
mod status;
mod technologies;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use poller::{PollPhase, PollSettings, PollerView, StatusPoller, StatusSource};
pub use report::{SectionState, TechnologyReport};
pub use sections::{SectionData, SectionLoader};
pub use status::{STATUS_INTERVAL_DEFAULT, STATUS_INTERVAL_MAX, STATUS_INTERVAL_MIN};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use techlens_core::domain::TechnologyId;

/// HTTP client for the analysis API
///
/// Methods are grouped by resource:
/// - Technology records (create, get)
/// - Analysis status
/// - Per-stage results (axes, patents, papers, market, visualization, medical)
/// - Aggregated report
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    /// Base URL joined with the configured path prefix
    api_root: String,
    /// HTTP client instance
    client: Client,
}

impl AnalysisClient {
    /// Create a client from a configuration
    ///
    /// The request timeout and bearer token from `config` are baked into the
    /// underlying HTTP client.
    ///
    /// # Example
    /// ```
    /// use techlens_client::{AnalysisClient, ClientConfig};
    ///
    /// let client = AnalysisClient::new(ClientConfig::new("http://localhost:8000")).unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8000");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::InvalidConfig(format!("invalid auth token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client with a custom HTTP client
    ///
    /// Only the URL settings of `config` are used; timeouts, proxies and
    /// headers come from `client`.
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        Self {
            api_root: config.api_root(),
            client,
        }
    }

    /// Get the API root every endpoint is resolved against
    pub fn base_url(&self) -> &str {
        &self.api_root
    }

    /// Absolute URL for an endpoint path such as `/technologies`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    /// Absolute URL for a sub-resource of one technology
    fn technology_url(&self, id: &TechnologyId, resource: &str) -> Result<String> {
        if id.as_str().trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "technology id cannot be empty".into(),
            ));
        }
        let mut url = self.endpoint(&format!("technologies/{}", id));
        if !resource.is_empty() {
            url.push('/');
            url.push_str(resource);
        }
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
