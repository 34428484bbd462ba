//! Error types for the Techlens client

use techlens_core::dto::technology::ApiErrorBody;
use thiserror::Error;

/// Result of any analysis API call
pub type Result<T> = std::result::Result<T, ClientError>;

/// Message shown when the API gives no usable reason for a failure
pub const GENERIC_RETRY_MESSAGE: &str = "Please check the details and try again.";

/// Errors that can occur when using the Techlens client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connect, timeout, TLS or body read
    #[error("Request to analysis API failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Analysis API returned {status}: {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    ParseError(String),

    /// Rejected before anything was sent
    #[error("Request not sent: {0}")]
    InvalidRequest(String),

    /// Client configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Builds an [`ClientError::ApiError`] from a response status and body
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// The technology or resource does not exist (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if (400..500).contains(status))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if (500..600).contains(status))
    }

    /// The `detail` field of an API error body, when there is one
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::ApiError { message, .. } => ApiErrorBody::parse(message).map(|body| body.detail),
            _ => None,
        }
    }

    /// Text suitable for showing to the person who made the request
    pub fn user_message(&self) -> String {
        self.detail()
            .unwrap_or_else(|| GENERIC_RETRY_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ClientError::api_error(404, "").is_not_found());
        assert!(ClientError::api_error(422, "").is_client_error());
        assert!(ClientError::api_error(502, "").is_server_error());
        assert!(!ClientError::ParseError("x".into()).is_client_error());
    }

    #[test]
    fn test_detail_surfaced() {
        let err = ClientError::api_error(409, r#"{"detail": "Technology name already registered"}"#);
        assert_eq!(err.detail().as_deref(), Some("Technology name already registered"));
        assert_eq!(err.user_message(), "Technology name already registered");
    }

    #[test]
    fn test_generic_message_without_detail() {
        let err = ClientError::api_error(500, "<html>Bad Gateway</html>");
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message(), GENERIC_RETRY_MESSAGE);
        assert_eq!(
            ClientError::InvalidRequest("empty id".into()).user_message(),
            GENERIC_RETRY_MESSAGE
        );
    }
}
