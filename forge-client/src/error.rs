//! Error types for the Forge client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Forge client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
        /// The orchestrator marked the failure as safe to retry
        retryable: bool,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
            retryable: false,
        }
    }

    /// Build an API error from a raw error body
    ///
    /// The orchestrator answers `{"error": "...", "retryable": bool}`; other
    /// bodies are kept verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
            return Self::api_error(status, body);
        };

        let message = json
            .get("error")
            .and_then(|error| error.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());

        Self::ApiError {
            status,
            message,
            retryable: json
                .get("retryable")
                .and_then(|retryable| retryable.as_bool())
                .unwrap_or(false),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a conflict, such as a job already being advanced
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ApiError { status: 409, .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ApiError { retryable: true, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
