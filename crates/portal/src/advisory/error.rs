//! Error types for the advisory client.

use thiserror::Error;

/// Errors that can occur when asking the text-generation service for advice.
///
/// Every variant is shown to the customer as the same fallback message; the
/// distinction only matters for logs.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// No API key is configured.
    #[error("missing API credential")]
    MissingCredential,

    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned an error.
    #[error("API error ({status}): {message}")]
    Api {
        /// Status string from the API, e.g. `INVALID_ARGUMENT`.
        status: String,
        /// Error message.
        message: String,
    },

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response, or it carried no text.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error envelope returned by the API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Numeric HTTP-style code.
    #[serde(default)]
    pub code: u16,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Canonical status name.
    #[serde(default)]
    pub status: String,
}
