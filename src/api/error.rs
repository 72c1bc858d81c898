//! Errors from talking to the marketplace REST API.

use thiserror::Error;

/// Failures of a single API request.
///
/// [`Status`](ApiError::Status) means the server answered but refused;
/// [`Decode`](ApiError::Decode) means it answered 2xx with a body we could
/// not read; [`Network`](ApiError::Network) covers everything that kept an
/// answer from arriving (DNS, refused connection, timeout).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. Carries the status code and the response body.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body could not be parsed.
    #[error("failed to parse API response: {0}")]
    Decode(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The server answered with a non-2xx status.
    pub fn is_server_rejection(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => None,
        }
    }
}
