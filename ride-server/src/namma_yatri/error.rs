//! Namma Yatri client error types.

use serde_json::Value;

/// Errors from the Namma Yatri HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// No HTTP response at all: DNS failure, refused connection, timeout,
    /// or the connection dropped before a status line arrived.
    #[error("{0}")]
    Unreachable(#[source] reqwest::Error),

    /// The API answered with an error status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: Value },

    /// A response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The body was read but didn't have the shape we need.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Setup(#[source] reqwest::Error),
}

impl UpstreamError {
    /// Whether this failure means the aggregator could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, UpstreamError::Unreachable(_))
    }

    /// The value reported to callers: the API's own error body when there is
    /// one, otherwise the error message.
    pub fn payload(&self) -> Value {
        match self {
            UpstreamError::Api { body, .. } => body.clone(),
            UpstreamError::Unreachable(e) | UpstreamError::Body(e) => Value::String(e.to_string()),
            other => Value::String(other.to_string()),
        }
    }
}
