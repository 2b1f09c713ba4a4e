//! Error types for proxy access.

use thiserror::Error;

/// Errors that can occur while fetching or decoding one dashboard payload.
///
/// Each error is scoped to a single request slot; the aggregation layer
/// records it and falls back to the slot's default value.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The proxy answered with a non-success status.
    #[error("Proxy returned status {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Reading a local payload failed.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::from(err);
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse response"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FetchError::Status(502).to_string(), "Proxy returned status 502");
    }
}
