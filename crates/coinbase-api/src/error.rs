//! Error types for the Coinbase API client.

use std::fmt;

use crate::frame::TableError;

/// Result type alias for Coinbase API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Coinbase API client.
///
/// Every variant is fatal to the call that produced it. Nothing is retried
/// or recovered inside the client.
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    Http(reqwest::Error),
    /// JSON deserialization error, or a body of the wrong shape
    Json(serde_json::Error),
    /// The exchange answered with a non-2xx status
    Upstream(UpstreamError),
    /// The response could not be arranged into a data frame
    Table(TableError),
    /// Invalid parameter provided
    InvalidParameter(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Upstream(e) => Some(e),
            Error::Table(e) => Some(e),
            Error::InvalidParameter(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Upstream(e) => write!(f, "Upstream error: {e}"),
            Error::Table(e) => write!(f, "Table error: {e}"),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<TableError> for Error {
    fn from(err: TableError) -> Self {
        Error::Table(err)
    }
}

impl From<UpstreamError> for Error {
    fn from(err: UpstreamError) -> Self {
        Error::Upstream(err)
    }
}

/// Non-2xx response returned by a Coinbase endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    /// HTTP status code
    pub status: u16,
    /// `message` field of the error body, or the status reason
    pub message: String,
    /// Raw response body
    pub body: String,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for UpstreamError {}

impl UpstreamError {
    /// Create a new upstream error.
    pub fn new(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Check if the requested resource (usually the pair) does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Check if the exchange throttled the request.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Check if the exchange itself failed.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display() {
        let err = UpstreamError::new(404, "NotFound", r#"{"message":"NotFound"}"#);
        assert_eq!(err.to_string(), "[404] NotFound");
        assert!(err.is_not_found());
        assert!(!err.is_server_error());

        let err: Error = err.into();
        assert_eq!(err.to_string(), "Upstream error: [404] NotFound");
    }

    #[test]
    fn test_status_helpers() {
        assert!(UpstreamError::new(429, "slow down", "").is_rate_limited());
        assert!(UpstreamError::new(503, "unavailable", "").is_server_error());
        assert!(!UpstreamError::new(400, "bad", "").is_server_error());
    }

    #[test]
    fn test_source_chain() {
        let err: Error = TableError::MissingColumn("id".into()).into();
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::InvalidParameter("granularity".into());
        assert!(std::error::Error::source(&err).is_none());
    }
}
