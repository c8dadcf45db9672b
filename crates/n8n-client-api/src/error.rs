//! Error taxonomy shared by every client implementation

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by [`crate::ClientApi`] operations
#[derive(Debug, Error)]
pub enum ClientApiError {
    /// The service answered with a non-success status
    #[error("request failed: {endpoint} returned {status}: {message}")]
    RequestFailed {
        status: u16,
        endpoint: String,
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("transport error: {0}")]
    Transport(String),

    /// Caller-supplied argument rejected before any network call
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("execution {execution_id} did not complete within {timeout:?}")]
    Timeout {
        execution_id: String,
        timeout: Duration,
    },

    /// A success response whose body could not be decoded
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("file error at {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid workflow file {}: {source}", .path.display())]
    FileFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientApiError {
    pub fn request_failed(status: u16, endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// HTTP status of a failed request, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for client API operations
pub type ClientApiResult<T> = Result<T, ClientApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = ClientApiError::request_failed(404, "GET /api/v1/workflows/42", "Not Found");
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));

        let err = ClientApiError::Transport("connection refused".into());
        assert!(!err.is_not_found());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_timeout_message_names_execution_and_budget() {
        let err = ClientApiError::Timeout {
            execution_id: "456".into(),
            timeout: Duration::from_secs(60),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "execution 456 did not complete within 60s");
    }
}
