//! Error types for the REST API client

use n8n_client_api::ClientApiError;
use n8n_rest_api_contract::ApiContractError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when using the REST API client
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("API contract error: {0}")]
    ApiContract(#[from] ApiContractError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{endpoint} returned error status {status}: {message}")]
    ServerError {
        status: StatusCode,
        endpoint: String,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for REST client operations
pub type RestClientResult<T> = Result<T, RestClientError>;

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::ServerError {
                status,
                endpoint,
                message,
            } => ClientApiError::request_failed(status.as_u16(), endpoint, message),
            RestClientError::Http(e) => match e.status() {
                Some(status) => ClientApiError::request_failed(
                    status.as_u16(),
                    e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    e.to_string(),
                ),
                None if e.is_decode() => ClientApiError::UnexpectedResponse(e.to_string()),
                None => ClientApiError::Transport(e.to_string()),
            },
            RestClientError::Json(e) => ClientApiError::UnexpectedResponse(e.to_string()),
            RestClientError::Url(e) => ClientApiError::InvalidInput(e.to_string()),
            RestClientError::ApiContract(e) => ClientApiError::InvalidInput(e.to_string()),
            RestClientError::Auth(message) | RestClientError::InvalidInput(message) => {
                ClientApiError::InvalidInput(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_keeps_status_and_endpoint() {
        let err = RestClientError::ServerError {
            status: StatusCode::NOT_FOUND,
            endpoint: "GET /api/v1/workflows/42".into(),
            message: "Not Found".into(),
        };
        let api_err = ClientApiError::from(err);
        assert!(api_err.is_not_found());
        assert!(api_err.to_string().contains("GET /api/v1/workflows/42"));
    }

    #[test]
    fn test_contract_error_is_invalid_input() {
        let err = RestClientError::from(ApiContractError::UnsupportedMethod("PUT".into()));
        assert!(matches!(
            ClientApiError::from(err),
            ClientApiError::InvalidInput(msg) if msg.contains("PUT")
        ));
    }
}
