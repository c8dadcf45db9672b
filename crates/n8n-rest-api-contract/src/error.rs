//! Error types for API contract parsing

use thiserror::Error;

/// Errors that can occur while interpreting caller input against the contract
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiContractError {
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),
}
