// crates/network/src/error.rs
//! Error types for network operations

use thiserror::Error;
use vinylcast_core::AppError;
use vinylcast_resilience::ResilienceError;

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Shown when the assistant's quota is exhausted
pub const QUOTA_MESSAGE: &str = "The assistant's API key has run out of quota. Create a new key at https://aistudio.google.com/app/apikey or try again later.";

/// Errors that can occur during network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// HTTP 429 from the service
    #[error("Quota exceeded: {0}")]
    Quota(String),

    /// A successful response that carried no answer text
    #[error("The response contained no answer")]
    EmptyAnswer,

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Rejected before any request was made
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Timeout
    #[error("Operation timed out")]
    Timeout,
}

impl From<ResilienceError> for NetworkError {
    fn from(err: ResilienceError) -> Self {
        match err {
            ResilienceError::Timeout(_) => NetworkError::Timeout,
        }
    }
}

impl NetworkError {
    pub fn is_quota(&self) -> bool {
        matches!(self, NetworkError::Quota(_))
    }

    /// Text suitable for showing in place of an assistant answer
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::Quota(_) => QUOTA_MESSAGE.to_string(),
            NetworkError::EmptyAnswer => {
                "Could not get an answer from the assistant. Please try again!".to_string()
            }
            NetworkError::InvalidRequest(reason) => format!("Please check your question: {}.", reason),
            _ => "Cannot reach the assistant. Check your network connection and try again!"
                .to_string(),
        }
    }
}

impl From<NetworkError> for AppError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Quota(message) => AppError::QuotaError { message },
            NetworkError::InvalidRequest(reason) => AppError::invalid_input("request", reason),
            other => AppError::network(other.to_string(), other),
        }
    }
}
