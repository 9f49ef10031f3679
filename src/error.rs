//! Error types for the remote discovery API

use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure and the like
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status
    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    /// Body was not the JSON shape we expect
    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
