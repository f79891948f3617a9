//! Error types for the script gateway.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while talking to the script API.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The configured host is not a usable base URL.
    #[error("invalid API host: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
