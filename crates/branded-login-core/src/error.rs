//! Error types for branded-login-core

use thiserror::Error;

/// Result type alias using branded-login-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in branded-login-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Community not found
    #[error("Community not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote API reported an error
    #[error("API error: {0}")]
    Api(String),
}
