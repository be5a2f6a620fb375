//! Error types shared across Gatehouse

use thiserror::Error;

/// Top-level error type for Gatehouse
#[derive(Debug, Error)]
pub enum GatehouseError {
    /// Configuration is missing or invalid (fails closed at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication subsystem failure (token signing, never verification)
    #[error("Auth error: {0}")]
    Auth(String),

    /// Socket-level I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP protocol failure while serving a connection
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, GatehouseError>;
