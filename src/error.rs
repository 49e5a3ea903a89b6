//! Error types for the CRPT client.

use thiserror::Error;

/// Main error type for CRPT client operations.
#[derive(Error, Debug)]
pub enum CrptError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The rate limit gate was closed while waiting for a slot
    #[error("Rate limit gate is closed")]
    GateClosed,

    /// Document serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport errors from the HTTP layer
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type alias for CRPT client operations.
pub type Result<T> = std::result::Result<T, CrptError>;
