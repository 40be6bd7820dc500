//! Error types for lingo-core.

use std::sync::Arc;
use thiserror::Error;

/// Result type alias using lingo-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for lingo operations
#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("Cannot reach the backend at {0}. Is it running?")]
    Unreachable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    // Backend errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests, try again later")]
    RateLimited,

    #[error("Backend error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    // Session errors
    #[error("Session initialization failed: {0}")]
    Initialization(#[source] Arc<Error>),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    // Local store errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("Lock poisoned")]
    LockPoisoned,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigValidationError),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an API error from a backend message
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Check if this error is a not found error
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Initialization(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout(_) | Self::RateLimited => true,
            Self::Server { status, .. } => *status >= 500,
            Self::Initialization(inner) => inner.is_transient(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
