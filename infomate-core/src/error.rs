//! # Error Handling
//!
//! Error types for InfoMate record store operations.
//!
//! Most failures inside a store are recovered locally (a broken snapshot is an
//! empty store, a failed save keeps the in-memory state). The variants below
//! exist so those failures can be reported before they are swallowed, and so
//! the outer surfaces (CLI, scoring service adapters) have something to return.

use thiserror::Error;

/// Result type alias for InfoMate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for InfoMate
#[derive(Error, Debug)]
pub enum Error {
    // Persistence Errors
    #[error("Persistence error for '{key}': {message}")]
    Persistence {
        key: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    // Input Errors
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    // Collaborator Errors
    #[error("Scoring service error: {message}")]
    Scoring { message: String },

    // System Errors
    #[error("IO error: {message}")]
    Io { message: String, source: std::io::Error },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Persistence { .. } => true,
            Error::Serialization { .. } => true,
            Error::Scoring { .. } => true,
            Error::Configuration { .. } => false,
            Error::Internal { .. } => false,
            _ => true,
        }
    }

    /// Get error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Persistence { .. } => "PERSISTENCE_ERROR",
            Error::Serialization { .. } => "SERIALIZATION_ERROR",
            Error::InvalidUrl { .. } => "INVALID_URL",
            Error::InvalidInput { .. } => "INVALID_INPUT",
            Error::Scoring { .. } => "SCORING_ERROR",
            Error::Io { .. } => "IO_ERROR",
            Error::Configuration { .. } => "CONFIG_ERROR",
            Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Build a persistence error for a blob key
    pub fn persistence<E>(key: &str, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Persistence {
            key: key.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
        }
    }
}

/// Extension trait for adding context to results
pub trait ResultExt<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::Internal {
            message: format!("{}: {}", f(), e),
        })
    }
}
