//! Error types for the import pipeline.

use thiserror::Error;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that can occur while importing configuration.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Network error (connection, HTTP status, body read).
    #[error("network error: {0}")]
    Network(String),

    /// Protocol error (malformed or unexpected response).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The remote side answered with an XML-RPC fault.
    #[error("remote fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// A remote call was attempted without a session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Filesystem error.
    #[error("storage error: {0}")]
    Storage(String),

    /// File content could not be encoded for writing.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record type error.
    #[error(transparent)]
    Types(#[from] monimport_types::Error),
}
