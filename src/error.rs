//! Error types for sparse_trie

use crate::model::PathKey;
use thiserror::Error;

/// Result type alias for sparse_trie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sparse_trie operations
#[derive(Error, Debug)]
pub enum Error {
    /// The derived key of an inserted value already holds a leaf
    #[error("Duplicate key: {0}")]
    DuplicateKey(PathKey),

    /// A proof was requested for a key in the wrong membership state
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The node tree no longer satisfies its structural invariants
    #[error("Trie invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidHash(err.to_string())
    }
}

impl Error {
    /// Whether the caller can recover by choosing different input
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::InvariantViolation(_))
    }
}
