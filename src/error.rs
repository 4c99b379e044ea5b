//! Error types for the tamrin search engine.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, TamrinError>;

/// Error taxonomy for the search engine.
///
/// An empty result list is a successful outcome and is never reported
/// through this type.
#[derive(Error, Debug)]
pub enum TamrinError {
    /// The embedding provider failed or timed out. The whole search aborts
    /// and no partial result is returned.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The vector index failed or timed out. The whole search aborts.
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// The caller supplied an unusable request, e.g. empty query text or
    /// `max_results` below 1.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// An internal invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TamrinError {
    /// Create an embedding unavailable error.
    pub fn embedding_unavailable<S: Into<String>>(message: S) -> Self {
        TamrinError::EmbeddingUnavailable(message.into())
    }

    /// Create an index unavailable error.
    pub fn index_unavailable<S: Into<String>>(message: S) -> Self {
        TamrinError::IndexUnavailable(message.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query<S: Into<String>>(message: S) -> Self {
        TamrinError::InvalidQuery(message.into())
    }

    /// Create an internal error.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        TamrinError::Internal(message.into())
    }

    /// True when the error originates from one of the two remote
    /// capabilities (embedding provider or vector index).
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            TamrinError::EmbeddingUnavailable(_) | TamrinError::IndexUnavailable(_)
        )
    }
}
