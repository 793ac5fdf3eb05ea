//! Store error types.
//!
//! The narrow failure surface a document-store backend reports through.
//! This layer performs no retries; whatever the backend reports propagates
//! to the manager unmodified in kind.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a document-store backend
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A document violated the store's structural expectations
    /// (e.g. a non-document insert)
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A pipeline or filter could not be evaluated
    #[error("pipeline execution failed: {0}")]
    Execution(String),

    /// The backend itself is unreachable or inconsistent
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}
