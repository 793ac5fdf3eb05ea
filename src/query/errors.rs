//! Query construction errors.

use thiserror::Error;

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building collection parameters or pipeline stages
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Filter predicates must be documents (or empty for match-all)
    #[error("filter must be a document, got {0}")]
    InvalidFilter(&'static str),

    /// Skip must land on a page boundary
    #[error("skip {skip} is not a multiple of limit {limit}")]
    MisalignedSkip { skip: u64, limit: u64 },

    /// Pattern failed to compile within the size limit
    #[error("invalid regex pattern `{pattern}`: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    /// Only i, m, s and x are meaningful for match stages
    #[error("unknown regex flag `{0}` (expected i, m, s or x)")]
    UnknownRegexFlag(char),
}
