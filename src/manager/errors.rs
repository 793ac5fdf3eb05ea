//! Manager error taxonomy.
//!
//! One typed error per capability. Nothing is swallowed: every failure path
//! carries a message, and store-caused failures keep the store error as
//! source. The HTTP layer maps these onto status codes (400 iteration /
//! 404 not-found / 500 store); that mapping lives outside this crate.

use thiserror::Error;

use crate::query::QueryError;
use crate::store::StoreError;

use super::PublicId;

/// Failures of the `iterate` capability
#[derive(Debug, Error)]
pub enum IterationError {
    /// The request itself is malformed
    #[error("invalid collection parameters: {0}")]
    Parameters(#[from] QueryError),

    /// `limit == 0` without the manager being configured for it
    #[error("unbounded iteration is not allowed for this manager")]
    Unbounded,

    /// Requested page size above the configured maximum
    #[error("limit {limit} exceeds maximum {max_limit}")]
    LimitExceeded { limit: u64, max_limit: u64 },

    /// The sort field does not exist on the resource type
    #[error("unknown sort field `{0}`")]
    UnknownSortField(String),

    /// Skip landed past the last page
    #[error("page index {index} out of range ({pages} pages)")]
    PageOutOfRange { index: u64, pages: u64 },

    /// The store failed to execute a pipeline
    #[error("pipeline execution failed")]
    Execution(#[from] StoreError),

    /// A raw record did not map into the resource type
    #[error("result conversion failed")]
    Conversion(#[source] serde_json::Error),
}

/// Failures of the `get` capability
#[derive(Debug, Error)]
pub enum GetError {
    /// Zero matches for a single-record lookup
    #[error("{resource} `{key}` not found")]
    NotFound {
        resource: &'static str,
        key: String,
    },

    /// The store failed to execute the lookup
    #[error("lookup failed")]
    Execution(#[from] StoreError),

    /// The stored record did not map into the resource type
    #[error("record conversion failed")]
    Conversion(#[source] serde_json::Error),
}

/// Failures of the `insert` capability
#[derive(Debug, Error)]
pub enum InsertError {
    /// The store refused or failed the write
    #[error("insert failed")]
    Execution(#[from] StoreError),

    /// The resource type does not support insertion
    #[error("insert is not supported: {0}")]
    Unsupported(&'static str),
}

/// Failures of the `update` capability
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Zero records matched; an update must hit exactly one
    #[error("{resource} {public_id} matched no record")]
    NoMatch {
        resource: &'static str,
        public_id: PublicId,
    },

    /// The store refused or failed the write
    #[error("update failed")]
    Execution(#[from] StoreError),

    /// The resource type does not support updates
    #[error("update is not supported: {0}")]
    Unsupported(&'static str),
}

/// Failures of the `delete` capability
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Built-in resources can never be deleted
    #[error("{resource} {public_id} is protected and can not be deleted")]
    Protected {
        resource: &'static str,
        public_id: PublicId,
    },

    /// Zero records matched the deletion
    #[error("{resource} {public_id} matched no record")]
    NoMatch {
        resource: &'static str,
        public_id: PublicId,
    },

    /// The store refused or failed the write
    #[error("delete failed")]
    Execution(#[from] StoreError),

    /// The stored record did not map into the resource type
    #[error("record conversion failed")]
    Conversion(#[source] serde_json::Error),

    /// The resource type does not support deletion
    #[error("delete is not supported: {0}")]
    Unsupported(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IterationError::PageOutOfRange { index: 4, pages: 3 };
        assert_eq!(err.to_string(), "page index 4 out of range (3 pages)");

        let err = GetError::NotFound {
            resource: "management.groups",
            key: "99".to_string(),
        };
        assert_eq!(err.to_string(), "management.groups `99` not found");

        let err = DeleteError::Protected {
            resource: "management.groups",
            public_id: 1,
        };
        assert!(err.to_string().contains("protected"));
    }

    #[test]
    fn test_store_error_is_source() {
        use std::error::Error;

        let err = IterationError::from(StoreError::Unavailable("connection reset".to_string()));
        let source = err.source().expect("store cause retained");
        assert!(source.to_string().contains("connection reset"));
    }
}
