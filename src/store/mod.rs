//! # Store subsystem
//!
//! The narrow interface this layer consumes from the document store, plus
//! the in-memory reference implementation. Managers never see driver
//! details; they execute pipelines and read cursors.

mod cursor;
mod errors;
mod eval;
mod memory;

pub use cursor::Cursor;
pub use errors::{StoreError, StoreResult};
pub use memory::{MemoryStore, PUBLIC_ID_FIELD};

use serde_json::Value;

use crate::manager::PublicId;
use crate::query::Pipeline;

/// Result of an update-by-filter operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents the filter matched
    pub matched: u64,
    /// Documents actually changed
    pub modified: u64,
}

impl UpdateOutcome {
    pub fn none() -> Self {
        Self {
            matched: 0,
            modified: 0,
        }
    }
}

/// The document-store operations this layer depends on.
///
/// Mutations are atomic per call; the store is the sole serialization
/// point. No retries happen here — failures propagate unmodified in kind.
pub trait DocumentStore: Send + Sync {
    /// Executes a pipeline and returns a cursor over the raw results.
    fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> StoreResult<Cursor>;

    /// Returns the first document matching the filter, if any.
    fn find_one(&self, collection: &str, filter: &Value) -> StoreResult<Option<Value>>;

    /// Inserts one document, assigning the next available `public_id` when
    /// the document carries none. Returns the id.
    fn insert_one(&self, collection: &str, document: Value) -> StoreResult<PublicId>;

    /// Replaces the first document matching the filter.
    fn update_one(
        &self,
        collection: &str,
        filter: &Value,
        document: Value,
    ) -> StoreResult<UpdateOutcome>;

    /// Deletes the first document matching the filter; returns the count.
    fn delete_one(&self, collection: &str, filter: &Value) -> StoreResult<u64>;
}
