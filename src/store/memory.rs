//! In-memory document store.
//!
//! The crate's reference backend: collections of raw documents behind a
//! read/write lock. Used directly by tests and by deployments that do not
//! persist (the production driver implements the same trait over the wire).

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::manager::PublicId;
use crate::query::Pipeline;

use super::cursor::Cursor;
use super::errors::{StoreError, StoreResult};
use super::eval;
use super::{DocumentStore, UpdateOutcome};

/// Identifier field present on every persisted resource
pub const PUBLIC_ID_FIELD: &str = "public_id";

/// Thread-safe in-memory collections of raw documents
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a collection, replacing any existing content. Test setup helper.
    pub fn seed(&self, collection: &str, documents: Vec<Value>) -> StoreResult<()> {
        let mut collections = self.write_collections()?;
        collections.insert(collection.to_string(), documents);
        Ok(())
    }

    /// Number of documents currently held in a collection
    pub fn collection_len(&self, collection: &str) -> StoreResult<usize> {
        let collections = self.read_collections()?;
        Ok(collections.get(collection).map_or(0, Vec::len))
    }

    fn read_collections(
        &self,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, Vec<Value>>>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }

    fn write_collections(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Value>>>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }

    fn next_public_id(documents: &[Value]) -> PublicId {
        documents
            .iter()
            .filter_map(|doc| doc.get(PUBLIC_ID_FIELD))
            .filter_map(Value::as_u64)
            .max()
            .map_or(1, |highest| highest + 1)
    }
}

impl DocumentStore for MemoryStore {
    fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> StoreResult<Cursor> {
        let snapshot = {
            let collections = self.read_collections()?;
            collections.get(collection).cloned().unwrap_or_default()
        };
        let results = eval::run(snapshot, pipeline)?;
        Ok(Cursor::new(results))
    }

    fn find_one(&self, collection: &str, filter: &Value) -> StoreResult<Option<Value>> {
        let collections = self.read_collections()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };
        for document in documents {
            if eval::matches(document, filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    fn insert_one(&self, collection: &str, document: Value) -> StoreResult<PublicId> {
        let Value::Object(mut fields) = document else {
            return Err(StoreError::MalformedDocument(
                "insert expects a document".to_string(),
            ));
        };

        let mut collections = self.write_collections()?;
        let documents = collections.entry(collection.to_string()).or_default();

        let public_id = match fields.get(PUBLIC_ID_FIELD).and_then(Value::as_u64) {
            Some(existing) => existing,
            None => {
                let next = Self::next_public_id(documents);
                fields.insert(PUBLIC_ID_FIELD.to_string(), next.into());
                next
            }
        };

        documents.push(Value::Object(fields));
        Ok(public_id)
    }

    fn update_one(
        &self,
        collection: &str,
        filter: &Value,
        document: Value,
    ) -> StoreResult<UpdateOutcome> {
        let Value::Object(replacement) = document else {
            return Err(StoreError::MalformedDocument(
                "update expects a document".to_string(),
            ));
        };

        let mut collections = self.write_collections()?;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(UpdateOutcome::none());
        };

        let mut match_index = None;
        for (index, existing) in documents.iter().enumerate() {
            if eval::matches(existing, filter)? {
                match_index = Some(index);
                break;
            }
        }
        let Some(index) = match_index else {
            return Ok(UpdateOutcome::none());
        };

        // The stored identifier is immutable across updates.
        let mut replacement = replacement;
        if let Some(id) = documents[index].get(PUBLIC_ID_FIELD).cloned() {
            replacement.insert(PUBLIC_ID_FIELD.to_string(), id);
        }
        let replacement = Value::Object(replacement);
        let modified = documents[index] != replacement;
        documents[index] = replacement;
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    fn delete_one(&self, collection: &str, filter: &Value) -> StoreResult<u64> {
        let mut collections = self.write_collections()?;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };
        for index in 0..documents.len() {
            if eval::matches(&documents[index], filter)? {
                documents.remove(index);
                return Ok(1);
            }
        }
        Ok(0)
    }
}
