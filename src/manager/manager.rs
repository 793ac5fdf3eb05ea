//! The uniform resource-manager contract and its document-store
//! implementation.
//!
//! Every concrete manager exposes the same capability set; persisted
//! resources all run through one generic [`DocumentManager`] composed over
//! a store handle. Managers hold no mutable state of their own — the store
//! is the single source of truth and the sole serialization point.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::model::Model;
use crate::observability::Logger;
use crate::query::{
    CollectionParameters, PipelineBuilder, QUICK_COUNT_FIELD, TOTAL_FIELD,
};
use crate::store::{Cursor, DocumentStore};

use super::errors::{DeleteError, GetError, InsertError, IterationError, UpdateError};
use super::result::IterationResult;
use super::PublicId;

/// Explicit per-manager policy, passed into constructors.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Largest page size a caller may request
    pub max_limit: u64,
    /// Whether `limit == 0` (return everything) is permitted
    pub allow_unbounded: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_limit: 1000,
            allow_unbounded: false,
        }
    }
}

impl ManagerConfig {
    /// Policy for callers that may drain whole collections (exports,
    /// internal sync).
    pub fn unbounded() -> Self {
        Self {
            allow_unbounded: true,
            ..Self::default()
        }
    }
}

/// The capability set every resource manager implements.
pub trait ResourceManager {
    /// Domain type served by this manager
    type Resource;
    /// Lookup key of `get`/`update`/`delete`
    type Key: ?Sized;

    /// Returns one page of matching resources plus the exact total.
    fn iterate(
        &self,
        params: &CollectionParameters,
    ) -> Result<IterationResult<Self::Resource>, IterationError>;

    /// Returns the single resource with the given key.
    fn get(&self, key: &Self::Key) -> Result<Self::Resource, GetError>;

    /// Inserts a raw resource document, returning its public id.
    fn insert(&self, resource: Value) -> Result<PublicId, InsertError>;

    /// Replaces the resource with the given key. Exactly one record must
    /// match; zero matches is an error, never a silent no-op.
    fn update(&self, key: &Self::Key, resource: Value) -> Result<(), UpdateError>;

    /// Deletes and returns the resource with the given key.
    fn delete(&self, key: &Self::Key) -> Result<Self::Resource, DeleteError>;
}

/// Generic manager for persisted resources.
///
/// Parameterized over the domain type instead of subclassed per resource:
/// the model supplies the collection name and the declared field set, the
/// store handle supplies execution.
pub struct DocumentManager<M: Model> {
    store: Arc<dyn DocumentStore>,
    config: ManagerConfig,
    /// Public ids `delete` must always refuse
    protected: &'static [PublicId],
    _resource: PhantomData<fn() -> M>,
}

impl<M: Model> DocumentManager<M> {
    pub fn new(store: Arc<dyn DocumentStore>, config: ManagerConfig) -> Self {
        Self {
            store,
            config,
            protected: &[],
            _resource: PhantomData,
        }
    }

    /// Marks a set of builtin ids as undeletable.
    pub fn with_protected(mut self, public_ids: &'static [PublicId]) -> Self {
        self.protected = public_ids;
        self
    }

    pub fn collection(&self) -> &'static str {
        M::COLLECTION
    }

    fn id_filter(public_id: PublicId) -> Value {
        json!({ "public_id": public_id })
    }

    /// Reads the zero-or-one count document off a counting cursor; absence
    /// means zero.
    fn drain_count(mut cursor: Cursor, field: &str) -> u64 {
        let mut count = 0;
        while cursor.alive() {
            if let Some(doc) = cursor.next() {
                count = doc.get(field).and_then(Value::as_u64).unwrap_or(0);
            }
        }
        count
    }

    /// Counts records whose `field` matches a user-supplied pattern,
    /// case-insensitively. The quick-search counter.
    pub fn quick_count(&self, field: &str, pattern: &str) -> Result<u64, IterationError> {
        let pipeline = PipelineBuilder::new().quick_count(field, pattern)?;
        let cursor = self.store.aggregate(M::COLLECTION, &pipeline)?;
        Ok(Self::drain_count(cursor, QUICK_COUNT_FIELD))
    }

    fn check_limit(&self, params: &CollectionParameters) -> Result<(), IterationError> {
        if params.limit == 0 && !self.config.allow_unbounded {
            return Err(IterationError::Unbounded);
        }
        if params.limit > self.config.max_limit {
            return Err(IterationError::LimitExceeded {
                limit: params.limit,
                max_limit: self.config.max_limit,
            });
        }
        Ok(())
    }
}

impl<M: Model> ResourceManager for DocumentManager<M> {
    type Resource = M;
    type Key = PublicId;

    /// Composes and executes the page and count pipelines.
    ///
    /// The two pipelines run as independent operations, not one snapshot:
    /// under concurrent writes the page and the total can disagree. Callers
    /// that need a consistent pair must serialize writes around the call.
    fn iterate(
        &self,
        params: &CollectionParameters,
    ) -> Result<IterationResult<M>, IterationError> {
        self.check_limit(params)?;

        let page_pipeline = PipelineBuilder::new().build(params)?;
        let count_pipeline = PipelineBuilder::new().count(&params.filter)?;

        let page = self
            .store
            .aggregate(M::COLLECTION, &page_pipeline)
            .map_err(|err| {
                Logger::error(
                    "ITERATE_FAILED",
                    &[("collection", M::COLLECTION), ("cause", &err.to_string())],
                );
                err
            })?;
        let results: Vec<Value> = page.collect();

        let count = self.store.aggregate(M::COLLECTION, &count_pipeline)?;
        let total = Self::drain_count(count, TOTAL_FIELD);

        IterationResult::new(results, total).convert_to::<M>()
    }

    fn get(&self, public_id: &PublicId) -> Result<M, GetError> {
        let document = self
            .store
            .find_one(M::COLLECTION, &Self::id_filter(*public_id))?
            .ok_or_else(|| GetError::NotFound {
                resource: M::COLLECTION,
                key: public_id.to_string(),
            })?;
        serde_json::from_value(document).map_err(GetError::Conversion)
    }

    fn insert(&self, resource: Value) -> Result<PublicId, InsertError> {
        let public_id = self.store.insert_one(M::COLLECTION, resource)?;
        Logger::info(
            "RESOURCE_INSERTED",
            &[
                ("collection", M::COLLECTION),
                ("public_id", &public_id.to_string()),
            ],
        );
        Ok(public_id)
    }

    fn update(&self, public_id: &PublicId, resource: Value) -> Result<(), UpdateError> {
        let outcome =
            self.store
                .update_one(M::COLLECTION, &Self::id_filter(*public_id), resource)?;
        if outcome.matched != 1 {
            return Err(UpdateError::NoMatch {
                resource: M::COLLECTION,
                public_id: *public_id,
            });
        }
        Logger::info(
            "RESOURCE_UPDATED",
            &[
                ("collection", M::COLLECTION),
                ("public_id", &public_id.to_string()),
            ],
        );
        Ok(())
    }

    fn delete(&self, public_id: &PublicId) -> Result<M, DeleteError> {
        if self.protected.contains(public_id) {
            return Err(DeleteError::Protected {
                resource: M::COLLECTION,
                public_id: *public_id,
            });
        }

        // Fetch first so the caller receives what was removed.
        let resource = match self.get(public_id) {
            Ok(resource) => resource,
            Err(GetError::NotFound { .. }) => {
                return Err(DeleteError::NoMatch {
                    resource: M::COLLECTION,
                    public_id: *public_id,
                })
            }
            Err(GetError::Execution(err)) => return Err(DeleteError::Execution(err)),
            Err(GetError::Conversion(err)) => return Err(DeleteError::Conversion(err)),
        };

        let deleted = self
            .store
            .delete_one(M::COLLECTION, &Self::id_filter(*public_id))?;
        if deleted == 0 {
            return Err(DeleteError::NoMatch {
                resource: M::COLLECTION,
                public_id: *public_id,
            });
        }
        Logger::info(
            "RESOURCE_DELETED",
            &[
                ("collection", M::COLLECTION),
                ("public_id", &public_id.to_string()),
            ],
        );
        Ok(resource)
    }
}
