//! The iteration result envelope.
//!
//! Every `iterate` call, persisted or in-memory, returns one of these:
//! a page of records plus the exact total match count. The caller owns the
//! value outright.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::IterationError;

/// A page of records plus the total number of matches
#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult<T> {
    /// The requested page, in result order
    pub results: Vec<T>,
    /// All matches of the filter, independent of pagination
    pub total: u64,
}

impl<T> IterationResult<T> {
    pub fn new(results: Vec<T>, total: u64) -> Self {
        Self { results, total }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Maps every record through `mapper`, all-or-nothing: the first record
    /// that fails to map fails the whole conversion and no partial result
    /// survives.
    pub fn try_map<U, E>(self, mapper: impl FnMut(T) -> Result<U, E>) -> Result<IterationResult<U>, E> {
        let results = self
            .results
            .into_iter()
            .map(mapper)
            .collect::<Result<Vec<U>, E>>()?;
        Ok(IterationResult {
            results,
            total: self.total,
        })
    }
}

impl IterationResult<Value> {
    /// Converts raw records into the declared resource type.
    pub fn convert_to<T: DeserializeOwned>(self) -> Result<IterationResult<T>, IterationError> {
        self.try_map(serde_json::from_value)
            .map_err(IterationError::Conversion)
    }
}
