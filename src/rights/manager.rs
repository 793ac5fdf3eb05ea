//! In-memory manager for the permission catalog.
//!
//! Rights are not persisted: the tree is flattened once at construction and
//! every call serves from the frozen list. The external contract matches
//! the persisted managers — same parameters, same result envelope, same
//! error taxonomy.

use std::cmp::Ordering;

use serde_json::Value;

use crate::manager::errors::{DeleteError, GetError, InsertError, IterationError, UpdateError};
use crate::manager::{IterationResult, PublicId, ResourceManager};
use crate::query::CollectionParameters;

use super::right::Right;
use super::tree::{default_tree, flatten, PermissionNode};

/// Sortable fields of a right
const SORT_FIELDS: [&str; 3] = ["name", "level", "description"];

const STATIC_CATALOG: &str = "rights are a static catalog";

/// Serves the flattened permission catalog.
///
/// The list is immutable after construction, so a single instance is safe
/// for unsynchronized concurrent reads across request workers.
#[derive(Debug, Clone)]
pub struct RightManager {
    rights: Vec<Right>,
}

impl RightManager {
    /// Flattens the tree once and freezes the result.
    pub fn new(tree: &[PermissionNode]) -> Self {
        Self {
            rights: flatten(tree),
        }
    }

    /// Manager over the builtin default catalog.
    pub fn with_defaults() -> Self {
        Self::new(&default_tree())
    }

    /// The frozen flat list, in declaration order.
    pub fn rights(&self) -> &[Right] {
        &self.rights
    }

    fn compare(a: &Right, b: &Right, field: &str) -> Ordering {
        match field {
            "name" => a.name.cmp(&b.name),
            "level" => a.level.cmp(&b.level),
            "description" => a.description.cmp(&b.description),
            _ => Ordering::Equal,
        }
    }
}

impl ResourceManager for RightManager {
    type Resource = Right;
    type Key = str;

    /// Sorts the full catalog, then serves the chunk `skip / limit`.
    ///
    /// The sort is stable: rights tying on the sort field keep their
    /// flatten (declaration) order, in both directions. `total` is always
    /// the catalog size.
    fn iterate(
        &self,
        params: &CollectionParameters,
    ) -> Result<IterationResult<Right>, IterationError> {
        let field = params.sort.as_str();
        if !SORT_FIELDS.contains(&field) {
            return Err(IterationError::UnknownSortField(field.to_string()));
        }

        let mut sorted = self.rights.clone();
        let descending = params.order.is_descending();
        sorted.sort_by(|a, b| {
            let ordering = Self::compare(a, b, field);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let total = self.rights.len() as u64;
        let page = if params.limit > 0 {
            let chunks: Vec<&[Right]> = sorted.chunks(params.limit as usize).collect();
            let index = (params.skip / params.limit) as usize;
            if index == 0 && chunks.is_empty() {
                Vec::new()
            } else if index >= chunks.len() {
                return Err(IterationError::PageOutOfRange {
                    index: index as u64,
                    pages: chunks.len() as u64,
                });
            } else {
                chunks[index].to_vec()
            }
        } else {
            sorted
        };

        Ok(IterationResult::new(page, total))
    }

    /// Linear scan for the first exact name match.
    fn get(&self, name: &str) -> Result<Right, GetError> {
        self.rights
            .iter()
            .find(|right| right.name == name)
            .cloned()
            .ok_or_else(|| GetError::NotFound {
                resource: "right",
                key: name.to_string(),
            })
    }

    fn insert(&self, _resource: Value) -> Result<PublicId, InsertError> {
        Err(InsertError::Unsupported(STATIC_CATALOG))
    }

    fn update(&self, _name: &str, _resource: Value) -> Result<(), UpdateError> {
        Err(UpdateError::Unsupported(STATIC_CATALOG))
    }

    fn delete(&self, _name: &str) -> Result<Right, DeleteError> {
        Err(DeleteError::Unsupported(STATIC_CATALOG))
    }
}
