//! Concrete managers for the persisted resource types.
//!
//! All of them are instances of [`DocumentManager`]; the only behavioral
//! difference is the group manager's protected builtin set.

use std::sync::Arc;

use crate::model::{Category, Group, Template, TypeModel};
use crate::store::DocumentStore;

use super::manager::{DocumentManager, ManagerConfig};
use super::PublicId;

/// Builtin groups (1 admin, 2 user) that must never be deleted
pub const PROTECTED_GROUPS: &[PublicId] = &[1, 2];

pub type CategoryManager = DocumentManager<Category>;
pub type TypeManager = DocumentManager<TypeModel>;
pub type GroupManager = DocumentManager<Group>;
pub type TemplateManager = DocumentManager<Template>;

impl GroupManager {
    /// Group manager with deletion protection for the builtin groups.
    pub fn with_builtin_groups(store: Arc<dyn DocumentStore>, config: ManagerConfig) -> Self {
        Self::new(store, config).with_protected(PROTECTED_GROUPS)
    }
}
