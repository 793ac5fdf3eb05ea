//! # Manager subsystem
//!
//! The uniform CRUD+iterate contract every resource type implements, the
//! iteration result envelope, the generic document-store manager and the
//! concrete per-resource managers.

pub mod errors;

mod manager;
mod resources;
mod result;

pub use errors::{DeleteError, GetError, InsertError, IterationError, UpdateError};
pub use manager::{DocumentManager, ManagerConfig, ResourceManager};
pub use resources::{
    CategoryManager, GroupManager, TemplateManager, TypeManager, PROTECTED_GROUPS,
};
pub use result::IterationResult;

/// Unique identifier of a persisted resource
pub type PublicId = u64;
