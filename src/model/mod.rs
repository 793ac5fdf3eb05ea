//! # Domain models
//!
//! Typed resource records. Every persisted model declares its collection
//! and exposes its `public_id`; construction from raw documents goes
//! through the declared field set — unknown document fields are dropped,
//! never absorbed.

mod category;
mod group;
mod template;
mod types;

pub use category::Category;
pub use group::Group;
pub use template::Template;
pub use types::{TypeField, TypeModel};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::manager::PublicId;

/// A persisted resource record
pub trait Model: Serialize + DeserializeOwned {
    /// Store collection holding this resource type
    const COLLECTION: &'static str;

    /// Unique identifier of the record
    fn public_id(&self) -> PublicId;
}
