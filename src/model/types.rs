//! Object type records — the schemas objects are instantiated from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::manager::PublicId;

use super::Model;

/// One field declaration of an object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// An object type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeModel {
    pub public_id: PublicId,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub author_id: Option<PublicId>,
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Vec<TypeField>,
    /// Free-form render metadata the UI layer owns
    #[serde(default)]
    pub render_meta: Value,
}

fn default_active() -> bool {
    true
}

impl Model for TypeModel {
    const COLLECTION: &'static str = "framework.types";

    fn public_id(&self) -> PublicId {
        self.public_id
    }
}
