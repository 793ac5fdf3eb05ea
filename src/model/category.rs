//! Category records — the tree objects are grouped under.

use serde::{Deserialize, Serialize};

use crate::manager::PublicId;

use super::Model;

/// A framework category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub public_id: PublicId,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Parent category; root categories have none
    #[serde(default)]
    pub parent: Option<PublicId>,
    /// Object types assigned to this category
    #[serde(default)]
    pub types: Vec<PublicId>,
}

impl Category {
    pub fn new(public_id: PublicId, name: impl Into<String>) -> Self {
        Self {
            public_id,
            name: name.into(),
            label: None,
            parent: None,
            types: Vec::new(),
        }
    }
}

impl Model for Category {
    const COLLECTION: &'static str = "framework.categories";

    fn public_id(&self) -> PublicId {
        self.public_id
    }
}
