//! User group records.
//!
//! Groups 1 (admin) and 2 (user) ship with the system and can never be
//! deleted; their manager enforces that.

use serde::{Deserialize, Serialize};

use crate::manager::PublicId;

use super::Model;

/// A user group carrying a set of right names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub public_id: PublicId,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Names of the rights granted to members of this group
    #[serde(default)]
    pub rights: Vec<String>,
}

impl Group {
    pub fn new(public_id: PublicId, name: impl Into<String>) -> Self {
        Self {
            public_id,
            name: name.into(),
            label: None,
            rights: Vec::new(),
        }
    }

    pub fn with_rights(mut self, rights: Vec<String>) -> Self {
        self.rights = rights;
        self
    }

    pub fn has_right(&self, name: &str) -> bool {
        self.rights.iter().any(|right| right == name)
    }
}

impl Model for Group {
    const COLLECTION: &'static str = "management.groups";

    fn public_id(&self) -> PublicId {
        self.public_id
    }
}
