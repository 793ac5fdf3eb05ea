//! Document template records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::manager::PublicId;

use super::Model;

/// A document template rendered against objects of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub public_id: PublicId,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub author_id: Option<PublicId>,
    /// Template body (markup with placeholders)
    #[serde(default)]
    pub template_data: String,
    /// Rendering parameters the export layer interprets
    #[serde(default)]
    pub template_parameters: Value,
}

fn default_active() -> bool {
    true
}

impl Model for Template {
    const COLLECTION: &'static str = "docapi.templates";

    fn public_id(&self) -> PublicId {
        self.public_id
    }
}
