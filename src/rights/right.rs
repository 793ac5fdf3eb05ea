//! Right nodes of the permission catalog.

use serde::{Deserialize, Serialize};

use super::level::Level;

/// One authorization right, identified by its dotted hierarchical name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Right {
    /// Dotted path, e.g. `base.framework.object.view`
    pub name: String,
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Right {
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level,
            description: None,
        }
    }

    pub fn with_description(
        name: impl Into<String>,
        level: Level,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            description: Some(description.into()),
        }
    }

    /// The branch this right belongs to (everything before the last dot).
    pub fn prefix(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map_or(self.name.as_str(), |(prefix, _)| prefix)
    }
}
