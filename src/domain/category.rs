//! Category Entity
//!
//! Member of a flat ordered list (e.g. FAQ categories).

use serde::{Deserialize, Serialize};
use super::entity::{Entity, Ordered};

/// A category in a sequential-order collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    /// Unique identifier
    pub id: String,
    /// Collection scope (e.g. "faq")
    pub scope: String,
    /// Dense 1..N position at rest
    pub order: u32,
    #[serde(default)]
    pub name: String,
}

impl CategoryRecord {
    pub fn new(id: impl Into<String>, scope: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            scope: scope.into(),
            order,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Entity for CategoryRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Ordered for CategoryRecord {
    fn order(&self) -> u32 {
        self.order
    }
}
