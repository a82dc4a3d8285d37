//! Content Entity
//!
//! A page bound to a menu. The only obligation towards the menu tree is
//! keeping `slug` in step with the bound menu's path.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    /// Menu this page is bound to
    pub menu_id: String,
    pub slug: String,
    #[serde(default)]
    pub title: String,
}

impl ContentRecord {
    pub fn new(id: impl Into<String>, menu_id: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            menu_id: menu_id.into(),
            slug: slug.into(),
            title: String::new(),
        }
    }
}

impl Entity for ContentRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
