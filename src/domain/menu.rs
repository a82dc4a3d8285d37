//! Menu Entity
//!
//! Represents one navigable unit of a site's menu forest (single parent).

use serde::{Deserialize, Serialize};
use super::entity::{Entity, Ordered};

/// Parent id used by top-level menus. Conceptually depth 0, never stored as a record.
pub const ROOT_PARENT_ID: &str = "0";

/// Page type determines whether the menu owns bound content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    /// Page rendered from content records bound to the menu
    #[default]
    Dynamic,
    /// Single static page
    Static,
    /// Link to another site, owns no content
    ExternalLink,
    /// Menu that only groups its children
    Group,
    #[serde(untagged)]
    Other(String),
}

impl PageType {
    pub fn as_str(&self) -> &str {
        match self {
            PageType::Dynamic => "dynamic",
            PageType::Static => "static",
            PageType::ExternalLink => "external-link",
            PageType::Group => "group",
            PageType::Other(s) => s,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "dynamic" => PageType::Dynamic,
            "static" => PageType::Static,
            "external-link" => PageType::ExternalLink,
            "group" => PageType::Group,
            other => PageType::Other(other.to_string()),
        }
    }

    /// Whether a path change on a menu of this type must be pushed to bound pages
    pub fn cascades_path(&self) -> bool {
        !matches!(self, PageType::ExternalLink)
    }
}

/// A menu entry in a site's navigation forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRecord {
    /// Unique identifier, immutable after creation
    pub id: String,
    /// Logical scope the menu belongs to (one site's menu set)
    pub scope: String,
    /// Parent menu ID, or `ROOT_PARENT_ID` for top level
    pub parent_id: String,
    /// 1 for top level, parent depth + 1 below
    pub depth: u32,
    /// 1-based position among siblings
    pub order: u32,
    pub path: String,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default)]
    pub label: String,
}

impl MenuRecord {
    /// Create a new top-level menu
    pub fn new_root(id: impl Into<String>, scope: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            scope: scope.into(),
            parent_id: ROOT_PARENT_ID.to_string(),
            depth: 1,
            order,
            path: String::new(),
            page_type: PageType::default(),
            label: String::new(),
        }
    }

    /// Create a new menu under a parent
    pub fn new_child(id: impl Into<String>, scope: impl Into<String>, parent: &MenuRecord, order: u32) -> Self {
        Self {
            parent_id: parent.id.clone(),
            depth: parent.depth + 1,
            ..Self::new_root(id, scope, order)
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    /// Check if this is a top-level menu
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }
}

impl Entity for MenuRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Ordered for MenuRecord {
    fn order(&self) -> u32 {
        self.order
    }
}
