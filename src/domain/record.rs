//! Record kinds and planned mutations
//!
//! Records are a tagged union rather than an open field map; every kind has
//! its own patch shape. Planners produce these values, the store applies them.

use serde::{Deserialize, Serialize};

use super::category::CategoryRecord;
use super::content::ContentRecord;
use super::entity::Entity;
use super::menu::MenuRecord;

/// Document-store collections known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Menus,
    Categories,
    Pages,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Menus => "menus",
            Collection::Categories => "categories",
            Collection::Pages => "pages",
        }
    }

    /// Fields that may be used with `find_by_foreign_key`
    pub fn foreign_keys(&self) -> &'static [&'static str] {
        match self {
            Collection::Menus => &["parent_id"],
            Collection::Categories => &[],
            Collection::Pages => &["menu_id"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Menu(MenuRecord),
    Category(CategoryRecord),
    Content(ContentRecord),
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self {
            Record::Menu(_) => Collection::Menus,
            Record::Category(_) => Collection::Categories,
            Record::Content(_) => Collection::Pages,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Menu(m) => m.id(),
            Record::Category(c) => c.id(),
            Record::Content(p) => p.id(),
        }
    }

    pub fn into_content(self) -> Option<ContentRecord> {
        match self {
            Record::Content(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_menu(self) -> Option<MenuRecord> {
        match self {
            Record::Menu(m) => Some(m),
            _ => None,
        }
    }
}

/// New position for one member of a sibling set or flat list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: String,
    pub order: u32,
}

impl OrderUpdate {
    pub fn new(id: impl Into<String>, order: u32) -> Self {
        Self { id: id.into(), order }
    }
}

/// Structural patch for one menu; `None` fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl From<OrderUpdate> for NodeUpdate {
    fn from(u: OrderUpdate) -> Self {
        NodeUpdate {
            id: u.id,
            order: Some(u.order),
            ..Default::default()
        }
    }
}

/// Dependent-record change produced by the cascade resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ContentUpdate {
    SetSlug { id: String, slug: String },
    Remove { id: String },
}

impl ContentUpdate {
    pub fn id(&self) -> &str {
        match self {
            ContentUpdate::SetSlug { id, .. } | ContentUpdate::Remove { id } => id,
        }
    }
}

/// One entry of an atomic batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    Insert(Record),
    Node(NodeUpdate),
    MenuPath { id: String, path: String },
    ItemOrder(OrderUpdate),
    Content(ContentUpdate),
    Delete { collection: Collection, id: String },
}

impl Mutation {
    pub fn collection(&self) -> Collection {
        match self {
            Mutation::Insert(record) => record.collection(),
            Mutation::Node(_) | Mutation::MenuPath { .. } => Collection::Menus,
            Mutation::ItemOrder(_) => Collection::Categories,
            Mutation::Content(_) => Collection::Pages,
            Mutation::Delete { collection, .. } => *collection,
        }
    }
}
