//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage dependencies (except the rusqlite error conversion).

mod category;
mod content;
mod entity;
mod menu;
mod record;

pub use category::CategoryRecord;
pub use content::ContentRecord;
pub use entity::{BatchError, DomainError, DomainResult, Entity, Ordered};
pub use menu::{MenuRecord, PageType, ROOT_PARENT_ID};
pub use record::{Collection, ContentUpdate, Mutation, NodeUpdate, OrderUpdate, Record};
