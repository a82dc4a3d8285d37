//! Repository Layer - Core Traits
//!
//! Defines the abstract interface the engine needs from a document store.
//! Implementations can use SQLite, a remote document database, etc.

use async_trait::async_trait;

use crate::domain::{BatchError, CategoryRecord, Collection, DomainResult, MenuRecord, Mutation, Record};

/// Document store contract
///
/// The store gives no multi-document ordering guarantees of its own; the
/// engine keeps orders consistent and relies only on `commit` being atomic.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All menus in one scope, in no particular order
    async fn list_nodes(&self, scope: &str) -> DomainResult<Vec<MenuRecord>>;

    /// All members of one sequential-order collection, in no particular order
    async fn list_items(&self, scope: &str) -> DomainResult<Vec<CategoryRecord>>;

    /// Find a record by ID
    async fn get(&self, collection: Collection, id: &str) -> DomainResult<Option<Record>>;

    /// Apply every mutation or none of them
    async fn commit(&self, mutations: Vec<Mutation>) -> Result<(), BatchError>;

    /// Records whose `field` equals `value`; `field` must be a declared foreign key
    async fn find_by_foreign_key(&self, collection: Collection, field: &str, value: &str) -> DomainResult<Vec<Record>>;
}
