//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID and be thread-safe.

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}

/// Entities that carry a position among their peers
pub trait Ordered: Entity {
    /// 1-based position among peers
    fn order(&self) -> u32;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Cycle: moving {node} under {new_parent} would make it its own ancestor")]
    Cycle { node: String, new_parent: String },

    #[error("Referential integrity: {node} references missing parent {parent}")]
    ReferentialIntegrity { node: String, parent: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by the document store while applying a batch.
///
/// A batch either applies completely or not at all; these never describe
/// partially applied state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Batch conflict: {0}")]
    Conflict(String),

    #[error("Database not initialized")]
    NotInitialized,
}

impl From<rusqlite::Error> for BatchError {
    fn from(e: rusqlite::Error) -> Self {
        BatchError::Storage(e.to_string())
    }
}
