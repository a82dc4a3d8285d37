//! Menu Tree Backend
//!
//! Layered architecture:
//! - domain: Core entities, planned mutations, and errors
//! - tree: Forest building, flattening, and invariant checks
//! - planner: Pure reorder/reparent/sequential/cascade planning
//! - repository: Document store abstraction and SQLite implementation
//! - commands: Snapshot, plan, commit handlers for administrative actions

pub mod commands;
pub mod config;
pub mod domain;
pub mod planner;
pub mod repository;
pub mod tree;

pub use config::EngineConfig;

use domain::DomainResult;
use repository::{init_db, DocumentStore, SqliteStore};

/// Application state shared across commands
pub struct AppState<S: DocumentStore> {
    pub store: S,
    pub config: EngineConfig,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }
}

impl AppState<SqliteStore> {
    /// Open (and migrate) the SQLite database named by `config`
    pub async fn open(config: EngineConfig) -> DomainResult<Self> {
        config.validate()?;
        let db_state = init_db(&config.db_path).await?;
        log::info!("Menu tree store opened (max depth {})", config.max_depth);
        Ok(Self::new(db_state.into(), config))
    }
}
