//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod sqlite_store;
mod traits;


pub use db::{init_db, DbState};
pub use sqlite_store::SqliteStore;
pub use traits::DocumentStore;
