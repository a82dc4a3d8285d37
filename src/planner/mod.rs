//! Planner Layer
//!
//! Pure functions from a snapshot and a command to the updates that
//! realize it. Split into:
//! - snapshot: the in-memory view every plan is computed from
//! - reorder: menu moves within and across parents, inserts and removals
//! - sequential: dense 1..N ordering for flat collections
//! - cascade: dependent page updates for path changes and deletions

mod cascade;
mod reorder;
mod sequential;
mod snapshot;

pub use cascade::{on_category_deleted, resolve_menu_removal, resolve_path_change, CascadeResolver};
pub use reorder::{plan_insert, plan_remove, reorder_within_parent, reparent, InsertPlan, RemovePlan};
pub use sequential::{close_gap, next_order, set_order};
pub use snapshot::MenuSnapshot;
