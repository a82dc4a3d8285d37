//! Tree Utilities
//!
//! Building, flattening, and checking the menu forest.

mod builder;
mod flatten;
mod validate;

pub use builder::{build, Forest, TreeNode};
pub use flatten::{flatten, flatten_subtree};
pub use validate::validate_forest;
