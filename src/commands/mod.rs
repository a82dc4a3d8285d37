//! Commands Layer
//!
//! Handlers that bridge request routing to the planners and the store.

mod category_cmd;
mod menu_cmd;

pub use category_cmd::*;
pub use menu_cmd::*;
