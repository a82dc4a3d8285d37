//! Menu Snapshot
//!
//! In-memory copy of one scope's menus, read once at the start of a command.
//! Planners only ever look at this, never at the store.

use std::collections::HashMap;

use crate::domain::{DomainResult, MenuRecord, NodeUpdate};
use crate::tree::{self, Forest};

#[derive(Debug, Clone, Default)]
pub struct MenuSnapshot {
    nodes: Vec<MenuRecord>,
    index: HashMap<String, usize>,
}

impl MenuSnapshot {
    pub fn new(nodes: Vec<MenuRecord>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self { nodes, index }
    }

    pub fn nodes(&self) -> &[MenuRecord] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&MenuRecord> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Children of `parent_id` sorted by order (stable), optionally leaving one out
    pub fn siblings(&self, parent_id: &str, excluding: Option<&str>) -> Vec<&MenuRecord> {
        let mut siblings: Vec<&MenuRecord> = self
            .nodes
            .iter()
            .filter(|n| n.parent_id == parent_id && Some(n.id.as_str()) != excluding)
            .collect();
        siblings.sort_by_key(|n| n.order);
        siblings
    }

    pub fn forest(&self) -> Forest {
        tree::build(&self.nodes)
    }

    /// Copy of the snapshot with planned node updates applied
    pub fn with_updates(&self, updates: &[NodeUpdate]) -> MenuSnapshot {
        let mut nodes = self.nodes.clone();
        for update in updates {
            if let Some(&i) = self.index.get(&update.id) {
                let node = &mut nodes[i];
                if let Some(parent_id) = &update.parent_id {
                    node.parent_id = parent_id.clone();
                }
                if let Some(depth) = update.depth {
                    node.depth = depth;
                }
                if let Some(order) = update.order {
                    node.order = order;
                }
            }
        }
        MenuSnapshot::new(nodes)
    }

    pub fn validate(&self, max_depth: u32) -> DomainResult<()> {
        tree::validate_forest(&self.nodes, max_depth)
    }
}

impl From<Vec<MenuRecord>> for MenuSnapshot {
    fn from(nodes: Vec<MenuRecord>) -> Self {
        Self::new(nodes)
    }
}
