//! Tree Flattener
//!
//! Pre-order walk of a forest: node before its children, children in
//! their sorted order.

use super::builder::{Forest, TreeNode};
use crate::domain::MenuRecord;

pub fn flatten(forest: &Forest) -> Vec<MenuRecord> {
    let mut result = Vec::with_capacity(forest.len());
    for root in &forest.roots {
        collect(root, &mut result);
    }
    result
}

/// The node `id` followed by all of its descendants, pre-order.
/// Empty when `id` is not in the forest.
pub fn flatten_subtree(forest: &Forest, id: &str) -> Vec<MenuRecord> {
    let mut result = Vec::new();
    if let Some(node) = forest.find(id) {
        collect(node, &mut result);
    }
    result
}

fn collect(node: &TreeNode, result: &mut Vec<MenuRecord>) {
    result.push(node.menu.clone());
    for child in &node.children {
        collect(child, result);
    }
}
