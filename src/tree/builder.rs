//! Tree Builder
//!
//! Turns a flat, unordered menu snapshot into a forest sorted by `order`
//! at every level.

use std::collections::{HashMap, HashSet};

use crate::domain::MenuRecord;

/// A menu with its sorted children
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub menu: MenuRecord,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn id(&self) -> &str {
        &self.menu.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Levels below this node (0 for a leaf)
    pub fn height(&self) -> u32 {
        self.children.iter().map(|c| c.height() + 1).max().unwrap_or(0)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// Zero or more independent trees
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forest {
    pub roots: Vec<TreeNode>,
}

impl Forest {
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.roots.iter().find_map(|r| r.find(id))
    }

    pub fn len(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Build a forest from flat nodes.
///
/// Nodes whose parent is the root sentinel, missing, or part of a parent
/// cycle become roots; nothing in the input is dropped. Siblings are sorted
/// by `order` with a stable sort, so ties keep input order.
pub fn build(nodes: &[MenuRecord]) -> Forest {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    // Build parent -> children map (indices keep the input order for stable ties)
    let mut children_map: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        if node.is_root() {
            roots.push(idx);
        } else if ids.contains(node.parent_id.as_str()) && node.parent_id != node.id {
            children_map.entry(node.parent_id.as_str()).or_default().push(idx);
        } else {
            log::warn!("Menu {} references missing parent {}, treating as root", node.id, node.parent_id);
            roots.push(idx);
        }
    }

    let mut placed = vec![false; nodes.len()];
    let mut forest = Forest {
        roots: attach(&roots, nodes, &children_map, &mut placed),
    };

    // Whatever is still unplaced hangs off a parent cycle
    let stranded: Vec<usize> = (0..nodes.len()).filter(|&i| !placed[i]).collect();
    if !stranded.is_empty() {
        for &idx in &stranded {
            if placed[idx] {
                continue;
            }
            log::warn!("Menu {} is part of a parent cycle, treating as root", nodes[idx].id);
            forest.roots.extend(attach(&[idx], nodes, &children_map, &mut placed));
        }
        sort_level(&mut forest.roots);
    }

    forest
}

fn attach(
    level: &[usize],
    nodes: &[MenuRecord],
    children_map: &HashMap<&str, Vec<usize>>,
    placed: &mut [bool],
) -> Vec<TreeNode> {
    let mut result = Vec::with_capacity(level.len());
    for &idx in level {
        if placed[idx] {
            continue;
        }
        placed[idx] = true;
        let menu = &nodes[idx];
        let children = children_map
            .get(menu.id.as_str())
            .map(|kids| attach(kids, nodes, children_map, placed))
            .unwrap_or_default();
        result.push(TreeNode {
            menu: menu.clone(),
            children,
        });
    }
    sort_level(&mut result);
    result
}

fn sort_level(level: &mut [TreeNode]) {
    level.sort_by_key(|n| n.menu.order);
}
