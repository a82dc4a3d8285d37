//! Reorder Planner
//!
//! Computes the writes needed to move a menu within its sibling set or to a
//! new parent. Nothing here touches storage; callers commit the result as
//! one batch.

use crate::domain::{DomainError, DomainResult, MenuRecord, NodeUpdate, OrderUpdate, ROOT_PARENT_ID};
use crate::tree::{flatten_subtree, TreeNode};

use super::sequential::next_order;
use super::snapshot::MenuSnapshot;

/// Insert of a new menu plus the sibling shifts that make room for it
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    pub record: MenuRecord,
    pub shifts: Vec<OrderUpdate>,
}

/// Removal of a menu subtree plus the sibling renumbering that closes the gap
#[derive(Debug, Clone, PartialEq)]
pub struct RemovePlan {
    /// The removed menu followed by its descendants, pre-order
    pub removed: Vec<String>,
    pub shifts: Vec<OrderUpdate>,
}

/// Move `moved_id` to `target_index` (0-based) among its current siblings.
///
/// Only pairs whose order actually changes are returned.
pub fn reorder_within_parent(
    snapshot: &MenuSnapshot,
    moved_id: &str,
    target_index: usize,
) -> DomainResult<Vec<OrderUpdate>> {
    let moved = find_moved(snapshot, moved_id)?;
    let siblings = snapshot.siblings(&moved.parent_id, Some(moved_id));
    let target_index = target_index.min(siblings.len());

    let current_index = snapshot
        .siblings(&moved.parent_id, None)
        .iter()
        .position(|n| n.id == moved_id)
        .unwrap_or(siblings.len());
    if current_index == target_index {
        return Ok(Vec::new());
    }

    let mut updates = Vec::with_capacity(siblings.len() + 1);
    let new_order = slot(target_index);
    if moved.order != new_order {
        updates.push(OrderUpdate::new(moved_id, new_order));
    }
    updates.extend(open_slot(&siblings, target_index));

    log::debug!("Planned reorder of {} to index {}: {} updates", moved_id, target_index, updates.len());
    Ok(updates)
}

/// Move `moved_id` under `new_parent_id` at `target_index`.
///
/// Rejects cycles and missing parents before planning anything. Descendants
/// of the moved menu get depth-only updates when its depth changes.
pub fn reparent(
    snapshot: &MenuSnapshot,
    moved_id: &str,
    new_parent_id: &str,
    target_index: usize,
    max_depth: u32,
) -> DomainResult<Vec<NodeUpdate>> {
    let moved = find_moved(snapshot, moved_id)?;
    if moved.parent_id == new_parent_id {
        let updates = reorder_within_parent(snapshot, moved_id, target_index)?;
        return Ok(updates.into_iter().map(NodeUpdate::from).collect());
    }

    check_ancestry(snapshot, moved_id, new_parent_id, max_depth)?;
    let new_depth = depth_under(snapshot, moved_id, new_parent_id)?;

    let forest = snapshot.forest();
    let subtree = forest.find(moved_id);
    let height = subtree.map(TreeNode::height).unwrap_or(0);
    if new_depth + height > max_depth {
        return Err(DomainError::Validation(format!(
            "Moving {} under {} would nest menus {} levels deep (max {})",
            moved_id,
            new_parent_id,
            new_depth + height,
            max_depth
        )));
    }

    let new_siblings = snapshot.siblings(new_parent_id, None);
    let target_index = target_index.min(new_siblings.len());

    let mut updates = vec![NodeUpdate {
        id: moved_id.to_string(),
        parent_id: Some(new_parent_id.to_string()),
        depth: Some(new_depth),
        order: Some(slot(target_index)),
    }];

    // Open a slot under the new parent
    updates.extend(open_slot(&new_siblings, target_index).into_iter().map(NodeUpdate::from));

    // Close the gap under the old parent
    let old_siblings = snapshot.siblings(&moved.parent_id, Some(moved_id));
    updates.extend(renumber_dense(&old_siblings).into_iter().map(NodeUpdate::from));

    if let Some(node) = subtree {
        redepth_children(node, new_depth, &mut updates);
    }

    log::debug!(
        "Planned reparent of {} from {} to {} at index {}: {} updates",
        moved_id,
        moved.parent_id,
        new_parent_id,
        target_index,
        updates.len()
    );
    Ok(updates)
}

/// Place a new menu under its `parent_id`, appending unless `target_index` is given
pub fn plan_insert(
    snapshot: &MenuSnapshot,
    mut record: MenuRecord,
    target_index: Option<usize>,
    max_depth: u32,
) -> DomainResult<InsertPlan> {
    if record.id.is_empty() || record.id == ROOT_PARENT_ID {
        return Err(DomainError::Validation(format!("Invalid menu id '{}'", record.id)));
    }
    if snapshot.contains(&record.id) {
        return Err(DomainError::Validation(format!("Menu {} already exists", record.id)));
    }

    record.depth = depth_under(snapshot, &record.id, &record.parent_id)?;
    if record.depth > max_depth {
        return Err(DomainError::Validation(format!(
            "Menu {} would sit at depth {} (max {})",
            record.id, record.depth, max_depth
        )));
    }

    let siblings = snapshot.siblings(&record.parent_id, None);
    let shifts = match target_index {
        Some(index) => {
            let index = index.min(siblings.len());
            record.order = slot(index);
            open_slot(&siblings, index)
        }
        None => {
            record.order = next_order(siblings.iter().copied());
            Vec::new()
        }
    };

    Ok(InsertPlan { record, shifts })
}

/// Remove a menu and its descendants, renumbering the remaining siblings from 1
pub fn plan_remove(snapshot: &MenuSnapshot, id: &str) -> DomainResult<RemovePlan> {
    let menu = snapshot
        .get(id)
        .ok_or_else(|| DomainError::NotFound(format!("Menu {} not found", id)))?;

    let removed = flatten_subtree(&snapshot.forest(), id)
        .into_iter()
        .map(|m| m.id)
        .collect();
    let remaining = snapshot.siblings(&menu.parent_id, Some(id));

    Ok(RemovePlan {
        removed,
        shifts: renumber_dense(&remaining),
    })
}

fn find_moved<'a>(snapshot: &'a MenuSnapshot, id: &str) -> DomainResult<&'a MenuRecord> {
    snapshot
        .get(id)
        .ok_or_else(|| DomainError::Validation(format!("Menu {} not found in snapshot", id)))
}

/// 1-based order for a 0-based index
fn slot(index: usize) -> u32 {
    index as u32 + 1
}

/// Renumber siblings from 1, skipping the slot reserved at `target_index`
fn open_slot(siblings: &[&MenuRecord], target_index: usize) -> Vec<OrderUpdate> {
    siblings
        .iter()
        .enumerate()
        .filter_map(|(rank, s)| {
            let order = if rank < target_index { slot(rank) } else { slot(rank + 1) };
            (s.order != order).then(|| OrderUpdate::new(s.id.as_str(), order))
        })
        .collect()
}

fn renumber_dense(siblings: &[&MenuRecord]) -> Vec<OrderUpdate> {
    siblings
        .iter()
        .enumerate()
        .filter(|(rank, s)| s.order != slot(*rank))
        .map(|(rank, s)| OrderUpdate::new(s.id.as_str(), slot(rank)))
        .collect()
}

/// Depth a menu gets under `parent_id`; the parent must exist
fn depth_under(snapshot: &MenuSnapshot, node_id: &str, parent_id: &str) -> DomainResult<u32> {
    if parent_id == ROOT_PARENT_ID {
        return Ok(1);
    }
    snapshot
        .get(parent_id)
        .map(|p| p.depth + 1)
        .ok_or_else(|| DomainError::ReferentialIntegrity {
            node: node_id.to_string(),
            parent: parent_id.to_string(),
        })
}

/// Walk from the new parent up to the root; meeting the moved node means a cycle
fn check_ancestry(snapshot: &MenuSnapshot, moved_id: &str, new_parent_id: &str, max_depth: u32) -> DomainResult<()> {
    let mut current = new_parent_id;
    let mut hops = 0;
    while current != ROOT_PARENT_ID {
        if current == moved_id {
            return Err(DomainError::Cycle {
                node: moved_id.to_string(),
                new_parent: new_parent_id.to_string(),
            });
        }
        if hops > max_depth {
            return Err(DomainError::Validation(format!(
                "Ancestors of {} run deeper than {} levels",
                new_parent_id, max_depth
            )));
        }
        let node = snapshot.get(current).ok_or_else(|| DomainError::ReferentialIntegrity {
            node: moved_id.to_string(),
            parent: current.to_string(),
        })?;
        current = node.parent_id.as_str();
        hops += 1;
    }
    Ok(())
}

fn redepth_children(node: &TreeNode, depth: u32, updates: &mut Vec<NodeUpdate>) {
    for child in &node.children {
        let child_depth = depth + 1;
        if child.menu.depth != child_depth {
            updates.push(NodeUpdate {
                id: child.menu.id.clone(),
                depth: Some(child_depth),
                ..Default::default()
            });
        }
        redepth_children(child, child_depth, updates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_menu(id: &str, parent_id: &str, depth: u32, order: u32) -> MenuRecord {
        MenuRecord {
            id: id.to_string(),
            scope: "site".to_string(),
            parent_id: parent_id.to_string(),
            depth,
            order,
            path: format!("/{}", id),
            page_type: Default::default(),
            label: String::new(),
        }
    }

    fn abc() -> MenuSnapshot {
        MenuSnapshot::from(vec![
            make_menu("A", ROOT_PARENT_ID, 1, 1),
            make_menu("B", ROOT_PARENT_ID, 1, 2),
            make_menu("C", ROOT_PARENT_ID, 1, 3),
        ])
    }

    fn chain() -> MenuSnapshot {
        MenuSnapshot::new(vec![
            make_menu("A", ROOT_PARENT_ID, 1, 1),
            make_menu("B", "A", 2, 1),
            make_menu("C", "B", 3, 1),
        ])
    }

    fn order_of(updates: &[OrderUpdate], id: &str) -> Option<u32> {
        updates.iter().find(|u| u.id == id).map(|u| u.order)
    }

    #[test]
    fn test_reorder_to_front() {
        let updates = reorder_within_parent(&abc(), "C", 0).unwrap();

        assert_eq!(updates.len(), 3);
        assert_eq!(order_of(&updates, "C"), Some(1));
        assert_eq!(order_of(&updates, "A"), Some(2));
        assert_eq!(order_of(&updates, "B"), Some(3));
    }

    #[test]
    fn test_reorder_skips_unchanged_siblings() {
        let updates = reorder_within_parent(&abc(), "A", 1).unwrap();

        // B takes slot 1, A slot 2, C is untouched
        assert_eq!(updates.len(), 2);
        assert_eq!(order_of(&updates, "A"), Some(2));
        assert_eq!(order_of(&updates, "B"), Some(1));
        assert_eq!(order_of(&updates, "C"), None);
    }

    #[test]
    fn test_reorder_to_current_index_is_noop() {
        let snapshot = abc();
        for (index, id) in ["A", "B", "C"].iter().enumerate() {
            assert!(reorder_within_parent(&snapshot, id, index).unwrap().is_empty());
        }
    }

    #[test]
    fn test_reorder_past_end_clamps() {
        let snapshot = abc();
        assert!(reorder_within_parent(&snapshot, "C", 99).unwrap().is_empty());

        let updates = reorder_within_parent(&snapshot, "A", 99).unwrap();
        assert_eq!(order_of(&updates, "A"), Some(3));
        assert_eq!(order_of(&updates, "B"), Some(1));
        assert_eq!(order_of(&updates, "C"), Some(2));
    }

    #[test]
    fn test_reorder_unknown_node() {
        let err = reorder_within_parent(&abc(), "Z", 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_reparent_example() {
        let updates = reparent(&abc(), "B", "A", 0, 3).unwrap();

        assert_eq!(
            updates,
            vec![
                NodeUpdate {
                    id: "B".to_string(),
                    parent_id: Some("A".to_string()),
                    depth: Some(2),
                    order: Some(1),
                },
                NodeUpdate {
                    id: "C".to_string(),
                    order: Some(2),
                    ..Default::default()
                },
            ]
        );
    }

    #[test]
    fn test_reparent_result_is_consistent() {
        let snapshot = abc();
        let updates = reparent(&snapshot, "B", "A", 0, 3).unwrap();
        assert!(snapshot.with_updates(&updates).validate(3).is_ok());
    }

    #[test]
    fn test_reparent_rejects_cycle() {
        let err = reparent(&chain(), "A", "C", 0, 3).unwrap_err();
        assert!(matches!(err, DomainError::Cycle { .. }));

        let err = reparent(&chain(), "B", "B", 0, 3).unwrap_err();
        assert!(matches!(err, DomainError::Cycle { .. }));
    }

    #[test]
    fn test_reparent_under_over_deep_chain() {
        // Depths are stale, so only the ancestor walk sees how deep E really is
        let snapshot = MenuSnapshot::new(vec![
            make_menu("A", ROOT_PARENT_ID, 1, 1),
            make_menu("B", "A", 1, 1),
            make_menu("C", "B", 1, 1),
            make_menu("E", "C", 1, 1),
            make_menu("D", ROOT_PARENT_ID, 1, 2),
        ]);

        let err = reparent(&snapshot, "D", "E", 0, 2).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "got {:?}", err);
    }

    #[test]
    fn test_reparent_missing_parent() {
        let err = reparent(&abc(), "B", "nowhere", 0, 3).unwrap_err();
        assert!(matches!(err, DomainError::ReferentialIntegrity { .. }));
    }

    #[test]
    fn test_reparent_opens_slot_under_new_parent() {
        let snapshot = MenuSnapshot::new(vec![
            make_menu("A", ROOT_PARENT_ID, 1, 1),
            make_menu("A1", "A", 2, 1),
            make_menu("A2", "A", 2, 2),
            make_menu("B", ROOT_PARENT_ID, 1, 2),
        ]);

        let updates = reparent(&snapshot, "B", "A", 1, 3).unwrap();
        let after = snapshot.with_updates(&updates);

        assert_eq!(after.get("B").unwrap().order, 2);
        assert_eq!(after.get("A1").unwrap().order, 1);
        assert_eq!(after.get("A2").unwrap().order, 3);
        assert!(after.validate(3).is_ok());
    }

    #[test]
    fn test_reparent_recomputes_descendant_depths() {
        let snapshot = MenuSnapshot::new(vec![
            make_menu("A", ROOT_PARENT_ID, 1, 1),
            make_menu("B", "A", 2, 1),
            make_menu("C", "B", 3, 1),
            make_menu("D", ROOT_PARENT_ID, 1, 2),
        ]);

        let updates = reparent(&snapshot, "B", ROOT_PARENT_ID, 0, 3).unwrap();
        let after = snapshot.with_updates(&updates);

        assert_eq!(after.get("B").unwrap().depth, 1);
        assert_eq!(after.get("C").unwrap().depth, 2);
        assert_eq!(after.get("A").unwrap().order, 2);
        assert_eq!(after.get("D").unwrap().order, 3);
        assert!(after.validate(3).is_ok());
    }

    #[test]
    fn test_reparent_rejects_too_deep_subtree() {
        let snapshot = MenuSnapshot::new(vec![
            make_menu("A", ROOT_PARENT_ID, 1, 1),
            make_menu("B", "A", 2, 1),
            make_menu("X", ROOT_PARENT_ID, 1, 2),
            make_menu("Y", "X", 2, 1),
        ]);

        let err = reparent(&snapshot, "X", "B", 0, 3).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_reparent_same_parent_delegates_to_reorder() {
        let updates = reparent(&abc(), "C", ROOT_PARENT_ID, 0, 3).unwrap();
        assert!(updates.iter().all(|u| u.parent_id.is_none() && u.depth.is_none()));
        assert_eq!(updates.len(), 3);

        assert!(reparent(&abc(), "B", ROOT_PARENT_ID, 1, 3).unwrap().is_empty());
    }

    #[test]
    fn test_plan_insert_appends() {
        let plan = plan_insert(&abc(), make_menu("D", ROOT_PARENT_ID, 0, 0), None, 3).unwrap();
        assert_eq!(plan.record.order, 4);
        assert_eq!(plan.record.depth, 1);
        assert!(plan.shifts.is_empty());
    }

    #[test]
    fn test_plan_insert_at_index() {
        let plan = plan_insert(&abc(), make_menu("D", ROOT_PARENT_ID, 0, 0), Some(1), 3).unwrap();
        assert_eq!(plan.record.order, 2);
        assert_eq!(order_of(&plan.shifts, "A"), None);
        assert_eq!(order_of(&plan.shifts, "B"), Some(3));
        assert_eq!(order_of(&plan.shifts, "C"), Some(4));
    }

    #[test]
    fn test_plan_insert_child_depth() {
        let plan = plan_insert(&chain(), make_menu("D", "B", 0, 0), None, 3).unwrap();
        assert_eq!(plan.record.depth, 3);
        assert_eq!(plan.record.order, 2);

        let err = plan_insert(&chain(), make_menu("E", "C", 0, 0), None, 3).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = plan_insert(&chain(), make_menu("F", "ghost", 0, 0), None, 3).unwrap_err();
        assert!(matches!(err, DomainError::ReferentialIntegrity { .. }));

        let err = plan_insert(&chain(), make_menu("A", ROOT_PARENT_ID, 0, 0), None, 3).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_plan_remove_takes_subtree_and_closes_gap() {
        let snapshot = MenuSnapshot::new(vec![
            make_menu("A", ROOT_PARENT_ID, 1, 1),
            make_menu("A1", "A", 2, 1),
            make_menu("B", ROOT_PARENT_ID, 1, 2),
            make_menu("C", ROOT_PARENT_ID, 1, 3),
        ]);

        let plan = plan_remove(&snapshot, "A").unwrap();

        assert_eq!(plan.removed, vec!["A".to_string(), "A1".to_string()]);
        assert_eq!(plan.shifts, vec![OrderUpdate::new("B", 1), OrderUpdate::new("C", 2)]);
    }
}
