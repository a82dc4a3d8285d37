//! Forest invariant checks
//!
//! Verifies a committed snapshot: no cycles, unique sibling orders,
//! consistent depths, and resolvable parents.

use std::collections::{HashMap, HashSet};

use crate::domain::{DomainError, DomainResult, MenuRecord, ROOT_PARENT_ID};

pub fn validate_forest(nodes: &[MenuRecord], max_depth: u32) -> DomainResult<()> {
    let by_id: HashMap<&str, &MenuRecord> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    if by_id.len() != nodes.len() {
        return Err(DomainError::Validation("Duplicate menu ids in snapshot".to_string()));
    }

    let mut seen_orders: HashSet<(&str, u32)> = HashSet::new();
    for node in nodes {
        if !seen_orders.insert((node.parent_id.as_str(), node.order)) {
            return Err(DomainError::Validation(format!(
                "Order {} used twice under parent {}",
                node.order, node.parent_id
            )));
        }
        if !node.is_root() && !by_id.contains_key(node.parent_id.as_str()) {
            return Err(DomainError::ReferentialIntegrity {
                node: node.id.clone(),
                parent: node.parent_id.clone(),
            });
        }
    }

    // Every chain must reach the root before depths mean anything
    for node in nodes {
        let mut visited: HashSet<&str> = HashSet::from([node.id.as_str()]);
        let mut current = node.parent_id.as_str();
        while current != ROOT_PARENT_ID {
            if !visited.insert(current) {
                return Err(DomainError::Cycle {
                    node: node.id.clone(),
                    new_parent: node.parent_id.clone(),
                });
            }
            current = by_id
                .get(current)
                .map(|p| p.parent_id.as_str())
                .unwrap_or(ROOT_PARENT_ID);
        }
    }

    for node in nodes {
        let expected_depth = if node.is_root() {
            1
        } else {
            by_id.get(node.parent_id.as_str()).map(|p| p.depth + 1).unwrap_or(1)
        };
        if node.depth != expected_depth {
            return Err(DomainError::Validation(format!(
                "Menu {} has depth {}, expected {}",
                node.id, node.depth, expected_depth
            )));
        }
        if node.depth > max_depth {
            return Err(DomainError::Validation(format!(
                "Menu {} is at depth {}, deeper than {}",
                node.id, node.depth, max_depth
            )));
        }
    }

    Ok(())
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
            path: String::new(),
            page_type: Default::default(),
            label: String::new(),
        }
    }

    #[test]
    fn test_valid_forest() {
        let nodes = vec![
            make_menu("a", ROOT_PARENT_ID, 1, 1),
            make_menu("b", ROOT_PARENT_ID, 1, 2),
            make_menu("c", "a", 2, 1),
            make_menu("d", "c", 3, 1),
        ];
        assert!(validate_forest(&nodes, 3).is_ok());
    }

    #[test]
    fn test_duplicate_sibling_order() {
        let nodes = vec![
            make_menu("a", ROOT_PARENT_ID, 1, 1),
            make_menu("b", ROOT_PARENT_ID, 1, 1),
        ];
        assert!(matches!(validate_forest(&nodes, 3), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_same_order_under_different_parents_is_fine() {
        let nodes = vec![
            make_menu("a", ROOT_PARENT_ID, 1, 1),
            make_menu("b", "a", 2, 1),
        ];
        assert!(validate_forest(&nodes, 3).is_ok());
    }

    #[test]
    fn test_wrong_depth() {
        let nodes = vec![
            make_menu("a", ROOT_PARENT_ID, 1, 1),
            make_menu("b", "a", 3, 1),
        ];
        assert!(matches!(validate_forest(&nodes, 3), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_dangling_parent() {
        let nodes = vec![make_menu("a", "gone", 2, 1)];
        assert!(matches!(
            validate_forest(&nodes, 3),
            Err(DomainError::ReferentialIntegrity { .. })
        ));
    }

    #[test]
    fn test_cycle() {
        let x = make_menu("x", "y", 2, 1);
        let y = make_menu("y", "x", 3, 1);

        for nodes in [vec![x.clone(), y.clone()], vec![y, x]] {
            let err = validate_forest(&nodes, 3).unwrap_err();
            assert!(matches!(err, DomainError::Cycle { .. }), "got {:?}", err);
        }
    }

    #[test]
    fn test_chain_into_cycle() {
        let nodes = vec![
            make_menu("a", ROOT_PARENT_ID, 1, 1),
            make_menu("x", "y", 2, 1),
            make_menu("y", "x", 2, 2),
            make_menu("z", "x", 3, 3),
        ];
        assert!(matches!(validate_forest(&nodes, 3), Err(DomainError::Cycle { .. })));
    }

    #[test]
    fn test_too_deep() {
        let nodes = vec![
            make_menu("a", ROOT_PARENT_ID, 1, 1),
            make_menu("b", "a", 2, 1),
            make_menu("c", "b", 3, 1),
        ];
        assert!(validate_forest(&nodes, 3).is_ok());
        assert!(matches!(validate_forest(&nodes, 2), Err(DomainError::Validation(_))));
    }
}
