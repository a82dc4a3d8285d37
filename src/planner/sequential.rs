//! Sequential-Order Shifter
//!
//! Keeps a flat collection (FAQ categories and the like) densely numbered
//! `1..N` when one member moves or is removed.

use crate::domain::{DomainError, DomainResult, OrderUpdate, Ordered};

/// Move `item_id` to `new_order`, shifting the range in between by one.
///
/// `new_order` past the end of the collection clamps to the last slot.
pub fn set_order<T: Ordered>(items: &[T], item_id: &str, new_order: u32) -> DomainResult<Vec<OrderUpdate>> {
    if new_order == 0 {
        return Err(DomainError::Validation("Order is 1-based, got 0".to_string()));
    }
    let item = find_item(items, item_id)?;
    let old_order = item.order();
    let new_order = new_order.min(items.len() as u32);

    if new_order == old_order {
        return Ok(Vec::new());
    }

    let mut updates = vec![OrderUpdate::new(item_id, new_order)];
    for other in items.iter().filter(|i| i.id() != item_id) {
        let order = other.order();
        if new_order > old_order && order > old_order && order <= new_order {
            // Moving down: (old, new] moves up by one
            updates.push(OrderUpdate::new(other.id(), order - 1));
        } else if new_order < old_order && order >= new_order && order < old_order {
            // Moving up: [new, old) moves down by one
            updates.push(OrderUpdate::new(other.id(), order + 1));
        }
    }

    log::debug!("Planned order change of {} from {} to {}: {} updates", item_id, old_order, new_order, updates.len());
    Ok(updates)
}

/// Orders to write after `removed_id` leaves the collection
pub fn close_gap<T: Ordered>(items: &[T], removed_id: &str) -> DomainResult<Vec<OrderUpdate>> {
    let removed_order = find_item(items, removed_id)?.order();

    Ok(items
        .iter()
        .filter(|i| i.id() != removed_id && i.order() > removed_order)
        .map(|i| OrderUpdate::new(i.id(), i.order() - 1))
        .collect())
}

/// Order for a member appended at the end
pub fn next_order<'a, T: Ordered + 'a>(items: impl IntoIterator<Item = &'a T>) -> u32 {
    items.into_iter().map(|i| i.order()).max().unwrap_or(0) + 1
}

fn find_item<'a, T: Ordered>(items: &'a [T], id: &str) -> DomainResult<&'a T> {
    items
        .iter()
        .find(|i| i.id() == id)
        .ok_or_else(|| DomainError::Validation(format!("Item {} not found in snapshot", id)))
}
