//! Category Commands
//!
//! Sequential-order collections: append, reorder, delete.

use crate::domain::{CategoryRecord, Collection, DomainError, DomainResult, Mutation, OrderUpdate, Record};
use crate::planner::{self, CascadeResolver};
use crate::repository::DocumentStore;
use crate::AppState;

/// List a collection sorted by order
pub async fn list_categories<S: DocumentStore>(state: &AppState<S>, scope: &str) -> DomainResult<Vec<CategoryRecord>> {
    let mut items = state.store.list_items(scope).await?;
    items.sort_by_key(|c| c.order);
    Ok(items)
}

/// Append a category at the end of its collection
pub async fn create_category<S: DocumentStore>(
    state: &AppState<S>,
    mut category: CategoryRecord,
) -> DomainResult<CategoryRecord> {
    if state.store.get(Collection::Categories, &category.id).await?.is_some() {
        return Err(DomainError::Validation(format!("Category {} already exists", category.id)));
    }
    let items = state.store.list_items(&category.scope).await?;

    category.order = planner::next_order(&items);
    state
        .store
        .commit(vec![Mutation::Insert(Record::Category(category.clone()))])
        .await?;

    log::info!("Created category {} at order {}", category.id, category.order);
    Ok(category)
}

/// Move a category to `new_order` (1-based), shifting the ones in between
pub async fn set_category_order<S: DocumentStore>(
    state: &AppState<S>,
    scope: &str,
    id: &str,
    new_order: i64,
) -> DomainResult<Vec<OrderUpdate>> {
    let new_order = u32::try_from(new_order)
        .map_err(|_| DomainError::Validation(format!("Order out of range: {}", new_order)))?;

    // One snapshot for the whole plan
    let items = state.store.list_items(scope).await?;
    let updates = planner::set_order(&items, id, new_order)?;
    if updates.is_empty() {
        return Ok(updates);
    }

    let mutations = updates.iter().cloned().map(Mutation::ItemOrder).collect();
    state.store.commit(mutations).await?;

    log::info!("Category {} moved to order {} ({} writes)", id, new_order, updates.len());
    Ok(updates)
}

/// Delete a category and close the gap it leaves
pub async fn delete_category<S: DocumentStore>(
    state: &AppState<S>,
    scope: &str,
    id: &str,
) -> DomainResult<Vec<OrderUpdate>> {
    let shifts = CascadeResolver::new(&state.store).on_category_deleted(scope, id).await?;

    let mut mutations = vec![Mutation::Delete {
        collection: Collection::Categories,
        id: id.to_string(),
    }];
    mutations.extend(shifts.iter().cloned().map(Mutation::ItemOrder));
    state.store.commit(mutations).await?;

    log::info!("Deleted category {}, {} categories shifted", id, shifts.len());
    Ok(shifts)
}
