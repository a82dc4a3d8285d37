//! Menu Commands
//!
//! Each command reads one snapshot, plans against it, and commits the plan
//! plus its cascade as a single batch.

use crate::domain::{
    Collection, ContentUpdate, DomainError, DomainResult, MenuRecord, Mutation, NodeUpdate, Record,
};
use crate::planner::{self, CascadeResolver, MenuSnapshot, RemovePlan};
use crate::repository::DocumentStore;
use crate::tree::{self, Forest};
use crate::AppState;

/// Convert a caller-supplied index, rejecting negatives
fn to_index(target_index: i64) -> DomainResult<usize> {
    usize::try_from(target_index)
        .map_err(|_| DomainError::Validation(format!("Target index must not be negative, got {}", target_index)))
}

async fn load_snapshot<S: DocumentStore>(state: &AppState<S>, scope: &str) -> DomainResult<MenuSnapshot> {
    Ok(state.store.list_nodes(scope).await?.into())
}

async fn find_menu<S: DocumentStore>(state: &AppState<S>, id: &str) -> DomainResult<MenuRecord> {
    state
        .store
        .get(Collection::Menus, id)
        .await?
        .and_then(Record::into_menu)
        .ok_or_else(|| DomainError::NotFound(format!("Menu {} not found", id)))
}

/// Refuse a plan that would break a forest that was consistent before it
fn ensure_consistent(snapshot: &MenuSnapshot, updates: &[NodeUpdate], max_depth: u32) -> DomainResult<()> {
    if let Err(e) = snapshot.validate(max_depth) {
        log::warn!("Snapshot was already inconsistent before planning: {}", e);
        return Ok(());
    }
    snapshot.with_updates(updates).validate(max_depth)
}

/// Get the sorted menu forest for a scope
pub async fn get_menu_tree<S: DocumentStore>(state: &AppState<S>, scope: &str) -> DomainResult<Forest> {
    let nodes = state.store.list_nodes(scope).await?;
    Ok(tree::build(&nodes))
}

/// Create a menu under `menu.parent_id`, appended unless `target_index` is given
pub async fn create_menu<S: DocumentStore>(
    state: &AppState<S>,
    menu: MenuRecord,
    target_index: Option<i64>,
) -> DomainResult<MenuRecord> {
    let index = target_index.map(to_index).transpose()?;
    // Ids are unique across scopes, the snapshot only sees one
    if let Some(existing) = state.store.get(Collection::Menus, &menu.id).await? {
        return Err(DomainError::Validation(format!(
            "Menu {} already exists in scope {}",
            menu.id,
            existing.into_menu().map(|m| m.scope).unwrap_or_default()
        )));
    }
    let snapshot = load_snapshot(state, &menu.scope).await?;

    let plan = planner::plan_insert(&snapshot, menu, index, state.config.max_depth)?;

    let mut mutations = vec![Mutation::Insert(Record::Menu(plan.record.clone()))];
    mutations.extend(plan.shifts.into_iter().map(|u| Mutation::Node(u.into())));
    state.store.commit(mutations).await?;

    log::info!("Created menu {} under {} at order {}", plan.record.id, plan.record.parent_id, plan.record.order);
    Ok(plan.record)
}

/// Move a menu to `target_index` among its current siblings
pub async fn reorder_menu<S: DocumentStore>(
    state: &AppState<S>,
    scope: &str,
    id: &str,
    target_index: i64,
) -> DomainResult<Vec<NodeUpdate>> {
    let index = to_index(target_index)?;
    let snapshot = load_snapshot(state, scope).await?;

    let updates: Vec<NodeUpdate> = planner::reorder_within_parent(&snapshot, id, index)?
        .into_iter()
        .map(NodeUpdate::from)
        .collect();
    commit_node_updates(state, &snapshot, &updates).await?;

    log::info!("Reordered menu {} to index {} ({} writes)", id, index, updates.len());
    Ok(updates)
}

/// Move a menu under `new_parent_id` (or `ROOT_PARENT_ID`) at `target_index`
pub async fn move_menu<S: DocumentStore>(
    state: &AppState<S>,
    scope: &str,
    id: &str,
    new_parent_id: &str,
    target_index: i64,
) -> DomainResult<Vec<NodeUpdate>> {
    let index = to_index(target_index)?;
    let snapshot = load_snapshot(state, scope).await?;

    let updates = planner::reparent(&snapshot, id, new_parent_id, index, state.config.max_depth)?;
    commit_node_updates(state, &snapshot, &updates).await?;

    log::info!("Moved menu {} under {} at index {} ({} writes)", id, new_parent_id, index, updates.len());
    Ok(updates)
}

async fn commit_node_updates<S: DocumentStore>(
    state: &AppState<S>,
    snapshot: &MenuSnapshot,
    updates: &[NodeUpdate],
) -> DomainResult<()> {
    if updates.is_empty() {
        return Ok(());
    }
    ensure_consistent(snapshot, updates, state.config.max_depth)?;
    let mutations = updates.iter().cloned().map(Mutation::Node).collect();
    state.store.commit(mutations).await?;
    Ok(())
}

/// Change a menu's path and rewrite the slug of every page bound to it
pub async fn update_menu_path<S: DocumentStore>(
    state: &AppState<S>,
    id: &str,
    new_path: &str,
) -> DomainResult<Vec<ContentUpdate>> {
    let menu = find_menu(state, id).await?;
    if menu.path == new_path {
        return Ok(Vec::new());
    }

    let cascade = CascadeResolver::new(&state.store)
        .on_path_changed(id, &menu.path, new_path)
        .await?;

    let mut mutations = vec![Mutation::MenuPath {
        id: id.to_string(),
        path: new_path.to_string(),
    }];
    mutations.extend(cascade.iter().cloned().map(Mutation::Content));
    state.store.commit(mutations).await?;

    log::info!("Menu {} path {} -> {}, {} pages updated", id, menu.path, new_path, cascade.len());
    Ok(cascade)
}

/// Delete a menu with its descendants and their bound pages, closing the sibling gap
pub async fn delete_menu<S: DocumentStore>(state: &AppState<S>, id: &str) -> DomainResult<RemovePlan> {
    let menu = find_menu(state, id).await?;
    let snapshot = load_snapshot(state, &menu.scope).await?;

    let plan = planner::plan_remove(&snapshot, id)?;
    let pages = CascadeResolver::new(&state.store).on_menu_deleted(&snapshot, id).await?;

    let mut mutations: Vec<Mutation> = pages.into_iter().map(Mutation::Content).collect();
    mutations.extend(plan.removed.iter().map(|menu_id| Mutation::Delete {
        collection: Collection::Menus,
        id: menu_id.clone(),
    }));
    mutations.extend(plan.shifts.iter().cloned().map(|u| Mutation::Node(u.into())));
    state.store.commit(mutations).await?;

    log::info!("Deleted menu {} and {} descendants", id, plan.removed.len().saturating_sub(1));
    Ok(plan)
}
