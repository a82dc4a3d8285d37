//! Cascade Resolver
//!
//! Expands a committed structural change into the dependent-record updates
//! that must ride along in the same batch.

use crate::domain::{
    CategoryRecord, Collection, ContentRecord, ContentUpdate, DomainError, DomainResult, MenuRecord, OrderUpdate,
    Record,
};
use crate::repository::DocumentStore;
use crate::tree::flatten_subtree;

use super::sequential;
use super::snapshot::MenuSnapshot;

/// Slug updates for pages bound to `menu` after its path changed.
///
/// Only pages whose `menu_id` is the menu itself are touched; child menu
/// paths are independent strings and are never rewritten.
pub fn resolve_path_change(
    menu: &MenuRecord,
    old_path: &str,
    new_path: &str,
    pages: &[ContentRecord],
) -> Vec<ContentUpdate> {
    if old_path == new_path || !menu.page_type.cascades_path() {
        return Vec::new();
    }
    pages
        .iter()
        .filter(|p| p.menu_id == menu.id)
        .map(|p| ContentUpdate::SetSlug {
            id: p.id.clone(),
            slug: new_path.to_string(),
        })
        .collect()
}

/// Removals for every page bound to one of `menu_ids`
pub fn resolve_menu_removal(menu_ids: &[String], pages: &[ContentRecord]) -> Vec<ContentUpdate> {
    pages
        .iter()
        .filter(|p| menu_ids.contains(&p.menu_id))
        .map(|p| ContentUpdate::Remove { id: p.id.clone() })
        .collect()
}

/// Orders to write once `category_id` is deleted, leaving `1..N-1`
pub fn on_category_deleted(items: &[CategoryRecord], category_id: &str) -> DomainResult<Vec<OrderUpdate>> {
    sequential::close_gap(items, category_id)
}

/// Store-backed resolver: looks up the dependent records, then delegates to
/// the pure functions above
pub struct CascadeResolver<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> CascadeResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn on_path_changed(&self, menu_id: &str, old_path: &str, new_path: &str) -> DomainResult<Vec<ContentUpdate>> {
        let menu = self
            .store
            .get(Collection::Menus, menu_id)
            .await?
            .and_then(Record::into_menu)
            .ok_or_else(|| DomainError::NotFound(format!("Menu {} not found", menu_id)))?;

        if old_path == new_path || !menu.page_type.cascades_path() {
            return Ok(Vec::new());
        }

        let pages = self.bound_pages(menu_id).await?;
        let updates = resolve_path_change(&menu, old_path, new_path, &pages);
        log::debug!("Path change on {} cascades to {} pages", menu_id, updates.len());
        Ok(updates)
    }

    /// Page removals for `menu_id` and all of its descendants
    pub async fn on_menu_deleted(&self, snapshot: &MenuSnapshot, menu_id: &str) -> DomainResult<Vec<ContentUpdate>> {
        let menu_ids: Vec<String> = flatten_subtree(&snapshot.forest(), menu_id)
            .into_iter()
            .map(|m| m.id)
            .collect();

        let mut pages = Vec::new();
        for id in &menu_ids {
            pages.extend(self.bound_pages(id).await?);
        }
        Ok(resolve_menu_removal(&menu_ids, &pages))
    }

    pub async fn on_category_deleted(&self, scope: &str, category_id: &str) -> DomainResult<Vec<OrderUpdate>> {
        let items = self.store.list_items(scope).await?;
        on_category_deleted(&items, category_id)
    }

    async fn bound_pages(&self, menu_id: &str) -> DomainResult<Vec<ContentRecord>> {
        Ok(self
            .store
            .find_by_foreign_key(Collection::Pages, "menu_id", menu_id)
            .await?
            .into_iter()
            .filter_map(Record::into_content)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageType;

    fn menu(page_type: PageType) -> MenuRecord {
        MenuRecord::new_root("m1", "site", 1)
            .with_path("/old")
            .with_page_type(page_type)
    }

    #[test]
    fn test_path_change_updates_bound_pages_only() {
        let pages = vec![
            ContentRecord::new("p1", "m1", "/old"),
            ContentRecord::new("p2", "m2", "/other"),
        ];

        let updates = resolve_path_change(&menu(PageType::Dynamic), "/old", "/new", &pages);

        assert_eq!(
            updates,
            vec![ContentUpdate::SetSlug {
                id: "p1".to_string(),
                slug: "/new".to_string()
            }]
        );
    }

    #[test]
    fn test_external_link_never_cascades() {
        let pages = vec![ContentRecord::new("p1", "m1", "/old")];
        assert!(resolve_path_change(&menu(PageType::ExternalLink), "/old", "/new", &pages).is_empty());
    }

    #[test]
    fn test_unchanged_path_is_noop() {
        let pages = vec![ContentRecord::new("p1", "m1", "/old")];
        assert!(resolve_path_change(&menu(PageType::Dynamic), "/old", "/old", &pages).is_empty());
    }

    #[test]
    fn test_menu_removal() {
        let pages = vec![
            ContentRecord::new("p1", "m1", "/a"),
            ContentRecord::new("p2", "m2", "/b"),
            ContentRecord::new("p3", "m3", "/c"),
        ];
        let ids = vec!["m1".to_string(), "m3".to_string()];

        let updates = resolve_menu_removal(&ids, &pages);

        let removed: Vec<&str> = updates.iter().map(ContentUpdate::id).collect();
        assert_eq!(removed, vec!["p1", "p3"]);
    }

    #[test]
    fn test_category_deleted_closes_gap() {
        let items: Vec<CategoryRecord> = (1..=3).map(|i| CategoryRecord::new(format!("c{}", i), "faq", i)).collect();

        let updates = on_category_deleted(&items, "c1").unwrap();

        assert_eq!(updates, vec![OrderUpdate::new("c2", 1), OrderUpdate::new("c3", 2)]);
        assert!(on_category_deleted(&items, "c3").unwrap().is_empty());
    }
}
