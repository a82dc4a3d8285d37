//! SQLite Document Store
//!
//! SQLite-backed implementation of `DocumentStore`. Every batch runs inside
//! one transaction, so a failed mutation rolls back the whole batch.

use async_trait::async_trait;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::db::DbState;
use super::traits::DocumentStore;
use crate::domain::{
    BatchError, CategoryRecord, Collection, ContentRecord, ContentUpdate, DomainError, DomainResult, MenuRecord,
    Mutation, PageType, Record,
};

const MENU_COLUMNS: &str = "id, scope, parent_id, depth, ord, path, page_type, label";
const CATEGORY_COLUMNS: &str = "id, scope, ord, name";
const PAGE_COLUMNS: &str = "id, menu_id, slug, title";

/// SQLite implementation of the document store
#[derive(Clone)]
pub struct SqliteStore {
    pub(super) conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteStore {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }
}

impl From<DbState> for SqliteStore {
    fn from(state: DbState) -> Self {
        Self::new(state.conn)
    }
}

pub(super) fn row_to_menu(row: &Row) -> rusqlite::Result<MenuRecord> {
    Ok(MenuRecord {
        id: row.get(0)?,
        scope: row.get(1)?,
        parent_id: row.get(2)?,
        depth: row.get(3)?,
        order: row.get(4)?,
        path: row.get(5)?,
        page_type: PageType::from_str(&row.get::<_, String>(6)?),
        label: row.get(7)?,
    })
}

pub(super) fn row_to_category(row: &Row) -> rusqlite::Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: row.get(0)?,
        scope: row.get(1)?,
        order: row.get(2)?,
        name: row.get(3)?,
    })
}

pub(super) fn row_to_page(row: &Row) -> rusqlite::Result<ContentRecord> {
    Ok(ContentRecord {
        id: row.get(0)?,
        menu_id: row.get(1)?,
        slug: row.get(2)?,
        title: row.get(3)?,
    })
}

fn internal(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

fn query_records<T>(
    conn: &Connection,
    sql: &str,
    value: &str,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> DomainResult<Vec<T>> {
    let mut stmt = conn.prepare(sql).map_err(internal)?;
    let rows = stmt.query_map(params![value], map).map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<T>>>().map_err(internal)
}

/// Fail the batch when a patch or delete matched nothing
fn expect_one(changed: usize, collection: Collection, id: &str) -> Result<(), BatchError> {
    if changed == 0 {
        return Err(BatchError::Conflict(format!("{} {} does not exist", collection.as_str(), id)));
    }
    Ok(())
}

fn apply_mutation(tx: &Transaction, mutation: &Mutation, now: i64) -> Result<(), BatchError> {
    match mutation {
        Mutation::Insert(Record::Menu(m)) => {
            tx.execute(
                "INSERT INTO menus (id, scope, parent_id, depth, ord, path, page_type, label, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![m.id, m.scope, m.parent_id, m.depth, m.order, m.path, m.page_type.as_str(), m.label, now],
            )?;
        }
        Mutation::Insert(Record::Category(c)) => {
            tx.execute(
                "INSERT INTO categories (id, scope, ord, name, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![c.id, c.scope, c.order, c.name, now],
            )?;
        }
        Mutation::Insert(Record::Content(p)) => {
            tx.execute(
                "INSERT INTO pages (id, menu_id, slug, title, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![p.id, p.menu_id, p.slug, p.title, now],
            )?;
        }
        Mutation::Node(u) => {
            let changed = tx.execute(
                "UPDATE menus SET parent_id = COALESCE(?1, parent_id), depth = COALESCE(?2, depth),
                 ord = COALESCE(?3, ord), updated_at = ?4 WHERE id = ?5",
                params![u.parent_id, u.depth, u.order, now, u.id],
            )?;
            expect_one(changed, Collection::Menus, &u.id)?;
        }
        Mutation::MenuPath { id, path } => {
            let changed = tx.execute(
                "UPDATE menus SET path = ?1, updated_at = ?2 WHERE id = ?3",
                params![path, now, id],
            )?;
            expect_one(changed, Collection::Menus, id)?;
        }
        Mutation::ItemOrder(u) => {
            let changed = tx.execute(
                "UPDATE categories SET ord = ?1, updated_at = ?2 WHERE id = ?3",
                params![u.order, now, u.id],
            )?;
            expect_one(changed, Collection::Categories, &u.id)?;
        }
        Mutation::Content(ContentUpdate::SetSlug { id, slug }) => {
            let changed = tx.execute(
                "UPDATE pages SET slug = ?1, updated_at = ?2 WHERE id = ?3",
                params![slug, now, id],
            )?;
            expect_one(changed, Collection::Pages, id)?;
        }
        Mutation::Content(ContentUpdate::Remove { id }) => {
            let changed = tx.execute("DELETE FROM pages WHERE id = ?1", params![id])?;
            expect_one(changed, Collection::Pages, id)?;
        }
        Mutation::Delete { collection, id } => {
            let changed = tx.execute(
                &format!("DELETE FROM {} WHERE id = ?1", collection.as_str()),
                params![id],
            )?;
            expect_one(changed, *collection, id)?;
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_nodes(&self, scope: &str) -> DomainResult<Vec<MenuRecord>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(BatchError::NotInitialized)?;
        query_records(
            conn,
            &format!("SELECT {} FROM menus WHERE scope = ?1", MENU_COLUMNS),
            scope,
            row_to_menu,
        )
    }

    async fn list_items(&self, scope: &str) -> DomainResult<Vec<CategoryRecord>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(BatchError::NotInitialized)?;
        query_records(
            conn,
            &format!("SELECT {} FROM categories WHERE scope = ?1", CATEGORY_COLUMNS),
            scope,
            row_to_category,
        )
    }

    async fn get(&self, collection: Collection, id: &str) -> DomainResult<Option<Record>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(BatchError::NotInitialized)?;

        let records = match collection {
            Collection::Menus => query_records(
                conn,
                &format!("SELECT {} FROM menus WHERE id = ?1", MENU_COLUMNS),
                id,
                row_to_menu,
            )?
            .into_iter()
            .map(Record::Menu)
            .collect::<Vec<_>>(),
            Collection::Categories => query_records(
                conn,
                &format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS),
                id,
                row_to_category,
            )?
            .into_iter()
            .map(Record::Category)
            .collect(),
            Collection::Pages => query_records(
                conn,
                &format!("SELECT {} FROM pages WHERE id = ?1", PAGE_COLUMNS),
                id,
                row_to_page,
            )?
            .into_iter()
            .map(Record::Content)
            .collect(),
        };
        Ok(records.into_iter().next())
    }

    async fn commit(&self, mutations: Vec<Mutation>) -> Result<(), BatchError> {
        if mutations.is_empty() {
            return Ok(());
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(BatchError::NotInitialized)?;

        let now = chrono::Utc::now().timestamp_millis();
        let tx = conn.transaction()?;
        for mutation in &mutations {
            if let Err(e) = apply_mutation(&tx, mutation, now) {
                log::warn!("Batch of {} mutations rolled back: {}", mutations.len(), e);
                // Dropping the transaction rolls it back
                return Err(e);
            }
        }
        tx.commit()?;

        log::debug!("Committed batch of {} mutations", mutations.len());
        Ok(())
    }

    async fn find_by_foreign_key(&self, collection: Collection, field: &str, value: &str) -> DomainResult<Vec<Record>> {
        if !collection.foreign_keys().iter().any(|key| *key == field) {
            return Err(DomainError::Validation(format!(
                "{} is not a foreign key of {}",
                field,
                collection.as_str()
            )));
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(BatchError::NotInitialized)?;

        // `field` is whitelisted above
        let records = match collection {
            Collection::Menus => query_records(
                conn,
                &format!("SELECT {} FROM menus WHERE {} = ?1", MENU_COLUMNS, field),
                value,
                row_to_menu,
            )?
            .into_iter()
            .map(Record::Menu)
            .collect(),
            Collection::Pages => query_records(
                conn,
                &format!("SELECT {} FROM pages WHERE {} = ?1", PAGE_COLUMNS, field),
                value,
                row_to_page,
            )?
            .into_iter()
            .map(Record::Content)
            .collect(),
            Collection::Categories => Vec::new(),
        };
        Ok(records)
    }
}
