//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::BatchError;

/// Database state wrapper
#[derive(Clone, Default)]
pub struct DbState {
    pub conn: Arc<Mutex<Option<Connection>>>,
}

impl DbState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

/// Initialize database with path (`:memory:` for an in-memory database)
pub async fn init_db(db_path: &Path) -> Result<DbState, BatchError> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };

    // Run migrations
    run_migrations(&conn)?;
    log::info!("Database ready at {}", db_path.display());

    Ok(DbState {
        conn: Arc::new(Mutex::new(Some(conn))),
    })
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, BatchError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), BatchError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS menus (
            id TEXT PRIMARY KEY,
            scope TEXT NOT NULL,
            parent_id TEXT NOT NULL DEFAULT '0',
            depth INTEGER NOT NULL DEFAULT 1,
            ord INTEGER NOT NULL DEFAULT 1,
            path TEXT NOT NULL DEFAULT '',
            page_type TEXT NOT NULL DEFAULT 'dynamic'
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            scope TEXT NOT NULL,
            ord INTEGER NOT NULL DEFAULT 1,
            name TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS pages (
            id TEXT PRIMARY KEY,
            menu_id TEXT NOT NULL,
            slug TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    // Columns added after the first release
    if !column_exists(conn, "menus", "label")? {
        conn.execute("ALTER TABLE menus ADD COLUMN label TEXT NOT NULL DEFAULT ''", [])?;
    }
    for table in ["menus", "categories", "pages"] {
        if !column_exists(conn, table, "updated_at")? {
            conn.execute(&format!("ALTER TABLE {} ADD COLUMN updated_at INTEGER", table), [])?;
        }
    }

    // Indexes for sibling and foreign-key lookups
    conn.execute("CREATE INDEX IF NOT EXISTS idx_menus_scope_parent ON menus(scope, parent_id)", [])?;
    conn.execute("CREATE INDEX IF NOT EXISTS idx_categories_scope ON categories(scope)", [])?;
    conn.execute("CREATE INDEX IF NOT EXISTS idx_pages_menu ON pages(menu_id)", [])?;

    Ok(())
}
