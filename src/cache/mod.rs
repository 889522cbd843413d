//! SQLite cache for posts, authors and the signed-in account.
//!
//! The store is the source the screens read from: interactors write what the
//! server returns, then query pages back out. Three tables:
//!
//! | Table | Rows |
//! |-------|------|
//! | `posts` | feed, search and profile posts; `is_feed` marks timeline rows |
//! | `authors` | profiles, joined to posts by `author_id` |
//! | `accounts` | the signed-in account |
//!
//! Schema changes are versioned with `PRAGMA user_version`. Older databases
//! get the missing columns added; anything that cannot be migrated is
//! dropped and recreated empty.

mod accounts;
mod posts;
mod profiles;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, Row};
use serde::de::DeserializeOwned;

use crate::domain::PAGE_SIZE;
use crate::error::StoreError;

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 2;

/// Columns added to `posts` after version 1, with their DDL.
const POST_COLUMN_MIGRATIONS: &[(&str, &str)] = &[
    ("files", "ALTER TABLE posts ADD COLUMN files TEXT;"),
    (
        "is_deleted",
        "ALTER TABLE posts ADD COLUMN is_deleted INTEGER NOT NULL DEFAULT 0;",
    ),
];

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Handle to the cache database.
///
/// Calls are short and synchronous; the connection sits behind a mutex so the
/// store can be shared between tasks.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
    page_size: u32,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::debug!("Opened cache database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Database that lives only as long as the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            page_size: PAGE_SIZE,
        })
    }

    /// Override the number of rows per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        Ok(user_version(&*self.conn()?)?)
    }

    /// Delete every cached row. Used on logout.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.conn()?
            .execute_batch("DELETE FROM posts; DELETE FROM authors; DELETE FROM accounts;")?;
        tracing::info!("Cleared cache database");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Schema and migrations
// ---------------------------------------------------------------------------

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS posts (
            id          TEXT PRIMARY KEY,
            text        TEXT,
            likes       INTEGER NOT NULL DEFAULT 0,
            liked       INTEGER NOT NULL DEFAULT 0,
            retweets    INTEGER NOT NULL DEFAULT 0,
            retweeted   INTEGER NOT NULL DEFAULT 0,
            is_retweet  INTEGER NOT NULL DEFAULT 0,
            file        TEXT,
            files       TEXT,
            author_id   TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            date_cached INTEGER NOT NULL,
            is_feed     INTEGER NOT NULL DEFAULT 0,
            is_deleted  INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_posts_feed ON posts(is_feed, created_at);
        CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id, created_at);

        CREATE TABLE IF NOT EXISTS authors (
            id           TEXT PRIMARY KEY,
            username     TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            image        TEXT NOT NULL,
            bio          TEXT,
            banner       TEXT,
            followers    INTEGER NOT NULL DEFAULT 0,
            followee     INTEGER NOT NULL DEFAULT 0,
            following    INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS accounts (
            id           TEXT PRIMARY KEY,
            email        TEXT NOT NULL,
            username     TEXT NOT NULL,
            display_name TEXT NOT NULL,
            image        TEXT NOT NULL,
            banner       TEXT,
            bio          TEXT
        );
        ",
    )?;
    Ok(())
}

fn user_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

fn relation_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn add_missing_post_columns(conn: &Connection) -> Result<(), StoreError> {
    for (column, ddl) in POST_COLUMN_MIGRATIONS {
        let has_column = conn
            .prepare(&format!("SELECT {} FROM posts LIMIT 0", column))
            .is_ok();
        if !has_column {
            conn.execute_batch(ddl)?;
            tracing::info!("Migrated posts table: added column {}", column);
        }
    }
    Ok(())
}

fn upgrade(conn: &Connection) -> Result<(), StoreError> {
    if relation_exists(conn, "posts")? {
        add_missing_post_columns(conn)?;
    }
    create_schema(conn)
}

/// Drop every table and view, then create the current schema.
fn rebuild(conn: &Connection) -> Result<(), StoreError> {
    let objects = {
        let mut stmt = conn.prepare(
            "SELECT type, name FROM sqlite_master
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };
    for (kind, name) in objects {
        let kind = if kind == "view" { "VIEW" } else { "TABLE" };
        conn.execute_batch(&format!("DROP {} IF EXISTS \"{}\";", kind, name))?;
    }
    create_schema(conn)
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    let version = user_version(conn)?;
    let result = if version > SCHEMA_VERSION {
        Err(format!("unknown schema version {}", version))
    } else {
        upgrade(conn).map_err(|e| e.to_string())
    };

    if let Err(reason) = result {
        tracing::warn!("Rebuilding cache database ({})", reason);
        rebuild(conn)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Row helpers
// ---------------------------------------------------------------------------

/// Read a nullable JSON text column.
fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(text) if !text.is_empty() => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            }),
        _ => Ok(None),
    }
}

fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}
