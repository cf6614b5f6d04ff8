//! SQLite-backed status-check store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use super::schema::{apply_schema, read_schema_version};
use super::types::{StatusCheck, StatusCheckCreate};
use super::{LIST_LIMIT, StatusStore, StoreError};

/// SQLite-backed [`StatusStore`].
///
/// Thread-safe via an internal `Mutex<Connection>`; all access is
/// serialised.
pub struct SqliteStatusStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStatusStore {
    /// Open (or create) the database at `db_path`, creating parent
    /// directories as needed.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(db_path)?;
        apply_schema(&conn)?;
        tracing::debug!(path = %db_path.display(), "status store opened");
        Ok(Self {
            path: Some(db_path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the current schema version from the database.
    pub fn schema_version(&self) -> Result<Option<u32>, StoreError> {
        let conn = self.lock()?;
        Ok(read_schema_version(&conn)?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl StatusStore for SqliteStatusStore {
    fn append(&self, create: StatusCheckCreate) -> Result<StatusCheck, StoreError> {
        let check = StatusCheck::new(create);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO status_checks (id, client_name, timestamp) VALUES (?1, ?2, ?3)",
            params![check.id, check.client_name, check.timestamp.to_rfc3339()],
        )?;
        Ok(check)
    }

    fn list(&self) -> Result<Vec<StatusCheck>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, client_name, timestamp FROM status_checks ORDER BY seq ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![LIST_LIMIT as i64], row_to_check)?;

        let mut checks = Vec::new();
        for r in rows {
            checks.push(r?);
        }
        Ok(checks)
    }
}

fn row_to_check(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatusCheck> {
    let raw: String = row.get(2)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);
    Ok(StatusCheck {
        id: row.get(0)?,
        client_name: row.get(1)?,
        timestamp,
    })
}
