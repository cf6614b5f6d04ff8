//! SQLite DDL for the status-check store.

use rusqlite::Connection;

/// Current schema version stamped into `schema_meta`.
pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Complete DDL for the status database.
///
/// Uses `IF NOT EXISTS` throughout so `apply_schema` is idempotent.
pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- `seq` preserves insertion order independent of clock skew.
CREATE TABLE IF NOT EXISTS status_checks (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    id          TEXT NOT NULL UNIQUE,
    client_name TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);
"#;

/// Apply the full schema to an open connection.
///
/// Safe to call multiple times. Seeds the schema version on a fresh
/// database.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![CURRENT_SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

/// Read the stamped schema version, if any.
pub(crate) fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_meta WHERE key = 'schema_version'")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => {
            let value: String = row.get(0)?;
            Ok(value.parse().ok())
        }
        None => Ok(None),
    }
}
