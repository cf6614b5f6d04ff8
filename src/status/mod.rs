//! Status-check store.
//!
//! A standalone append/list log of client check-ins, served under
//! `/api/status`. Nothing in the search pipeline reads or writes it.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStatusStore;
pub use types::{StatusCheck, StatusCheckCreate};

/// Maximum number of records returned by [`StatusStore::list`].
pub const LIST_LIMIT: usize = 1000;

/// Append/list persistence for status checks.
pub trait StatusStore: Send + Sync {
    /// Persist a new status check and return it with its id and timestamp.
    fn append(&self, create: StatusCheckCreate) -> Result<StatusCheck, StoreError>;

    /// Return up to [`LIST_LIMIT`] status checks in insertion order.
    fn list(&self) -> Result<Vec<StatusCheck>, StoreError>;
}

/// Errors raised by a [`StatusStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("lock poisoned: {0}")]
    Lock(String),
}
