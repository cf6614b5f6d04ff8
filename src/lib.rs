//! vidfind: key-less video search served over HTTP.
//!
//! # Architecture
//!
//! - **Search**: [`vidfind_search`] resolves untrusted queries against
//!   YouTube with a one-step fallback and a stable output schema
//! - **Status store**: an append/list log of client check-ins in SQLite
//! - **API**: an axum router under `/api` exposing both
//! - **Config**: TOML file plus environment overrides

pub mod api;
pub mod config;
pub mod error;
pub mod status;

pub use api::{ApiServer, AppState};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use status::{SqliteStatusStore, StatusCheck, StatusCheckCreate, StatusStore, StoreError};
