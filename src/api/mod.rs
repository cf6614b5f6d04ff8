//! HTTP API.
//!
//! ## Endpoints
//!
//! - `GET /api/` greeting
//! - `POST /api/status` record a status check
//! - `GET /api/status` list status checks
//! - `GET /api/search/videos?q=...` resolve a video query

pub mod server;

pub use server::{ApiServer, AppState, ErrorBody, ErrorResponse, build_router};
