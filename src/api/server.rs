//! axum router and server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use vidfind_search::{SearchConfig, SearchOutcome, UpstreamSearch};

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::status::{StatusCheck, StatusCheckCreate, StatusStore, StoreError};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string for `GET /api/search/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Raw, untrusted query text.
    pub q: String,
}

/// Body of `GET /api/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
}

/// JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error details.
    pub error: ErrorBody,
}

/// Error details within an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
    /// Error type (e.g. `"store_error"`).
    #[serde(rename = "type")]
    pub error_type: String,
}

/// Handler-level failure, rendered as a 500 [`ErrorResponse`].
#[derive(Debug)]
enum ApiError {
    Store(StoreError),
    Task(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, error_type) = match self {
            Self::Store(e) => (e.to_string(), "store_error"),
            Self::Task(e) => (e, "server_error"),
        };
        tracing::error!(error = %message, "request failed");
        let body = ErrorResponse {
            error: ErrorBody {
                message,
                error_type: error_type.to_owned(),
            },
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
///
/// Generic over the upstream so tests can swap in a scripted source.
pub struct AppState<U> {
    /// Upstream video source.
    pub upstream: Arc<U>,
    /// Status-check persistence.
    pub store: Arc<dyn StatusStore>,
    /// Limits and locale used for every resolution.
    pub search: SearchConfig,
}

impl<U> AppState<U> {
    pub fn new(upstream: U, store: Arc<dyn StatusStore>, search: SearchConfig) -> Self {
        Self {
            upstream: Arc::new(upstream),
            store,
            search,
        }
    }
}

// Manual impl: `U` itself need not be `Clone`.
impl<U> Clone for AppState<U> {
    fn clone(&self) -> Self {
        Self {
            upstream: Arc::clone(&self.upstream),
            store: Arc::clone(&self.store),
            search: self.search.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the API router with CORS applied.
///
/// # Errors
///
/// Returns [`AppError::Config`] if a configured origin is not a valid
/// header value.
pub fn build_router<U>(state: AppState<U>, config: &ServerConfig) -> Result<Router>
where
    U: UpstreamSearch + 'static,
{
    Ok(Router::new()
        .route("/api", get(handle_root))
        .route("/api/", get(handle_root))
        .route(
            "/api/status",
            get(handle_list_status::<U>).post(handle_create_status::<U>),
        )
        .route("/api/search/videos", get(handle_search_videos::<U>))
        .layer(cors_layer(config)?)
        .with_state(state))
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .map_err(|e| AppError::Config(format!("invalid CORS origin {o:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

// ---------------------------------------------------------------------------
// ApiServer
// ---------------------------------------------------------------------------

/// HTTP server running the API router in a background task.
pub struct ApiServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl ApiServer {
    /// Start the API server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the CORS origins are invalid or the TCP listener
    /// cannot bind.
    pub async fn start<U>(config: &ServerConfig, state: AppState<U>) -> Result<Self>
    where
        U: UpstreamSearch + 'static,
    {
        let app = build_router(state, config)?;

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("bind {bind_addr} failed: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Server(format!("failed to get local addr: {e}")))?;

        info!("API server listening on http://{addr}/api");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("API server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }

    /// Whether the serve task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /api/`
async fn handle_root() -> Json<Greeting> {
    Json(Greeting {
        message: "Hello World".to_owned(),
    })
}

/// `POST /api/status`
async fn handle_create_status<U>(
    State(state): State<AppState<U>>,
    Json(create): Json<StatusCheckCreate>,
) -> std::result::Result<Json<StatusCheck>, ApiError>
where
    U: UpstreamSearch + 'static,
{
    let store = Arc::clone(&state.store);
    let check = tokio::task::spawn_blocking(move || store.append(create))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;
    tracing::debug!(id = %check.id, "status check recorded");
    Ok(Json(check))
}

/// `GET /api/status`
async fn handle_list_status<U>(
    State(state): State<AppState<U>>,
) -> std::result::Result<Json<Vec<StatusCheck>>, ApiError>
where
    U: UpstreamSearch + 'static,
{
    let store = Arc::clone(&state.store);
    let checks = tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;
    Ok(Json(checks))
}

/// `GET /api/search/videos?q=...`
///
/// Always 200: failures surface as an empty `items` list, with `error`
/// set only for unexpected faults.
async fn handle_search_videos<U>(
    State(state): State<AppState<U>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchOutcome>
where
    U: UpstreamSearch + 'static,
{
    let outcome = vidfind_search::resolve(&params.q, state.upstream.as_ref(), &state.search).await;
    tracing::debug!(
        resolution = %outcome.resolution,
        count = outcome.items.len(),
        "search request served"
    );
    Json(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SqliteStatusStore;
    use serde_json::Value;
    use vidfind_search::SearchError;

    struct Empty;

    impl UpstreamSearch for Empty {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> std::result::Result<Vec<Value>, SearchError> {
            Ok(Vec::new())
        }
    }

    fn state() -> AppState<Empty> {
        let store = SqliteStatusStore::open_in_memory().expect("store");
        AppState::new(Empty, Arc::new(store), SearchConfig::default())
    }

    #[test]
    fn error_body_uses_type_key() {
        let body = ErrorResponse {
            error: ErrorBody {
                message: "disk full".into(),
                error_type: "store_error".into(),
            },
        };
        let json = serde_json::to_value(body).expect("serialise");
        assert_eq!(json["error"]["type"], "store_error");
        assert_eq!(json["error"]["message"], "disk full");
    }

    #[test]
    fn store_error_maps_to_500() {
        let response = ApiError::Store(StoreError::Lock("poisoned".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_cors_origin_is_rejected() {
        let config = ServerConfig {
            cors_origins: vec!["http://ok.example".into(), "bad\norigin".into()],
            ..Default::default()
        };
        let err = build_router(state(), &config).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn explicit_origins_build() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:3000".into()],
            ..Default::default()
        };
        assert!(build_router(state(), &config).is_ok());
    }

    #[tokio::test]
    async fn server_binds_ephemeral_port_and_shuts_down() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let server = ApiServer::start(&config, state()).await.expect("start");
        assert_ne!(server.port(), 0);
        assert!(server.addr().ip().is_loopback());
        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(server.is_finished());
    }

    #[tokio::test]
    async fn bind_failure_is_server_error() {
        let first = ApiServer::start(
            &ServerConfig {
                port: 0,
                ..Default::default()
            },
            state(),
        )
        .await
        .expect("start");
        let taken = ServerConfig {
            port: first.port(),
            ..Default::default()
        };
        let err = ApiServer::start(&taken, state()).await.err().expect("bind should fail");
        assert!(matches!(err, AppError::Server(_)));
    }
}
