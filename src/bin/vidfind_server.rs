//! API server binary.
//!
//! Loads configuration, opens the status store and serves `/api` until
//! Ctrl-C. All tracing output goes to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use vidfind::{ApiServer, AppConfig, AppState, SqliteStatusStore};
use vidfind_search::YouTubeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var_os("VIDFIND_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_config_path);
    let config = AppConfig::load(&config_path)
        .map_err(|e| anyhow::anyhow!("loading {}: {e}", config_path.display()))?;

    tracing::info!(
        config = %config_path.display(),
        db = %config.store.db_path.display(),
        "vidfind-server starting"
    );

    let store = SqliteStatusStore::open(&config.store.db_path)?;
    let upstream = YouTubeClient::new(config.search.clone())
        .map_err(|e| anyhow::anyhow!("building YouTube client: {e}"))?;
    let state = AppState::new(upstream, Arc::new(store), config.search.clone());

    let server = ApiServer::start(&config.server, state).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    server.shutdown();

    tracing::info!("vidfind-server shut down cleanly");
    Ok(())
}
