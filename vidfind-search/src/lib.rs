//! # vidfind-search
//!
//! Key-less video search that always answers.
//!
//! Given an arbitrary, untrusted query, [`resolve`] returns a list of
//! [`NormalizedVideo`] records that a client can render directly, even when
//! the upstream source returns oddly shaped data or fails outright.
//!
//! ## Design
//!
//! - The primary attempt sends the raw query untouched, so legitimate
//!   punctuation (`c++`, `what's new`) reaches the upstream
//! - If the upstream chokes on its own response, one fallback attempt is
//!   made with a cleaned, shortened query and a smaller result limit
//! - Records are normalised field by field; a missing or wrongly typed
//!   field becomes `""` and never drops the record
//! - Nothing escapes [`resolve`]: unexpected faults (including panics in an
//!   upstream implementation) become an empty outcome with a diagnostic
//! - No shared mutable state: concurrent resolutions are independent
//!
//! ## Privacy
//!
//! - Queries are logged only at debug/trace level
//! - No API keys or accounts

pub mod config;
pub mod engines;
pub mod error;
pub mod http;
pub mod normalize;
pub mod orchestrator;
pub mod payload;
pub mod sanitize;
pub mod types;
pub mod upstream;

pub use config::SearchConfig;
pub use engines::YouTubeClient;
pub use error::{Result, SearchError};
pub use types::{NormalizedVideo, Resolution, SearchOutcome};
pub use upstream::UpstreamSearch;

/// Resolve a raw query into normalised videos using `upstream`.
///
/// Blank queries return an empty outcome without touching `upstream`.
/// Otherwise the raw query is tried with `config.primary_limit`; on an
/// upstream failure the cleaned query is tried once with
/// `config.fallback_limit`.
///
/// Never fails. The worst case is an empty `items` list, with `error` set
/// only when an unexpected fault occurred.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> vidfind_search::Result<()> {
/// let config = vidfind_search::SearchConfig::default();
/// let client = vidfind_search::YouTubeClient::new(config.clone())?;
/// let outcome = vidfind_search::resolve("rust programming", &client, &config).await;
/// for video in &outcome.items {
///     println!("{}: {}", video.id, video.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn resolve<U: UpstreamSearch>(
    raw_query: &str,
    upstream: &U,
    config: &SearchConfig,
) -> SearchOutcome {
    orchestrator::search::orchestrate_search(raw_query, upstream, config).await
}

/// Resolve a raw query against YouTube with default configuration.
///
/// Convenience wrapper around [`resolve`]; builds a fresh
/// [`YouTubeClient`] per call. A client that cannot be built is reported
/// through the outcome's `error`.
pub async fn resolve_default(raw_query: &str) -> SearchOutcome {
    let config = SearchConfig::default();
    match YouTubeClient::new(config.clone()) {
        Ok(client) => resolve(raw_query, &client, &config).await,
        Err(err) => {
            tracing::error!(error = %err, "failed to build YouTube client");
            SearchOutcome::fault(err.to_string())
        }
    }
}
