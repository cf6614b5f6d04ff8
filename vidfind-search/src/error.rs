//! Error types for the vidfind-search crate.
//!
//! These never cross [`crate::resolve`]: the orchestrator recovers from
//! [`SearchError::Upstream`] by falling back, and turns everything else into
//! a diagnostic string on the returned outcome.

/// Errors that can occur inside the search pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The upstream source choked on its own response (missing or malformed
    /// structure). Recoverable by retrying with a simplified query.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// An HTTP request to the upstream source failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response could not be parsed at all.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Any other fault, including a panic caught at the resolve boundary.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Whether this error should advance the orchestrator to its fallback tier.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Convenience type alias for vidfind-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
