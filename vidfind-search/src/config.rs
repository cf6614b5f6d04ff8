//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the per-tier result limits, query cleaning and
//! the transport used by the bundled YouTube client.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Configuration for query resolution.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result ceiling for the primary attempt (raw query).
    pub primary_limit: usize,
    /// Result ceiling for the fallback attempt (sanitised query).
    pub fallback_limit: usize,
    /// Maximum number of characters kept by the query sanitiser.
    pub max_clean_query_chars: usize,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Interface language requested from the upstream (`hl`).
    pub language: String,
    /// Region requested from the upstream (`gl`).
    pub region: String,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Origin of the upstream site. Overridden in tests.
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_limit: 10,
            fallback_limit: 5,
            max_clean_query_chars: 50,
            timeout_seconds: 10,
            language: "en".to_owned(),
            region: "US".to_owned(),
            user_agent: None,
            base_url: "https://www.youtube.com".to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - both limits must be greater than 0
    /// - `fallback_limit` must be <= `primary_limit`
    /// - `max_clean_query_chars` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `base_url` must parse as an absolute URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.primary_limit == 0 {
            return Err(SearchError::Config(
                "primary_limit must be greater than 0".into(),
            ));
        }
        if self.fallback_limit == 0 {
            return Err(SearchError::Config(
                "fallback_limit must be greater than 0".into(),
            ));
        }
        if self.fallback_limit > self.primary_limit {
            return Err(SearchError::Config(
                "fallback_limit must be <= primary_limit".into(),
            ));
        }
        if self.max_clean_query_chars == 0 {
            return Err(SearchError::Config(
                "max_clean_query_chars must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("base_url is not a valid URL: {e}")))?;
        Ok(())
    }
}
