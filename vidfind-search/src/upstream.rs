//! Trait definition for the upstream video metadata source.
//!
//! The orchestrator only ever talks to an [`UpstreamSearch`]; the bundled
//! [`crate::engines::YouTubeClient`] is one implementation, tests supply
//! scripted ones.

use serde_json::Value;

use crate::error::SearchError;

/// A single-attempt search against an opaque, occasionally failing source.
///
/// Implementors return raw records without normalising them. Each
/// implementation handles its own:
///
/// - request construction and transport
/// - mapping of source-side structural failures to
///   [`SearchError::Upstream`], which the orchestrator retries with a
///   simplified query
/// - mapping of transport failures to other [`SearchError`] variants,
///   which are reported to the caller as diagnostics
///
/// Implementations must not retry internally. All implementations must be
/// `Send + Sync` so that many resolutions can share one client.
pub trait UpstreamSearch: Send + Sync {
    /// Search for `query`, returning at most `limit` raw records.
    ///
    /// # Arguments
    ///
    /// * `query`: Non-empty query string. Callers filter blank queries.
    /// * `limit`: Positive result ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Upstream`] when the source's response has an
    /// unexpected shape, or another variant when the request itself fails.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Value>, SearchError>> + Send;

    /// Human-readable name of this source, for logs.
    fn name(&self) -> &'static str {
        "upstream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A mock source for testing trait bounds and async execution.
    struct MockUpstream {
        records: Vec<Value>,
        fail: bool,
    }

    impl UpstreamSearch for MockUpstream {
        async fn search(&self, _query: &str, limit: usize) -> Result<Vec<Value>, SearchError> {
            if self.fail {
                return Err(SearchError::Upstream("mock upstream failure".into()));
            }
            Ok(self.records.iter().take(limit).cloned().collect())
        }
    }

    #[test]
    fn mock_upstream_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockUpstream>();
    }

    #[tokio::test]
    async fn mock_upstream_returns_records() {
        let upstream = MockUpstream {
            records: vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})],
            fail: false,
        };
        let records = upstream.search("test", 2).await.expect("should succeed");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "a");
    }

    #[tokio::test]
    async fn mock_upstream_propagates_errors() {
        let upstream = MockUpstream {
            records: vec![],
            fail: true,
        };
        let err = upstream.search("test", 10).await.unwrap_err();
        assert!(err.is_upstream_failure());
        assert!(err.to_string().contains("mock upstream failure"));
    }

    #[test]
    fn default_name() {
        let upstream = MockUpstream {
            records: vec![],
            fail: false,
        };
        assert_eq!(upstream.name(), "upstream");
    }
}
