//! Async driver for the fallback state machine.
//!
//! Runs the upstream calls requested by [`State::pending_attempt`] one after
//! another, and contains every fault (errors and panics alike) inside the
//! returned [`SearchOutcome`].

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::SearchOutcome;
use crate::upstream::UpstreamSearch;

use super::machine::{transition, State, Step};

/// Resolve `raw` against `upstream`.
///
/// # Pipeline
///
/// 1. `Start`: blank queries finish immediately with no upstream call
/// 2. Validate `config` (only when an attempt is pending)
/// 3. `PrimaryAttempt`: raw query, `config.primary_limit`
/// 4. `FallbackAttempt`: only after an upstream failure, with the cleaned
///    query and `config.fallback_limit`
/// 5. Convert the terminal state into a [`SearchOutcome`]
///
/// The two attempts never overlap: the fallback is decided from the primary
/// result. Never fails; unexpected faults become an empty outcome whose
/// `error` holds a diagnostic message.
pub async fn orchestrate_search<U: UpstreamSearch>(
    raw: &str,
    upstream: &U,
    config: &SearchConfig,
) -> SearchOutcome {
    tracing::debug!(upstream = upstream.name(), "resolving query");

    match AssertUnwindSafe(drive(raw, upstream, config))
        .catch_unwind()
        .await
    {
        Ok(Ok(outcome)) => {
            tracing::debug!(
                resolution = %outcome.resolution,
                count = outcome.items.len(),
                "query resolved"
            );
            outcome
        }
        Ok(Err(err)) => {
            tracing::error!(error = %err, "error searching videos");
            SearchOutcome::fault(err.to_string())
        }
        Err(payload) => {
            let err = SearchError::Internal(panic_message(payload.as_ref()));
            tracing::error!(error = %err, "search panicked");
            SearchOutcome::fault(err.to_string())
        }
    }
}

async fn drive<U: UpstreamSearch>(
    raw: &str,
    upstream: &U,
    config: &SearchConfig,
) -> Result<SearchOutcome, SearchError> {
    let mut state = transition(State::new(raw), Step::Begin, config)?;
    if state.pending_attempt().is_some() {
        config.validate()?;
    }
    while let Some(tier) = state.pending_attempt() {
        tracing::trace!(query = %tier.query, limit = tier.limit, "upstream attempt");
        let result = upstream.search(&tier.query, tier.limit).await;
        state = transition(state, Step::Attempted(result), config)?;
    }

    state
        .into_outcome()
        .ok_or_else(|| SearchError::Internal("resolution stopped in a non-terminal state".into()))
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}
