//! The tiered fallback state machine.
//!
//! ```text
//! ┌───────┐ blank query                              ┌─────────┐
//! │ Start ├─────────────────────────────────────────►│ Success │
//! └───┬───┘                                          └────▲────┘
//!     │ query                    records                  │
//!     ▼                ┌──────────────────────────────────┤
//! ┌────────────────┐   │                                  │ records
//! │ PrimaryAttempt ├───┘   upstream failure  ┌────────────┴────┐
//! │ raw, limit 10  ├────────────────────────►│ FallbackAttempt │
//! └───────┬────────┘  clean query differs    │ clean, limit 5  │
//!         │                                  └────────┬────────┘
//!         │ upstream failure, clean query             │ any failure
//!         │ empty or unchanged   ┌───────────┐        │
//!         └─────────────────────►│ Exhausted │◄───────┘
//!                                └───────────┘
//! ```
//!
//! [`transition`] is pure: the async driver in [`super::search`] performs
//! the upstream call a state asks for and feeds the result back in.

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::normalize::normalize_batch;
use crate::sanitize::sanitize;
use crate::types::{NormalizedVideo, Resolution, SearchOutcome};

/// One attempt configuration: the query sent upstream and its result ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub query: String,
    pub limit: usize,
}

/// Resolution state.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// Nothing has happened yet.
    Start { raw: String },
    /// Waiting for the upstream result of the raw query.
    PrimaryAttempt { raw: String, tier: Tier },
    /// Waiting for the upstream result of the cleaned query.
    FallbackAttempt { tier: Tier },
    /// Terminal: normalised items in upstream order.
    Success {
        items: Vec<NormalizedVideo>,
        resolution: Resolution,
    },
    /// Terminal: every applicable tier failed or was skipped.
    Exhausted,
}

/// Input driving a transition.
#[derive(Debug)]
pub enum Step {
    /// Leave [`State::Start`].
    Begin,
    /// The upstream call requested by the current state completed.
    Attempted(Result<Vec<Value>, SearchError>),
}

impl State {
    /// Initial state for `raw`.
    pub fn new(raw: impl Into<String>) -> Self {
        Self::Start { raw: raw.into() }
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Exhausted)
    }

    /// The upstream call this state is waiting on, if any.
    pub fn pending_attempt(&self) -> Option<&Tier> {
        match self {
            Self::PrimaryAttempt { tier, .. } | Self::FallbackAttempt { tier } => Some(tier),
            _ => None,
        }
    }

    /// Convert a terminal state into the caller-facing outcome.
    ///
    /// Returns `None` for non-terminal states.
    pub fn into_outcome(self) -> Option<SearchOutcome> {
        match self {
            Self::Success { items, resolution } => Some(SearchOutcome::success(items, resolution)),
            Self::Exhausted => Some(SearchOutcome::empty(Resolution::Exhausted)),
            _ => None,
        }
    }
}

/// Advance `state` by one `step`.
///
/// Terminal states are returned unchanged.
///
/// # Errors
///
/// Returns the upstream error when the primary attempt fails with anything
/// other than [`SearchError::Upstream`], and [`SearchError::Internal`] when
/// `step` does not fit `state`. Both are unexpected faults for the caller.
pub fn transition(state: State, step: Step, config: &SearchConfig) -> Result<State, SearchError> {
    match (state, step) {
        (State::Start { raw }, Step::Begin) => Ok(begin(raw, config)),

        (State::PrimaryAttempt { tier, .. }, Step::Attempted(Ok(records))) => {
            tracing::debug!(count = records.len(), "primary attempt succeeded");
            Ok(State::Success {
                items: normalize_batch(&records, tier.limit),
                resolution: Resolution::Primary,
            })
        }

        (State::PrimaryAttempt { raw, .. }, Step::Attempted(Err(err))) => {
            if !err.is_upstream_failure() {
                return Err(err);
            }
            tracing::warn!(error = %err, "primary attempt failed");
            Ok(fall_back(&raw, config))
        }

        (State::FallbackAttempt { tier }, Step::Attempted(Ok(records))) => {
            tracing::debug!(count = records.len(), "fallback attempt succeeded");
            Ok(State::Success {
                items: normalize_batch(&records, tier.limit),
                resolution: Resolution::Fallback,
            })
        }

        (State::FallbackAttempt { .. }, Step::Attempted(Err(err))) => {
            tracing::warn!(error = %err, "fallback attempt also failed");
            Ok(State::Exhausted)
        }

        (terminal, _) if terminal.is_terminal() => Ok(terminal),

        (state, step) => Err(SearchError::Internal(format!(
            "no transition from {state:?} on {step:?}"
        ))),
    }
}

fn begin(raw: String, config: &SearchConfig) -> State {
    if raw.trim().is_empty() {
        return State::Success {
            items: Vec::new(),
            resolution: Resolution::EmptyQuery,
        };
    }
    let tier = Tier {
        query: raw.clone(),
        limit: config.primary_limit,
    };
    State::PrimaryAttempt { raw, tier }
}

fn fall_back(raw: &str, config: &SearchConfig) -> State {
    let clean = sanitize(raw, config.max_clean_query_chars);
    if clean.is_empty() || clean == raw {
        tracing::debug!(clean_empty = clean.is_empty(), "no usable cleaned query");
        return State::Exhausted;
    }
    tracing::debug!(query = %clean, "retrying with cleaned query");
    State::FallbackAttempt {
        tier: Tier {
            query: clean,
            limit: config.fallback_limit,
        },
    }
}
