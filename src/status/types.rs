//! Status-check record types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded client check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    /// UUID v4 string.
    pub id: String,
    /// Caller-supplied client name.
    pub client_name: String,
    /// Creation time (UTC, serialised as RFC 3339).
    pub timestamp: DateTime<Utc>,
}

/// Request body for creating a [`StatusCheck`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl StatusCheck {
    /// Build a fresh record for `create` stamped with the current time.
    ///
    /// The timestamp is truncated to microseconds so it survives a round
    /// trip through the store unchanged.
    pub fn new(create: StatusCheckCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: create.client_name,
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }
}
