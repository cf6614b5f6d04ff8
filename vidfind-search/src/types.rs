//! Core types: the normalised video record and the resolve outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The only record kind this crate emits.
pub const VIDEO_KIND: &str = "video";

/// A video record in the stable output schema.
///
/// Every field is always present and always a string; fields the upstream
/// record did not provide are empty strings, never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedVideo {
    /// Upstream video identifier.
    pub id: String,
    /// Always [`VIDEO_KIND`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Video title.
    pub title: String,
    /// Name of the uploading channel.
    pub channel_title: String,
    /// URL of the first (usually smallest) thumbnail.
    pub thumbnail: String,
    /// First description snippet fragment.
    pub description: String,
}

impl NormalizedVideo {
    /// A record with every field empty except `type`.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            kind: VIDEO_KIND.to_owned(),
            title: String::new(),
            channel_title: String::new(),
            thumbnail: String::new(),
            description: String::new(),
        }
    }
}

/// Which terminal state a resolution ended in.
///
/// Not serialised: callers that need to tell "no results" apart from
/// "fallback exhausted" read it from [`SearchOutcome::resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// The query was blank; no upstream call was made.
    #[default]
    EmptyQuery,
    /// The primary attempt with the raw query succeeded.
    Primary,
    /// The primary attempt failed and the sanitised query succeeded.
    Fallback,
    /// Both tiers failed or the fallback tier was skipped.
    Exhausted,
    /// An unexpected fault was caught at the boundary.
    Fault,
}

impl Resolution {
    /// Short lowercase label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "empty_query",
            Self::Primary => "primary",
            Self::Fallback => "fallback",
            Self::Exhausted => "exhausted",
            Self::Fault => "fault",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of resolving one raw query.
///
/// Serialises as `{"items": [...]}` with an `"error"` key only when an
/// unexpected fault occurred. Output only: `resolution` is not part of the
/// wire format, so there is no `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Normalised videos in upstream relevance order.
    pub items: Vec<NormalizedVideo>,
    /// Diagnostic message for unexpected faults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Terminal state of the resolution.
    #[serde(skip)]
    pub resolution: Resolution,
}

impl SearchOutcome {
    /// A successful outcome carrying `items`.
    pub fn success(items: Vec<NormalizedVideo>, resolution: Resolution) -> Self {
        Self {
            items,
            error: None,
            resolution,
        }
    }

    /// An empty outcome with no diagnostic.
    pub fn empty(resolution: Resolution) -> Self {
        Self::success(Vec::new(), resolution)
    }

    /// An empty outcome carrying a diagnostic message.
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            error: Some(message.into()),
            resolution: Resolution::Fault,
        }
    }
}
