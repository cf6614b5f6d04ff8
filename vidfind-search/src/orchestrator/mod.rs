//! Search orchestrator: tiered fallback over an unreliable upstream.
//!
//! [`machine`] holds the pure state machine, [`search`] drives it against
//! an [`crate::upstream::UpstreamSearch`] and contains every fault.

pub mod machine;
pub mod search;
