//! # Skip (staleness) policy for the consumer.
//!
//! The worker may be slower than the producer. To keep the backlog bounded the consumer
//! prefers fresh items and discards stale ones instead of processing everything.
//!
//! ```text
//! queue: [3][4][5]          CheckAfterPop            DrainToLatest
//! pop() → 3                 len()=2 > 0 → skip 3     try_pop 4, 5 → skip 3, 4
//! pop() → 4                 len()=1 > 0 → skip 4     dispatch 5
//! pop() → 5                 len()=0     → dispatch 5
//! ```
//!
//! Both end up dispatching the freshest item when nothing arrives in between; they differ
//! only under bursts that land while the consumer is mid-decision.

use std::str::FromStr;

use crate::error::ConfigError;

/// How the consumer treats a popped item while newer ones are queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkipPolicy {
    /// After each successful pop, discard the item if the queue is non-empty.
    #[default]
    CheckAfterPop,
    /// After a successful pop, drain the queue and keep only the last item.
    DrainToLatest,
}

impl SkipPolicy {
    /// Returns a short stable label (kebab-case) for CLI and logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SkipPolicy::CheckAfterPop => "check-after-pop",
            SkipPolicy::DrainToLatest => "drain-to-latest",
        }
    }
}

impl FromStr for SkipPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check-after-pop" => Ok(SkipPolicy::CheckAfterPop),
            "drain-to-latest" => Ok(SkipPolicy::DrainToLatest),
            other => Err(ConfigError::UnknownSkipPolicy {
                value: other.to_string(),
            }),
        }
    }
}
