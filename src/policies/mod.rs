//! # Policies controlling consumer behavior.
//!
//! - [`SkipPolicy`] which popped items are discarded as stale.

mod skip;

pub use skip::SkipPolicy;
