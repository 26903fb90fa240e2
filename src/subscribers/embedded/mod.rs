//! # Built-in subscribers
//!
//! - [`LogWriter`]: renders events as human-readable `tracing` lines.

mod log;

pub use log::LogWriter;
