//! # Event subscribers for the pipeline runtime.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Actor ── publish(Event) ──► Bus ──► event listener ──► SubscriberSet::emit(&Event)
//!                                                             │
//!                                                  ┌──────────┼──────────┐
//!                                                  ▼          ▼          ▼
//!                                              LogWriter   Metrics    Custom
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
