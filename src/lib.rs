//! # pipevisor
//!
//! **Pipevisor** is a minimal producer/consumer pipeline with a cooperative, ordered
//! graceful shutdown.
//!
//! One producer pushes sequential work items on a fixed period, one consumer drains them
//! through a single worker, and an external cancellation (SIGINT/SIGTERM) stops
//! everything in a fixed order without losing or duplicating the signal.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌────────────┐   push    ┌─────────────┐  pop(timeout)  ┌────────────┐  process  ┌────────┐
//!  │  Producer  │ ────────► │  WorkQueue  │ ─────────────► │  Consumer  │ ────────► │ Worker │
//!  │ (loop task)│           │ (unbounded) │                │ (loop task)│  inline   │        │
//!  └─────┬──────┘           └─────────────┘                └─────┬──────┘           └───┬────┘
//!        │ StopFlag                                              │ StopFlag             │ StopFlag
//!        └───────────────────────┬───────────────────────────────┴──────────────────────┘
//!                                ▼
//!                   ┌──────────────────────────┐      SIGINT / SIGTERM
//!                   │   ShutdownCoordinator    │ ◄──── shutdown::listen
//!                   │ producer → worker →      │
//!                   │ consumer → join          │
//!                   └──────────────────────────┘
//!
//!  every actor ── publish(Event) ──► Bus ──► SubscriberSet ──► LogWriter / custom sinks
//! ```
//!
//! ### Shutdown
//! ```text
//! cancellation ─► requested.set()
//!              ─► Producer::terminate()   stop flag + join   (no pushes afterwards)
//!              ─► Consumer::terminate()   worker flag, own flag + join
//!              ─► AllStopped              main flow proceeds
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Primitives**    | Interruptible waits and the shared queue.                    | [`StopFlag`], [`WorkQueue`]                 |
//! | **Actors**        | Producer, consumer, worker on a generic loop shell.          | [`Producer`], [`Consumer`], [`Worker`]      |
//! | **Shutdown**      | Ordered, idempotent termination.                             | [`ShutdownCoordinator`]                     |
//! | **Policies**      | Which stale items the consumer discards.                     | [`SkipPolicy`]                              |
//! | **Subscriber API**| Injected logging / observability sinks.                      | [`Subscribe`], [`SubscriberSet`]            |
//! | **Errors**        | Typed runtime and configuration errors.                      | [`RuntimeError`], [`ConfigError`]           |
//! | **Configuration** | Time unit, periods, timeouts.                                | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] that renders events via `tracing`.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use pipevisor::{Config, Pipeline, Subscribe};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(pipevisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let pipeline = Pipeline::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     // Runs until SIGINT/SIGTERM, then shuts down in order.
//!     pipeline.run().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    CONSUME_DURATION, CancellableLoop, Config, Consumer, LoopBody, PRODUCE_CYCLE, Pipeline,
    PipelineBuilder, Producer, ShutdownCoordinator, StopFlag, WorkItem, WorkOutcome, WorkQueue,
    Worker,
};
pub use error::{ConfigError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use policies::SkipPolicy;
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose the built-in logger subscriber.
// Enabled by default; disable with `--no-default-features`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
