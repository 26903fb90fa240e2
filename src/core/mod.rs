//! Runtime core: actors, primitives, and shutdown orchestration.
//!
//! Internal modules:
//! - [`flag`]: `StopFlag`, the interruptible-wait latch everything is built on;
//! - [`queue`]: `WorkQueue` and `WorkItem`;
//! - [`actor`]: `CancellableLoop`, the run-until-flag + join-once actor shell;
//! - [`worker`]: the interruptible unit of work;
//! - [`producer`] / [`consumer`]: the two loop bodies;
//! - [`coordinator`]: ordered, idempotent termination;
//! - [`shutdown`]: OS signal registration;
//! - [`pipeline`] / [`builder`]: wiring and the main poll loop;
//! - [`config`]: runtime settings.

mod actor;
mod builder;
mod config;
mod consumer;
mod coordinator;
mod flag;
mod pipeline;
mod producer;
mod queue;
mod shutdown;
mod worker;

pub use actor::{CancellableLoop, LoopBody};
pub use builder::PipelineBuilder;
pub use config::{CONSUME_DURATION, Config, PRODUCE_CYCLE};
pub use consumer::Consumer;
pub use coordinator::ShutdownCoordinator;
pub use flag::StopFlag;
pub use pipeline::Pipeline;
pub use producer::Producer;
pub use queue::{WorkItem, WorkQueue};
pub use worker::{WorkOutcome, Worker};
