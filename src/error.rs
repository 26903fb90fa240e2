//! Error types used by the pipeline runtime.
//!
//! This module defines two enums:
//!
//! - [`RuntimeError`] — failures of the orchestration itself (dead actors, signal setup).
//! - [`ConfigError`] — rejected configuration values.
//!
//! An empty queue is **not** an error: [`WorkQueue::pop`](crate::WorkQueue::pop) returns `None`.

use thiserror::Error;

/// # Errors produced by the pipeline runtime.
///
/// Fail-fast: none of these are recovered from; a dead actor is never restarted.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Joining an actor found that its task panicked.
    #[error("actor '{actor}' panicked: {error}")]
    ActorPanicked {
        /// Actor name.
        actor: &'static str,
        /// Panic payload or join error message.
        error: String,
    },

    /// An actor task ended although no shutdown was requested.
    #[error("actor '{actor}' exited without a shutdown request")]
    ActorExited {
        /// Actor name.
        actor: &'static str,
    },

    /// OS signal handlers could not be installed.
    #[error("failed to register shutdown signals: {error}")]
    SignalSetup {
        /// The underlying I/O error message.
        error: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pipevisor::RuntimeError;
    ///
    /// let err = RuntimeError::ActorExited { actor: "producer" };
    /// assert_eq!(err.as_label(), "runtime_actor_exited");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::ActorPanicked { .. } => "runtime_actor_panicked",
            RuntimeError::ActorExited { .. } => "runtime_actor_exited",
            RuntimeError::SignalSetup { .. } => "runtime_signal_setup",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::ActorPanicked { actor, error } => {
                format!("panic: actor={actor} error={error}")
            }
            RuntimeError::ActorExited { actor } => format!("exited: actor={actor}"),
            RuntimeError::SignalSetup { error } => format!("signals: {error}"),
        }
    }
}

/// # Errors produced by configuration validation and parsing.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("time unit must be greater than zero")]
    ZeroTimeUnit,

    #[error("produce cycle must be at least one time unit")]
    ZeroProduceCycle,

    #[error("pop timeout must be at least one time unit")]
    ZeroPopTimeout,

    #[error("poll interval must be at least one time unit")]
    ZeroPollInterval,

    #[error("unknown skip policy '{value}' (expected check-after-pop or drain-to-latest)")]
    UnknownSkipPolicy {
        /// The rejected input.
        value: String,
    },
}
