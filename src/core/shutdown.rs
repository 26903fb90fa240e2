//! # Cross-platform OS signal handling.
//!
//! Provides [`listen`], which registers termination signals and forwards **every**
//! delivery to [`ShutdownCoordinator::deliver`]. The coordinator decides whether a
//! delivery starts the shutdown or is a duplicate.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::core::coordinator::ShutdownCoordinator;
use crate::error::RuntimeError;

/// Registers the signal handlers and spawns the forwarding task.
///
/// Registration happens before this returns, so a failure is reported to the caller
/// instead of being lost in a background task.
#[cfg(unix)]
pub fn listen(coordinator: Arc<ShutdownCoordinator>) -> Result<JoinHandle<()>, RuntimeError> {
    use tokio::signal::unix::{SignalKind, signal};

    let setup = |e: std::io::Error| RuntimeError::SignalSetup {
        error: e.to_string(),
    };
    let mut sigint = signal(SignalKind::interrupt()).map_err(setup)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(setup)?;

    Ok(tokio::spawn(async move {
        loop {
            let source = tokio::select! {
                s = sigint.recv()  => s.map(|()| "SIGINT"),
                s = sigterm.recv() => s.map(|()| "SIGTERM"),
            };
            let Some(source) = source else { break };
            coordinator.deliver(source);
        }
    }))
}

/// Spawns the Ctrl-C forwarding task.
#[cfg(not(unix))]
pub fn listen(coordinator: Arc<ShutdownCoordinator>) -> Result<JoinHandle<()>, RuntimeError> {
    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            coordinator.deliver("ctrl-c");
        }
    }))
}
