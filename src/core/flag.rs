//! # StopFlag: monotonic latch with interruptible waits.
//!
//! [`StopFlag`] is the only control primitive the pipeline uses. Every actor owns one;
//! the shutdown coordinator owns one more that means "shutdown requested".
//!
//! ## Rules
//! - `set()` is **idempotent** and **monotonic** (there is no reset).
//! - `wait(d)` returns after `d` **or** as soon as the flag is set, whichever comes first.
//!   It does not report which one happened; callers re-check [`StopFlag::is_set`].
//! - Clones share state: setting any clone wakes waiters on all of them.
//!
//! ```text
//! actor loop:                       coordinator:
//!   while !flag.is_set() {            flag.set() ──► wakes the wait below
//!       ...work...
//!       flag.wait(period).await  ◄────┘
//!   }
//! ```

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// Cooperative cancellation latch.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    token: CancellationToken,
}

impl StopFlag {
    /// Creates a new, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Sets the flag and wakes every current waiter.
    pub fn set(&self) {
        self.token.cancel();
    }

    /// Returns the current state without blocking.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Blocks for up to `timeout`, returning early once the flag is set.
    pub async fn wait(&self, timeout: Duration) {
        let _ = time::timeout(timeout, self.token.cancelled()).await;
    }

    /// Blocks until the flag is set. Returns immediately if it already is.
    pub async fn stopped(&self) {
        self.token.cancelled().await;
    }
}
