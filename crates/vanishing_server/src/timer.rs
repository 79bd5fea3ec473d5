//! Per-room turn clock.
//!
//! At most one countdown is live per room. Arming always cancels the
//! previous countdown first. Expiry runs the supplied future, which feeds a
//! timeout back into the room's serialized event stream.

use std::future::Future;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

/// Identifies the turn a countdown was started for.
///
/// A countdown that outlives its turn carries a stale ticket and must be
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnTicket {
    /// Round within the room; bumped on every rematch.
    pub round: u64,
    /// Turn within the round.
    pub turn: u32,
}

/// Cancellable countdown for the current turn.
#[derive(Debug, Default)]
pub struct TurnTimer {
    task: Option<AbortHandle>,
    ticket: Option<TurnTicket>,
}

impl TurnTimer {
    /// Starts a countdown for `ticket`, replacing any live one.
    pub fn arm<F>(&mut self, ticket: TurnTicket, duration: Duration, on_expiry: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            on_expiry.await;
        });
        debug!(?ticket, ?duration, "Turn timer armed");
        self.task = Some(task.abort_handle());
        self.ticket = Some(ticket);
    }

    /// Aborts the live countdown, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(ticket = ?self.ticket, "Turn timer cancelled");
        }
        self.ticket = None;
    }

    /// Forgets the countdown without aborting it.
    ///
    /// Called from inside the expiring task itself, which must not abort
    /// its own remaining work.
    pub fn release(&mut self) {
        self.task = None;
        self.ticket = None;
    }

    /// Whether `ticket` is the countdown currently armed.
    pub fn holds(&self, ticket: TurnTicket) -> bool {
        self.ticket == Some(ticket)
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
