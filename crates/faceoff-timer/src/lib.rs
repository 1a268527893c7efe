//! Cancellable single-shot countdown for Faceoff rooms.
//!
//! A [`Countdown`] counts a fixed number of time units and then delivers an
//! expiry command. Crucially, it never runs game logic itself: expiry and
//! tick notifications are *commands* sent into the owning room's mpsc
//! channel, so they are serialized with connection-originated actions and
//! can never produce a torn read or write.
//!
//! # Integration
//!
//! ```ignore
//! let generation = self.turn_generation;
//! self.turn_timer = Some(Countdown::start(
//!     CountdownConfig { units: 30, unit: Duration::from_secs(1) },
//!     self.sender.clone(),
//!     |remaining| {
//!         tracing::debug!(remaining, "turn countdown");
//!         None // advisory only — no command enqueued per tick
//!     },
//!     move || RoomCommand::TurnTimerExpired { generation },
//! ));
//! ```
//!
//! Cancellation is idempotent: cancelling an already-cancelled or
//! already-fired countdown is a no-op. Dropping the handle cancels too.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::{debug, trace};

/// How long a countdown runs: `units` steps of `unit` each.
///
/// The reference behavior uses 30 units of one second; tests compress the
/// unit to a few milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct CountdownConfig {
    /// Number of time units before expiry.
    pub units: u32,
    /// Wall-clock length of one unit.
    pub unit: Duration,
}

impl CountdownConfig {
    /// A countdown of `units` one-second steps.
    pub fn seconds(units: u32) -> Self {
        Self {
            units,
            unit: Duration::from_secs(1),
        }
    }

    /// Total wall-clock duration of the countdown.
    pub fn total(&self) -> Duration {
        self.unit * self.units
    }
}

/// Handle to a running countdown task.
///
/// Single-shot: after the expiry command has been sent, or after
/// [`cancel`](Self::cancel), the countdown is inert.
#[derive(Debug)]
pub struct Countdown {
    cancel: Option<oneshot::Sender<()>>,
}

impl Countdown {
    /// Spawns a countdown task.
    ///
    /// After each elapsed unit (except the last), `tick(remaining)` is
    /// invoked; if it returns a command, that command is enqueued on
    /// `sender`. After the final unit, `expire()` is enqueued. If the
    /// receiving channel closes, the task exits quietly — the room is
    /// gone.
    pub fn start<C, T, E>(
        config: CountdownConfig,
        sender: mpsc::Sender<C>,
        mut tick: T,
        expire: E,
    ) -> Self
    where
        C: Send + 'static,
        T: FnMut(u32) -> Option<C> + Send + 'static,
        E: FnOnce() -> C + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = oneshot::channel();

        debug!(units = config.units, unit = ?config.unit, "countdown armed");

        tokio::spawn(async move {
            for remaining in (0..config.units).rev() {
                tokio::select! {
                    // Poll cancellation first so a cancel that races a
                    // due tick always wins.
                    biased;
                    _ = &mut cancel_rx => {
                        trace!(remaining, "countdown cancelled");
                        return;
                    }
                    _ = time::sleep(config.unit) => {
                        if remaining > 0 {
                            if let Some(cmd) = tick(remaining) {
                                if sender.send(cmd).await.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
            trace!("countdown expired");
            let _ = sender.send(expire()).await;
        });

        Self {
            cancel: Some(cancel_tx),
        }
    }

    /// Cancels the countdown. Idempotent: repeat calls, or calls after
    /// the countdown has fired, do nothing.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            // Fails if the task already finished — that's fine.
            let _ = tx.send(());
            debug!("countdown cancel requested");
        }
    }

    /// Returns `true` if [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
