//! Integration tests for the countdown primitive.
//!
//! Uses `tokio::time::pause()` via `start_paused` so sleeps resolve
//! deterministically without real waiting.

use std::time::Duration;

use faceoff_timer::{Countdown, CountdownConfig};
use tokio::sync::mpsc;

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Tick(u32),
    Expired,
}

fn config(units: u32) -> CountdownConfig {
    CountdownConfig {
        units,
        unit: Duration::from_millis(10),
    }
}

/// Starts a countdown that enqueues every tick and the expiry.
fn start(units: u32, tx: mpsc::Sender<Event>) -> Countdown {
    Countdown::start(
        config(units),
        tx,
        |remaining| Some(Event::Tick(remaining)),
        || Event::Expired,
    )
}

#[test]
fn test_config_total_duration() {
    let cfg = CountdownConfig::seconds(30);
    assert_eq!(cfg.total(), Duration::from_secs(30));
    assert_eq!(config(3).total(), Duration::from_millis(30));
}

#[tokio::test(start_paused = true)]
async fn test_ticks_count_down_then_expire() {
    let (tx, mut rx) = mpsc::channel(8);
    let _countdown = start(3, tx);

    assert_eq!(rx.recv().await, Some(Event::Tick(2)));
    assert_eq!(rx.recv().await, Some(Event::Tick(1)));
    assert_eq!(rx.recv().await, Some(Event::Expired));
    // Single-shot: the task is done, channel closes.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_one_unit_countdown_expires_without_ticks() {
    let (tx, mut rx) = mpsc::channel(8);
    let _countdown = start(1, tx);

    assert_eq!(rx.recv().await, Some(Event::Expired));
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_suppresses_expiry() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut countdown = start(5, tx);

    countdown.cancel();
    assert!(countdown.is_cancelled());

    // Advance well past the would-be expiry.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(rx.try_recv().ok(), None);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_idempotent() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut countdown = start(5, tx);

    countdown.cancel();
    countdown.cancel();
    countdown.cancel();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_expiry_is_a_noop() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut countdown = start(1, tx);

    assert_eq!(rx.recv().await, Some(Event::Expired));
    // Already fired — cancelling must not panic or double-deliver.
    countdown.cancel();
    countdown.cancel();
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels() {
    let (tx, mut rx) = mpsc::channel(8);
    {
        let _countdown = start(5, tx);
        // Handle dropped here.
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(rx.try_recv().ok(), None);
}

#[tokio::test(start_paused = true)]
async fn test_silent_ticks_still_expire() {
    let (tx, mut rx) = mpsc::channel::<Event>(8);
    let _countdown = Countdown::start(config(3), tx, |_| None, || Event::Expired);

    assert_eq!(rx.recv().await, Some(Event::Expired));
}

#[tokio::test(start_paused = true)]
async fn test_closed_channel_stops_task_quietly() {
    let (tx, rx) = mpsc::channel(8);
    let _countdown = start(3, tx);
    drop(rx);

    // Nothing to assert beyond "no panic": the task notices the closed
    // channel on its first tick send and exits.
    tokio::time::sleep(Duration::from_millis(200)).await;
}
