//! The three-signal event bus (spec.md §4.E, §9 "Event bus with three
//! booleans"). `tokio::sync::Notify` alone is edge-triggered: a `notify_*`
//! call is lost if nobody is waiting yet. Pairing it with an `AtomicBool`
//! flag gives the level-triggered, clear-after-wait semantics of
//! `threading.Event` that both drivers rely on to re-arm.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct LevelEvent {
    notify: Notify,
    flag: AtomicBool,
}

impl LevelEvent {
    pub fn new() -> Self {
        Self { notify: Notify::new(), flag: AtomicBool::new(false) }
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Blocks until `set`, consuming the signal (clear-after-wait). Safe
    /// against the set-before-wait race: a `Notified` future is created and
    /// the flag rechecked before awaiting it, so a `set()` landing between
    /// the two checks is never missed.
    pub async fn wait(&self) {
        loop {
            if self.flag.swap(false, Ordering::SeqCst) {
                return;
            }
            let notified = self.notify.notified();
            tokio::pin!(notified);
            if self.flag.swap(false, Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}

/// The operation's single event bus instance, shared by both drivers and
/// the controller (spec.md §4.E).
#[derive(Debug, Default)]
pub struct EventBus {
    pub start_next_exploration: LevelEvent,
    pub stop_exploration: LevelEvent,
    pub inspector_done: LevelEvent,
}

impl EventBus {
    pub fn new() -> Self { Self::default() }
}
