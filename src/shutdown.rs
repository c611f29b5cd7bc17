//! Process-wide shutdown signaling.
//!
//! Deferred background tasks and the web server subscribe here so that
//! ctrl-c interrupts in-flight work instead of orphaning it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use tokio::sync::{watch, Notify};

fn channel() -> &'static watch::Sender<bool> {
    static TX: OnceLock<watch::Sender<bool>> = OnceLock::new();
    TX.get_or_init(|| watch::channel(false).0)
}

static ACTIVE_TASKS: AtomicUsize = AtomicUsize::new(0);

fn drained() -> &'static Notify {
    static NOTIFY: OnceLock<Notify> = OnceLock::new();
    NOTIFY.get_or_init(Notify::new)
}

/// Subscribe to the shutdown signal. The value flips to true exactly once.
pub fn subscribe() -> watch::Receiver<bool> {
    channel().subscribe()
}

/// Signal every subscriber to stop.
pub fn trigger() {
    let _ = channel().send(true);
}

/// Marks a background task as in flight until dropped. Shutdown waits for
/// all guards to drop before the process exits, so cancellation edits still
/// reach the chat.
pub struct TaskGuard(());

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if ACTIVE_TASKS.fetch_sub(1, Ordering::SeqCst) == 1 {
            drained().notify_waiters();
        }
    }
}

pub fn task_guard() -> TaskGuard {
    ACTIVE_TASKS.fetch_add(1, Ordering::SeqCst);
    TaskGuard(())
}

/// Wait until every tracked task has finished, up to `grace`.
pub async fn wait_for_tasks(grace: Duration) {
    let deadline = tokio::time::sleep(grace);
    tokio::pin!(deadline);

    while ACTIVE_TASKS.load(Ordering::SeqCst) > 0 {
        tokio::select! {
            _ = drained().notified() => {}
            _ = &mut deadline => {
                tracing::warn!(
                    remaining = ACTIVE_TASKS.load(Ordering::SeqCst),
                    "Shutdown grace period expired with tasks still in flight"
                );
                break;
            }
        }
    }
}
