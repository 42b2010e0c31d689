//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries, plus the
//! handle used to stop it.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// == Cleanup Handle ==
/// Owns a running cleanup task.
///
/// The task stops when [`CleanupHandle::shutdown`] is awaited, or as soon as
/// the handle is dropped, since dropping closes the shutdown channel the task
/// listens on.
#[derive(Debug)]
pub struct CleanupHandle {
    /// Shutdown signal, `true` once a stop was requested
    shutdown: watch::Sender<bool>,
    /// Join handle, taken by the first `shutdown` call
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CleanupHandle {
    fn new(shutdown: watch::Sender<bool>, task: JoinHandle<()>) -> Self {
        Self {
            shutdown,
            task: Mutex::new(Some(task)),
        }
    }

    // == Shutdown ==
    /// Signals the task to stop and waits for it to finish.
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        // The task may already be gone, in which case nobody is listening.
        let _ = self.shutdown.send(true);

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!("TTL cleanup task ended abnormally: {}", err);
            }
        }
    }

    // == Is Running ==
    /// Returns true while the task is alive.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

/// Sleeps for `interval`, runs one sweep pass, and repeats.
///
/// `sweep` returns the number of entries it removed, or `None` once the
/// store it sweeps no longer exists.
async fn sweep_loop<F>(interval: Duration, mut shutdown: watch::Receiver<bool>, mut sweep: F)
where
    F: FnMut() -> Option<usize>,
{
    info!(
        "Starting TTL cleanup task with interval of {} ms",
        interval.as_millis()
    );

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        match sweep() {
            Some(removed) if removed > 0 => {
                info!("TTL cleanup: removed {} expired entries", removed);
            }
            Some(_) => debug!("TTL cleanup: no expired entries found"),
            None => break,
        }
    }

    debug!("TTL cleanup task stopped");
}

/// Spawns a cleanup task on the Tokio runtime.
///
/// # Panics
/// Panics when called outside a Tokio runtime, like `tokio::spawn`.
pub fn spawn_cleanup_task<F>(interval: Duration, sweep: F) -> CleanupHandle
where
    F: FnMut() -> Option<usize> + Send + 'static,
{
    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(sweep_loop(interval, rx, sweep));
    CleanupHandle::new(tx, task)
}

/// Spawns a cleanup task on the current `LocalSet`, for stores that are not
/// `Send`.
///
/// # Panics
/// Panics when called outside a `LocalSet`, like `tokio::task::spawn_local`.
pub fn spawn_local_cleanup_task<F>(interval: Duration, sweep: F) -> CleanupHandle
where
    F: FnMut() -> Option<usize> + 'static,
{
    let (tx, rx) = watch::channel(false);
    let task = tokio::task::spawn_local(sweep_loop(interval, rx, sweep));
    CleanupHandle::new(tx, task)
}
