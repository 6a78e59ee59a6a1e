//! Handle for the pending auto-save timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// The one armed auto-save timer.
///
/// Owns the channel that cancels the background task and the handle to
/// await it. While a handle exists auto-save is armed; cancelling it
/// disarms. The coordinator stores at most one.
#[derive(Debug)]
pub(crate) struct ScheduledTimer {
    generation: u64,
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ScheduledTimer {
    pub(crate) fn new(generation: u64, cancel: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            generation,
            cancel,
            task,
        }
    }

    /// Arming generation; every arm gets a fresh one.
    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the timer.
    ///
    /// A wait that has not elapsed ends without firing. A save already in
    /// progress runs to completion; the task then sees it is stale and exits
    /// without rescheduling. Returns the task so callers can await it.
    pub(crate) fn cancel(self) -> JoinHandle<()> {
        // Err means the task already exited
        let _ = self.cancel.send(());
        self.task
    }
}

/// Counts running timer tasks.
///
/// Created when a task is spawned and moved into it, so the count drops only
/// when the task has really finished, including any save it was running.
#[derive(Debug)]
pub(crate) struct LiveTimer {
    count: Arc<AtomicUsize>,
}

impl LiveTimer {
    pub(crate) fn new(count: &Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self {
            count: Arc::clone(count),
        }
    }
}

impl Drop for LiveTimer {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
