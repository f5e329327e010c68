// src/coordinator/timer.rs
use std::time::Duration;
use tokio::task::JoinHandle;

/// A callback scheduled to run once after a delay.
///
/// Cancelling (or dropping) the handle aborts the sleeping task, so a
/// cancelled callback never runs.
#[derive(Debug)]
pub struct TimerHandle {
    id: u64,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn schedule<F>(id: u64, delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { id, task }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(self) {
        // Drop does the abort
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Holds at most one live timer. Scheduling a new one cancels the previous.
///
/// Each timer gets a fresh id which the callback receives. An expiry that was
/// already queued when its timer got replaced can be recognised with
/// [`TimerSlot::take_if_live`] and ignored.
#[derive(Debug, Default)]
pub struct TimerSlot {
    live: Option<TimerHandle>,
    next_id: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, delay: Duration, callback: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        if let Some(previous) = self.live.replace(TimerHandle::schedule(id, delay, move || callback(id))) {
            previous.cancel();
        }
        id
    }

    /// Cancel the live timer. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.live.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.live.is_some()
    }

    /// Consume an expiry for `id`. Returns false if that timer is no longer the live one.
    pub fn take_if_live(&mut self, id: u64) -> bool {
        match &self.live {
            Some(handle) if handle.id() == id => {
                self.live = None;
                true
            }
            _ => false,
        }
    }
}
