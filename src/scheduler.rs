//! Cancellable scheduled tasks driven by an explicit clock.
//!
//! Deferred work (slide commits, preload debounce, thumbnail auto-hide) is
//! queued here instead of being handed to a fire-and-forget timer. Every task
//! gets a [`TaskHandle`]; closing the viewer cancels its tasks outright, so a
//! stale callback can never run against a closed or reopened viewer.
//!
//! The scheduler never reads the clock itself: callers pass `now` to
//! [`Scheduler::schedule`] and [`Scheduler::take_due`], which keeps tests
//! deterministic and lets the host decide how it sleeps.

use std::time::Duration;

use web_time::Instant;

/// Identifies a scheduled task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    id: u64,
    due: Instant,
    task: T,
}

/// A queue of tasks, each due at a point in time.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// Schedule `task` to run `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> TaskHandle {
        self.schedule_at(now + delay, task)
    }

    /// Schedule `task` to run at `due`.
    pub fn schedule_at(&mut self, due: Instant, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(ScheduledTask { id, due, task });
        TaskHandle(id)
    }

    /// Cancel a task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != handle.0);
        self.tasks.len() != before
    }

    /// Cancel every pending task, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Remove and return every task due at or before `now`, in due order
    /// (ties broken by scheduling order).
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due <= now);
        self.tasks = pending;
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|t| t.task).collect()
    }
}
