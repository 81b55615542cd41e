//! Time source and single-shot task scheduling abstractions.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock instant.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Callback invoked once when a scheduled task fires.
pub type FireCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a pending single-shot task.
pub trait ScheduledTask: Send {
    /// Cancel the task. Cancelling a task that already fired is a no-op.
    fn cancel(&mut self);
}

/// Schedules single-shot wake-ups.
///
/// Implementations must not run `on_fire` synchronously from within
/// `schedule_at`, even when `deadline` is already in the past.
pub trait TaskScheduler: Send + Sync {
    /// Arrange for `on_fire` to run at `deadline`.
    fn schedule_at(&self, deadline: DateTime<Utc>, on_fire: FireCallback) -> Box<dyn ScheduledTask>;
}
