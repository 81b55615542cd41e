//! Manually driven clock and scheduler for deterministic tests.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::{Clock, FireCallback, ScheduledTask, TaskScheduler};

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

struct ManualEntry {
    deadline: DateTime<Utc>,
    callback: Option<FireCallback>,
    cancelled: Arc<AtomicBool>,
}

impl ManualEntry {
    fn is_pending(&self) -> bool {
        self.callback.is_some() && !self.cancelled.load(Ordering::SeqCst)
    }
}

/// Scheduler whose tasks fire only through [`fire_due`](Self::fire_due).
#[derive(Clone, Default)]
pub struct ManualScheduler {
    entries: Arc<Mutex<Vec<ManualEntry>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadlines of tasks that are neither fired nor cancelled.
    pub fn pending_deadlines(&self) -> Vec<DateTime<Utc>> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_pending())
            .map(|e| e.deadline)
            .collect()
    }

    /// Total number of tasks ever scheduled.
    pub fn scheduled_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Fire every pending task whose deadline is at or before `now`.
    ///
    /// Returns how many tasks fired.
    pub fn fire_due(&self, now: DateTime<Utc>) -> usize {
        let due: Vec<FireCallback> = {
            let mut entries = self.entries.lock().unwrap();
            entries
                .iter_mut()
                .filter(|e| e.is_pending() && e.deadline <= now)
                .filter_map(|e| e.callback.take())
                .collect()
        };
        let fired = due.len();
        for callback in due {
            callback();
        }
        fired
    }
}

impl TaskScheduler for ManualScheduler {
    fn schedule_at(
        &self,
        deadline: DateTime<Utc>,
        on_fire: FireCallback,
    ) -> Box<dyn ScheduledTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.entries.lock().unwrap().push(ManualEntry {
            deadline,
            callback: Some(on_fire),
            cancelled: cancelled.clone(),
        });
        Box::new(ManualTask { cancelled })
    }
}

struct ManualTask {
    cancelled: Arc<AtomicBool>,
}

impl ScheduledTask for ManualTask {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
