//! Tokio-based single-shot task scheduler.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

use crate::traits::{Clock, FireCallback, ScheduledTask, TaskScheduler};

/// Runs each scheduled callback from a spawned sleeping task.
///
/// The wall-clock deadline is converted to a delay when the task is
/// scheduled; deadlines in the past fire on the next runtime tick.
#[derive(Clone)]
pub struct TokioScheduler {
    clock: Arc<dyn Clock>,
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(clock: Arc<dyn Clock>, runtime: Handle) -> Self {
        Self { clock, runtime }
    }

    /// Use the runtime of the calling context.
    pub fn current(clock: Arc<dyn Clock>) -> Result<Self, TryCurrentError> {
        Ok(Self::new(clock, Handle::try_current()?))
    }
}

impl TaskScheduler for TokioScheduler {
    fn schedule_at(
        &self,
        deadline: DateTime<Utc>,
        on_fire: FireCallback,
    ) -> Box<dyn ScheduledTask> {
        let delay = (deadline - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        });
        Box::new(TokioTask { handle })
    }
}

/// Abort handle of a task spawned by [`TokioScheduler`].
pub struct TokioTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask for TokioTask {
    fn cancel(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SystemClock;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn scheduler() -> TokioScheduler {
        TokioScheduler::current(Arc::new(SystemClock)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let _task = scheduler().schedule_at(
            Utc::now() + chrono::Duration::seconds(30),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let mut task = scheduler().schedule_at(
            Utc::now() + chrono::Duration::seconds(5),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        task.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_deadline_fires_asynchronously() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let _task = scheduler().schedule_at(
            Utc::now() - chrono::Duration::seconds(5),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        assert!(!fired.load(Ordering::SeqCst));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_current_requires_runtime() {
        assert!(TokioScheduler::current(Arc::new(SystemClock)).is_err());
    }
}
