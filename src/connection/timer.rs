//! Connection timing measurements used by telemetry events.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::traits::Clock;

/// Tracks when connection attempts and sessions start and stop.
pub struct ConnectionTimer {
    clock: Arc<dyn Clock>,
    started_connecting: Option<DateTime<Utc>>,
    finished_connecting: Option<DateTime<Utc>>,
    connection_started: Option<DateTime<Utc>>,
    connection_stopped: Option<DateTime<Utc>>,
}

impl ConnectionTimer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            started_connecting: None,
            finished_connecting: None,
            connection_started: None,
            connection_stopped: None,
        }
    }

    /// Restore the start of a session that survived an app restart.
    pub fn update_connection_started(&mut self, at: DateTime<Utc>) {
        self.connection_started = Some(at);
    }

    /// A new connection attempt began.
    pub fn mark_started_connecting(&mut self) {
        self.started_connecting = Some(self.clock.now());
        self.finished_connecting = None;
        self.connection_stopped = None;
    }

    /// The tunnel came up; also starts the session clock.
    ///
    /// Without a preceding attempt a session that is still running (restored
    /// at startup) keeps its start.
    pub fn mark_finished_connecting(&mut self) {
        let now = self.clock.now();
        self.finished_connecting = Some(now);
        let session_running =
            self.connection_started.is_some() && self.connection_stopped.is_none();
        if self.started_connecting.is_some() || !session_running {
            self.connection_started = Some(now);
        }
        self.connection_stopped = None;
    }

    /// The current attempt has been reported; nothing is being timed until
    /// the next [`mark_started_connecting`](Self::mark_started_connecting).
    pub fn finish_attempt(&mut self) {
        self.started_connecting = None;
        self.finished_connecting = None;
    }

    /// The running attempt or session ended.
    pub fn mark_connection_stopped(&mut self) {
        self.connection_stopped = Some(self.clock.now());
    }

    /// Time from starting to finishing the last connection attempt.
    pub fn time_to_connect(&self) -> Option<Duration> {
        Some(elapsed(self.started_connecting?, self.finished_connecting?))
    }

    /// Time spent in the current (or last stopped) connection attempt.
    pub fn time_connecting(&self) -> Option<Duration> {
        let started = self.started_connecting?;
        Some(elapsed(started, self.stop_or_now()))
    }

    /// Length of the current (or last stopped) session.
    pub fn connection_duration(&self) -> Option<Duration> {
        let started = self.connection_started?;
        Some(elapsed(started, self.stop_or_now()))
    }

    fn stop_or_now(&self) -> DateTime<Utc> {
        self.connection_stopped.unwrap_or_else(|| self.clock.now())
    }
}

impl std::fmt::Debug for ConnectionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionTimer")
            .field("started_connecting", &self.started_connecting)
            .field("finished_connecting", &self.finished_connecting)
            .field("connection_started", &self.connection_started)
            .field("connection_stopped", &self.connection_stopped)
            .finish()
    }
}

/// Non-negative time between two instants.
fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
    (to - from).to_std().unwrap_or(Duration::ZERO)
}
