//! Classifies connection status notifications into telemetry transitions.
//!
//! Notifications must be fed one at a time in arrival order. The tracker
//! remembers the last `connecting`/`connected`/`disconnected` status and the
//! pending user intent, and drives the [`ConnectionTimer`].

use super::status::{ConnectionStatus, UserInitiatedChange};
use super::timer::ConnectionTimer;
use crate::telemetry::{ConnectionEventType, Outcome};

/// Result of processing one status notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Status that just arrived.
    pub status: ConnectionStatus,
    /// Remembered status before this notification.
    pub previous: Option<ConnectionStatus>,
    pub outcome: Outcome,
    /// `None` when the transition is not reported.
    pub event_type: Option<ConnectionEventType>,
}

impl Transition {
    /// Whether this transition produces a telemetry event.
    pub fn is_reportable(&self) -> bool {
        self.event_type.is_some()
    }
}

/// Connection state machine feeding telemetry.
#[derive(Debug)]
pub struct ConnectionStateTracker {
    previous: Option<ConnectionStatus>,
    pending_intent: Option<UserInitiatedChange>,
    timer: ConnectionTimer,
}

impl ConnectionStateTracker {
    pub fn new(timer: ConnectionTimer) -> Self {
        Self {
            previous: None,
            pending_intent: None,
            timer,
        }
    }

    pub fn previous_status(&self) -> Option<ConnectionStatus> {
        self.previous
    }

    pub fn pending_intent(&self) -> Option<UserInitiatedChange> {
        self.pending_intent
    }

    pub fn timer(&self) -> &ConnectionTimer {
        &self.timer
    }

    /// Annotate the next transition with a user action. Last write wins.
    pub fn record_user_intent(&mut self, change: UserInitiatedChange) {
        self.pending_intent = Some(change);
    }

    /// Process one status notification.
    ///
    /// Returns `None` for `disconnecting`, which changes no state.
    pub fn handle_status(&mut self, status: ConnectionStatus) -> Option<Transition> {
        let event_type = match status {
            // Repeated notification for a tunnel that is already up
            ConnectionStatus::Connected if self.previous == Some(ConnectionStatus::Connected) => {
                None
            }
            ConnectionStatus::Connected => {
                self.timer.mark_finished_connecting();
                let event_type = connection_event_type(status, self.previous, &self.timer);
                self.timer.finish_attempt();
                event_type
            }
            ConnectionStatus::Connecting => {
                self.timer.mark_connection_stopped();
                let event_type = connection_event_type(status, self.previous, &self.timer);
                self.timer.mark_started_connecting();
                event_type
            }
            ConnectionStatus::Disconnected => {
                self.timer.mark_connection_stopped();
                let event_type = connection_event_type(status, self.previous, &self.timer);
                self.timer.finish_attempt();
                event_type
            }
            ConnectionStatus::Disconnecting => return None,
        };

        let outcome = connection_outcome(status, self.previous, self.pending_intent.take());
        let previous = self.previous;
        if status.is_remembered() {
            self.previous = Some(status);
        }

        Some(Transition {
            status,
            previous,
            outcome,
            event_type,
        })
    }
}

/// Business outcome of arriving at `current` from `previous`.
pub fn connection_outcome(
    current: ConnectionStatus,
    previous: Option<ConnectionStatus>,
    intent: Option<UserInitiatedChange>,
) -> Outcome {
    match current {
        ConnectionStatus::Disconnected => {
            let was_active = matches!(
                previous,
                Some(ConnectionStatus::Connected | ConnectionStatus::Connecting)
            );
            if !was_active {
                return Outcome::Success;
            }
            match intent {
                Some(UserInitiatedChange::Disconnect) => Outcome::Success,
                Some(UserInitiatedChange::Abort) => Outcome::Aborted,
                Some(UserInitiatedChange::Connect) | None => Outcome::Failure,
            }
        }
        ConnectionStatus::Connected => Outcome::Success,
        ConnectionStatus::Connecting => {
            if previous == Some(ConnectionStatus::Connected) {
                Outcome::Success
            } else {
                Outcome::Failure
            }
        }
        ConnectionStatus::Disconnecting => Outcome::Failure,
    }
}

/// Event reported when arriving at `current` from `previous`, if any.
pub fn connection_event_type(
    current: ConnectionStatus,
    previous: Option<ConnectionStatus>,
    timer: &ConnectionTimer,
) -> Option<ConnectionEventType> {
    match (current, previous) {
        (ConnectionStatus::Connected, Some(ConnectionStatus::Connected)) => None,
        (ConnectionStatus::Connected, _) => timer
            .time_to_connect()
            .map(|time_to_connection| ConnectionEventType::VpnConnection { time_to_connection }),
        (
            ConnectionStatus::Disconnected | ConnectionStatus::Connecting,
            Some(ConnectionStatus::Connected),
        ) => Some(ConnectionEventType::VpnDisconnection {
            session_length: timer.connection_duration().unwrap_or_default(),
        }),
        (ConnectionStatus::Disconnected, Some(ConnectionStatus::Connecting)) => {
            Some(ConnectionEventType::VpnConnection {
                time_to_connection: timer.time_connecting().unwrap_or_default(),
            })
        }
        _ => None,
    }
}
