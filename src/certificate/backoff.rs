//! Retry backoff for failed certificate refreshes.

use std::time::Duration;

/// Default floor of the retry interval.
pub const DEFAULT_RETRY_FLOOR: Duration = Duration::from_secs(10);

/// Unbounded doubling backoff.
///
/// Each failure doubles the last interval (never going below the floor).
/// There is no ceiling; a successful refresh resets to the floor.
#[derive(Debug, Clone)]
pub struct RetryBackoff {
    floor: Duration,
    last: Duration,
}

impl RetryBackoff {
    pub fn new(floor: Duration) -> Self {
        Self { floor, last: floor }
    }

    /// Interval to wait before the next retry. Advances the backoff.
    pub fn next_delay(&mut self) -> Duration {
        self.last = self.last.saturating_mul(2).max(self.floor);
        self.last
    }

    /// Back to the floor after a successful refresh.
    pub fn reset(&mut self) {
        self.last = self.floor;
    }

    /// Last interval handed out (the floor right after a reset).
    pub fn last_interval(&self) -> Duration {
        self.last
    }

    pub fn floor(&self) -> Duration {
        self.floor
    }
}

impl Default for RetryBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubles_from_floor() {
        let mut backoff = RetryBackoff::default();
        assert_eq!(backoff.next_delay(), Duration::from_secs(20));
        assert_eq!(backoff.next_delay(), Duration::from_secs(40));
        assert_eq!(backoff.next_delay(), Duration::from_secs(80));
        assert_eq!(backoff.next_delay(), Duration::from_secs(160));
    }

    #[test]
    fn test_reset_returns_to_floor() {
        let mut backoff = RetryBackoff::default();
        for _ in 0..6 {
            backoff.next_delay();
        }
        backoff.reset();
        assert_eq!(backoff.last_interval(), DEFAULT_RETRY_FLOOR);
        assert_eq!(backoff.next_delay(), Duration::from_secs(20));
    }

    #[test]
    fn test_zero_floor_stays_at_zero() {
        let mut backoff = RetryBackoff::new(Duration::ZERO);
        assert_eq!(backoff.next_delay(), Duration::ZERO);
    }

    #[test]
    fn test_never_decreases_and_saturates() {
        let mut backoff = RetryBackoff::new(Duration::from_secs(1));
        let mut previous = Duration::ZERO;
        for _ in 0..200 {
            let delay = backoff.next_delay();
            assert!(delay >= previous);
            previous = delay;
        }
        assert_eq!(previous, Duration::MAX);
    }
}
