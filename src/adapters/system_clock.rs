//! Wall clock backed by the system time.

use chrono::{DateTime, Utc};

use crate::traits::Clock;

/// [`Clock`] returning `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
