//! System clock adapter

use chrono::{DateTime, Utc};
use querybox_application::ports::Clock;

/// Wall-clock time for record timestamps and export envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock::new();
        let now = clock.now();
        assert!(now.timestamp() > 0);
        let millis = clock.now_millis();
        assert!(millis >= now.timestamp_millis());
    }
}
