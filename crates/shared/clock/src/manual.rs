use std::sync::RwLock;

use chrono::Duration;
use kestrel_core::Timestamp;
use kestrel_ports::Clock;

/// Deterministic clock for tests and replay
///
/// Time is frozen at the initial instant and only moves through
/// [`advance`](ManualClock::advance) or [`set`](ManualClock::set).
/// Neither operation can move time backwards.
pub struct ManualClock {
    current_time: RwLock<Timestamp>,
}

impl ManualClock {
    /// Create a clock frozen at `initial_time`
    pub fn new(initial_time: Timestamp) -> Self {
        Self {
            current_time: RwLock::new(initial_time),
        }
    }

    /// Advance the clock by a non-negative duration. Negative durations are ignored.
    pub fn advance(&self, duration: Duration) {
        if duration < Duration::zero() {
            return;
        }
        let mut current = match self.current_time.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current += duration;
    }

    /// Jump to `time`. Returns false (and leaves the clock unchanged) if
    /// `time` is earlier than the current reading.
    pub fn set(&self, time: Timestamp) -> bool {
        let mut current = match self.current_time.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if time < *current {
            return false;
        }
        *current = time;
        true
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        match self.current_time.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}
