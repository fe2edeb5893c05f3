use std::sync::Mutex;

use chrono::Utc;
use kestrel_core::Timestamp;
use kestrel_ports::Clock;

/// Real system clock for production use
///
/// Returns the current wall-clock time, never earlier than a previous
/// reading: if the host clock steps backwards the last reading is repeated
/// until wall time catches up.
pub struct SystemClock {
    last: Mutex<Timestamp>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(Utc::now()),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let wall = Utc::now();
        // Poisoned or not, the stored reading is a valid lower bound
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if wall > *last {
            *last = wall;
        }
        *last
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
