//! Kestrel Clock Infrastructure
//!
//! Provides the time sources the core consumes through [`Clock`]:
//!
//! - [`SystemClock`]: wall-clock time, forced monotonic
//! - [`ManualClock`]: frozen time that only moves when told to
//!
//! ## Usage
//!
//! ```ignore
//! use kestrel_clock::{Clock, ManualClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(start);
//! let t0 = clock.now();
//! clock.advance(Duration::seconds(1));
//! assert_eq!(clock.now() - t0, Duration::seconds(1));
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use kestrel_ports::Clock;
