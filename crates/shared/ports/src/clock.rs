use kestrel_core::Timestamp;

/// Port for time abstraction
///
/// Implementations must be monotonic non-decreasing: order timestamps,
/// trade ordering and uptime are all derived from successive readings.
/// - Wall-clock time for production
/// - Manually advanced time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
