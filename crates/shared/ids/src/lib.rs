//! Kestrel Identifier Sources
//!
//! Implementations of [`IdGenerator`] for order and trade ids:
//! - [`UuidIdGenerator`]: random v4 UUIDs, for production
//! - [`SequentialIdGenerator`]: `prefix-1`, `prefix-2`, ... for tests and replay

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

// Re-export the IdGenerator trait for convenience
pub use kestrel_ports::IdGenerator;

/// Random v4 UUID identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic counter identifiers of the form `{prefix}-{n}`, starting at 1
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}
