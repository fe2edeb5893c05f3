//! Kestrel Ports
//!
//! Capability traits the core consumes but never implements itself.
//! These define the boundary between the pricing engines and the host.

mod clock;
mod id;

pub use clock::Clock;
pub use id::IdGenerator;
