//! Kestrel Inventory Ledger
//!
//! Tracks the market maker's signed position and its average entry price:
//! - **Hard limits**: position is clamped into `[min_inventory, max_inventory]`;
//!   the overshoot is returned as a [`ClampEvent`], never an error
//! - **Cost basis**: weighted average over same-direction exposure,
//!   reset when a trade flips the position through zero
//! - **Rebalancing**: signals when the deviation from target exceeds a
//!   fraction of the allowed range
//!
//! The ledger is a leaf: it consumes [`Trade`](kestrel_core::Trade) values and
//! hands out [`InventoryState`](kestrel_core::InventoryState) snapshots.

pub mod config;
pub mod error;
pub mod ledger;

// Re-export main types
pub use config::{InventoryConfig, InventoryConfigUpdate};
pub use error::{ConfigError, Result};
pub use ledger::{ClampEvent, InventoryLedger, InventoryUpdate, Position};
