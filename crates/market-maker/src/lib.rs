//! Kestrel Market Maker
//!
//! Coordinator that wires the spread model, inventory ledger and liquidity
//! pool together:
//!
//! ```text
//! MarketSnapshot ──► SpreadModel ──► Quote ──► bid/ask Orders
//!                        ▲                          │ fill
//!                        │ InventoryState           ▼
//!                  InventoryLedger ◄──────────── Trade ──► P&L, history
//! ```
//!
//! The pool is reached through its own proxy methods and never affects
//! quoting, inventory or P&L.
//!
//! All operations are synchronous and expect a single owner. Time and ids
//! come from the injected [`Clock`](kestrel_ports::Clock) and
//! [`IdGenerator`](kestrel_ports::IdGenerator).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kestrel_market_maker::{MarketMaker, MarketMakerConfig};
//!
//! let mut mm = MarketMaker::new(MarketMakerConfig::default(), clock, ids)?;
//! let orders = mm.requote(&snapshot);
//! let outcome = mm.process_fill(&orders[0].id, dec!(0.5), None)?;
//! if outcome.needs_rebalancing {
//!     mm.execute_rebalance(&snapshot);
//! }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod maker;
pub mod stats;

pub use config::{MarketMakerConfig, MarketMakerConfigUpdate};
pub use error::{MarketMakerError, Result};
pub use history::TradeHistory;
pub use maker::{FillOutcome, MarketMaker};
pub use stats::{MarketMakerStats, TradeStats};

// Re-export the component types callers need
pub use kestrel_inventory::{ClampEvent, InventoryUpdate};
pub use kestrel_pool::{PoolError, Token};
