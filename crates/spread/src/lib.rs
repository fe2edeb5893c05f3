//! Kestrel Spread Model
//!
//! Pure pricing: market data plus an inventory snapshot in, quote width and
//! sizes out. Holds no position state of its own.
//!
//! ## Pipeline
//!
//! ```text
//! volume_24h ──► volume factor ──┐
//!                                ├──► total spread (clamped to [min, max])
//! volatility ──► dead-zone adj ──┘            │
//!                                             ▼
//! inventory ratio ──────────────► skew ──► bid / ask half-spreads
//!                                             │
//!                     mid price, order size ──┴──► Quote (tick-rounded)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kestrel_spread::{SpreadConfig, SpreadModel};
//!
//! let model = SpreadModel::new(SpreadConfig::default())?;
//! let quote = model.generate_quote(mid, &market, &inventory, dec!(1));
//! ```

pub mod config;
pub mod error;
pub mod model;

// Re-export main types
pub use config::{SpreadConfig, SpreadConfigUpdate};
pub use error::{ConfigError, Result};
pub use model::{SpreadModel, SpreadQuote};
