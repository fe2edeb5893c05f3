//! Kestrel Core Domain
//!
//! Pure domain types shared by the spread model, inventory ledger,
//! liquidity pool and the market-making coordinator.
//! Components exchange these by value; none holds a reference into another.
//! This crate contains no I/O and no mutable shared state.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    InventoryState, MarketSnapshot, Order, OrderId, OrderStatus, Quote, Side, Trade, TradeId,
};
pub use values::{Price, Quantity, Symbol, Timestamp};
