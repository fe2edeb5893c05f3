mod inventory;
mod market;
mod order;
mod order_status;
mod quote;
mod side;
mod trade;

pub use inventory::InventoryState;
pub use market::MarketSnapshot;
pub use order::{Order, OrderId};
pub use order_status::OrderStatus;
pub use quote::Quote;
pub use side::Side;
pub use trade::{Trade, TradeId};
