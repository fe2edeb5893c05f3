//! Market maker errors

use kestrel_core::OrderStatus;
use kestrel_pool::PoolError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketMakerError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order {id} is not active (status {status:?})")]
    OrderNotActive { id: String, status: OrderStatus },

    #[error("Invalid fill: {0}")]
    InvalidFill(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<kestrel_spread::ConfigError> for MarketMakerError {
    fn from(err: kestrel_spread::ConfigError) -> Self {
        MarketMakerError::InvalidConfig(format!("spread: {}", err))
    }
}

impl From<kestrel_inventory::ConfigError> for MarketMakerError {
    fn from(err: kestrel_inventory::ConfigError) -> Self {
        MarketMakerError::InvalidConfig(format!("inventory: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, MarketMakerError>;
