//! Spread model errors

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_spread ({min}) must not exceed max_spread ({max})")]
    SpreadBounds { min: Decimal, max: Decimal },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("tick_size must be positive, got {0}")]
    TickSize(Decimal),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
