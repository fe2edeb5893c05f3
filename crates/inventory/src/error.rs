//! Inventory ledger errors

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_inventory ({min}) must be below max_inventory ({max})")]
    InventoryBounds { min: Decimal, max: Decimal },

    #[error("target_inventory ({target}) must lie within [{min}, {max}]")]
    TargetOutOfBounds {
        target: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Position {current} cannot be re-clamped into [{min}, {max}] without changing sign")]
    PositionOutsideLimits {
        current: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
