//! Liquidity pool errors
//!
//! All of these are caused by caller-supplied inputs; retrying with the same
//! inputs reproduces the same failure.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool is already initialized")]
    AlreadyInitialized,

    #[error("Amounts must be positive and keep the reserves within Decimal range")]
    InvalidAmount,

    #[error("Initial liquidity {liquidity} does not exceed the minimum of {minimum}")]
    InitialLiquidityTooLow { liquidity: Decimal, minimum: Decimal },

    #[error("Slippage exceeded: expected at least {expected}, got {actual}")]
    SlippageExceeded { expected: Decimal, actual: Decimal },

    #[error("Invalid LP token amount {requested} (outstanding supply {supply})")]
    InvalidLpAmount { requested: Decimal, supply: Decimal },

    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    #[error("Fee {0} outside [0, 1)")]
    InvalidFee(Decimal),
}

pub type Result<T> = std::result::Result<T, PoolError>;
