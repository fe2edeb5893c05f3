//! Kestrel Liquidity Pool
//!
//! Constant product market maker (x * y = k), Uniswap V2 style.
//! Supports:
//! - One-shot initialization with a permanently burned minimum liquidity
//! - Read-only swap simulation and slippage-guarded execution
//! - Ratio-preserving liquidity addition and pro-rata removal
//! - Inverse quoting (input needed for a desired output)
//!
//! Fees stay in the pool, so `k` grows with every fee-bearing swap.
//! The pool is independent of the spread model and inventory ledger.

pub mod error;
pub mod pool;
pub mod types;

// Re-export main types
pub use error::{PoolError, Result};
pub use pool::{LiquidityPool, MINIMUM_LIQUIDITY};
pub use types::{
    AddLiquidityResult, LiquidityPosition, PoolState, RemoveLiquidityResult, SwapResult, Token,
};
