use kestrel_core::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One of the two pool tokens. `A` is the base, `B` the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    A,
    B,
}

impl Token {
    /// The other side of the pair
    pub fn other(self) -> Self {
        match self {
            Token::A => Token::B,
            Token::B => Token::A,
        }
    }
}

/// Snapshot of the pool's accounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolState {
    pub token_a_reserve: Decimal,
    pub token_b_reserve: Decimal,
    /// LP tokens held by providers; excludes the burned minimum liquidity
    pub lp_token_supply: Decimal,
    pub fee: Decimal,
    pub last_update: Timestamp,
}

/// Outcome of a (simulated or executed) swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapResult {
    pub token_in: Token,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    /// Portion of `amount_in` kept by the pool as fee
    pub fee_amount: Decimal,
    pub amount_in_after_fee: Decimal,
    pub new_reserve_a: Decimal,
    pub new_reserve_b: Decimal,
    /// Relative drop in the marginal price of `token_in`, as a fraction
    pub price_impact: Decimal,
    /// `amount_out / amount_in`
    pub effective_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddLiquidityResult {
    pub lp_tokens: Decimal,
    pub amount_a_used: Decimal,
    pub amount_b_used: Decimal,
    /// Fraction of the post-deposit LP supply held by this deposit
    pub share_of_pool: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveLiquidityResult {
    pub lp_tokens_burned: Decimal,
    pub amount_a: Decimal,
    pub amount_b: Decimal,
}

/// Claim on the reserves represented by a quantity of LP tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    pub lp_tokens: Decimal,
    pub share: Decimal,
    pub token_a_amount: Decimal,
    pub token_b_amount: Decimal,
    /// Both legs valued in token B at the current pool price
    pub value_in_b: Decimal,
}
