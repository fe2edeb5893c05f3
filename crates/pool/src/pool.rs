use std::sync::Arc;

use kestrel_core::Timestamp;
use kestrel_ports::Clock;
use log::{debug, info};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::{PoolError, Result};
use crate::types::{
    AddLiquidityResult, LiquidityPosition, PoolState, RemoveLiquidityResult, SwapResult, Token,
};

/// LP tokens burned forever on initialization
pub const MINIMUM_LIQUIDITY: Decimal = dec!(1000);

/// Constant product pool between token A (base) and token B (quote)
///
/// Reserves are always kept so that `reserve_a * reserve_b` and both price
/// ratios fit in a `Decimal`; inputs that would break this fail with
/// [`PoolError::InvalidAmount`] and leave the pool unchanged.
pub struct LiquidityPool {
    reserve_a: Decimal,
    reserve_b: Decimal,
    lp_token_supply: Decimal,
    /// Swap fee as a fraction, taken from the input amount
    fee: Decimal,
    last_update: Timestamp,
    /// Fees retained in each reserve since creation
    fees_collected_a: Decimal,
    fees_collected_b: Decimal,
    swap_count: u64,
    clock: Arc<dyn Clock>,
}

impl LiquidityPool {
    /// Create an empty pool
    pub fn new(fee: Decimal, clock: Arc<dyn Clock>) -> Result<Self> {
        validate_fee(fee)?;
        Ok(Self {
            reserve_a: Decimal::ZERO,
            reserve_b: Decimal::ZERO,
            lp_token_supply: Decimal::ZERO,
            fee,
            last_update: clock.now(),
            fees_collected_a: Decimal::ZERO,
            fees_collected_b: Decimal::ZERO,
            swap_count: 0,
            clock,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.lp_token_supply > Decimal::ZERO
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    pub fn set_fee(&mut self, fee: Decimal) -> Result<()> {
        validate_fee(fee)?;
        self.fee = fee;
        Ok(())
    }

    pub fn swap_count(&self) -> u64 {
        self.swap_count
    }

    /// Fees retained by the pool as (token A, token B)
    pub fn fees_collected(&self) -> (Decimal, Decimal) {
        (self.fees_collected_a, self.fees_collected_b)
    }

    /// Seed the pool. Returns the LP tokens minted to the depositor.
    ///
    /// `sqrt(a * b)` must exceed [`MINIMUM_LIQUIDITY`], which is burned.
    pub fn initialize(&mut self, amount_a: Decimal, amount_b: Decimal) -> Result<Decimal> {
        if self.is_initialized() {
            return Err(PoolError::AlreadyInitialized);
        }
        if amount_a <= Decimal::ZERO || amount_b <= Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }

        let product = representable_product(amount_a, amount_b)?;
        let liquidity = product.sqrt().unwrap_or(Decimal::ZERO);
        if liquidity <= MINIMUM_LIQUIDITY {
            return Err(PoolError::InitialLiquidityTooLow {
                liquidity,
                minimum: MINIMUM_LIQUIDITY,
            });
        }

        self.reserve_a = amount_a;
        self.reserve_b = amount_b;
        self.lp_token_supply = liquidity - MINIMUM_LIQUIDITY;
        self.touch();

        info!(
            "Pool initialized: reserves {} / {}, {} LP tokens minted",
            amount_a, amount_b, self.lp_token_supply
        );
        Ok(self.lp_token_supply)
    }

    /// Quote a swap without touching the reserves
    pub fn simulate_swap(&self, amount_in: Decimal, token_in: Token) -> Result<SwapResult> {
        if amount_in <= Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }
        if !self.is_initialized() {
            return Err(PoolError::InsufficientLiquidity);
        }

        let (reserve_in, reserve_out) = self.reserves_for(token_in);

        let fee_amount = amount_in.checked_mul(self.fee).ok_or(PoolError::InvalidAmount)?;
        let amount_in_after_fee = amount_in - fee_amount;

        // (x + dx) * (y - dy) = x * y  =>  dy = y * dx / (x + dx)
        let denominator = reserve_in
            .checked_add(amount_in_after_fee)
            .ok_or(PoolError::InvalidAmount)?;
        let amount_out = mul_div(reserve_out, amount_in_after_fee, denominator)?;
        if amount_out <= Decimal::ZERO {
            return Err(PoolError::InsufficientLiquidity);
        }

        // The whole input, fee included, stays in the pool
        let new_reserve_in = reserve_in.checked_add(amount_in).ok_or(PoolError::InvalidAmount)?;
        let new_reserve_out = reserve_out - amount_out;
        if new_reserve_out <= Decimal::ZERO {
            return Err(PoolError::InsufficientLiquidity);
        }

        let (new_reserve_a, new_reserve_b) = match token_in {
            Token::A => (new_reserve_in, new_reserve_out),
            Token::B => (new_reserve_out, new_reserve_in),
        };
        representable_product(new_reserve_a, new_reserve_b)?;

        let price_before = checked_div(reserve_out, reserve_in)?;
        let price_after = checked_div(new_reserve_out, new_reserve_in)?;
        let price_impact = checked_div(price_before - price_after, price_before)?;
        let effective_price = checked_div(amount_out, amount_in)?;

        Ok(SwapResult {
            token_in,
            amount_in,
            amount_out,
            fee_amount,
            amount_in_after_fee,
            new_reserve_a,
            new_reserve_b,
            price_impact,
            effective_price,
        })
    }

    /// Execute a swap, refusing to move the reserves if the output is below `min_amount_out`
    pub fn execute_swap(
        &mut self,
        amount_in: Decimal,
        token_in: Token,
        min_amount_out: Decimal,
    ) -> Result<SwapResult> {
        let result = self.simulate_swap(amount_in, token_in)?;

        if result.amount_out < min_amount_out {
            return Err(PoolError::SlippageExceeded {
                expected: min_amount_out,
                actual: result.amount_out,
            });
        }

        self.reserve_a = result.new_reserve_a;
        self.reserve_b = result.new_reserve_b;
        match token_in {
            Token::A => self.fees_collected_a += result.fee_amount,
            Token::B => self.fees_collected_b += result.fee_amount,
        }
        self.swap_count += 1;
        self.touch();

        debug!(
            "Swap {:?} in {} -> out {} (fee {}, impact {})",
            token_in, result.amount_in, result.amount_out, result.fee_amount, result.price_impact
        );
        Ok(result)
    }

    /// Output amount for a swap of `amount_in`
    pub fn get_amount_out(&self, amount_in: Decimal, token_in: Token) -> Result<Decimal> {
        Ok(self.simulate_swap(amount_in, token_in)?.amount_out)
    }

    /// Input of the opposite token needed to receive exactly `amount_out` of `token_out`
    pub fn get_amount_in(&self, amount_out: Decimal, token_out: Token) -> Result<Decimal> {
        if amount_out <= Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }
        if !self.is_initialized() {
            return Err(PoolError::InsufficientLiquidity);
        }

        let (reserve_in, reserve_out) = self.reserves_for(token_out.other());
        if amount_out >= reserve_out {
            return Err(PoolError::InsufficientLiquidity);
        }

        let before_fee = mul_div(reserve_in, amount_out, reserve_out - amount_out)?;
        checked_div(before_fee, Decimal::ONE - self.fee)
    }

    /// Deposit both tokens at the current ratio.
    ///
    /// Only the limiting side is used in full; the excess of the other token is
    /// not taken. An empty pool is initialized instead.
    pub fn add_liquidity(
        &mut self,
        amount_a: Decimal,
        amount_b: Decimal,
    ) -> Result<AddLiquidityResult> {
        if amount_a <= Decimal::ZERO || amount_b <= Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }

        if !self.is_initialized() {
            let lp_tokens = self.initialize(amount_a, amount_b)?;
            return Ok(AddLiquidityResult {
                lp_tokens,
                amount_a_used: amount_a,
                amount_b_used: amount_b,
                share_of_pool: Decimal::ONE,
            });
        }

        let optimal_b = mul_div(amount_a, self.reserve_b, self.reserve_a)?;
        let (amount_a_used, amount_b_used) = if optimal_b <= amount_b {
            (amount_a, optimal_b)
        } else {
            (mul_div(amount_b, self.reserve_a, self.reserve_b)?, amount_b)
        };

        let lp_tokens = mul_div(amount_a_used, self.lp_token_supply, self.reserve_a)?
            .min(mul_div(amount_b_used, self.lp_token_supply, self.reserve_b)?);
        if lp_tokens <= Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }

        let new_reserve_a = self
            .reserve_a
            .checked_add(amount_a_used)
            .ok_or(PoolError::InvalidAmount)?;
        let new_reserve_b = self
            .reserve_b
            .checked_add(amount_b_used)
            .ok_or(PoolError::InvalidAmount)?;
        representable_product(new_reserve_a, new_reserve_b)?;
        let new_supply = self
            .lp_token_supply
            .checked_add(lp_tokens)
            .ok_or(PoolError::InvalidAmount)?;

        self.reserve_a = new_reserve_a;
        self.reserve_b = new_reserve_b;
        self.lp_token_supply = new_supply;
        self.touch();

        let share_of_pool = checked_div(lp_tokens, new_supply)?;
        debug!(
            "Liquidity added: {} A, {} B for {} LP tokens",
            amount_a_used, amount_b_used, lp_tokens
        );

        Ok(AddLiquidityResult {
            lp_tokens,
            amount_a_used,
            amount_b_used,
            share_of_pool,
        })
    }

    /// Burn LP tokens for a pro-rata share of both reserves
    pub fn remove_liquidity(&mut self, lp_tokens: Decimal) -> Result<RemoveLiquidityResult> {
        self.check_lp_amount(lp_tokens)?;

        let (amount_a, amount_b) = if lp_tokens == self.lp_token_supply {
            // Last provider out empties the pool
            (self.reserve_a, self.reserve_b)
        } else {
            (
                mul_div(self.reserve_a, lp_tokens, self.lp_token_supply)?,
                mul_div(self.reserve_b, lp_tokens, self.lp_token_supply)?,
            )
        };

        self.reserve_a -= amount_a;
        self.reserve_b -= amount_b;
        self.lp_token_supply -= lp_tokens;
        self.touch();

        debug!(
            "Liquidity removed: {} LP tokens for {} A, {} B",
            lp_tokens, amount_a, amount_b
        );
        if !self.is_initialized() {
            info!("Pool drained");
        }

        Ok(RemoveLiquidityResult {
            lp_tokens_burned: lp_tokens,
            amount_a,
            amount_b,
        })
    }

    /// Price of token A in token B; zero for an empty pool
    pub fn get_price(&self) -> Decimal {
        if !self.is_initialized() {
            return Decimal::ZERO;
        }
        self.reserve_b
            .checked_div(self.reserve_a)
            .unwrap_or(Decimal::ZERO)
    }

    /// What `lp_tokens` would redeem for right now
    pub fn get_liquidity_position(&self, lp_tokens: Decimal) -> Result<LiquidityPosition> {
        self.check_lp_amount(lp_tokens)?;

        let share = checked_div(lp_tokens, self.lp_token_supply)?;
        let amount_a = mul_div(self.reserve_a, lp_tokens, self.lp_token_supply)?;
        let amount_b = mul_div(self.reserve_b, lp_tokens, self.lp_token_supply)?;
        let a_in_b = mul_div(amount_a, self.reserve_b, self.reserve_a)?;

        Ok(LiquidityPosition {
            lp_tokens,
            share,
            token_a_amount: amount_a,
            token_b_amount: amount_b,
            value_in_b: a_in_b.checked_add(amount_b).ok_or(PoolError::InvalidAmount)?,
        })
    }

    /// `reserve_a * reserve_b`; every mutation keeps this within range
    pub fn constant_product(&self) -> Decimal {
        self.reserve_a
            .checked_mul(self.reserve_b)
            .unwrap_or(Decimal::MAX)
    }

    pub fn state(&self) -> PoolState {
        PoolState {
            token_a_reserve: self.reserve_a,
            token_b_reserve: self.reserve_b,
            lp_token_supply: self.lp_token_supply,
            fee: self.fee,
            last_update: self.last_update,
        }
    }

    /// Impermanent loss of an LP versus holding, as a positive fraction
    ///
    /// `IL = |2 * sqrt(r) / (1 + r) - 1|` with `r = current / initial`.
    pub fn impermanent_loss(initial_price: Decimal, current_price: Decimal) -> Decimal {
        if initial_price <= Decimal::ZERO || current_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        // A ratio past the Decimal range puts the loss at 1 within precision
        let Some(ratio) = current_price.checked_div(initial_price) else {
            return Decimal::ONE;
        };
        let Some(denominator) = Decimal::ONE.checked_add(ratio) else {
            return Decimal::ONE;
        };
        let sqrt_ratio = ratio.sqrt().unwrap_or(Decimal::ZERO);
        (dec!(2) * sqrt_ratio / denominator - Decimal::ONE).abs()
    }

    fn reserves_for(&self, token_in: Token) -> (Decimal, Decimal) {
        match token_in {
            Token::A => (self.reserve_a, self.reserve_b),
            Token::B => (self.reserve_b, self.reserve_a),
        }
    }

    fn check_lp_amount(&self, lp_tokens: Decimal) -> Result<()> {
        if lp_tokens <= Decimal::ZERO || lp_tokens > self.lp_token_supply {
            return Err(PoolError::InvalidLpAmount {
                requested: lp_tokens,
                supply: self.lp_token_supply,
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.last_update = self.clock.now();
    }
}

impl std::fmt::Debug for LiquidityPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiquidityPool")
            .field("reserve_a", &self.reserve_a)
            .field("reserve_b", &self.reserve_b)
            .field("lp_token_supply", &self.lp_token_supply)
            .field("fee", &self.fee)
            .field("clock", &self.clock.name())
            .finish()
    }
}

fn validate_fee(fee: Decimal) -> Result<()> {
    if fee < Decimal::ZERO || fee >= Decimal::ONE {
        return Err(PoolError::InvalidFee(fee));
    }
    Ok(())
}

/// `a * b` for a reserve pair, requiring the product and both ratios to fit
fn representable_product(a: Decimal, b: Decimal) -> Result<Decimal> {
    match (a.checked_mul(b), b.checked_div(a), a.checked_div(b)) {
        (Some(product), Some(_), Some(_)) => Ok(product),
        _ => Err(PoolError::InvalidAmount),
    }
}

fn checked_div(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or(PoolError::InvalidAmount)
}

/// `a * b / c`, dividing first when the product would overflow
fn mul_div(a: Decimal, b: Decimal, c: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(c))
        .or_else(|| b.checked_div(c).and_then(|ratio| ratio.checked_mul(a)))
        .or_else(|| a.checked_div(c).and_then(|ratio| ratio.checked_mul(b)))
        .ok_or(PoolError::InvalidAmount)
}
