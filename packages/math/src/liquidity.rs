// Liquidity calculations (Q64.64 sqrt prices, u128 amounts)

use ethnum::U256;

use crate::constants::Q64;
use crate::error::PerpError;
use crate::full_math::{mul_div_u256, to_u128};

/// Apply a signed liquidity delta
#[inline]
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128, PerpError> {
    if delta >= 0 {
        liquidity
            .checked_add(delta as u128)
            .ok_or(PerpError::ArithmeticOverflow)
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(PerpError::InsufficientLiquidity)
    }
}

#[inline]
fn ordered(a: u128, b: u128) -> (u128, u128) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Token0 amount between two sqrt prices for a liquidity
/// Formula: L * (sqrt_upper - sqrt_lower) / (sqrt_upper * sqrt_lower)
pub fn get_amount_0_delta(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, PerpError> {
    let (sqrt_lower, sqrt_upper) = ordered(sqrt_price_a, sqrt_price_b);

    if sqrt_lower == 0 {
        return Err(PerpError::InvalidPrice);
    }

    let numerator_1 = U256::from(liquidity) << 64u32;
    let numerator_2 = U256::from(sqrt_upper - sqrt_lower);

    let scaled = mul_div_u256(numerator_1, numerator_2, U256::from(sqrt_upper), round_up)?;
    let lower = U256::from(sqrt_lower);

    let amount = if round_up {
        let quotient = scaled / lower;
        if scaled % lower != U256::ZERO {
            quotient + U256::ONE
        } else {
            quotient
        }
    } else {
        scaled / lower
    };

    to_u128(amount)
}

/// Token1 amount between two sqrt prices for a liquidity
/// Formula: L * (sqrt_upper - sqrt_lower)
pub fn get_amount_1_delta(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, PerpError> {
    let (sqrt_lower, sqrt_upper) = ordered(sqrt_price_a, sqrt_price_b);

    let amount = mul_div_u256(
        U256::from(liquidity),
        U256::from(sqrt_upper - sqrt_lower),
        U256::from(Q64),
        round_up,
    )?;

    to_u128(amount)
}

/// Virtual token amounts backing `liquidity` over a range at the current price.
/// Round up when the amounts are owed to the pool (mint).
pub fn get_amounts_for_liquidity(
    liquidity: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    sqrt_price_current: u128,
    round_up: bool,
) -> Result<(u128, u128), PerpError> {
    if sqrt_price_current <= sqrt_price_lower {
        let amount0 = get_amount_0_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((amount0, 0))
    } else if sqrt_price_current < sqrt_price_upper {
        let amount0 = get_amount_0_delta(sqrt_price_current, sqrt_price_upper, liquidity, round_up)?;
        let amount1 = get_amount_1_delta(sqrt_price_lower, sqrt_price_current, liquidity, round_up)?;
        Ok((amount0, amount1))
    } else {
        let amount1 = get_amount_1_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((0, amount1))
    }
}
