// Q128 conversions between curve prices and funding quantities

use ethnum::{I256, U256};

use crate::constants::Q128;
use crate::error::PerpError;
use crate::full_math::{mul_div_u256, to_signed, to_u128};

/// Widen a Q64.64 value to Q128
#[inline]
pub fn x64_to_x128(value_x64: u128) -> U256 {
    U256::from(value_x64) << 64u32
}

/// Price (token1 per token0) as Q128 from a Q64.64 sqrt price.
/// Exact: `sqrt^2` of a Q64.64 value is already scaled by 2^128.
#[inline]
pub fn price_x128_from_sqrt_x64(sqrt_price_x64: u128) -> U256 {
    U256::from(sqrt_price_x64) * U256::from(sqrt_price_x64)
}

/// `amount * Q128 / liquidity` as a signed Q128 value, truncating toward zero
pub fn per_liquidity_x128(amount: i128, liquidity: u128) -> Result<I256, PerpError> {
    if liquidity == 0 {
        return Err(PerpError::ZeroLiquidity);
    }
    let magnitude = mul_div_u256(U256::from(amount.unsigned_abs()), Q128, U256::from(liquidity), false)?;
    let value = to_signed(magnitude)?;
    Ok(if amount < 0 { -value } else { value })
}

/// `value_x128 * liquidity / Q128` for unsigned accumulators (fees)
pub fn amount_from_growth(growth_x128: U256, liquidity: u128) -> Result<u128, PerpError> {
    let amount = mul_div_u256(growth_x128, U256::from(liquidity), Q128, false)?;
    to_u128(amount)
}
