// Funding rate and accumulator extrapolation
//
// All quantities are signed Q128. `a` is the funding payment per unit of
// token position, `sumA` its time integral.

use perpamm_math::{
    checked_add, checked_sub, mul_div, mul_div_floor, to_signed, PerpError, I256, Q128_SIGNED,
    SECONDS_PER_DAY, U256,
};

/// Funding rate per second, before weighting by the virtual price.
///
/// `(index - virtual) / index / DAY`, positive when the index is above the
/// virtual price.
pub fn funding_rate_x128(index_price_x128: U256, virtual_price_x128: U256) -> Result<I256, PerpError> {
    if index_price_x128 == U256::ZERO || virtual_price_x128 == U256::ZERO {
        return Err(PerpError::InvalidPrice);
    }

    let index = to_signed(index_price_x128)?;
    let virtual_price = to_signed(virtual_price_x128)?;

    let premium = checked_sub(index, virtual_price)?;
    let rate = mul_div(premium, Q128_SIGNED, index)?;
    Ok(rate / I256::from(SECONDS_PER_DAY as i128))
}

/// Funding accrued over `elapsed` seconds at `rate`, quoted at `virtual_price_x128`
pub fn next_a_x128(
    funding_rate_x128: I256,
    virtual_price_x128: U256,
    elapsed: u64,
) -> Result<I256, PerpError> {
    if elapsed == 0 {
        return Ok(I256::ZERO);
    }

    let a_per_second = mul_div(funding_rate_x128, to_signed(virtual_price_x128)?, Q128_SIGNED)?;
    a_per_second
        .checked_mul(I256::from(elapsed as i128))
        .ok_or(PerpError::ArithmeticOverflow)
}

/// `sum_a` carried forward by `elapsed` seconds without touching state
pub fn extrapolated_sum_a(
    sum_a_x128: I256,
    funding_rate_x128: I256,
    virtual_price_x128: U256,
    elapsed: u64,
) -> Result<I256, PerpError> {
    let delta = next_a_x128(funding_rate_x128, virtual_price_x128, elapsed)?;
    checked_add(sum_a_x128, delta)
}

/// A `sumFp` snapshot taken at `sum_a_last` carried forward to `sum_a_now`.
///
/// `sum_b_x128` must be the value that held over the whole interval; this is
/// the case for tick outside values and position checkpoints, which only
/// change at the points where they are re-snapshotted. Rounds toward -inf
/// like the global accumulator.
pub fn extrapolated_sum_fp(
    sum_fp_x128: I256,
    sum_b_x128: I256,
    sum_a_last_x128: I256,
    sum_a_now_x128: I256,
) -> Result<I256, PerpError> {
    let delta_a = checked_sub(sum_a_now_x128, sum_a_last_x128)?;
    if delta_a == I256::ZERO || sum_b_x128 == I256::ZERO {
        return Ok(sum_fp_x128);
    }
    let accrued = mul_div_floor(delta_a, sum_b_x128, Q128_SIGNED)?;
    checked_add(sum_fp_x128, accrued)
}
