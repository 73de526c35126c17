// Sqrt price calculations (Q64.64)

use ethnum::U256;

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::error::PerpError;
use crate::full_math::{mul_div_u256, to_u128};
use crate::liquidity::{get_amount_0_delta, get_amount_1_delta};

/// 2^128 / sqrt(1.0001)^(2^i), floor
const TICK_RATIOS: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e2139,
    0xfff2e50f5f656932ef12357cf3c7fdcb,
    0xffe5caca7e10e4e61c3624eaa0941ccf,
    0xffcb9843d60f6159c9db58835c926643,
    0xff973b41fa98c081472e6896dfb254bf,
    0xff2ea16466c96a3843ec78b326b52860,
    0xfe5dee046a99a2a811c461f1969c3052,
    0xfcbe86c7900a88aedcffc83b479aa3a3,
    0xf987a7253ac413176f2b074cf7815e53,
    0xf3392b0822b70005940c7a398e4b70f2,
    0xe7159475a2c29b7443b29c7fa6e889d8,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e4,
    0x70d869a156d2a1b890bb3df62baf32f6,
    0x31be135f97d08fd981231505542fcfa5,
    0x09aa508b5b7a84e1c677de54f3e99bc8,
    0x005d6af8dedb81196699c329225ee604,
    0x00002216e584f5fa1ea926041bedfe97,
];

/// Convert tick to sqrt price in Q64.64 format
/// Formula: sqrt(1.0001^tick) * 2^64, rounded up
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<u128, PerpError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(PerpError::TickOutOfRange);
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(TICK_RATIOS[0])
    } else {
        U256::from_words(1, 0)
    };

    for (bit, factor) in TICK_RATIOS.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128u32;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let (hi, lo) = ratio.into_words();
    let rounded = (hi << 64) | (lo >> 64);
    Ok(if lo & (u64::MAX as u128) != 0 { rounded + 1 } else { rounded })
}

/// Greatest tick whose sqrt ratio is <= `sqrt_price_x64`
pub fn get_tick_at_sqrt_ratio(sqrt_price_x64: u128) -> Result<i32, PerpError> {
    if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64) {
        return Err(PerpError::PriceOutOfBounds);
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_ratio_at_tick(mid)? <= sqrt_price_x64 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

/// Next sqrt price after adding (or removing) token0, rounded up
pub fn get_next_sqrt_price_from_amount_0(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128, PerpError> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let numerator = U256::from(liquidity) << 64u32;
    let product = U256::from(amount) * U256::from(sqrt_price);

    let next = if add {
        match numerator.checked_add(product) {
            Some(denominator) => mul_div_u256(numerator, U256::from(sqrt_price), denominator, true)?,
            None => {
                let denominator = numerator / U256::from(sqrt_price) + U256::from(amount);
                let quotient = numerator / denominator;
                if numerator % denominator != U256::ZERO {
                    quotient + U256::ONE
                } else {
                    quotient
                }
            }
        }
    } else {
        if numerator <= product {
            return Err(PerpError::PriceOutOfBounds);
        }
        mul_div_u256(numerator, U256::from(sqrt_price), numerator - product, true)?
    };

    to_u128(next)
}

/// Next sqrt price after adding (or removing) token1, rounded down
pub fn get_next_sqrt_price_from_amount_1(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128, PerpError> {
    let scaled = U256::from(amount) << 64u32;
    let liquidity = U256::from(liquidity);

    if add {
        let quotient = scaled / liquidity;
        to_u128(U256::from(sqrt_price) + quotient)
    } else {
        let mut quotient = scaled / liquidity;
        if scaled % liquidity != U256::ZERO {
            quotient += U256::ONE;
        }
        let current = U256::from(sqrt_price);
        if current <= quotient {
            return Err(PerpError::PriceOutOfBounds);
        }
        to_u128(current - quotient)
    }
}

/// Calculate next sqrt price given input amount
pub fn get_next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u128,
    zero_for_one: bool,
) -> Result<u128, PerpError> {
    if sqrt_price == 0 {
        return Err(PerpError::InvalidPrice);
    }
    if liquidity == 0 {
        return Err(PerpError::NoLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount_0(sqrt_price, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_1(sqrt_price, liquidity, amount_in, true)
    }
}

/// Calculate next sqrt price given output amount
pub fn get_next_sqrt_price_from_output(
    sqrt_price: u128,
    liquidity: u128,
    amount_out: u128,
    zero_for_one: bool,
) -> Result<u128, PerpError> {
    if sqrt_price == 0 {
        return Err(PerpError::InvalidPrice);
    }
    if liquidity == 0 {
        return Err(PerpError::NoLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount_1(sqrt_price, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_0(sqrt_price, liquidity, amount_out, false)
    }
}

/// Result of a single swap step toward a target price
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next: u128,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Compute swap step with a target price
///
/// `amount_remaining > 0` is an exact input, `< 0` an exact output.
/// Direction follows from the target: a lower target sells token0.
pub fn compute_swap_step(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_remaining: i128,
) -> Result<SwapStep, PerpError> {
    let zero_for_one = sqrt_price_current >= sqrt_price_target;
    let exact_in = amount_remaining >= 0;
    let remaining = amount_remaining.unsigned_abs();

    if liquidity == 0 {
        return Ok(SwapStep {
            sqrt_price_next: sqrt_price_target,
            amount_in: 0,
            amount_out: 0,
        });
    }

    let mut amount_in = 0;
    let mut amount_out = 0;

    let sqrt_price_next = if exact_in {
        amount_in = if zero_for_one {
            get_amount_0_delta(sqrt_price_target, sqrt_price_current, liquidity, true)?
        } else {
            get_amount_1_delta(sqrt_price_current, sqrt_price_target, liquidity, true)?
        };
        if remaining >= amount_in {
            sqrt_price_target
        } else {
            get_next_sqrt_price_from_input(sqrt_price_current, liquidity, remaining, zero_for_one)?
        }
    } else {
        amount_out = if zero_for_one {
            get_amount_1_delta(sqrt_price_target, sqrt_price_current, liquidity, false)?
        } else {
            get_amount_0_delta(sqrt_price_current, sqrt_price_target, liquidity, false)?
        };
        if remaining >= amount_out {
            sqrt_price_target
        } else {
            get_next_sqrt_price_from_output(sqrt_price_current, liquidity, remaining, zero_for_one)?
        }
    };

    let reached = sqrt_price_next == sqrt_price_target;

    if zero_for_one {
        if !(reached && exact_in) {
            amount_in = get_amount_0_delta(sqrt_price_next, sqrt_price_current, liquidity, true)?;
        }
        if !(reached && !exact_in) {
            amount_out = get_amount_1_delta(sqrt_price_next, sqrt_price_current, liquidity, false)?;
        }
    } else {
        if !(reached && exact_in) {
            amount_in = get_amount_1_delta(sqrt_price_current, sqrt_price_next, liquidity, true)?;
        }
        if !(reached && !exact_in) {
            amount_out = get_amount_0_delta(sqrt_price_current, sqrt_price_next, liquidity, false)?;
        }
    }

    if !exact_in && amount_out > remaining {
        amount_out = remaining;
    }
    // a partial exact-input step consumes the whole remainder, rounding dust included
    if exact_in && !reached {
        amount_in = remaining;
    }

    Ok(SwapStep {
        sqrt_price_next,
        amount_in,
        amount_out,
    })
}
