// Tick Update and Crossing Logic

use perpamm_funding::{extrapolated_sum_a, extrapolated_sum_fp, FundingState};
use perpamm_math::{
    checked_sub,
    constants::{MAX_LIQUIDITY_PER_TICK, MAX_TICK, MAX_TICK_SEARCH_STEPS, MIN_TICK},
    snap_tick_to_spacing, PerpError, I256, U256,
};

use crate::types::{TickCheckpoint, TickStore};

/// Update a tick when liquidity is added or removed
///
/// `global` must already be advanced to the current timestamp. Returns true
/// when the tick flipped between initialized and uninitialized. A tick whose
/// gross liquidity returns to zero is cleared entirely, so positions on it
/// must be settled first.
pub fn update_tick<S: TickStore>(
    store: &mut S,
    tick: i32,
    current_tick: i32,
    liquidity_delta: i128,
    global: &FundingState,
    fee_growth_global_x128: U256,
    upper: bool,
) -> Result<bool, PerpError> {
    let mut info = store.read_tick(tick);

    let liquidity_gross_before = info.liquidity_gross;
    let liquidity_gross_after = if liquidity_delta >= 0 {
        liquidity_gross_before
            .checked_add(liquidity_delta as u128)
            .ok_or(PerpError::LiquidityOverflow)?
    } else {
        liquidity_gross_before
            .checked_sub(liquidity_delta.unsigned_abs())
            .ok_or(PerpError::InsufficientLiquidity)?
    };

    if liquidity_gross_after > MAX_LIQUIDITY_PER_TICK {
        return Err(PerpError::LiquidityOverflow);
    }

    let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

    if liquidity_gross_after == 0 {
        store.clear_tick(tick);
        return Ok(flipped);
    }

    if liquidity_gross_before == 0 {
        // everything so far is taken to have happened below the tick
        info.checkpoint = if tick <= current_tick {
            TickCheckpoint {
                sum_a_last_x128: global.sum_a_x128,
                sum_b_outside_x128: global.sum_b_x128,
                sum_fp_outside_x128: global.sum_fp_x128,
                fee_outside_x128: fee_growth_global_x128,
            }
        } else {
            TickCheckpoint {
                sum_a_last_x128: global.sum_a_x128,
                ..TickCheckpoint::default()
            }
        };
    }

    info.liquidity_gross = liquidity_gross_after;
    info.liquidity_net = if upper {
        info.liquidity_net.checked_sub(liquidity_delta)
    } else {
        info.liquidity_net.checked_add(liquidity_delta)
    }
    .ok_or(PerpError::ArithmeticOverflow)?;

    store.write_tick(tick, &info);

    Ok(flipped)
}

/// Cross a tick boundary during a swap
///
/// Flips the tick's outside values against the global accumulator carried
/// forward to `now` at `funding_rate_x128` and the crossing price. Returns
/// the tick's net liquidity.
pub fn cross_tick<S: TickStore>(
    store: &mut S,
    tick: i32,
    global: &FundingState,
    fee_growth_global_x128: U256,
    now: u64,
    price_x128: U256,
    funding_rate_x128: I256,
) -> Result<i128, PerpError> {
    let elapsed = now
        .checked_sub(global.timestamp_last)
        .ok_or(PerpError::TimestampRegression)?;

    let sum_a_now = extrapolated_sum_a(global.sum_a_x128, funding_rate_x128, price_x128, elapsed)?;
    let global_fp_now = extrapolated_sum_fp(
        global.sum_fp_x128,
        global.sum_b_x128,
        global.sum_a_x128,
        sum_a_now,
    )?;

    let mut info = store.read_tick(tick);
    let cp = info.checkpoint;

    let tick_fp_now = extrapolated_sum_fp(
        cp.sum_fp_outside_x128,
        cp.sum_b_outside_x128,
        cp.sum_a_last_x128,
        sum_a_now,
    )?;

    info.checkpoint = TickCheckpoint {
        sum_a_last_x128: sum_a_now,
        sum_b_outside_x128: checked_sub(global.sum_b_x128, cp.sum_b_outside_x128)?,
        sum_fp_outside_x128: checked_sub(global_fp_now, tick_fp_now)?,
        fee_outside_x128: fee_growth_global_x128.wrapping_sub(cp.fee_outside_x128),
    };

    store.write_tick(tick, &info);

    Ok(info.liquidity_net)
}

/// Find the next initialized tick in the given direction
///
/// Searching down includes the current tick's own boundary, searching up
/// starts one spacing above it. When nothing is found within
/// `MAX_TICK_SEARCH_STEPS`, the last tick visited (clamped to the tick
/// range) is returned with `false`.
pub fn find_next_initialized_tick<S: TickStore>(
    store: &S,
    current_tick: i32,
    tick_spacing: i32,
    zero_for_one: bool,
) -> Result<(i32, bool), PerpError> {
    let compressed = snap_tick_to_spacing(current_tick, tick_spacing)?;

    let (mut tick, step) = if zero_for_one {
        (compressed, -tick_spacing)
    } else {
        (compressed.saturating_add(tick_spacing), tick_spacing)
    };

    for _ in 0..MAX_TICK_SEARCH_STEPS {
        if tick < MIN_TICK {
            return Ok((MIN_TICK, false));
        }
        if tick > MAX_TICK {
            return Ok((MAX_TICK, false));
        }

        if store.read_tick(tick).is_initialized() {
            return Ok((tick, true));
        }

        tick = tick.saturating_add(step);
    }

    Ok((tick.clamp(MIN_TICK, MAX_TICK), false))
}

/// Check if a tick is within valid range
#[inline]
pub fn is_valid_tick(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Validate a position range against the tick range and spacing
pub fn validate_tick_range(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Result<(), PerpError> {
    if tick_lower >= tick_upper {
        return Err(PerpError::IllegalTicks);
    }
    if !is_valid_tick(tick_lower) || !is_valid_tick(tick_upper) {
        return Err(PerpError::TickOutOfRange);
    }
    if tick_spacing <= 0 {
        return Err(PerpError::InvalidTickSpacing);
    }
    if tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
        return Err(PerpError::TickOutOfRange);
    }
    Ok(())
}
