use perpamm_funding::FundingState;
use perpamm_math::{
    add_delta, compute_swap_step,
    constants::{
        BPS_DENOMINATOR, MAX_SQRT_PRICE_X64, MAX_SWAP_ITERATIONS, MIN_SQRT_PRICE_X64, Q128,
    },
    get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, mul_div_u256, price_x128_from_sqrt_x64,
    PerpError, U256,
};
use perpamm_tick::{cross_tick, find_next_initialized_tick, TickInfo, TickStore};

use crate::types::{SwapOutcome, SwapParams};

// ============================================================
// SWAP STATE
// ============================================================

/// Curve state passed from the contract
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapState {
    pub sqrt_price_x64: u128,
    pub current_tick: i32,
    pub liquidity: u128,
    pub tick_spacing: i32,
    pub fee_growth_global_x128: U256,
}

// ============================================================
// PUBLIC SWAP FUNCTIONS
// ============================================================

/// Execute a trade, keeping the funding accumulator in step with the curve
///
/// Each curve step first advances funding at the step's starting price and
/// records the step's token flow against the step's liquidity, then accrues
/// fees, then crosses the tick the step ended on. Elapsed time is only
/// non-zero for the first step. A last advance at the final price leaves the
/// cached rate reflecting where the trade left the curve.
///
/// Nothing is written unless the trade fills completely: the walk is first
/// run against a read-only view of `store`, and tick crossings are only
/// written on a second walk once the fill is known to succeed.
/// `emit_cross` is called with `(tick, sqrt_price_x64)` for every crossing.
pub fn engine_swap<S, F>(
    state: &mut SwapState,
    funding: &mut FundingState,
    store: &mut S,
    params: &SwapParams,
    emit_cross: F,
) -> Result<SwapOutcome, PerpError>
where
    S: TickStore,
    F: FnMut(i32, u128),
{
    if params.amount == 0 {
        return Err(PerpError::InvalidAmount);
    }

    let (mut curve, mut acc, mut outcome) =
        walk(state, funding, &mut ReadOnlyTicks(&*store), params, |_, _| {})?;

    if outcome.ticks_crossed > 0 {
        (curve, acc, outcome) = walk(state, funding, store, params, emit_cross)?;
    }

    *state = curve;
    *funding = acc;

    Ok(outcome)
}

// ============================================================
// CURVE WALK
// ============================================================

/// Tick view that drops writes
struct ReadOnlyTicks<'a, S: TickStore>(&'a S);

impl<S: TickStore> TickStore for ReadOnlyTicks<'_, S> {
    fn read_tick(&self, tick: i32) -> TickInfo {
        self.0.read_tick(tick)
    }

    fn write_tick(&mut self, _tick: i32, _info: &TickInfo) {}

    fn clear_tick(&mut self, _tick: i32) {}
}

/// Walk the curve for `params`, returning the filled curve and accumulator.
/// Only `store` is written to. A crossed tick is never read again in the
/// same walk, so a walk over `ReadOnlyTicks` gives the same result.
fn walk<S, F>(
    state: &SwapState,
    funding: &FundingState,
    store: &mut S,
    params: &SwapParams,
    mut emit_cross: F,
) -> Result<(SwapState, FundingState, SwapOutcome), PerpError>
where
    S: TickStore,
    F: FnMut(i32, u128),
{
    // buying tokens pushes the price up
    let zero_for_one = params.amount < 0;
    let sqrt_limit = resolve_price_limit(state.sqrt_price_x64, params.sqrt_price_limit_x64, zero_for_one)?;

    let mut curve = *state;
    let mut acc = *funding;
    let mut outcome = SwapOutcome::default();

    // compute_swap_step convention: > 0 exact input, < 0 exact output
    let mut amount_remaining = params.amount.checked_neg().ok_or(PerpError::InvalidAmount)?;
    let mut iterations = 0;

    while amount_remaining != 0 && curve.sqrt_price_x64 != sqrt_limit {
        iterations += 1;
        if iterations > MAX_SWAP_ITERATIONS {
            return Err(PerpError::SwapIncomplete);
        }

        let (next_tick, initialized) =
            find_next_initialized_tick(store, curve.current_tick, curve.tick_spacing, zero_for_one)?;
        let sqrt_price_next_tick = get_sqrt_ratio_at_tick(next_tick)?;

        let sqrt_target = if zero_for_one {
            sqrt_price_next_tick.max(sqrt_limit)
        } else {
            sqrt_price_next_tick.min(sqrt_limit)
        };

        let step = compute_swap_step(curve.sqrt_price_x64, sqrt_target, curve.liquidity, amount_remaining)?;

        let (token_flow, quote_flow) = if zero_for_one {
            (neg(step.amount_in)?, to_i128(step.amount_out)?)
        } else {
            (to_i128(step.amount_out)?, neg(step.amount_in)?)
        };

        {
            let mut advanced = acc.advance(
                params.now,
                params.index_price_x128,
                price_x128_from_sqrt_x64(curve.sqrt_price_x64),
            )?;
            if token_flow != 0 && curve.liquidity > 0 {
                advanced.apply_position_delta(token_flow, curve.liquidity)?;
            }
        }

        amount_remaining = if zero_for_one {
            amount_remaining - to_i128(step.amount_in)?
        } else {
            amount_remaining + to_i128(step.amount_out)?
        };

        let step_fee = fee_on(quote_flow.unsigned_abs(), params.fee_bps)?;
        if step_fee > 0 && curve.liquidity > 0 {
            let growth = mul_div_u256(U256::from(step_fee), Q128, U256::from(curve.liquidity), false)?;
            curve.fee_growth_global_x128 = curve.fee_growth_global_x128.wrapping_add(growth);
        }

        outcome.token_delta = outcome
            .token_delta
            .checked_add(token_flow)
            .ok_or(PerpError::ArithmeticOverflow)?;
        outcome.quote_delta = outcome
            .quote_delta
            .checked_add(quote_flow)
            .ok_or(PerpError::ArithmeticOverflow)?;
        outcome.fee_paid = outcome
            .fee_paid
            .checked_add(to_i128(step_fee)?)
            .ok_or(PerpError::ArithmeticOverflow)?;

        if step.sqrt_price_next == sqrt_price_next_tick {
            if initialized {
                let liquidity_net = cross_tick(
                    store,
                    next_tick,
                    &acc,
                    curve.fee_growth_global_x128,
                    params.now,
                    price_x128_from_sqrt_x64(sqrt_price_next_tick),
                    acc.funding_rate_x128,
                )?;
                emit_cross(next_tick, sqrt_price_next_tick);
                outcome.ticks_crossed += 1;

                let delta = if zero_for_one {
                    liquidity_net.checked_neg().ok_or(PerpError::ArithmeticOverflow)?
                } else {
                    liquidity_net
                };
                curve.liquidity = add_delta(curve.liquidity, delta)?;
            }
            curve.current_tick = if zero_for_one { next_tick - 1 } else { next_tick };
        } else if step.sqrt_price_next != curve.sqrt_price_x64 {
            curve.current_tick = get_tick_at_sqrt_ratio(step.sqrt_price_next)?;
        }
        curve.sqrt_price_x64 = step.sqrt_price_next;
    }

    if amount_remaining != 0 {
        return Err(PerpError::SwapIncomplete);
    }

    acc.advance(
        params.now,
        params.index_price_x128,
        price_x128_from_sqrt_x64(curve.sqrt_price_x64),
    )?;

    Ok((curve, acc, outcome))
}

// ============================================================
// HELPER FUNCTIONS
// ============================================================

fn resolve_price_limit(current: u128, limit: u128, zero_for_one: bool) -> Result<u128, PerpError> {
    if zero_for_one {
        let limit = if limit == 0 { MIN_SQRT_PRICE_X64 } else { limit };
        if limit >= current || limit < MIN_SQRT_PRICE_X64 {
            return Err(PerpError::InvalidPriceLimit);
        }
        Ok(limit)
    } else {
        let limit = if limit == 0 { MAX_SQRT_PRICE_X64 } else { limit };
        if limit <= current || limit > MAX_SQRT_PRICE_X64 {
            return Err(PerpError::InvalidPriceLimit);
        }
        Ok(limit)
    }
}

/// Fee on a quote amount, rounded up
#[inline]
fn fee_on(quote: u128, fee_bps: u32) -> Result<u128, PerpError> {
    let fee = mul_div_u256(
        U256::from(quote),
        U256::from(fee_bps),
        U256::from(BPS_DENOMINATOR),
        true,
    )?;
    perpamm_math::to_u128(fee)
}

#[inline]
fn to_i128(amount: u128) -> Result<i128, PerpError> {
    i128::try_from(amount).map_err(|_| PerpError::ArithmeticOverflow)
}

#[inline]
fn neg(amount: u128) -> Result<i128, PerpError> {
    Ok(-to_i128(amount)?)
}
