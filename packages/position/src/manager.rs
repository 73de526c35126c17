// Liquidity Position Management Logic
//
// A range earns the funding paid on the net token position it takes on as
// traders move price through it, plus trading fees. The net position itself
// is handed to the owner's token position on every settlement, after which
// its funding accrues through the token ledger.

use perpamm_funding::extrapolated_sum_fp;
use perpamm_math::{
    amount_from_growth, checked_sub, mul_div, mul_div_floor, to_i128, PerpError, I256, Q128_SIGNED,
};
use perpamm_tick::ValuesInside;

use crate::types::{LiquidityPosition, SettlementResult};

/// Create an empty position checkpointed at the current inside values
pub fn create_empty_position(
    slot: &mut Option<LiquidityPosition>,
    tick_lower: i32,
    tick_upper: i32,
    values: &ValuesInside,
) -> Result<(), PerpError> {
    if tick_lower >= tick_upper {
        return Err(PerpError::IllegalTicks);
    }
    if slot.is_some() {
        return Err(PerpError::AlreadyInitialized);
    }

    let mut pos = LiquidityPosition::default();
    pos.checkpoint(values);
    *slot = Some(pos);
    Ok(())
}

/// Funding owed to the range since its checkpoint.
///
/// The part of `sumFp` explained by the position held at the checkpoint is
/// removed: that position already moved to the owner's token ledger.
pub fn unrealized_funding(pos: &LiquidityPosition, values: &ValuesInside) -> Result<i128, PerpError> {
    if pos.liquidity == 0 {
        return Ok(0);
    }

    let baseline = extrapolated_sum_fp(
        pos.sum_fp_inside_last_x128,
        pos.sum_b_inside_last_x128,
        pos.sum_a_last_x128,
        values.sum_a_x128,
    )?;
    let growth = checked_sub(values.sum_fp_inside_x128, baseline)?;

    to_i128(mul_div_floor(growth, I256::from(pos.liquidity), Q128_SIGNED)?)
}

/// Trading fees owed to the range since its checkpoint
pub fn unrealized_fee(pos: &LiquidityPosition, values: &ValuesInside) -> Result<u128, PerpError> {
    if pos.liquidity == 0 {
        return Ok(0);
    }
    let growth = values.fee_inside_x128.wrapping_sub(pos.fee_inside_last_x128);
    amount_from_growth(growth, pos.liquidity)
}

/// Token position the range took on since its checkpoint.
/// Traders buying from the range leave it short.
pub fn unrealized_net_position(pos: &LiquidityPosition, values: &ValuesInside) -> Result<i128, PerpError> {
    if pos.liquidity == 0 {
        return Ok(0);
    }
    let delta_b = checked_sub(values.sum_b_inside_x128, pos.sum_b_inside_last_x128)?;
    let traded = to_i128(mul_div(delta_b, I256::from(pos.liquidity), Q128_SIGNED)?)?;
    traded.checked_neg().ok_or(PerpError::ArithmeticOverflow)
}

/// Realize funding, fees and net position, then re-checkpoint
pub fn settle(pos: &mut LiquidityPosition, values: &ValuesInside) -> Result<SettlementResult, PerpError> {
    let fee = unrealized_fee(pos, values)?;
    let result = SettlementResult {
        funding: unrealized_funding(pos, values)?,
        fee: i128::try_from(fee).map_err(|_| PerpError::ArithmeticOverflow)?,
        net_position: unrealized_net_position(pos, values)?,
    };

    pos.checkpoint(values);

    Ok(result)
}

/// Settle, then change the position's liquidity
pub fn modify_position(
    pos: &mut LiquidityPosition,
    liquidity_delta: i128,
    values: &ValuesInside,
) -> Result<SettlementResult, PerpError> {
    let liquidity = if liquidity_delta >= 0 {
        pos.liquidity
            .checked_add(liquidity_delta as u128)
            .ok_or(PerpError::LiquidityOverflow)?
    } else {
        pos.liquidity
            .checked_sub(liquidity_delta.unsigned_abs())
            .ok_or(PerpError::InsufficientLiquidity)?
    };

    let result = settle(pos, values)?;
    pos.liquidity = liquidity;

    Ok(result)
}
