#![no_std]

use soroban_sdk::{contract, contractimpl, log, Address, Env};

// External packages
use perpamm_funding::FundingState;
use perpamm_math::{
    add_delta, get_amounts_for_liquidity, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio,
    price_x128_from_sqrt_x64, x64_to_x128,
    constants::{MAX_FEE_BPS, MAX_TICK_SPACING},
    I256,
};
use perpamm_position::{
    create_empty_position, modify_position, settle, unrealized_fee, unrealized_funding,
    unrealized_net_position, TokenPosition,
};
use perpamm_swap::{engine_swap, SwapOutcome, SwapParams, SwapState};
use perpamm_tick::{update_tick, validate_tick_range, ValuesInside};

// Local modules
mod error;
mod events;
mod storage;
pub mod types;

pub use error::PerpError;
use events::*;
use storage::*;
use types::{
    u256_from_host, u256_to_host, FundingRecord, PoolConfig, PoolState, PositionRecord,
    PositionStatus, SettlementResult, SwapResult, TickRecord, TokenPositionRecord,
    ValuesInsideView,
};

#[contract]
pub struct PerpPool;

#[contractimpl]
impl PerpPool {
    // ========================================================
    // INITIALIZATION
    // ========================================================

    /// Initialize the pool
    ///
    /// # Arguments
    /// * `admin` - May replace the keeper and the liquidator
    /// * `keeper` - Pushes index prices through `poke_funding_state`
    /// * `liquidator` - Closes token positions through `liquidate`
    /// * `sqrt_price_x64` - Initial sqrt price; the tick is derived from it
    /// * `tick_spacing` - Spacing of usable ticks
    /// * `fee_bps` - Trading fee, charged in quote
    /// * `index_price_x64` - Initial index price (Q64.64)
    pub fn initialize(
        env: Env,
        admin: Address,
        keeper: Address,
        liquidator: Address,
        sqrt_price_x64: u128,
        tick_spacing: i32,
        fee_bps: u32,
        index_price_x64: u128,
    ) -> Result<(), PerpError> {
        admin.require_auth();

        if is_initialized(&env) {
            return Err(PerpError::PoolAlreadyInitialized);
        }
        if fee_bps > MAX_FEE_BPS {
            return Err(PerpError::InvalidFee);
        }
        if tick_spacing <= 0 || tick_spacing > MAX_TICK_SPACING {
            return Err(PerpError::InvalidTickSpacing);
        }
        if index_price_x64 == 0 {
            return Err(PerpError::InvalidPrice);
        }

        let current_tick = get_tick_at_sqrt_ratio(sqrt_price_x64)?;

        // cache the opening rate
        let now = env.ledger().timestamp();
        let mut funding = FundingState::new(now);
        funding.advance(
            now,
            x64_to_x128(index_price_x64),
            price_x128_from_sqrt_x64(sqrt_price_x64),
        )?;

        let config = PoolConfig {
            admin: admin.clone(),
            keeper,
            liquidator,
            tick_spacing,
            fee_bps,
        };
        let state = PoolState {
            sqrt_price_x64,
            current_tick,
            liquidity: 0,
            fee_growth_global_x128: u256_to_host(&env, ethnum::U256::ZERO),
            index_price_x64,
        };

        write_pool_config(&env, &config);
        write_pool_state(&env, &state);
        write_funding(&env, &funding);
        set_initialized(&env);

        emit_initialized(&env, &admin, sqrt_price_x64, current_tick, tick_spacing, fee_bps);
        Ok(())
    }

    // ========================================================
    // KEEPER
    // ========================================================

    /// Accrue funding up to the ledger time and store a new index price
    pub fn poke_funding_state(env: Env, keeper: Address, index_price_x64: u128) -> Result<(), PerpError> {
        keeper.require_auth();

        let config = read_pool_config(&env)?;
        if keeper != config.keeper {
            return Err(PerpError::Unauthorized);
        }
        if index_price_x64 == 0 {
            return Err(PerpError::InvalidPrice);
        }

        let mut state = read_pool_state(&env)?;
        state.index_price_x64 = index_price_x64;
        let funding = advance_funding(&env, &state)?;

        write_pool_state(&env, &state);
        write_funding(&env, &funding);

        emit_funding_poked(&env, index_price_x64, &FundingRecord::from_state(&env, &funding));
        Ok(())
    }

    // ========================================================
    // LIQUIDITY
    // ========================================================

    /// Add liquidity to a range
    ///
    /// Settles the range first. Returns the virtual token and quote amounts
    /// backing the added liquidity, rounded up.
    pub fn mint(
        env: Env,
        owner: Address,
        lower_tick: i32,
        upper_tick: i32,
        liquidity: u128,
    ) -> Result<(i128, i128), PerpError> {
        owner.require_auth();

        let config = read_pool_config(&env)?;
        validate_tick_range(lower_tick, upper_tick, config.tick_spacing)?;
        let delta = liquidity_delta(liquidity)?;

        let mut state = read_pool_state(&env)?;
        let funding = advance_funding(&env, &state)?;
        let fee_growth = u256_from_host(&state.fee_growth_global_x128);

        let mut ticks = PoolTicks::new(&env);
        update_tick(&mut ticks, lower_tick, state.current_tick, delta, &funding, fee_growth, false)?;
        update_tick(&mut ticks, upper_tick, state.current_tick, delta, &funding, fee_growth, true)?;

        // new ticks must be checkpointed before the range reads them
        let values = values_inside(&env, &state, &funding, lower_tick, upper_tick)?;

        let mut slot = read_position(&env, &owner, lower_tick, upper_tick);
        if slot.is_none() {
            create_empty_position(&mut slot, lower_tick, upper_tick, &values)?;
        }
        let Some(mut pos) = slot else {
            return Err(PerpError::PositionNotFound);
        };

        let settlement = modify_position(&mut pos, delta, &values)?;
        realize_settlement(&env, &owner, &settlement, funding.sum_a_x128)?;
        write_position(&env, &owner, lower_tick, upper_tick, &pos);

        if in_range(&state, lower_tick, upper_tick) {
            state.liquidity = add_delta(state.liquidity, delta)?;
        }

        write_pool_state(&env, &state);
        write_funding(&env, &funding);

        let (amount0, amount1) = position_amounts(&state, lower_tick, upper_tick, liquidity, true)?;

        emit_settled(&env, &owner, lower_tick, upper_tick, &settlement);
        emit_mint(&env, &owner, lower_tick, upper_tick, liquidity, amount0, amount1);

        Ok((amount0, amount1))
    }

    /// Remove liquidity from a range
    ///
    /// Settles the range first. Ticks left with no liquidity are cleared and
    /// the position is deleted once empty.
    pub fn burn(
        env: Env,
        owner: Address,
        lower_tick: i32,
        upper_tick: i32,
        liquidity: u128,
    ) -> Result<(i128, i128), PerpError> {
        owner.require_auth();

        let config = read_pool_config(&env)?;
        validate_tick_range(lower_tick, upper_tick, config.tick_spacing)?;
        let delta = liquidity_delta(liquidity)?;

        let mut pos =
            read_position(&env, &owner, lower_tick, upper_tick).ok_or(PerpError::PositionNotFound)?;

        let mut state = read_pool_state(&env)?;
        let funding = advance_funding(&env, &state)?;
        let fee_growth = u256_from_host(&state.fee_growth_global_x128);

        // read before the ticks can be cleared
        let values = values_inside(&env, &state, &funding, lower_tick, upper_tick)?;
        let settlement = modify_position(&mut pos, -delta, &values)?;
        realize_settlement(&env, &owner, &settlement, funding.sum_a_x128)?;

        let mut ticks = PoolTicks::new(&env);
        update_tick(&mut ticks, lower_tick, state.current_tick, -delta, &funding, fee_growth, false)?;
        update_tick(&mut ticks, upper_tick, state.current_tick, -delta, &funding, fee_growth, true)?;

        if in_range(&state, lower_tick, upper_tick) {
            state.liquidity = add_delta(state.liquidity, -delta)?;
        }

        if pos.liquidity == 0 {
            remove_position(&env, &owner, lower_tick, upper_tick);
        } else {
            write_position(&env, &owner, lower_tick, upper_tick, &pos);
        }

        write_pool_state(&env, &state);
        write_funding(&env, &funding);

        let (amount0, amount1) = position_amounts(&state, lower_tick, upper_tick, liquidity, false)?;

        emit_settled(&env, &owner, lower_tick, upper_tick, &settlement);
        emit_burn(&env, &owner, lower_tick, upper_tick, liquidity, amount0, amount1);

        Ok((amount0, amount1))
    }

    /// Settle a range without changing its liquidity
    ///
    /// Funding and fees go to the owner's quote balance, the net position to
    /// the owner's token position.
    pub fn collect(
        env: Env,
        owner: Address,
        lower_tick: i32,
        upper_tick: i32,
    ) -> Result<SettlementResult, PerpError> {
        owner.require_auth();

        let mut pos =
            read_position(&env, &owner, lower_tick, upper_tick).ok_or(PerpError::PositionNotFound)?;

        let state = read_pool_state(&env)?;
        let funding = advance_funding(&env, &state)?;

        let values = values_inside(&env, &state, &funding, lower_tick, upper_tick)?;
        let settlement = settle(&mut pos, &values)?;
        realize_settlement(&env, &owner, &settlement, funding.sum_a_x128)?;

        write_position(&env, &owner, lower_tick, upper_tick, &pos);
        write_funding(&env, &funding);

        emit_settled(&env, &owner, lower_tick, upper_tick, &settlement);

        Ok(settlement)
    }

    // ========================================================
    // TRADING
    // ========================================================

    /// Trade against the curve
    ///
    /// `amount > 0` buys exactly `amount` tokens, `amount < 0` sells exactly
    /// `-amount`. `sqrt_price_limit_x64 = 0` means no limit. A trade the
    /// limit stops short of fails as a whole.
    pub fn swap(
        env: Env,
        trader: Address,
        amount: i128,
        sqrt_price_limit_x64: u128,
    ) -> Result<SwapResult, PerpError> {
        trader.require_auth();

        let config = read_pool_config(&env)?;
        let mut token = match read_token_position(&env, &trader) {
            Some(token) => token,
            None => TokenPosition::new(read_funding(&env)?.sum_a_x128),
        };
        if token.status == PositionStatus::Liquidated {
            return Err(PerpError::PositionLiquidated);
        }

        let (outcome, funding, state) = run_swap(&env, &config, amount, sqrt_price_limit_x64)?;

        let payment = token.apply_trade(outcome.token_delta, funding.sum_a_x128)?;
        write_token_position(&env, &trader, &token);
        credit_quote(&env, &trader, trade_proceeds(&outcome, payment)?)?;

        log!(&env, "swap", outcome.token_delta, outcome.quote_delta, outcome.ticks_crossed);
        emit_swap(
            &env,
            &trader,
            outcome.token_delta,
            outcome.quote_delta,
            outcome.fee_paid,
            state.sqrt_price_x64,
            state.current_tick,
        );

        Ok(swap_result(&outcome, payment))
    }

    /// Close a trader's whole token position against the curve
    pub fn liquidate(
        env: Env,
        liquidator: Address,
        trader: Address,
        sqrt_price_limit_x64: u128,
    ) -> Result<SwapResult, PerpError> {
        liquidator.require_auth();

        let config = read_pool_config(&env)?;
        if liquidator != config.liquidator {
            return Err(PerpError::Unauthorized);
        }

        let mut token = read_token_position(&env, &trader).ok_or(PerpError::NoOpenPosition)?;
        if !token.is_liquidatable() {
            return Err(PerpError::NoOpenPosition);
        }
        let closing = token.balance.checked_neg().ok_or(PerpError::ArithmeticOverflow)?;

        let (outcome, funding, _) = run_swap(&env, &config, closing, sqrt_price_limit_x64)?;

        let payment = token.liquidate(outcome.token_delta, funding.sum_a_x128)?;
        write_token_position(&env, &trader, &token);
        credit_quote(&env, &trader, trade_proceeds(&outcome, payment)?)?;

        log!(&env, "liquidate", outcome.token_delta, outcome.quote_delta);
        emit_liquidation(&env, &liquidator, &trader, outcome.token_delta, outcome.quote_delta);

        Ok(swap_result(&outcome, payment))
    }

    // ========================================================
    // ADMIN
    // ========================================================

    pub fn set_keeper(env: Env, admin: Address, keeper: Address) -> Result<(), PerpError> {
        let mut config = authorize_admin(&env, &admin)?;
        config.keeper = keeper.clone();
        write_pool_config(&env, &config);
        emit_role_updated(&env, "keeper", &keeper);
        Ok(())
    }

    pub fn set_liquidator(env: Env, admin: Address, liquidator: Address) -> Result<(), PerpError> {
        let mut config = authorize_admin(&env, &admin)?;
        config.liquidator = liquidator.clone();
        write_pool_config(&env, &config);
        emit_role_updated(&env, "liquidator", &liquidator);
        Ok(())
    }

    // ========================================================
    // VIEW FUNCTIONS
    // ========================================================

    pub fn is_initialized(env: Env) -> bool {
        is_initialized(&env)
    }

    pub fn get_pool_state(env: Env) -> Result<PoolState, PerpError> {
        read_pool_state(&env)
    }

    pub fn get_pool_config(env: Env) -> Result<PoolConfig, PerpError> {
        read_pool_config(&env)
    }

    /// Stored accumulator, as of the last update
    pub fn get_funding_state(env: Env) -> Result<FundingRecord, PerpError> {
        read_funding_record(&env)
    }

    /// Tick checkpoint, `None` while uninitialized
    pub fn get_tick(env: Env, tick: i32) -> Option<TickRecord> {
        read_tick_record(&env, tick)
    }

    pub fn get_position(
        env: Env,
        owner: Address,
        lower_tick: i32,
        upper_tick: i32,
    ) -> Option<PositionRecord> {
        read_position_record(&env, &owner, lower_tick, upper_tick)
    }

    pub fn get_token_position(env: Env, trader: Address) -> Option<TokenPositionRecord> {
        read_token_position_record(&env, &trader)
    }

    pub fn get_quote_balance(env: Env, owner: Address) -> i128 {
        read_quote_balance(&env, &owner)
    }

    /// Inside values of a range, extrapolated to the ledger time
    pub fn get_values_inside(
        env: Env,
        lower_tick: i32,
        upper_tick: i32,
    ) -> Result<ValuesInsideView, PerpError> {
        let state = read_pool_state(&env)?;
        let funding = extrapolated_funding(&env, &state)?;
        let values = values_inside(&env, &state, &funding, lower_tick, upper_tick)?;
        Ok(ValuesInsideView::from_values(&env, &values))
    }

    /// Funding a trader would realize now; negative is owed by the trader
    pub fn unrealized_funding_payment(env: Env, trader: Address) -> Result<i128, PerpError> {
        let Some(token) = read_token_position(&env, &trader) else {
            return Ok(0);
        };
        let state = read_pool_state(&env)?;
        let funding = extrapolated_funding(&env, &state)?;
        token.unrealized_funding_payment(funding.sum_a_x128)
    }

    /// What `collect` would realize now, without touching state
    pub fn unrealized_position_funding(
        env: Env,
        owner: Address,
        lower_tick: i32,
        upper_tick: i32,
    ) -> Result<SettlementResult, PerpError> {
        let pos =
            read_position(&env, &owner, lower_tick, upper_tick).ok_or(PerpError::PositionNotFound)?;
        let state = read_pool_state(&env)?;
        let funding = extrapolated_funding(&env, &state)?;
        let values = values_inside(&env, &state, &funding, lower_tick, upper_tick)?;

        let fee = unrealized_fee(&pos, &values)?;
        Ok(SettlementResult {
            funding: unrealized_funding(&pos, &values)?,
            fee: i128::try_from(fee).map_err(|_| PerpError::ArithmeticOverflow)?,
            net_position: unrealized_net_position(&pos, &values)?,
        })
    }
}

// ========================================================
// HELPER FUNCTIONS
// ========================================================

fn authorize_admin(env: &Env, admin: &Address) -> Result<PoolConfig, PerpError> {
    admin.require_auth();
    let config = read_pool_config(env)?;
    if *admin != config.admin {
        return Err(PerpError::Unauthorized);
    }
    Ok(config)
}

/// Stored funding advanced to the ledger time at the current price
fn advance_funding(env: &Env, state: &PoolState) -> Result<FundingState, PerpError> {
    let mut funding = read_funding(env)?;
    funding.advance(
        env.ledger().timestamp(),
        x64_to_x128(state.index_price_x64),
        price_x128_from_sqrt_x64(state.sqrt_price_x64),
    )?;
    Ok(funding)
}

/// Read-only counterpart of `advance_funding`, using the cached rate
fn extrapolated_funding(env: &Env, state: &PoolState) -> Result<FundingState, PerpError> {
    read_funding(env)?.extrapolated(
        env.ledger().timestamp(),
        price_x128_from_sqrt_x64(state.sqrt_price_x64),
    )
}

fn values_inside(
    env: &Env,
    state: &PoolState,
    funding: &FundingState,
    lower_tick: i32,
    upper_tick: i32,
) -> Result<ValuesInside, PerpError> {
    perpamm_tick::get_values_inside(
        &PoolTicks::new(env),
        lower_tick,
        upper_tick,
        state.current_tick,
        funding,
        u256_from_host(&state.fee_growth_global_x128),
    )
}

/// Book a range settlement: quote to the ledger, net position to the
/// owner's token position
fn realize_settlement(
    env: &Env,
    owner: &Address,
    settlement: &SettlementResult,
    sum_a_x128: I256,
) -> Result<(), PerpError> {
    let mut quote = settlement
        .funding
        .checked_add(settlement.fee)
        .ok_or(PerpError::ArithmeticOverflow)?;

    if settlement.net_position != 0 {
        let mut token = read_token_position(env, owner).unwrap_or_else(|| TokenPosition::new(sum_a_x128));
        let payment = token.adjust_balance(settlement.net_position, sum_a_x128)?;
        quote = quote.checked_add(payment).ok_or(PerpError::ArithmeticOverflow)?;
        write_token_position(env, owner, &token);
    }

    credit_quote(env, owner, quote)
}

/// Run the engine on the stored curve and persist curve and funding
fn run_swap(
    env: &Env,
    config: &PoolConfig,
    amount: i128,
    sqrt_price_limit_x64: u128,
) -> Result<(SwapOutcome, FundingState, PoolState), PerpError> {
    let mut state = read_pool_state(env)?;
    let mut funding = read_funding(env)?;

    let mut curve = SwapState {
        sqrt_price_x64: state.sqrt_price_x64,
        current_tick: state.current_tick,
        liquidity: state.liquidity,
        tick_spacing: config.tick_spacing,
        fee_growth_global_x128: u256_from_host(&state.fee_growth_global_x128),
    };
    let params = SwapParams {
        amount,
        sqrt_price_limit_x64,
        fee_bps: config.fee_bps,
        now: env.ledger().timestamp(),
        index_price_x128: x64_to_x128(state.index_price_x64),
    };

    let mut ticks = PoolTicks::new(env);
    let outcome = engine_swap(&mut curve, &mut funding, &mut ticks, &params, |tick, sqrt_price| {
        emit_tick_crossed(env, tick, sqrt_price)
    })?;

    state.sqrt_price_x64 = curve.sqrt_price_x64;
    state.current_tick = curve.current_tick;
    state.liquidity = curve.liquidity;
    state.fee_growth_global_x128 = u256_to_host(env, curve.fee_growth_global_x128);

    write_pool_state(env, &state);
    write_funding(env, &funding);

    Ok((outcome, funding, state))
}

/// Quote credited to a trader: curve proceeds, less the fee, plus funding
fn trade_proceeds(outcome: &SwapOutcome, funding_payment: i128) -> Result<i128, PerpError> {
    outcome
        .quote_delta
        .checked_sub(outcome.fee_paid)
        .and_then(|q| q.checked_add(funding_payment))
        .ok_or(PerpError::ArithmeticOverflow)
}

fn swap_result(outcome: &SwapOutcome, funding_payment: i128) -> SwapResult {
    SwapResult {
        token_delta: outcome.token_delta,
        quote_delta: outcome.quote_delta,
        fee_paid: outcome.fee_paid,
        funding_payment,
        ticks_crossed: outcome.ticks_crossed,
    }
}

#[inline]
fn in_range(state: &PoolState, lower_tick: i32, upper_tick: i32) -> bool {
    lower_tick <= state.current_tick && state.current_tick < upper_tick
}

fn liquidity_delta(liquidity: u128) -> Result<i128, PerpError> {
    if liquidity == 0 {
        return Err(PerpError::ZeroLiquidity);
    }
    i128::try_from(liquidity).map_err(|_| PerpError::LiquidityOverflow)
}

fn position_amounts(
    state: &PoolState,
    lower_tick: i32,
    upper_tick: i32,
    liquidity: u128,
    round_up: bool,
) -> Result<(i128, i128), PerpError> {
    let (amount0, amount1) = get_amounts_for_liquidity(
        liquidity,
        get_sqrt_ratio_at_tick(lower_tick)?,
        get_sqrt_ratio_at_tick(upper_tick)?,
        state.sqrt_price_x64,
        round_up,
    )?;
    Ok((
        i128::try_from(amount0).map_err(|_| PerpError::ArithmeticOverflow)?,
        i128::try_from(amount1).map_err(|_| PerpError::ArithmeticOverflow)?,
    ))
}
