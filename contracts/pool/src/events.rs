// Pool events module
// One function per event; the topic is a single short symbol

use soroban_sdk::{Address, Env, Symbol};

use crate::types::{FundingRecord, SettlementResult};

/// Topics: ("Init",)
/// Data: (admin, sqrt_price_x64, current_tick, tick_spacing, fee_bps)
pub fn emit_initialized(
    env: &Env,
    admin: &Address,
    sqrt_price_x64: u128,
    current_tick: i32,
    tick_spacing: i32,
    fee_bps: u32,
) {
    env.events().publish(
        (Symbol::new(env, "Init"),),
        (admin.clone(), sqrt_price_x64, current_tick, tick_spacing, fee_bps),
    );
}

/// Topics: ("FundingPoke",)
/// Data: (index_price_x64, sum_a_x128, funding_rate_x128, timestamp)
pub fn emit_funding_poked(env: &Env, index_price_x64: u128, funding: &FundingRecord) {
    env.events().publish(
        (Symbol::new(env, "FundingPoke"),),
        (
            index_price_x64,
            funding.sum_a_x128.clone(),
            funding.funding_rate_x128.clone(),
            funding.timestamp_last,
        ),
    );
}

/// Topics: ("Mint",)
/// Data: (owner, lower_tick, upper_tick, liquidity, amount0, amount1)
pub fn emit_mint(
    env: &Env,
    owner: &Address,
    lower_tick: i32,
    upper_tick: i32,
    liquidity: u128,
    amount0: i128,
    amount1: i128,
) {
    env.events().publish(
        (Symbol::new(env, "Mint"),),
        (owner.clone(), lower_tick, upper_tick, liquidity, amount0, amount1),
    );
}

/// Topics: ("Burn",)
/// Data: (owner, lower_tick, upper_tick, liquidity, amount0, amount1)
pub fn emit_burn(
    env: &Env,
    owner: &Address,
    lower_tick: i32,
    upper_tick: i32,
    liquidity: u128,
    amount0: i128,
    amount1: i128,
) {
    env.events().publish(
        (Symbol::new(env, "Burn"),),
        (owner.clone(), lower_tick, upper_tick, liquidity, amount0, amount1),
    );
}

/// Emitted whenever a range is settled (mint, burn, collect)
/// Topics: ("Settle",)
/// Data: (owner, lower_tick, upper_tick, funding, fee, net_position)
pub fn emit_settled(
    env: &Env,
    owner: &Address,
    lower_tick: i32,
    upper_tick: i32,
    settlement: &SettlementResult,
) {
    env.events().publish(
        (Symbol::new(env, "Settle"),),
        (
            owner.clone(),
            lower_tick,
            upper_tick,
            settlement.funding,
            settlement.fee,
            settlement.net_position,
        ),
    );
}

/// Topics: ("Swap",)
/// Data: (trader, token_delta, quote_delta, fee_paid, sqrt_price_x64, current_tick)
pub fn emit_swap(
    env: &Env,
    trader: &Address,
    token_delta: i128,
    quote_delta: i128,
    fee_paid: i128,
    sqrt_price_x64: u128,
    current_tick: i32,
) {
    env.events().publish(
        (Symbol::new(env, "Swap"),),
        (trader.clone(), token_delta, quote_delta, fee_paid, sqrt_price_x64, current_tick),
    );
}

/// Topics: ("TickCross",)
/// Data: (tick, sqrt_price_x64)
pub fn emit_tick_crossed(env: &Env, tick: i32, sqrt_price_x64: u128) {
    env.events()
        .publish((Symbol::new(env, "TickCross"),), (tick, sqrt_price_x64));
}

/// Topics: ("Liquidate",)
/// Data: (liquidator, trader, token_delta, quote_delta)
pub fn emit_liquidation(
    env: &Env,
    liquidator: &Address,
    trader: &Address,
    token_delta: i128,
    quote_delta: i128,
) {
    env.events().publish(
        (Symbol::new(env, "Liquidate"),),
        (liquidator.clone(), trader.clone(), token_delta, quote_delta),
    );
}

/// Topics: ("RoleSet", role)
/// Data: address
pub fn emit_role_updated(env: &Env, role: &str, address: &Address) {
    env.events()
        .publish((Symbol::new(env, "RoleSet"), Symbol::new(env, role)), address.clone());
}
