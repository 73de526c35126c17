// Pool Types
//
// Wide accumulators are ethnum words inside the packages and host
// `I256`/`U256` values in storage and at the contract boundary.

use perpamm_funding::FundingState;
use perpamm_position::{LiquidityPosition, TokenPosition};
use perpamm_tick::{TickCheckpoint, TickInfo, ValuesInside};
use soroban_sdk::{contracttype, Address, Bytes, Env, I256, U256};

// Re-export types from packages
pub use perpamm_position::{PositionStatus, SettlementResult};

// ============================================================
// POOL CONFIGURATION
// ============================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// May replace the keeper and the liquidator
    pub admin: Address,
    /// Only address allowed to poke the funding state
    pub keeper: Address,
    /// Only address allowed to liquidate token positions
    pub liquidator: Address,
    pub tick_spacing: i32,
    /// Trading fee in basis points, charged in quote
    pub fee_bps: u32,
}

// ============================================================
// POOL STATE
// ============================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current sqrt price as Q64.64 fixed point
    pub sqrt_price_x64: u128,
    pub current_tick: i32,
    /// Active liquidity in range
    pub liquidity: u128,
    pub fee_growth_global_x128: U256,
    /// Last index price pushed by the keeper, Q64.64
    pub index_price_x64: u128,
}

// ============================================================
// STORED RECORDS
// ============================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingRecord {
    pub sum_a_x128: I256,
    pub sum_b_x128: I256,
    pub sum_fp_x128: I256,
    pub timestamp_last: u64,
    pub funding_rate_x128: I256,
}

impl FundingRecord {
    pub fn from_state(env: &Env, state: &FundingState) -> Self {
        Self {
            sum_a_x128: i256_to_host(env, state.sum_a_x128),
            sum_b_x128: i256_to_host(env, state.sum_b_x128),
            sum_fp_x128: i256_to_host(env, state.sum_fp_x128),
            timestamp_last: state.timestamp_last,
            funding_rate_x128: i256_to_host(env, state.funding_rate_x128),
        }
    }

    pub fn to_state(&self) -> FundingState {
        FundingState {
            sum_a_x128: i256_from_host(&self.sum_a_x128),
            sum_b_x128: i256_from_host(&self.sum_b_x128),
            sum_fp_x128: i256_from_host(&self.sum_fp_x128),
            timestamp_last: self.timestamp_last,
            funding_rate_x128: i256_from_host(&self.funding_rate_x128),
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickRecord {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub sum_a_last_x128: I256,
    pub sum_b_outside_x128: I256,
    pub sum_fp_outside_x128: I256,
    pub fee_outside_x128: U256,
}

impl TickRecord {
    pub fn from_info(env: &Env, info: &TickInfo) -> Self {
        Self {
            liquidity_gross: info.liquidity_gross,
            liquidity_net: info.liquidity_net,
            sum_a_last_x128: i256_to_host(env, info.checkpoint.sum_a_last_x128),
            sum_b_outside_x128: i256_to_host(env, info.checkpoint.sum_b_outside_x128),
            sum_fp_outside_x128: i256_to_host(env, info.checkpoint.sum_fp_outside_x128),
            fee_outside_x128: u256_to_host(env, info.checkpoint.fee_outside_x128),
        }
    }

    pub fn to_info(&self) -> TickInfo {
        TickInfo {
            liquidity_gross: self.liquidity_gross,
            liquidity_net: self.liquidity_net,
            checkpoint: TickCheckpoint {
                sum_a_last_x128: i256_from_host(&self.sum_a_last_x128),
                sum_b_outside_x128: i256_from_host(&self.sum_b_outside_x128),
                sum_fp_outside_x128: i256_from_host(&self.sum_fp_outside_x128),
                fee_outside_x128: u256_from_host(&self.fee_outside_x128),
            },
        }
    }
}

/// Liquidity range of one owner, keyed by (owner, lower, upper)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionRecord {
    pub liquidity: u128,
    pub sum_a_last_x128: I256,
    pub sum_b_inside_last_x128: I256,
    pub sum_fp_inside_last_x128: I256,
    pub fee_inside_last_x128: U256,
}

impl PositionRecord {
    pub fn from_position(env: &Env, pos: &LiquidityPosition) -> Self {
        Self {
            liquidity: pos.liquidity,
            sum_a_last_x128: i256_to_host(env, pos.sum_a_last_x128),
            sum_b_inside_last_x128: i256_to_host(env, pos.sum_b_inside_last_x128),
            sum_fp_inside_last_x128: i256_to_host(env, pos.sum_fp_inside_last_x128),
            fee_inside_last_x128: u256_to_host(env, pos.fee_inside_last_x128),
        }
    }

    pub fn to_position(&self) -> LiquidityPosition {
        LiquidityPosition {
            liquidity: self.liquidity,
            sum_a_last_x128: i256_from_host(&self.sum_a_last_x128),
            sum_b_inside_last_x128: i256_from_host(&self.sum_b_inside_last_x128),
            sum_fp_inside_last_x128: i256_from_host(&self.sum_fp_inside_last_x128),
            fee_inside_last_x128: u256_from_host(&self.fee_inside_last_x128),
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenPositionRecord {
    pub balance: i128,
    pub net_trader_position: i128,
    pub sum_a_last_x128: I256,
    pub status: PositionStatus,
}

impl TokenPositionRecord {
    pub fn from_position(env: &Env, pos: &TokenPosition) -> Self {
        Self {
            balance: pos.balance,
            net_trader_position: pos.net_trader_position,
            sum_a_last_x128: i256_to_host(env, pos.sum_a_last_x128),
            status: pos.status,
        }
    }

    pub fn to_position(&self) -> TokenPosition {
        TokenPosition {
            balance: self.balance,
            net_trader_position: self.net_trader_position,
            sum_a_last_x128: i256_from_host(&self.sum_a_last_x128),
            status: self.status,
        }
    }
}

// ============================================================
// RESULTS AND VIEWS
// ============================================================

/// Inside accumulators of a range, as seen by the margin engine
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValuesInsideView {
    pub sum_a_x128: I256,
    pub sum_b_inside_x128: I256,
    pub sum_fp_inside_x128: I256,
    pub fee_inside_x128: U256,
}

impl ValuesInsideView {
    pub fn from_values(env: &Env, values: &ValuesInside) -> Self {
        Self {
            sum_a_x128: i256_to_host(env, values.sum_a_x128),
            sum_b_inside_x128: i256_to_host(env, values.sum_b_inside_x128),
            sum_fp_inside_x128: i256_to_host(env, values.sum_fp_inside_x128),
            fee_inside_x128: u256_to_host(env, values.fee_inside_x128),
        }
    }
}

/// Result of a trade or a liquidation, signed from the trader's side
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SwapResult {
    pub token_delta: i128,
    /// Quote from the curve, before fees
    pub quote_delta: i128,
    pub fee_paid: i128,
    /// Funding realized on the balance held before the trade
    pub funding_payment: i128,
    pub ticks_crossed: u32,
}

// ============================================================
// HOST WORD CONVERSIONS
// ============================================================

pub fn i256_to_host(env: &Env, value: ethnum::I256) -> I256 {
    I256::from_be_bytes(env, &Bytes::from_array(env, &value.to_be_bytes()))
}

pub fn i256_from_host(value: &I256) -> ethnum::I256 {
    let mut buf = [0u8; 32];
    value.to_be_bytes().copy_into_slice(&mut buf);
    ethnum::I256::from_be_bytes(buf)
}

pub fn u256_to_host(env: &Env, value: ethnum::U256) -> U256 {
    U256::from_be_bytes(env, &Bytes::from_array(env, &value.to_be_bytes()))
}

pub fn u256_from_host(value: &U256) -> ethnum::U256 {
    let mut buf = [0u8; 32];
    value.to_be_bytes().copy_into_slice(&mut buf);
    ethnum::U256::from_be_bytes(buf)
}
