// Pool storage module

use perpamm_funding::FundingState;
use perpamm_math::PerpError;
use perpamm_position::{LiquidityPosition, TokenPosition};
use perpamm_tick::{TickInfo, TickStore};
use soroban_sdk::{contracttype, Address, Env};

use crate::types::{
    FundingRecord, PoolConfig, PoolState, PositionRecord, TickRecord, TokenPositionRecord,
};

// ============================================================
// STORAGE KEYS
// ============================================================

#[contracttype]
pub enum DataKey {
    /// Initialization flag
    Initialized,
    /// Roles, spacing and fee
    Config,
    /// Curve state and last index price
    PoolState,
    /// Global funding accumulator
    Funding,
    /// Tick checkpoint by tick index; absent ticks are uninitialized
    Tick(i32),
    /// Liquidity position by (owner, lower_tick, upper_tick)
    Position(Address, i32, i32),
    /// Token position by account
    TokenPosition(Address),
    /// Realized quote (funding, fees, trade proceeds) by account
    QuoteBalance(Address),
}

// ============================================================
// TTL CONFIGURATION
// ============================================================

/// Persistent storage lifetime in ledgers (~1 year at 5s/ledger)
const PERSISTENT_LIFETIME: u32 = 6_307_200;
/// TTL bump threshold
const PERSISTENT_BUMP: u32 = 6_307_200;

fn extend_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME, PERSISTENT_BUMP);
}

// ============================================================
// INITIALIZATION
// ============================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().persistent().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().persistent().set(&DataKey::Initialized, &true);
    extend_ttl(env, &DataKey::Initialized);
}

// ============================================================
// POOL CONFIG AND STATE
// ============================================================

pub fn read_pool_config(env: &Env) -> Result<PoolConfig, PerpError> {
    env.storage()
        .persistent()
        .get(&DataKey::Config)
        .ok_or(PerpError::NotInitialized)
}

pub fn write_pool_config(env: &Env, config: &PoolConfig) {
    env.storage().persistent().set(&DataKey::Config, config);
    extend_ttl(env, &DataKey::Config);
}

pub fn read_pool_state(env: &Env) -> Result<PoolState, PerpError> {
    env.storage()
        .persistent()
        .get(&DataKey::PoolState)
        .ok_or(PerpError::NotInitialized)
}

pub fn write_pool_state(env: &Env, state: &PoolState) {
    env.storage().persistent().set(&DataKey::PoolState, state);
    extend_ttl(env, &DataKey::PoolState);
}

// ============================================================
// FUNDING
// ============================================================

pub fn read_funding_record(env: &Env) -> Result<FundingRecord, PerpError> {
    env.storage()
        .persistent()
        .get(&DataKey::Funding)
        .ok_or(PerpError::NotInitialized)
}

pub fn read_funding(env: &Env) -> Result<FundingState, PerpError> {
    Ok(read_funding_record(env)?.to_state())
}

pub fn write_funding(env: &Env, state: &FundingState) {
    let record = FundingRecord::from_state(env, state);
    env.storage().persistent().set(&DataKey::Funding, &record);
    extend_ttl(env, &DataKey::Funding);
}

// ============================================================
// TICKS
// ============================================================

pub fn read_tick_record(env: &Env, tick: i32) -> Option<TickRecord> {
    env.storage().persistent().get(&DataKey::Tick(tick))
}

/// Tick map backed by persistent storage
pub struct PoolTicks<'a> {
    env: &'a Env,
}

impl<'a> PoolTicks<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }
}

impl TickStore for PoolTicks<'_> {
    fn read_tick(&self, tick: i32) -> TickInfo {
        read_tick_record(self.env, tick)
            .map(|record| record.to_info())
            .unwrap_or_default()
    }

    fn write_tick(&mut self, tick: i32, info: &TickInfo) {
        let key = DataKey::Tick(tick);
        let record = TickRecord::from_info(self.env, info);
        self.env.storage().persistent().set(&key, &record);
        extend_ttl(self.env, &key);
    }

    fn clear_tick(&mut self, tick: i32) {
        self.env.storage().persistent().remove(&DataKey::Tick(tick));
    }
}

// ============================================================
// LIQUIDITY POSITIONS
// ============================================================

pub fn read_position_record(
    env: &Env,
    owner: &Address,
    lower_tick: i32,
    upper_tick: i32,
) -> Option<PositionRecord> {
    let key = DataKey::Position(owner.clone(), lower_tick, upper_tick);
    env.storage().persistent().get(&key)
}

pub fn read_position(
    env: &Env,
    owner: &Address,
    lower_tick: i32,
    upper_tick: i32,
) -> Option<LiquidityPosition> {
    read_position_record(env, owner, lower_tick, upper_tick).map(|record| record.to_position())
}

pub fn write_position(
    env: &Env,
    owner: &Address,
    lower_tick: i32,
    upper_tick: i32,
    pos: &LiquidityPosition,
) {
    let key = DataKey::Position(owner.clone(), lower_tick, upper_tick);
    let record = PositionRecord::from_position(env, pos);
    env.storage().persistent().set(&key, &record);
    extend_ttl(env, &key);
}

pub fn remove_position(env: &Env, owner: &Address, lower_tick: i32, upper_tick: i32) {
    let key = DataKey::Position(owner.clone(), lower_tick, upper_tick);
    env.storage().persistent().remove(&key);
}

// ============================================================
// TOKEN POSITIONS
// ============================================================

pub fn read_token_position_record(env: &Env, owner: &Address) -> Option<TokenPositionRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::TokenPosition(owner.clone()))
}

pub fn read_token_position(env: &Env, owner: &Address) -> Option<TokenPosition> {
    read_token_position_record(env, owner).map(|record| record.to_position())
}

pub fn write_token_position(env: &Env, owner: &Address, pos: &TokenPosition) {
    let key = DataKey::TokenPosition(owner.clone());
    let record = TokenPositionRecord::from_position(env, pos);
    env.storage().persistent().set(&key, &record);
    extend_ttl(env, &key);
}

// ============================================================
// QUOTE BALANCES
// ============================================================

pub fn read_quote_balance(env: &Env, owner: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::QuoteBalance(owner.clone()))
        .unwrap_or(0)
}

pub fn credit_quote(env: &Env, owner: &Address, amount: i128) -> Result<(), PerpError> {
    if amount == 0 {
        return Ok(());
    }
    let key = DataKey::QuoteBalance(owner.clone());
    let balance = read_quote_balance(env, owner)
        .checked_add(amount)
        .ok_or(PerpError::ArithmeticOverflow)?;
    env.storage().persistent().set(&key, &balance);
    extend_ttl(env, &key);
    Ok(())
}
