#![allow(dead_code)]

use perpamm_pool::{PerpPool, PerpPoolClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Env,
};

// Test constants
pub const FEE_BPS: u32 = 30; // 0.30%
pub const TICK_SPACING: i32 = 60;
pub const SQRT_PRICE_X64: u128 = 1u128 << 64; // Price = 1.0
pub const INDEX_PRICE_X64: u128 = 1u128 << 64;
pub const START_TIME: u64 = 1_000;

pub const LOWER: i32 = -600;
pub const UPPER: i32 = 600;
pub const LIQUIDITY: u128 = 1_000_000_000_000;

pub struct Setup<'a> {
    pub client: PerpPoolClient<'a>,
    pub admin: Address,
    pub keeper: Address,
    pub liquidator: Address,
}

/// Register the contract without initializing it
pub fn register_pool(env: &Env) -> PerpPoolClient<'_> {
    let pool_id = env.register(PerpPool, ());
    PerpPoolClient::new(env, &pool_id)
}

/// Pool at price 1.0 with the index at 1.0, ledger time START_TIME
pub fn setup_pool(env: &Env) -> Setup<'_> {
    env.mock_all_auths();
    set_time(env, START_TIME);

    let admin = Address::generate(env);
    let keeper = Address::generate(env);
    let liquidator = Address::generate(env);

    let client = register_pool(env);
    client.initialize(
        &admin,
        &keeper,
        &liquidator,
        &SQRT_PRICE_X64,
        &TICK_SPACING,
        &FEE_BPS,
        &INDEX_PRICE_X64,
    );

    Setup {
        client,
        admin,
        keeper,
        liquidator,
    }
}

/// Pool with one LP holding LIQUIDITY over [LOWER, UPPER)
pub fn setup_with_liquidity(env: &Env) -> (Setup<'_>, Address) {
    let setup = setup_pool(env);
    let lp = Address::generate(env);
    setup.client.mint(&lp, &LOWER, &UPPER, &LIQUIDITY);
    (setup, lp)
}

pub fn set_time(env: &Env, timestamp: u64) {
    env.ledger().set_timestamp(timestamp);
}

/// Index price `num / den` as Q64.64
pub fn index_price(num: u128, den: u128) -> u128 {
    INDEX_PRICE_X64 * num / den
}
