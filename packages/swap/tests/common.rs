#![allow(dead_code)]

use std::collections::BTreeMap;

use perpamm_funding::FundingState;
use perpamm_math::{Q128, Q64, U256};
use perpamm_swap::{SwapParams, SwapState};
use perpamm_tick::{update_tick, TickInfo, TickStore};

#[derive(Default)]
pub struct MemoryTicks {
    pub ticks: BTreeMap<i32, TickInfo>,
}

impl TickStore for MemoryTicks {
    fn read_tick(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).copied().unwrap_or_default()
    }

    fn write_tick(&mut self, tick: i32, info: &TickInfo) {
        self.ticks.insert(tick, *info);
    }

    fn clear_tick(&mut self, tick: i32) {
        self.ticks.remove(&tick);
    }
}

/// Curve, accumulator and tick map of one pool
pub struct TestPool {
    pub state: SwapState,
    pub funding: FundingState,
    pub ticks: MemoryTicks,
}

impl TestPool {
    /// Price 1.0 at tick 0, spacing 60
    pub fn new() -> Self {
        Self {
            state: SwapState {
                sqrt_price_x64: Q64,
                current_tick: 0,
                liquidity: 0,
                tick_spacing: 60,
                fee_growth_global_x128: U256::ZERO,
            },
            funding: FundingState::new(0),
            ticks: MemoryTicks::default(),
        }
    }

    pub fn add_liquidity(&mut self, lower: i32, upper: i32, liquidity: u128) {
        let fee = self.state.fee_growth_global_x128;
        let tick = self.state.current_tick;
        update_tick(&mut self.ticks, lower, tick, liquidity as i128, &self.funding, fee, false).unwrap();
        update_tick(&mut self.ticks, upper, tick, liquidity as i128, &self.funding, fee, true).unwrap();
        if lower <= tick && tick < upper {
            self.state.liquidity += liquidity;
        }
    }
}

pub fn one() -> U256 {
    Q128
}

pub fn price(num: u128, den: u128) -> U256 {
    Q128 * U256::from(num) / U256::from(den)
}

pub fn params(amount: i128, now: u64) -> SwapParams {
    SwapParams {
        amount,
        sqrt_price_limit_x64: 0,
        fee_bps: 30,
        now,
        index_price_x128: one(),
    }
}
