#![allow(dead_code)]

use std::collections::BTreeMap;

use perpamm_funding::FundingState;
use perpamm_math::{I256, Q128, U256};
use perpamm_tick::{TickInfo, TickStore};

/// In-memory tick map
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

pub fn i(value: i128) -> I256 {
    I256::from(value)
}

pub fn u(value: u128) -> U256 {
    U256::from(value)
}

/// Global state with explicit sums
pub fn global(sum_a: i128, sum_b: i128, sum_fp: i128, timestamp: u64) -> FundingState {
    FundingState {
        sum_a_x128: i(sum_a),
        sum_b_x128: i(sum_b),
        sum_fp_x128: i(sum_fp),
        timestamp_last: timestamp,
        funding_rate_x128: I256::ZERO,
    }
}

/// Price 1.0 as Q128
pub fn one() -> U256 {
    Q128
}

pub fn price(num: u128, den: u128) -> U256 {
    Q128 * U256::from(num) / U256::from(den)
}
