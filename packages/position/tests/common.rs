#![allow(dead_code)]

use std::collections::BTreeMap;

use perpamm_math::{I256, Q128, Q128_SIGNED, U256};
use perpamm_tick::{TickInfo, TickStore, ValuesInside};

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

/// `n` as a Q128 value
pub fn x128(n: i128) -> I256 {
    Q128_SIGNED * I256::from(n)
}

pub fn one() -> U256 {
    Q128
}

pub fn price(num: u128, den: u128) -> U256 {
    Q128 * U256::from(num) / U256::from(den)
}

pub fn values(sum_a: I256, sum_b: I256, sum_fp: I256, fee: U256) -> ValuesInside {
    ValuesInside {
        sum_a_x128: sum_a,
        sum_b_inside_x128: sum_b,
        sum_fp_inside_x128: sum_fp,
        fee_inside_x128: fee,
    }
}
