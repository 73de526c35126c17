// Tick Types

use perpamm_math::{I256, U256};

/// Accumulator values on the far side of a tick from the current price
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickCheckpoint {
    /// Global sumA when this tick was last crossed or initialized
    pub sum_a_last_x128: I256,
    pub sum_b_outside_x128: I256,
    /// Valid as of `sum_a_last_x128`
    pub sum_fp_outside_x128: I256,
    pub fee_outside_x128: U256,
}

/// Information stored for each initialized tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInfo {
    /// Total liquidity referencing this tick
    pub liquidity_gross: u128,
    /// Net liquidity change when crossing left-to-right
    pub liquidity_net: i128,
    pub checkpoint: TickCheckpoint,
}

impl TickInfo {
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross > 0
    }
}

/// Accumulator values between two ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValuesInside {
    /// Raw global sumA, shared by every range
    pub sum_a_x128: I256,
    pub sum_b_inside_x128: I256,
    pub sum_fp_inside_x128: I256,
    pub fee_inside_x128: U256,
}

/// Storage seam for tick operations.
///
/// Absent ticks must read as `TickInfo::default()`.
pub trait TickStore {
    fn read_tick(&self, tick: i32) -> TickInfo;
    fn write_tick(&mut self, tick: i32, info: &TickInfo);
    fn clear_tick(&mut self, tick: i32);
}
