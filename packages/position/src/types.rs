use perpamm_math::{I256, U256};
use perpamm_tick::ValuesInside;
use soroban_sdk::contracttype;

/// Liquidity range owned by one account.
///
/// The checkpoint is the range's inside values as of the last touch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityPosition {
    pub liquidity: u128,
    pub sum_a_last_x128: I256,
    pub sum_b_inside_last_x128: I256,
    pub sum_fp_inside_last_x128: I256,
    pub fee_inside_last_x128: U256,
}

impl LiquidityPosition {
    pub(crate) fn checkpoint(&mut self, values: &ValuesInside) {
        self.sum_a_last_x128 = values.sum_a_x128;
        self.sum_b_inside_last_x128 = values.sum_b_inside_x128;
        self.sum_fp_inside_last_x128 = values.sum_fp_inside_x128;
        self.fee_inside_last_x128 = values.fee_inside_x128;
    }
}

/// Amounts realized by settling a liquidity position
#[contracttype]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettlementResult {
    /// Funding credited to the owner (negative is a debit)
    pub funding: i128,
    /// Trading fees earned
    pub fee: i128,
    /// Token position taken on by the range since the last settlement
    pub net_position: i128,
}

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum PositionStatus {
    Closed = 0,
    Open = 1,
    Liquidated = 2,
}

impl Default for PositionStatus {
    fn default() -> Self {
        PositionStatus::Closed
    }
}

/// Directional token exposure of one account
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenPosition {
    /// Net token exposure, trades plus settled LP positions
    pub balance: i128,
    /// Net token amount from direct trades only
    pub net_trader_position: i128,
    pub sum_a_last_x128: I256,
    pub status: PositionStatus,
}
