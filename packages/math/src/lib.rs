// PerpAMM Math Package

#![no_std]

pub mod constants;
pub mod error;
pub mod full_math;
pub mod liquidity;
pub mod q128;
pub mod sqrt_price;

pub use ethnum::{I256, U256};

// Re-export commonly used items from constants
pub use constants::*;

pub use error::PerpError;

// Re-export fixed point helpers
pub use full_math::{
    checked_add,
    checked_sub,
    mul_div,
    mul_div_floor,
    mul_div_u256,
    to_i128,
    to_signed,
    to_u128,
};
pub use q128::{amount_from_growth, per_liquidity_x128, price_x128_from_sqrt_x64, x64_to_x128};

// Re-export sqrt price functions
pub use sqrt_price::{
    compute_swap_step,
    get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
    get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio,
    SwapStep,
};

// Re-export liquidity functions
pub use liquidity::{add_delta, get_amount_0_delta, get_amount_1_delta, get_amounts_for_liquidity};

/// Round a tick down to the nearest multiple of `spacing`
pub fn snap_tick_to_spacing(tick: i32, spacing: i32) -> Result<i32, PerpError> {
    if spacing <= 0 {
        return Err(PerpError::InvalidTickSpacing);
    }
    Ok(tick - tick.rem_euclid(spacing))
}
