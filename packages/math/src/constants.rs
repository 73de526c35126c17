// Constants grouped by concern. Prices on the curve are Q64.64 sqrt prices;
// every funding accumulator is a signed Q128 value (value * 2^128).

use ethnum::{I256, U256};

// ============================================================
// TICK CONSTANTS
// ============================================================

/// Minimum valid tick. Keeps the Q64.64 sqrt price above 2^32.
pub const MIN_TICK: i32 = -443_636;

/// Maximum valid tick. Keeps the Q64.64 sqrt price below 2^96.
pub const MAX_TICK: i32 = 443_636;

/// Sqrt price at MIN_TICK (Q64.64)
pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_017;

/// Sqrt price at MAX_TICK (Q64.64)
pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_515_401_279_992_447_579_062;

/// Largest tick spacing accepted at pool initialization
pub const MAX_TICK_SPACING: i32 = 16_384;

/// Maximum steps when searching for the next initialized tick
pub const MAX_TICK_SEARCH_STEPS: i32 = 2000;

// ============================================================
// LIQUIDITY CONSTANTS
// ============================================================

/// Upper bound on gross liquidity referencing a single tick
pub const MAX_LIQUIDITY_PER_TICK: u128 = u128::MAX / 4;

// ============================================================
// SWAP CONSTANTS
// ============================================================

/// Maximum iterations in the swap loop
pub const MAX_SWAP_ITERATIONS: u32 = 1024;

/// Maximum trading fee in basis points (10%)
pub const MAX_FEE_BPS: u32 = 1000;

/// Basis point denominator
pub const BPS_DENOMINATOR: u128 = 10_000;

// ============================================================
// FIXED POINT CONSTANTS
// ============================================================

/// 2^64, price 1.0 for Q64.64 values
pub const Q64: u128 = 1u128 << 64;

/// 2^128 as an unsigned 256-bit word
pub const Q128: U256 = U256::from_words(1, 0);

/// 2^128 as a signed 256-bit word
pub const Q128_SIGNED: I256 = I256::from_words(1, 0);

// ============================================================
// FUNDING CONSTANTS
// ============================================================

/// Funding rates are quoted per day and accrued per second
pub const SECONDS_PER_DAY: u64 = 86_400;
