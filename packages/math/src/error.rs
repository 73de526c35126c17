// Error taxonomy shared by every package and the pool contract.
//
// Codes are grouped by range. Every variant is fatal for the enclosing
// invocation: the host rolls back all storage writes of a failed call.

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PerpError {
    // Initialization errors (100-199)
    /// Pool has already been initialized
    PoolAlreadyInitialized = 100,
    /// Pool has not been initialized
    NotInitialized = 101,

    // Precondition violations (200-299)
    /// `now` is earlier than the last funding update
    TimestampRegression = 200,
    /// Index or virtual price is zero
    InvalidPrice = 201,
    /// Operation needs non-zero liquidity
    ZeroLiquidity = 202,
    /// Lower tick must be strictly below upper tick
    IllegalTicks = 203,
    /// Tick spacing must be in (0, MAX_TICK_SPACING]
    InvalidTickSpacing = 204,
    /// Fee must be at most MAX_FEE_BPS
    InvalidFee = 205,
    /// Amount must be non-zero (or positive where stated)
    InvalidAmount = 206,
    /// Tick outside [MIN_TICK, MAX_TICK] or not aligned to spacing
    TickOutOfRange = 207,
    /// Sqrt price limit on the wrong side of the current price
    InvalidPriceLimit = 208,

    // Position errors (300-399)
    /// Position for this range is already initialized
    AlreadyInitialized = 300,
    /// No position exists for this key
    PositionNotFound = 301,
    /// Removing more liquidity than the position holds
    InsufficientLiquidity = 302,
    /// Account was liquidated and can no longer trade
    PositionLiquidated = 303,
    /// Account has no open token position
    NoOpenPosition = 304,
    /// Gross liquidity on a tick would exceed MAX_LIQUIDITY_PER_TICK
    LiquidityOverflow = 305,

    // Swap errors (400-499)
    /// No active liquidity to trade against
    NoLiquidity = 400,
    /// Price limit reached before the requested amount was filled
    SwapIncomplete = 401,
    /// Price would leave the representable range
    PriceOutOfBounds = 402,

    // Authorization errors (500-599)
    /// Caller is not the configured role for this action
    Unauthorized = 500,

    // Math errors (600-699)
    /// Fixed-point result does not fit its target width
    ArithmeticOverflow = 600,
    /// Division by zero
    DivisionByZero = 601,
}
