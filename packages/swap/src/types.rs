use perpamm_math::U256;

/// Inputs of one trade against the curve
#[derive(Clone, Copy, Debug)]
pub struct SwapParams {
    /// Tokens to buy (> 0, exact output) or sell (< 0, exact input)
    pub amount: i128,
    /// Q64.64 bound on the final price; 0 for the edge of the tick range
    pub sqrt_price_limit_x64: u128,
    pub fee_bps: u32,
    pub now: u64,
    pub index_price_x128: U256,
}

/// Flows of a filled trade, signed from the trader's side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Tokens received (negative when sold)
    pub token_delta: i128,
    /// Quote received from the curve before fees (negative when paid)
    pub quote_delta: i128,
    /// Fee charged in quote on top of `quote_delta`
    pub fee_paid: i128,
    pub ticks_crossed: u32,
}
