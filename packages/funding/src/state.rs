// Global funding accumulator

use core::ops::Deref;

use perpamm_math::{checked_add, per_liquidity_x128, PerpError, I256, U256};

use crate::rate::{extrapolated_sum_a, extrapolated_sum_fp, funding_rate_x128, next_a_x128};

// ============================================================
// FUNDING STATE
// ============================================================

/// Running sums shared by every tick and position of a pool.
///
/// * `sum_a_x128` - integral of the funding payment per unit token
/// * `sum_b_x128` - net trader position per unit liquidity
/// * `sum_fp_x128` - integral of `a * sumB`, funding per unit liquidity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FundingState {
    pub sum_a_x128: I256,
    pub sum_b_x128: I256,
    pub sum_fp_x128: I256,
    pub timestamp_last: u64,
    /// Rate observed by the last `advance`, used for read-side extrapolation
    pub funding_rate_x128: I256,
}

impl FundingState {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp_last: timestamp,
            ..Self::default()
        }
    }

    /// Accrue funding up to `now` and refresh the cached rate.
    ///
    /// `sumFp` accrues against the `sumB` in force before this call, so any
    /// position delta of the current trade must go through the returned
    /// guard. With `now == timestamp_last` only the rate is refreshed.
    pub fn advance(
        &mut self,
        now: u64,
        index_price_x128: U256,
        virtual_price_x128: U256,
    ) -> Result<AdvancedFunding<'_>, PerpError> {
        if now < self.timestamp_last {
            return Err(PerpError::TimestampRegression);
        }

        let rate = funding_rate_x128(index_price_x128, virtual_price_x128)?;
        let elapsed = now - self.timestamp_last;

        if elapsed > 0 {
            let delta_a = next_a_x128(rate, virtual_price_x128, elapsed)?;
            let sum_a = checked_add(self.sum_a_x128, delta_a)?;
            let sum_fp = extrapolated_sum_fp(self.sum_fp_x128, self.sum_b_x128, self.sum_a_x128, sum_a)?;

            self.sum_fp_x128 = sum_fp;
            self.sum_a_x128 = sum_a;
            self.timestamp_last = now;
        }
        self.funding_rate_x128 = rate;

        Ok(AdvancedFunding { state: self })
    }

    /// `sum_a` at `now` using the cached rate and the current virtual price
    pub fn extrapolated_sum_a(&self, now: u64, virtual_price_x128: U256) -> Result<I256, PerpError> {
        let elapsed = now
            .checked_sub(self.timestamp_last)
            .ok_or(PerpError::TimestampRegression)?;
        extrapolated_sum_a(self.sum_a_x128, self.funding_rate_x128, virtual_price_x128, elapsed)
    }

    /// Copy of the state carried forward to `now`; `sum_b` is unchanged
    pub fn extrapolated(&self, now: u64, virtual_price_x128: U256) -> Result<FundingState, PerpError> {
        let sum_a = self.extrapolated_sum_a(now, virtual_price_x128)?;
        let sum_fp = extrapolated_sum_fp(self.sum_fp_x128, self.sum_b_x128, self.sum_a_x128, sum_a)?;

        Ok(FundingState {
            sum_a_x128: sum_a,
            sum_fp_x128: sum_fp,
            timestamp_last: now,
            ..*self
        })
    }
}

// ============================================================
// ADVANCED GUARD
// ============================================================

/// Funding state that has been advanced to the current trade's timestamp
pub struct AdvancedFunding<'a> {
    state: &'a mut FundingState,
}

impl AdvancedFunding<'_> {
    /// Record a trader position change against the active liquidity.
    ///
    /// `amount` is the token flow to traders (positive when traders buy).
    pub fn apply_position_delta(&mut self, amount: i128, liquidity: u128) -> Result<(), PerpError> {
        let delta_b = per_liquidity_x128(amount, liquidity)?;
        self.state.sum_b_x128 = checked_add(self.state.sum_b_x128, delta_b)?;
        Ok(())
    }
}

impl Deref for AdvancedFunding<'_> {
    type Target = FundingState;

    fn deref(&self) -> &FundingState {
        self.state
    }
}
