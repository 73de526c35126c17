// Token Position Ledger

use perpamm_math::{checked_sub, mul_div_floor, to_i128, PerpError, I256, Q128_SIGNED};

use crate::types::{PositionStatus, TokenPosition};

impl TokenPosition {
    pub fn new(sum_a_x128: I256) -> Self {
        Self {
            sum_a_last_x128: sum_a_x128,
            ..Self::default()
        }
    }

    /// `-balance * (sumA - sumALast)`, rounded toward -inf.
    /// A long pays (negative result) while `sumA` grows.
    pub fn unrealized_funding_payment(&self, sum_a_x128: I256) -> Result<i128, PerpError> {
        if self.balance == 0 {
            return Ok(0);
        }
        let delta_a = checked_sub(sum_a_x128, self.sum_a_last_x128)?;
        let exposure = -I256::from(self.balance);
        to_i128(mul_div_floor(exposure, delta_a, Q128_SIGNED)?)
    }

    /// Realize pending funding and move the checkpoint to `sum_a_x128`
    pub fn settle_funding_payment(&mut self, sum_a_x128: I256) -> Result<i128, PerpError> {
        let payment = self.unrealized_funding_payment(sum_a_x128)?;
        self.sum_a_last_x128 = sum_a_x128;
        Ok(payment)
    }

    /// Book a trade. Returns the funding realized on the prior balance.
    pub fn apply_trade(&mut self, delta: i128, sum_a_x128: I256) -> Result<i128, PerpError> {
        if self.status == PositionStatus::Liquidated {
            return Err(PerpError::PositionLiquidated);
        }
        if delta == 0 {
            return Err(PerpError::InvalidAmount);
        }

        let balance = self.balance.checked_add(delta).ok_or(PerpError::ArithmeticOverflow)?;
        let net_trader_position = self
            .net_trader_position
            .checked_add(delta)
            .ok_or(PerpError::ArithmeticOverflow)?;

        let payment = self.settle_funding_payment(sum_a_x128)?;
        self.balance = balance;
        self.net_trader_position = net_trader_position;
        self.transition();

        Ok(payment)
    }

    /// Move an LP net position into the balance.
    /// Allowed in any status; `net_trader_position` is untouched.
    pub fn adjust_balance(&mut self, delta: i128, sum_a_x128: I256) -> Result<i128, PerpError> {
        let balance = self.balance.checked_add(delta).ok_or(PerpError::ArithmeticOverflow)?;

        let payment = self.settle_funding_payment(sum_a_x128)?;
        self.balance = balance;
        self.transition();

        Ok(payment)
    }

    /// Any nonzero balance can be liquidated, including LP exposure
    /// settled into an account after an earlier liquidation.
    #[inline]
    pub fn is_liquidatable(&self) -> bool {
        self.balance != 0
    }

    /// Book the forced closing trade of a liquidation.
    /// Returns the funding realized on the liquidated balance.
    pub fn liquidate(&mut self, closing_delta: i128, sum_a_x128: I256) -> Result<i128, PerpError> {
        if !self.is_liquidatable() {
            return Err(PerpError::NoOpenPosition);
        }

        let balance = self
            .balance
            .checked_add(closing_delta)
            .ok_or(PerpError::ArithmeticOverflow)?;
        let net_trader_position = self
            .net_trader_position
            .checked_add(closing_delta)
            .ok_or(PerpError::ArithmeticOverflow)?;

        let payment = self.settle_funding_payment(sum_a_x128)?;
        self.balance = balance;
        self.net_trader_position = net_trader_position;
        self.status = PositionStatus::Liquidated;

        Ok(payment)
    }

    fn transition(&mut self) {
        if self.status == PositionStatus::Liquidated {
            return;
        }
        self.status = if self.balance == 0 {
            PositionStatus::Closed
        } else {
            PositionStatus::Open
        };
    }
}
