mod common;

use common::*;
use perpamm_math::{PerpError, I256, Q128_SIGNED};
use perpamm_position::*;

#[test]
fn test_new_position_is_closed() {
    let pos = TokenPosition::new(x128(4));
    assert_eq!(pos.status, PositionStatus::Closed);
    assert_eq!(pos.balance, 0);
    assert_eq!(pos.sum_a_last_x128, x128(4));
}

#[test]
fn test_funding_sign_convention() {
    let mut long = TokenPosition::new(I256::ZERO);
    long.apply_trade(10, I256::ZERO).unwrap();
    assert_eq!(long.unrealized_funding_payment(x128(1)), Ok(-10));
    assert_eq!(long.unrealized_funding_payment(x128(-1)), Ok(10));

    let mut short = TokenPosition::new(I256::ZERO);
    short.apply_trade(-10, I256::ZERO).unwrap();
    assert_eq!(short.unrealized_funding_payment(x128(1)), Ok(10));
}

#[test]
fn test_funding_rounds_against_trader() {
    let mut pos = TokenPosition::new(I256::ZERO);
    pos.apply_trade(1, I256::ZERO).unwrap();
    assert_eq!(pos.unrealized_funding_payment(Q128_SIGNED / I256::from(3i128)), Ok(-1));

    let mut pos = TokenPosition::new(I256::ZERO);
    pos.apply_trade(-1, I256::ZERO).unwrap();
    assert_eq!(pos.unrealized_funding_payment(Q128_SIGNED / I256::from(3i128)), Ok(0));
}

#[test]
fn test_settle_refreshes_checkpoint_and_keeps_balance() {
    let mut pos = TokenPosition::new(I256::ZERO);
    pos.apply_trade(7, I256::ZERO).unwrap();

    assert_eq!(pos.settle_funding_payment(x128(2)), Ok(-14));
    assert_eq!(pos.balance, 7);
    assert_eq!(pos.sum_a_last_x128, x128(2));
    assert_eq!(pos.settle_funding_payment(x128(2)), Ok(0));
}

#[test]
fn test_trade_settles_old_balance_first() {
    let mut pos = TokenPosition::new(I256::ZERO);
    pos.apply_trade(5, I256::ZERO).unwrap();

    let payment = pos.apply_trade(20, x128(1)).unwrap();
    assert_eq!(payment, -5);
    assert_eq!(pos.balance, 25);
    assert_eq!(pos.net_trader_position, 25);
}

#[test]
fn test_open_and_close() {
    let mut pos = TokenPosition::new(I256::ZERO);

    pos.apply_trade(3, I256::ZERO).unwrap();
    assert_eq!(pos.status, PositionStatus::Open);

    pos.apply_trade(-1, I256::ZERO).unwrap();
    assert_eq!(pos.status, PositionStatus::Open);

    pos.apply_trade(-2, x128(1)).unwrap();
    assert_eq!(pos.status, PositionStatus::Closed);
    assert_eq!(pos.balance, 0);

    // flip straight through zero stays open
    pos.apply_trade(4, x128(1)).unwrap();
    pos.apply_trade(-9, x128(1)).unwrap();
    assert_eq!(pos.status, PositionStatus::Open);
    assert_eq!(pos.balance, -5);
}

#[test]
fn test_zero_trade_rejected() {
    let mut pos = TokenPosition::new(I256::ZERO);
    assert_eq!(pos.apply_trade(0, I256::ZERO), Err(PerpError::InvalidAmount));
}

#[test]
fn test_adjust_balance_leaves_trader_position() {
    let mut pos = TokenPosition::new(I256::ZERO);
    pos.adjust_balance(-40, I256::ZERO).unwrap();

    assert_eq!(pos.balance, -40);
    assert_eq!(pos.net_trader_position, 0);
    assert_eq!(pos.status, PositionStatus::Open);
}

#[test]
fn test_liquidation_is_terminal_for_trades() {
    let mut pos = TokenPosition::new(I256::ZERO);
    pos.apply_trade(12, I256::ZERO).unwrap();

    let payment = pos.liquidate(-12, x128(1)).unwrap();
    assert_eq!(payment, -12);
    assert_eq!(pos.status, PositionStatus::Liquidated);
    assert_eq!(pos.balance, 0);

    assert_eq!(pos.apply_trade(1, x128(1)), Err(PerpError::PositionLiquidated));
    assert_eq!(pos.liquidate(0, x128(1)), Err(PerpError::NoOpenPosition));

    pos.adjust_balance(3, x128(1)).unwrap();
    assert_eq!(pos.status, PositionStatus::Liquidated);
    assert_eq!(pos.balance, 3);
}

#[test]
fn test_settled_exposure_after_liquidation_can_be_liquidated() {
    let mut pos = TokenPosition::new(I256::ZERO);
    pos.apply_trade(100, I256::ZERO).unwrap();
    pos.liquidate(-100, I256::ZERO).unwrap();

    // LP net position settled after the liquidation
    pos.adjust_balance(-50, I256::ZERO).unwrap();
    assert_eq!(pos.status, PositionStatus::Liquidated);
    assert!(pos.is_liquidatable());
    assert_eq!(pos.apply_trade(50, I256::ZERO), Err(PerpError::PositionLiquidated));

    let payment = pos.liquidate(50, x128(2)).unwrap();
    assert_eq!(payment, 100);
    assert_eq!(pos.balance, 0);
    assert_eq!(pos.status, PositionStatus::Liquidated);
    assert!(!pos.is_liquidatable());
}

#[test]
fn test_closed_position_is_not_liquidatable() {
    let mut pos = TokenPosition::new(I256::ZERO);
    pos.apply_trade(7, I256::ZERO).unwrap();
    pos.apply_trade(-7, I256::ZERO).unwrap();
    assert_eq!(pos.status, PositionStatus::Closed);
    assert_eq!(pos.liquidate(7, I256::ZERO), Err(PerpError::NoOpenPosition));
}

#[test]
fn test_liquidate_requires_open_position() {
    let mut pos = TokenPosition::new(I256::ZERO);
    assert_eq!(pos.liquidate(0, I256::ZERO), Err(PerpError::NoOpenPosition));
}
