mod common;

use common::*;
use perpamm_funding::{extrapolated_sum_a, extrapolated_sum_fp, funding_rate_x128, FundingState};
use perpamm_math::{PerpError, I256, Q128_SIGNED, U256};
use perpamm_tick::*;

#[test]
fn test_cross_flips_outside_values() {
    let mut store = MemoryTicks::default();
    store.write_tick(
        60,
        &TickInfo {
            liquidity_gross: 10,
            liquidity_net: -10,
            checkpoint: TickCheckpoint {
                sum_a_last_x128: i(3),
                sum_b_outside_x128: i(40),
                sum_fp_outside_x128: i(5),
                fee_outside_x128: u(900),
            },
        },
    );

    let g = global(3, 100, 20, 50);
    let net = cross_tick(&mut store, 60, &g, u(1_000), 50, one(), I256::ZERO).unwrap();
    assert_eq!(net, -10);

    let cp = store.read_tick(60).checkpoint;
    assert_eq!(cp.sum_a_last_x128, i(3));
    assert_eq!(cp.sum_b_outside_x128, i(60));
    assert_eq!(cp.sum_fp_outside_x128, i(15));
    assert_eq!(cp.fee_outside_x128, u(100));
}

#[test]
fn test_cross_conserves_sum_b() {
    let mut store = MemoryTicks::default();
    let g = global(0, 0, 0, 0);
    update_tick(&mut store, 0, 0, 1, &g, U256::ZERO, false).unwrap();

    let before = store.read_tick(0).checkpoint;
    let later = global(500, -1_234, 77, 10);
    cross_tick(&mut store, 0, &later, u(5), 10, one(), I256::ZERO).unwrap();
    let after = store.read_tick(0).checkpoint;

    assert_eq!(before.sum_b_outside_x128 + after.sum_b_outside_x128, later.sum_b_x128);
    assert_eq!(before.fee_outside_x128.wrapping_add(after.fee_outside_x128), u(5));
}

#[test]
fn test_double_cross_restores_checkpoint() {
    let mut store = MemoryTicks::default();
    let original = TickCheckpoint {
        sum_a_last_x128: i(1_000),
        sum_b_outside_x128: i(-8),
        sum_fp_outside_x128: i(123),
        fee_outside_x128: u(4),
    };
    store.write_tick(
        -60,
        &TickInfo {
            liquidity_gross: 1,
            liquidity_net: 1,
            checkpoint: original,
        },
    );

    let g = global(1_000, 32, 456, 9);
    cross_tick(&mut store, -60, &g, u(10), 9, one(), I256::ZERO).unwrap();
    cross_tick(&mut store, -60, &g, u(10), 9, one(), I256::ZERO).unwrap();

    assert_eq!(store.read_tick(-60).checkpoint, original);
}

#[test]
fn test_cross_extrapolates_to_crossing_time() {
    let index = price(102, 100);
    let rate = funding_rate_x128(index, one()).unwrap();

    let mut g = FundingState::new(0);
    g.advance(10, index, one())
        .unwrap()
        .apply_position_delta(1_000, 10_000)
        .unwrap();

    let mut store = MemoryTicks::default();
    update_tick(&mut store, 60, 0, 1, &g, U256::ZERO, true).unwrap();

    cross_tick(&mut store, 60, &g, U256::ZERO, 70, one(), rate).unwrap();

    let sum_a_now = extrapolated_sum_a(g.sum_a_x128, rate, one(), 60).unwrap();
    let global_fp_now = extrapolated_sum_fp(g.sum_fp_x128, g.sum_b_x128, g.sum_a_x128, sum_a_now).unwrap();

    let cp = store.read_tick(60).checkpoint;
    assert_eq!(cp.sum_a_last_x128, sum_a_now);
    assert_eq!(cp.sum_b_outside_x128, g.sum_b_x128);
    assert_eq!(cp.sum_fp_outside_x128, global_fp_now);
    assert!(global_fp_now > g.sum_fp_x128);

    // global state is only read
    assert_eq!(g.timestamp_last, 10);
}

#[test]
fn test_cross_rejects_past_timestamp() {
    let mut store = MemoryTicks::default();
    let g = global(0, 0, 0, 100);
    assert_eq!(
        cross_tick(&mut store, 0, &g, U256::ZERO, 99, one(), Q128_SIGNED),
        Err(PerpError::TimestampRegression)
    );
}
