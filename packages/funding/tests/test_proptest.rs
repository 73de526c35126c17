// Property-Based Testing with Proptest
// Run with: cargo test -p perpamm-funding --test test_proptest

mod common;

use common::{one, price};
use perpamm_funding::*;
use perpamm_math::I256;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: with no net position sumFp never moves
    #[test]
    fn prop_zero_position_neutral(
        steps in prop::collection::vec((1u64..100_000, 50u128..200), 1..20)
    ) {
        let mut state = FundingState::new(0);
        let mut now = 0;
        for (dt, index) in steps {
            now += dt;
            state.advance(now, price(index, 100), one()).unwrap();
        }
        prop_assert_eq!(state.sum_fp_x128, I256::ZERO);
    }

    /// Property: sumA accrues linearly at a constant rate
    #[test]
    fn prop_sum_a_linear(index in 50u128..200, t1 in 1u64..1_000_000, t2 in 1u64..1_000_000) {
        let mut split = FundingState::new(0);
        split.advance(t1, price(index, 100), one()).unwrap();
        split.advance(t1 + t2, price(index, 100), one()).unwrap();

        let mut whole = FundingState::new(0);
        whole.advance(t1 + t2, price(index, 100), one()).unwrap();

        prop_assert_eq!(split.sum_a_x128, whole.sum_a_x128);
    }

    /// Property: reading never mutates
    #[test]
    fn prop_extrapolate_is_pure(amount in -1_000_000i128..1_000_000, liquidity in 1u128..1_000_000, dt in 0u64..1_000_000) {
        let mut state = FundingState::new(0);
        state.advance(1, price(103, 100), one()).unwrap().apply_position_delta(amount, liquidity).unwrap();
        let before = state;
        let _ = state.extrapolated(1 + dt, one()).unwrap();
        prop_assert_eq!(state, before);
    }
}
