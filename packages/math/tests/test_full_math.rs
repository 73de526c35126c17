use perpamm_math::*;

// ============================================================
// FULL WIDTH PRODUCT
// ============================================================

#[test]
fn test_full_mul_small_operands_stay_in_low_word() {
    let (hi, lo) = full_math::full_mul(U256::from(6u128), U256::from(7u128));
    assert_eq!(hi, U256::ZERO);
    assert_eq!(lo, U256::from(42u128));
}

#[test]
fn test_full_mul_carries_into_high_word() {
    // 2^255 * 4 = 2^257
    let a = U256::ONE << 255u32;
    let (hi, lo) = full_math::full_mul(a, U256::from(4u128));
    assert_eq!(hi, U256::from(2u128));
    assert_eq!(lo, U256::ZERO);
}

#[test]
fn test_full_mul_max_squared() {
    // (2^256 - 1)^2 = 2^512 - 2^257 + 1
    let (hi, lo) = full_math::full_mul(U256::MAX, U256::MAX);
    assert_eq!(hi, U256::MAX - U256::ONE);
    assert_eq!(lo, U256::ONE);
}

// ============================================================
// UNSIGNED MUL DIV
// ============================================================

#[test]
fn test_mul_div_u256_basic() {
    assert_eq!(mul_div_u256(U256::from(6u128), U256::from(7u128), U256::from(2u128), false), Ok(U256::from(21u128)));
    assert_eq!(mul_div_u256(U256::from(7u128), U256::ONE, U256::from(2u128), false), Ok(U256::from(3u128)));
    assert_eq!(mul_div_u256(U256::from(7u128), U256::ONE, U256::from(2u128), true), Ok(U256::from(4u128)));
}

#[test]
fn test_mul_div_u256_wide_intermediate() {
    // Q128 * Q128 overflows 256 bits, the quotient does not
    assert_eq!(mul_div_u256(Q128, Q128, Q128, false), Ok(Q128));
    assert_eq!(mul_div_u256(U256::MAX, U256::MAX, U256::MAX, false), Ok(U256::MAX));
    assert_eq!(
        mul_div_u256(U256::MAX, U256::from(3u128), U256::from(6u128), false),
        Ok(U256::MAX / U256::from(2u128))
    );
}

#[test]
fn test_mul_div_u256_overflow() {
    assert_eq!(
        mul_div_u256(U256::MAX, U256::from(2u128), U256::ONE, false),
        Err(PerpError::ArithmeticOverflow)
    );
    assert_eq!(
        mul_div_u256(U256::MAX, U256::ONE, U256::ONE, true),
        Ok(U256::MAX)
    );
}

#[test]
fn test_mul_div_u256_division_by_zero() {
    assert_eq!(
        mul_div_u256(U256::ONE, U256::ONE, U256::ZERO, false),
        Err(PerpError::DivisionByZero)
    );
}

// ============================================================
// SIGNED MUL DIV
// ============================================================

#[test]
fn test_mul_div_truncates_toward_zero() {
    let two = I256::from(2i128);
    assert_eq!(mul_div(I256::from(7i128), I256::ONE, two), Ok(I256::from(3i128)));
    assert_eq!(mul_div(I256::from(-7i128), I256::ONE, two), Ok(I256::from(-3i128)));
    assert_eq!(mul_div(I256::from(7i128), I256::from(-1i128), two), Ok(I256::from(-3i128)));
    assert_eq!(mul_div(I256::from(-7i128), I256::from(-1i128), two), Ok(I256::from(3i128)));
}

#[test]
fn test_mul_div_floor_rounds_down() {
    let two = I256::from(2i128);
    assert_eq!(mul_div_floor(I256::from(7i128), I256::ONE, two), Ok(I256::from(3i128)));
    assert_eq!(mul_div_floor(I256::from(-7i128), I256::ONE, two), Ok(I256::from(-4i128)));
    assert_eq!(mul_div_floor(I256::from(-8i128), I256::ONE, two), Ok(I256::from(-4i128)));
    assert_eq!(mul_div_floor(I256::ZERO, I256::from(-5i128), two), Ok(I256::ZERO));
}

#[test]
fn test_mul_div_signed_wide_intermediate() {
    let value = Q128_SIGNED * I256::from(-3i128);
    assert_eq!(mul_div(value, Q128_SIGNED, Q128_SIGNED), Ok(value));
}

#[test]
fn test_mul_div_signed_overflow() {
    assert_eq!(
        mul_div(I256::MAX, I256::from(2i128), I256::ONE),
        Err(PerpError::ArithmeticOverflow)
    );
    assert_eq!(mul_div(I256::MIN, I256::ONE, I256::ONE), Ok(I256::MIN));
}

// ============================================================
// CONVERSIONS
// ============================================================

#[test]
fn test_to_i128_bounds() {
    assert_eq!(to_i128(I256::from(i128::MAX)), Ok(i128::MAX));
    assert_eq!(to_i128(I256::from(i128::MIN)), Ok(i128::MIN));
    assert_eq!(to_i128(I256::from(-1i128)), Ok(-1));
    assert_eq!(
        to_i128(I256::from(i128::MAX) + I256::ONE),
        Err(PerpError::ArithmeticOverflow)
    );
    assert_eq!(
        to_i128(I256::from(i128::MIN) - I256::ONE),
        Err(PerpError::ArithmeticOverflow)
    );
}

#[test]
fn test_abs_u256_handles_min() {
    assert_eq!(full_math::abs_u256(I256::from(-5i128)), U256::from(5u128));
    assert_eq!(full_math::abs_u256(I256::MIN), U256::ONE << 255u32);
}

#[test]
fn test_to_signed_rejects_top_bit() {
    assert_eq!(to_signed(U256::ONE << 255u32), Err(PerpError::ArithmeticOverflow));
    assert_eq!(to_signed(Q128), Ok(Q128_SIGNED));
}

#[test]
fn test_per_liquidity_x128() {
    assert_eq!(per_liquidity_x128(100, 10_000), Ok(Q128_SIGNED / I256::from(100i128)));
    assert_eq!(per_liquidity_x128(-100, 10_000), Ok(-(Q128_SIGNED / I256::from(100i128))));
    assert_eq!(per_liquidity_x128(0, 10_000), Ok(I256::ZERO));
    assert_eq!(per_liquidity_x128(100, 0), Err(PerpError::ZeroLiquidity));
}

#[test]
fn test_price_from_sqrt_price() {
    assert_eq!(price_x128_from_sqrt_x64(Q64), Q128);
    assert_eq!(price_x128_from_sqrt_x64(2 * Q64), Q128 * U256::from(4u128));
    assert_eq!(x64_to_x128(Q64), Q128);
}

#[test]
fn test_amount_from_growth() {
    // growth of 0.5 per unit liquidity on 1000 liquidity
    let growth = Q128 / U256::from(2u128);
    assert_eq!(amount_from_growth(growth, 1000), Ok(500));
}
