// Full-width multiply-then-divide over 256-bit words.
//
// The product of two 256-bit operands is kept as a 512-bit (hi, lo) pair so
// that `a * b / d` is exact whenever the quotient fits 256 bits.

use ethnum::{I256, U256};

use crate::error::PerpError;

/// 512-bit product of two 256-bit words as `(hi, lo)`
pub fn full_mul(a: U256, b: U256) -> (U256, U256) {
    let (a_hi, a_lo) = a.into_words();
    let (b_hi, b_lo) = b.into_words();

    let ll = U256::from(a_lo) * U256::from(b_lo);
    let lh = U256::from(a_lo) * U256::from(b_hi);
    let hl = U256::from(a_hi) * U256::from(b_lo);
    let hh = U256::from(a_hi) * U256::from(b_hi);

    let (mid, mid_carry) = lh.overflowing_add(hl);
    let (mid_hi, mid_lo) = mid.into_words();

    let (lo, lo_carry) = ll.overflowing_add(U256::from_words(mid_lo, 0));

    let mut hi = hh + U256::from(mid_hi);
    if mid_carry {
        hi += U256::from_words(1, 0);
    }
    if lo_carry {
        hi += U256::ONE;
    }

    (hi, lo)
}

/// `floor(a * b / d)` (or ceiling when `round_up`) with a 512-bit intermediate
pub fn mul_div_u256(a: U256, b: U256, d: U256, round_up: bool) -> Result<U256, PerpError> {
    if d == U256::ZERO {
        return Err(PerpError::DivisionByZero);
    }

    let (hi, lo) = full_mul(a, b);

    let (quotient, remainder) = if hi == U256::ZERO {
        (lo / d, lo % d)
    } else {
        if hi >= d {
            return Err(PerpError::ArithmeticOverflow);
        }
        div_wide(hi, lo, d)
    };

    if round_up && remainder != U256::ZERO {
        quotient
            .checked_add(U256::ONE)
            .ok_or(PerpError::ArithmeticOverflow)
    } else {
        Ok(quotient)
    }
}

/// Long division of `(hi, lo)` by `d`, requires `hi < d`
fn div_wide(hi: U256, lo: U256, d: U256) -> (U256, U256) {
    let mut rem = hi;
    let mut quotient = U256::ZERO;

    for i in (0..256u32).rev() {
        let carry = (rem >> 255u32) != U256::ZERO;
        rem = (rem << 1u32) | ((lo >> i) & U256::ONE);
        quotient = quotient << 1u32;
        if carry || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient = quotient | U256::ONE;
        }
    }

    (quotient, rem)
}

/// Signed `a * b / d`, truncating toward zero
pub fn mul_div(a: I256, b: I256, d: I256) -> Result<I256, PerpError> {
    signed_mul_div(a, b, d, false)
}

/// Signed `a * b / d`, rounding toward negative infinity
pub fn mul_div_floor(a: I256, b: I256, d: I256) -> Result<I256, PerpError> {
    signed_mul_div(a, b, d, true)
}

fn signed_mul_div(a: I256, b: I256, d: I256, floor: bool) -> Result<I256, PerpError> {
    if d == I256::ZERO {
        return Err(PerpError::DivisionByZero);
    }

    let negative = a.is_negative() ^ b.is_negative() ^ d.is_negative();
    let magnitude = mul_div_u256(abs_u256(a), abs_u256(b), abs_u256(d), floor && negative)?;

    if negative {
        neg_from_magnitude(magnitude)
    } else {
        to_signed(magnitude)
    }
}

/// Magnitude of a signed word, exact for `I256::MIN`
#[inline]
pub fn abs_u256(x: I256) -> U256 {
    let v = if x.is_negative() { x.wrapping_neg() } else { x };
    let (hi, lo) = v.into_words();
    U256::from_words(hi as u128, lo as u128)
}

/// Checked unsigned-to-signed conversion
#[inline]
pub fn to_signed(x: U256) -> Result<I256, PerpError> {
    let (hi, lo) = x.into_words();
    if hi > i128::MAX as u128 {
        return Err(PerpError::ArithmeticOverflow);
    }
    Ok(I256::from_words(hi as i128, lo as i128))
}

fn neg_from_magnitude(m: U256) -> Result<I256, PerpError> {
    let limit = U256::from_words(1u128 << 127, 0);
    if m > limit {
        return Err(PerpError::ArithmeticOverflow);
    }
    let (hi, lo) = m.into_words();
    Ok(I256::from_words(hi as i128, lo as i128).wrapping_neg())
}

/// Checked narrowing to i128
#[inline]
pub fn to_i128(x: I256) -> Result<i128, PerpError> {
    let (hi, lo) = x.into_words();
    if (hi == 0 && lo >= 0) || (hi == -1 && lo < 0) {
        Ok(lo)
    } else {
        Err(PerpError::ArithmeticOverflow)
    }
}

/// Checked narrowing to u128
#[inline]
pub fn to_u128(x: U256) -> Result<u128, PerpError> {
    let (hi, lo) = x.into_words();
    if hi != 0 {
        return Err(PerpError::ArithmeticOverflow);
    }
    Ok(lo)
}

#[inline]
pub fn checked_add(a: I256, b: I256) -> Result<I256, PerpError> {
    a.checked_add(b).ok_or(PerpError::ArithmeticOverflow)
}

#[inline]
pub fn checked_sub(a: I256, b: I256) -> Result<I256, PerpError> {
    a.checked_sub(b).ok_or(PerpError::ArithmeticOverflow)
}
