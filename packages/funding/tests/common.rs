#![allow(dead_code)]

use perpamm_math::{Q128, U256};

/// Price 1.0 as Q128
pub fn one() -> U256 {
    Q128
}

/// `num / den` as a Q128 price
pub fn price(num: u128, den: u128) -> U256 {
    Q128 * U256::from(num) / U256::from(den)
}
