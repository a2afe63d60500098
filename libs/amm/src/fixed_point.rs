//! Integer fixed-point helpers with caller-chosen rounding
//!
//! Every quotient in the protocol goes through [`mul_div`], and every call
//! site names its [`Rounding`]. Amounts paid out of a pool or minted to a
//! caller round [`Rounding::Down`]; amounts charged to a caller round
//! [`Rounding::Up`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rounding direction of an integer quotient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Toward zero (floor for non-negative operands)
    Down,
    /// Away from zero (ceiling for non-negative operands)
    Up,
}

/// Errors that can occur during integer AMM arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Intermediate value exceeds `u128`
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Subtraction would go below zero
    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,

    /// One side of the pool holds nothing
    #[error("pool reserves are empty")]
    EmptyReserves,

    /// Requested output is not strictly below the output reserve
    #[error("requested {requested} but reserve holds {reserve}")]
    InsufficientReserve { requested: u128, reserve: u128 },
}

/// `a * b / denominator`, rounded as requested
///
/// Fails instead of wrapping when `a * b` does not fit in a `u128`.
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(MathError::ArithmeticOverflow)?;
    let quotient = product / denominator;
    match rounding {
        Rounding::Up if product % denominator != 0 => Ok(quotient + 1),
        _ => Ok(quotient),
    }
}

/// `numerator / denominator`, rounded as requested
pub fn div(numerator: u128, denominator: u128, rounding: Rounding) -> Result<u128, MathError> {
    mul_div(numerator, 1, denominator, rounding)
}

/// Floor of the square root
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Newton iteration from an upper bound; never overflows for n == u128::MAX
    let mut x = n;
    let mut y = n / 2 + (n & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_add(b).ok_or(MathError::ArithmeticOverflow)
}

pub fn checked_sub(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_sub(b).ok_or(MathError::Underflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div(10, 1, 3, Rounding::Down), Ok(3));
        assert_eq!(mul_div(10, 1, 3, Rounding::Up), Ok(4));
        // Exact quotients never round up
        assert_eq!(mul_div(9, 1, 3, Rounding::Up), Ok(3));
        assert_eq!(mul_div(0, 7, 3, Rounding::Up), Ok(0));
    }

    #[test]
    fn test_mul_div_failures() {
        assert_eq!(
            mul_div(u128::MAX, 2, 3, Rounding::Down),
            Err(MathError::ArithmeticOverflow)
        );
        assert_eq!(mul_div(1, 1, 0, Rounding::Down), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(10), 3);
        assert_eq!(isqrt(200_000_000), 14142);
        assert_eq!(
            isqrt(50_000_000_000_000 * 50_000_000_000_000),
            50_000_000_000_000
        );
        assert_eq!(isqrt(u128::MAX), u64::MAX as u128);
    }

    #[test]
    fn test_checked_helpers() {
        assert_eq!(checked_add(u128::MAX, 1), Err(MathError::ArithmeticOverflow));
        assert_eq!(checked_sub(1, 2), Err(MathError::Underflow));
        assert_eq!(div(7, 2, Rounding::Up), Ok(4));
    }

    proptest! {
        #[test]
        fn prop_isqrt_is_floor(n in any::<u64>()) {
            let n = n as u128;
            let r = isqrt(n);
            prop_assert!(r * r <= n);
            prop_assert!((r + 1) * (r + 1) > n);
        }

        #[test]
        fn prop_up_is_down_plus_remainder(a in 0u128..1u128 << 60, b in 0u128..1u128 << 60, d in 1u128..1u128 << 60) {
            let down = mul_div(a, b, d, Rounding::Down).unwrap();
            let up = mul_div(a, b, d, Rounding::Up).unwrap();
            let exact = (a * b) % d == 0;
            prop_assert_eq!(up, if exact { down } else { down + 1 });
        }
    }
}
