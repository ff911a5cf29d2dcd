//! Restoring long division.
//!
//! Implements unsigned and signed 32-bit divide/remainder for targets without
//! a hardware divider, using only shifts, compares, and subtraction.
//!
//! Two boundary conditions are resolved explicitly:
//! 1. **Zero denominator:** every routine returns [`ArithError::DivisionByZero`].
//! 2. **`i32::MIN / -1`:** the quotient wraps to `i32::MIN` and the remainder is
//!    `0`, matching two's-complement hardware divide overflow.

use crate::common::ArithError;
use crate::common::constants::XLEN_BITS;

/// Quotient and remainder produced by a single long division.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DivMod {
    /// Truncated quotient.
    pub quotient: u32,
    /// Remainder, always less than the denominator.
    pub remainder: u32,
}

/// Divides `numerator` by `denominator` with restoring binary long division.
///
/// Bits are processed from bit 31 down to bit 0: the running remainder is
/// shifted left, the next numerator bit is brought in, and whenever the
/// remainder reaches the denominator it is reduced and the matching quotient
/// bit is set.
///
/// # Errors
///
/// Returns [`ArithError::DivisionByZero`] when `denominator` is zero.
///
/// # Examples
///
/// ```
/// use dutsim_core::softmath::unsigned_divmod;
///
/// let r = unsigned_divmod(100, 7).unwrap();
/// assert_eq!((r.quotient, r.remainder), (14, 2));
/// ```
pub const fn unsigned_divmod(numerator: u32, denominator: u32) -> Result<DivMod, ArithError> {
    if denominator == 0 {
        return Err(ArithError::DivisionByZero);
    }

    let mut quotient: u32 = 0;
    let mut remainder: u32 = 0;
    let mut bit = XLEN_BITS;
    while bit > 0 {
        bit -= 1;
        // After k bits the remainder is below 2^k, so the shift cannot overflow.
        remainder = (remainder << 1) | ((numerator >> bit) & 1);
        if remainder >= denominator {
            remainder -= denominator;
            quotient |= 1 << bit;
        }
    }

    Ok(DivMod {
        quotient,
        remainder,
    })
}

/// Unsigned quotient of `numerator / denominator`.
///
/// # Errors
///
/// Returns [`ArithError::DivisionByZero`] when `denominator` is zero.
pub const fn unsigned_divide(numerator: u32, denominator: u32) -> Result<u32, ArithError> {
    match unsigned_divmod(numerator, denominator) {
        Ok(r) => Ok(r.quotient),
        Err(e) => Err(e),
    }
}

/// Unsigned remainder of `numerator / denominator`.
///
/// # Errors
///
/// Returns [`ArithError::DivisionByZero`] when `denominator` is zero.
pub const fn unsigned_remainder(numerator: u32, denominator: u32) -> Result<u32, ArithError> {
    match unsigned_divmod(numerator, denominator) {
        Ok(r) => Ok(r.remainder),
        Err(e) => Err(e),
    }
}

/// Signed quotient, truncated toward zero.
///
/// The result is negative exactly when one operand is negative. Operand
/// magnitudes are taken as `u32`, so `i32::MIN` keeps its exact magnitude of
/// 2^31; only `i32::MIN / -1` overflows and wraps to `i32::MIN`.
///
/// # Errors
///
/// Returns [`ArithError::DivisionByZero`] when `denominator` is zero.
///
/// # Examples
///
/// ```
/// use dutsim_core::softmath::signed_divide;
///
/// assert_eq!(signed_divide(-7, 2), Ok(-3));
/// assert_eq!(signed_divide(i32::MIN, -1), Ok(i32::MIN));
/// ```
pub const fn signed_divide(numerator: i32, denominator: i32) -> Result<i32, ArithError> {
    let negative = (numerator < 0) ^ (denominator < 0);
    let quotient = match unsigned_divide(numerator.unsigned_abs(), denominator.unsigned_abs()) {
        Ok(q) => q as i32,
        Err(e) => return Err(e),
    };
    Ok(if negative {
        quotient.wrapping_neg()
    } else {
        quotient
    })
}

/// Signed remainder whose sign follows the numerator.
///
/// Pairs with [`signed_divide`] so that `q * d + r == n` under wrapping
/// arithmetic for every non-zero `d`.
///
/// # Errors
///
/// Returns [`ArithError::DivisionByZero`] when `denominator` is zero.
pub const fn signed_remainder(numerator: i32, denominator: i32) -> Result<i32, ArithError> {
    let remainder = match unsigned_remainder(numerator.unsigned_abs(), denominator.unsigned_abs()) {
        Ok(r) => r as i32,
        Err(e) => return Err(e),
    };
    Ok(if numerator < 0 {
        remainder.wrapping_neg()
    } else {
        remainder
    })
}
