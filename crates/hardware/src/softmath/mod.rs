//! Soft integer arithmetic.
//!
//! This module implements the 32-bit multiply/divide helpers that software
//! built for a core without a hardware multiplier or divider links against.
//! Every routine uses only addition, subtraction, comparison, and shifts.
//!
//! Operations are organized into submodules by category:
//! - [`mul`]: shift-and-add multiply
//! - [`div`]: restoring long division (unsigned and signed, quotient and remainder)
//!
//! [`SoftOp`] maps the runtime helper symbols to those routines.

/// Shift-and-add multiplication.
pub mod mul;

/// Restoring long division.
pub mod div;

use std::fmt;

pub use div::{
    DivMod, signed_divide, signed_remainder, unsigned_divide, unsigned_divmod, unsigned_remainder,
};
pub use mul::{multiply, multiply_signed};

use crate::common::ArithError;

/// Soft arithmetic helper, keyed by the runtime symbol it provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoftOp {
    /// `__mulsi3`: low 32 bits of the product.
    Mul,
    /// `__divsi3`: signed quotient.
    Div,
    /// `__udivsi3`: unsigned quotient.
    Divu,
    /// `__modsi3`: signed remainder.
    Rem,
    /// `__umodsi3`: unsigned remainder.
    Remu,
}

impl SoftOp {
    /// Every helper, in symbol-table order.
    pub const ALL: [Self; 5] = [Self::Mul, Self::Div, Self::Divu, Self::Rem, Self::Remu];

    /// Returns the runtime symbol name this helper is linked as.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Mul => "__mulsi3",
            Self::Div => "__divsi3",
            Self::Divu => "__udivsi3",
            Self::Rem => "__modsi3",
            Self::Remu => "__umodsi3",
        }
    }

    /// Looks up a helper by its runtime symbol name.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Returns `true` when the helper interprets its operands as signed.
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Mul | Self::Div | Self::Rem)
    }

    /// Executes the helper on two raw 32-bit register values.
    ///
    /// Signed helpers reinterpret the operands and result as `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`ArithError::DivisionByZero`] for a divide or remainder with `b == 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dutsim_core::softmath::SoftOp;
    ///
    /// assert_eq!(SoftOp::Div.execute(-9i32 as u32, 2), Ok(-4i32 as u32));
    /// assert_eq!(SoftOp::Remu.execute(9, 4), Ok(1));
    /// ```
    pub const fn execute(self, a: u32, b: u32) -> Result<u32, ArithError> {
        match self {
            Self::Mul => Ok(multiply(a, b)),
            Self::Div => match signed_divide(a as i32, b as i32) {
                Ok(q) => Ok(q as u32),
                Err(e) => Err(e),
            },
            Self::Divu => unsigned_divide(a, b),
            Self::Rem => match signed_remainder(a as i32, b as i32) {
                Ok(r) => Ok(r as u32),
                Err(e) => Err(e),
            },
            Self::Remu => unsigned_remainder(a, b),
        }
    }
}

impl fmt::Display for SoftOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
