//! Shift-and-add multiplication.
//!
//! Implements the 32-bit multiply helper for targets without a hardware
//! multiplier. Only addition, shifts, and bit tests are used; the result is
//! the low 32 bits of the true product and wraps silently.

/// Multiplies two 32-bit values using shift-and-add.
///
/// Each iteration adds `a` to the accumulator when the low bit of `b` is
/// set, then shifts `a` left and `b` right. The loop ends when `b` reaches
/// zero, so it runs at most 32 times.
///
/// # Arguments
///
/// * `a` - Multiplicand.
/// * `b` - Multiplier, consumed one bit per iteration.
///
/// # Returns
///
/// The low 32 bits of `a * b`.
///
/// # Examples
///
/// ```
/// use dutsim_core::softmath::multiply;
///
/// assert_eq!(multiply(6, 7), 42);
/// assert_eq!(multiply(0x8000_0000, 2), 0);
/// ```
pub const fn multiply(a: u32, b: u32) -> u32 {
    let mut acc: u32 = 0;
    let mut a = a;
    let mut b = b;
    while b != 0 {
        if b & 1 != 0 {
            acc = acc.wrapping_add(a);
        }
        a <<= 1;
        b >>= 1;
    }
    acc
}

/// Signed view of [`multiply`].
///
/// The low 32 bits of a two's-complement product do not depend on operand
/// signedness, so the multiplier is walked as an unsigned bit pattern. A
/// negative multiplier therefore still terminates and yields the wrapped
/// product.
pub const fn multiply_signed(a: i32, b: i32) -> i32 {
    multiply(a as u32, b as u32) as i32
}
