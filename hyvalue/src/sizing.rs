//! Numeric sizing helpers.
//!
//! Pure functions that compute how many bits are needed to hold an integer.
//! They operate on [`BigInt`] so that no precision is ever lost, whatever the
//! magnitude of the value being sized.
use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};

use crate::utils::{Error, Result};

/// Number of bits in the binary representation of `|n|`.
///
/// Zero is reported as one bit wide unless `zero_is_zero` is set.
///
/// ```rust
/// # use hyvalue::sizing::bit_length;
/// # use num_bigint::BigInt;
/// assert_eq!(bit_length(&BigInt::from(5), false), 3);
/// assert_eq!(bit_length(&BigInt::from(-8), false), 4);
/// assert_eq!(bit_length(&BigInt::from(0), false), 1);
/// assert_eq!(bit_length(&BigInt::from(0), true), 0);
/// ```
pub fn bit_length(n: &BigInt, zero_is_zero: bool) -> u32 {
    if n.is_zero() {
        return if zero_is_zero { 0 } else { 1 };
    }
    n.bits() as u32
}

/// Integer base-2 logarithm of `n`, rounded up.
///
/// With `need_pow2` set, `n` must be an exact power of two. Returns 0 for `n == 0`.
pub fn log2_int(n: &BigInt, need_pow2: bool) -> Result<u32> {
    match n.sign() {
        Sign::Minus => Err(Error::NegativeLogarithm { value: n.clone() }),
        Sign::NoSign => Ok(0),
        Sign::Plus => {
            let r = ceil_log2(n);
            if need_pow2 && (BigInt::one() << r) != *n {
                return Err(Error::NotPowerOfTwo { value: n.clone() });
            }
            Ok(r)
        }
    }
}

/// Minimal width needed to represent `n`.
///
/// Non-positive values always carry a sign bit. For positive values the sign bit
/// is only added when `require_sign_bit` is set.
///
/// ```rust
/// # use hyvalue::sizing::bits_for;
/// # use num_bigint::BigInt;
/// assert_eq!(bits_for(&BigInt::from(7), false), 3);
/// assert_eq!(bits_for(&BigInt::from(7), true), 4);
/// assert_eq!(bits_for(&BigInt::from(-8), false), 4);
/// ```
pub fn bits_for(n: &BigInt, require_sign_bit: bool) -> u32 {
    if n.sign() == Sign::Plus {
        let bits = ceil_log2(&(n + BigInt::one()));
        if require_sign_bit { bits + 1 } else { bits }
    } else {
        ceil_log2(&-n) + 1
    }
}

/// `ceil(log2(n))` for non-negative `n`, with `ceil_log2(0) == 0`.
fn ceil_log2(n: &BigInt) -> u32 {
    if n.is_zero() {
        0
    } else {
        (n - BigInt::one()).bits() as u32
    }
}
