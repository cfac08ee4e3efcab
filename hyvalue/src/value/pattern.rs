//! Ternary pattern matching.
//!
//! Patterns are strings over `{0, 1, *}` written most significant bit first,
//! one character per bit of the matched value. `*` accepts either bit value.
use num_bigint::BigInt;

use crate::{
    shape::Shape,
    utils::{Error, Result},
    value::{Value, constant::Const},
};

/// Care mask and expected bits of a single validated pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern {
    mask: BigInt,
    bits: BigInt,
}

impl Pattern {
    fn parse(pattern: &str, width: u32) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if let Some(c) = pattern.chars().find(|c| !matches!(c, '0' | '1' | '*')) {
            return Err(invalid(format!(
                "character `{}` is not one of `0`, `1` or `*`",
                c
            )));
        }
        if pattern.len() != width as usize {
            return Err(invalid(format!(
                "pattern is {} bit(s) long but the value is {} bit(s) wide",
                pattern.len(),
                width
            )));
        }

        let mut mask = BigInt::ZERO;
        let mut bits = BigInt::ZERO;
        for (index, c) in pattern.bytes().rev().enumerate() {
            let index = index as u64;
            match c {
                b'0' => mask.set_bit(index, true),
                b'1' => {
                    mask.set_bit(index, true);
                    bits.set_bit(index, true);
                }
                _ => {}
            }
        }

        Ok(Self { mask, bits })
    }
}

impl Value {
    /// Single-bit expression that is set when the value matches any of `patterns`.
    ///
    /// Every pattern is validated before any node is built. Matching against no
    /// pattern at all yields a constant `0`.
    ///
    /// ```rust
    /// # use hyvalue::value::{Value, constant::Const};
    /// let v = Value::from(Const::new(5, None));
    /// assert!(!v.matches(&["101"]).unwrap().as_const().unwrap().is_zero());
    /// assert!(!v.matches(&["1*1"]).unwrap().as_const().unwrap().is_zero());
    /// assert!(v.matches(&["010"]).unwrap().as_const().unwrap().is_zero());
    /// assert!(v.matches(&["01x"]).unwrap_err().is_invalid_pattern());
    /// ```
    #[track_caller]
    pub fn matches<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Value> {
        let width = self.shape().width();
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::parse(pattern.as_ref(), width))
            .collect::<Result<Vec<_>>>()?;

        let shape = Shape::derived(width, false);
        let bits = self.as_unsigned();

        Ok(patterns
            .into_iter()
            .map(|pattern| {
                (bits.clone() & Const::with_shape(pattern.mask, shape))
                    .cmp_eq(Const::with_shape(pattern.bits, shape))
            })
            .reduce(|acc, term| acc | term)
            .unwrap_or_else(|| Const::from(false).into()))
    }
}
