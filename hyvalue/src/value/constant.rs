//! Constant literals.
use num_bigint::BigInt;
use num_traits::{One, Zero};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    location::{Provenance, SrcLoc},
    shape::Shape,
    sizing::bits_for,
};

/// A fixed-width literal.
///
/// `value` is always the canonical two's-complement representative of the raw
/// integer for `shape`: in `[0, 2^w - 1]` when unsigned and in
/// `[-2^(w-1), 2^(w-1) - 1]` when signed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Const {
    value: BigInt,
    shape: Shape,
    #[cfg_attr(feature = "serde", serde(skip))]
    src_loc: Provenance,
}

impl Const {
    /// Create a constant. Without an explicit shape, the minimal shape holding
    /// `value` is used (signed only when `value` is negative).
    ///
    /// ```rust
    /// # use hyvalue::{value::constant::Const, shape::Shape};
    /// let c = Const::new(5, None);
    /// assert_eq!(c.shape(), Shape::unsigned(3).unwrap());
    ///
    /// let c = Const::new(-5, None);
    /// assert_eq!(c.shape(), Shape::signed(4).unwrap());
    /// assert_eq!(c.value(), &(-5).into());
    ///
    /// let c = Const::new(-1, Some(Shape::unsigned(4).unwrap()));
    /// assert_eq!(c.value(), &15.into());
    /// ```
    #[track_caller]
    pub fn new(value: impl Into<BigInt>, shape: Option<Shape>) -> Self {
        let value = value.into();
        let shape = shape.unwrap_or_else(|| Self::minimal_shape(&value));
        Self {
            value: Self::normalize(&value, shape),
            shape,
            src_loc: Provenance::here(),
        }
    }

    /// Create a constant of an explicit shape.
    #[track_caller]
    pub fn with_shape(value: impl Into<BigInt>, shape: Shape) -> Self {
        Self::new(value, Some(shape))
    }

    /// Replace the recorded construction site.
    pub fn with_src_loc(mut self, src_loc: SrcLoc) -> Self {
        self.src_loc = src_loc.into();
        self
    }

    /// Minimal shape able to hold `value`.
    pub fn minimal_shape(value: &BigInt) -> Shape {
        let signed = value.sign() == num_bigint::Sign::Minus;
        Shape::derived(bits_for(value, signed), signed)
    }

    /// Reduce `value` to its canonical two's-complement representative for `shape`.
    ///
    /// The low `width` bits are kept; for signed shapes bit `width - 1` is then
    /// propagated to every higher bit.
    pub fn normalize(value: &BigInt, shape: Shape) -> BigInt {
        let mask = (BigInt::one() << shape.width()) - BigInt::one();
        let value = value & &mask;
        if shape.is_signed() && value.bit(shape.width() as u64 - 1) {
            value | !mask
        } else {
            value
        }
    }

    #[inline]
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn src_loc(&self) -> Option<&SrcLoc> {
        self.src_loc.get()
    }

    /// The raw bit pattern of this constant, i.e. its unsigned reinterpretation.
    pub fn bits(&self) -> BigInt {
        Self::normalize(&self.value, self.shape.as_unsigned())
    }

    /// Value of bit `index` (0 is the least significant bit).
    pub fn bit(&self, index: u32) -> bool {
        self.value.bit(index as u64)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Reinterpret the same bits under another shape, truncating or extending as needed.
    #[track_caller]
    pub fn cast_to(&self, shape: Shape) -> Self {
        Self::new(self.value.clone(), Some(shape))
    }
}

impl std::fmt::Display for Const {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.shape.is_signed() {
            write!(f, "(const {}'sd{})", self.shape.width(), self.value)
        } else {
            write!(f, "(const {}'d{})", self.shape.width(), self.value)
        }
    }
}

macro_rules! const_from_int {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for Const {
                #[track_caller]
                fn from(value: $typ) -> Self {
                    Const::new(value, None)
                }
            }
        )*
    };
}

const_from_int! { i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, BigInt }

impl From<bool> for Const {
    #[track_caller]
    fn from(value: bool) -> Self {
        Const::new(value as u8, Some(Shape::BIT))
    }
}
