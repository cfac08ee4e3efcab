//! Bit-width and signedness descriptors.
//!
//! Every value in the algebra carries a [`Shape`]. Shapes are small `Copy`
//! values compared structurally. They can be built directly with
//! [`Shape::unsigned`]/[`Shape::signed`] or derived from a [`ShapeSource`]
//! through [`Shape::cast`].
use std::collections::BTreeMap;

use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use crate::{
    range::IntRange,
    sizing::bits_for,
    utils::{Error, Result},
};

/// Width and signedness of a value.
///
/// The width is always at least one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    width: u32,
    signed: bool,
}

impl Shape {
    pub const MIN_WIDTH: u32 = 1;
    pub const MAX_WIDTH: u32 = (1 << 23) - 1;

    /// Single unsigned bit, the shape of every boolean expression.
    pub const BIT: Self = Self {
        width: 1,
        signed: false,
    };

    #[inline]
    const fn check_validity(width: i64) -> bool {
        width >= Self::MIN_WIDTH as i64 && width <= Self::MAX_WIDTH as i64
    }

    fn checked(width: i64, signed: bool) -> Result<Self> {
        if Self::check_validity(width) {
            Ok(Self {
                width: width as u32,
                signed,
            })
        } else {
            Err(Error::InvalidShape {
                width,
                max: Self::MAX_WIDTH,
            })
        }
    }

    /// Shapes derived internally (operator growth, constant sizing) are clamped
    /// into `MIN_WIDTH..=MAX_WIDTH` instead of being rejected.
    #[inline]
    pub(crate) const fn derived(width: u32, signed: bool) -> Self {
        let width = if width < Self::MIN_WIDTH {
            Self::MIN_WIDTH
        } else if width > Self::MAX_WIDTH {
            Self::MAX_WIDTH
        } else {
            width
        };
        Self { width, signed }
    }

    /// Create an unsigned shape of the given width.
    ///
    /// ```rust
    /// # use hyvalue::shape::Shape;
    /// assert_eq!(Shape::unsigned(4).unwrap().width(), 4);
    /// assert!(Shape::unsigned(0).is_err());
    /// ```
    pub fn unsigned(width: u32) -> Result<Self> {
        Self::checked(width as i64, false)
    }

    /// Create a signed shape of the given width.
    pub fn signed(width: u32) -> Result<Self> {
        Self::checked(width as i64, true)
    }

    /// Create a shape of the given width and signedness.
    pub fn new(width: u32, signed: bool) -> Result<Self> {
        Self::checked(width as i64, signed)
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn is_signed(&self) -> bool {
        self.signed
    }

    #[inline]
    pub const fn is_unsigned(&self) -> bool {
        !self.signed
    }

    /// Same width, unsigned.
    #[inline]
    pub const fn as_unsigned(&self) -> Self {
        Self {
            width: self.width,
            signed: false,
        }
    }

    /// Same width, signed.
    #[inline]
    pub const fn as_signed(&self) -> Self {
        Self {
            width: self.width,
            signed: true,
        }
    }

    /// Smallest representable value.
    pub fn min_value(&self) -> BigInt {
        if self.signed {
            -(BigInt::from(1) << (self.width - 1))
        } else {
            BigInt::ZERO
        }
    }

    /// Largest representable value.
    pub fn max_value(&self) -> BigInt {
        if self.signed {
            (BigInt::from(1) << (self.width - 1)) - 1
        } else {
            (BigInt::from(1) << self.width) - 1
        }
    }

    /// Minimal shape able to represent every value in `values`.
    ///
    /// Signedness is forced on as soon as one value is negative. Returns `None`
    /// if `values` is empty.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a BigInt> + Clone) -> Option<Self> {
        let signed = values.clone().into_iter().any(|v| v.sign() == num_bigint::Sign::Minus);
        values
            .into_iter()
            .map(|v| bits_for(v, signed))
            .max()
            .map(|width| Self::derived(width, signed))
    }

    /// Derive a shape from any of the accepted [`ShapeSource`]s.
    ///
    /// ```rust
    /// # use hyvalue::{shape::{Shape, ShapeSource}, range::IntRange};
    /// let s = Shape::cast(IntRange::new(-3, 8, 1).unwrap()).unwrap();
    /// assert_eq!(s, Shape::signed(4).unwrap());
    ///
    /// let s = Shape::cast(8).unwrap();
    /// assert_eq!(s, Shape::unsigned(8).unwrap());
    /// ```
    pub fn cast(source: impl Into<ShapeSource>) -> Result<Self> {
        match source.into() {
            ShapeSource::FromShape(shape) => Ok(shape),
            ShapeSource::FromWidth(width) => Self::checked(width, false),
            ShapeSource::FromPair(width, signed) => Self::checked(width, signed),
            ShapeSource::FromRange(range) => {
                let endpoints: Vec<BigInt> = range
                    .first()
                    .into_iter()
                    .chain(range.last())
                    .map(BigInt::from)
                    .collect();
                Self::fit(&endpoints).ok_or(Error::EmptyShapeSource { source_kind: "range" })
            }
            ShapeSource::FromNamedMap(map) => {
                Self::fit(map.values()).ok_or(Error::EmptyShapeSource {
                    source_kind: "mapping",
                })
            }
        }
    }

    /// Structural comparison against anything that casts to a shape.
    ///
    /// Sources that fail to cast compare unequal.
    ///
    /// ```rust
    /// # use hyvalue::shape::Shape;
    /// assert!(Shape::unsigned(4).unwrap().equals((4, false)));
    /// assert!(!Shape::signed(4).unwrap().equals((4, false)));
    /// ```
    pub fn equals(&self, other: impl Into<ShapeSource>) -> bool {
        Self::cast(other).is_ok_and(|other| other == *self)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.signed {
            write!(f, "signed({})", self.width)
        } else {
            write!(f, "unsigned({})", self.width)
        }
    }
}

/// Everything a [`Shape`] can be derived from.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
pub enum ShapeSource {
    /// An existing shape, used as-is.
    FromShape(Shape),

    /// A width for an unsigned shape. This is a width, not a value to be sized.
    FromWidth(i64),

    /// An explicit `(width, signed)` pair.
    FromPair(i64, bool),

    /// The minimal shape holding every element of the range.
    FromRange(IntRange),

    /// The minimal shape holding every value of the mapping (enumeration-like declarations).
    FromNamedMap(BTreeMap<String, BigInt>),
}

impl From<Shape> for ShapeSource {
    fn from(value: Shape) -> Self {
        ShapeSource::FromShape(value)
    }
}

impl From<&Shape> for ShapeSource {
    fn from(value: &Shape) -> Self {
        ShapeSource::FromShape(*value)
    }
}

macro_rules! shape_source_from_width {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for ShapeSource {
                fn from(value: $typ) -> Self {
                    ShapeSource::FromWidth(value as i64)
                }
            }

            impl From<($typ, bool)> for ShapeSource {
                fn from((width, signed): ($typ, bool)) -> Self {
                    ShapeSource::FromPair(width as i64, signed)
                }
            }
        )*
    };
}

shape_source_from_width! { i32, i64, u32 }

impl From<IntRange> for ShapeSource {
    fn from(value: IntRange) -> Self {
        ShapeSource::FromRange(value)
    }
}

impl From<std::ops::Range<i64>> for ShapeSource {
    fn from(value: std::ops::Range<i64>) -> Self {
        ShapeSource::FromRange(IntRange::ascending(value.start, value.end))
    }
}

impl From<BTreeMap<String, BigInt>> for ShapeSource {
    fn from(value: BTreeMap<String, BigInt>) -> Self {
        ShapeSource::FromNamedMap(value)
    }
}

impl<'a> FromIterator<(&'a str, i64)> for ShapeSource {
    fn from_iter<T: IntoIterator<Item = (&'a str, i64)>>(iter: T) -> Self {
        ShapeSource::FromNamedMap(
            iter.into_iter()
                .map(|(name, value)| (name.to_string(), BigInt::from(value)))
                .collect(),
        )
    }
}
