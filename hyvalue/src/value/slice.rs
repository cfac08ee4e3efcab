use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::One;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    location::{Provenance, SrcLoc},
    shape::Shape,
    utils::{Error, Result},
    value::{Assignable, FoldCache, SignalSet, Value, constant::Const},
};

/// A contiguous bit range `[start, stop)` of another value.
///
/// Bounds are stored already normalized, so `0 <= start < stop <= width`
/// always holds. The result is unsigned and `stop - start` bits wide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slice {
    value: Value,
    start: u32,
    stop: u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    src_loc: Provenance,
}

impl Slice {
    /// Slice `value`. Negative bounds count from the end of the value, so
    /// `-1` designates its most significant bit.
    ///
    /// ```rust
    /// # use hyvalue::value::{constant::Const, slice::Slice};
    /// let s = Slice::new(Const::new(0b1011_0110, None), -4, 8).unwrap();
    /// assert_eq!((s.start(), s.stop()), (4, 8));
    /// assert_eq!(s.as_const().unwrap().value(), &0b1011.into());
    ///
    /// assert!(Slice::new(Const::new(1, None), 0, 0).unwrap_err().is_out_of_range());
    /// ```
    #[track_caller]
    pub fn new(value: impl Into<Value>, start: i64, stop: i64) -> Result<Self> {
        let value = value.into();
        let width = value.shape().width();

        let wrap = |index: i64| if index < 0 { index + width as i64 } else { index };
        let (norm_start, norm_stop) = (wrap(start), wrap(stop));

        if norm_start < 0 || norm_stop > width as i64 || norm_start >= norm_stop {
            return Err(Error::OutOfRange { start, stop, width });
        }

        Ok(Self {
            value,
            start: norm_start as u32,
            stop: norm_stop as u32,
            src_loc: Provenance::here(),
        })
    }

    pub fn with_src_loc(mut self, src_loc: SrcLoc) -> Self {
        self.src_loc = src_loc.into();
        self
    }

    /// The sliced value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> u32 {
        self.stop
    }

    pub fn src_loc(&self) -> Option<&SrcLoc> {
        self.src_loc.get()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::derived(self.stop - self.start, false)
    }

    pub fn rhs_signals(&self) -> SignalSet {
        self.value.rhs_signals()
    }

    pub fn as_const(&self) -> Result<Const> {
        self.fold(&mut FoldCache::default())
    }

    pub(crate) fn fold(&self, cache: &mut FoldCache) -> Result<Const> {
        let inner = self.value.fold(cache)?;
        let mask = (BigInt::one() << (self.stop - self.start)) - BigInt::one();
        let bits = (inner.bits() >> self.start) & mask;
        let folded = Const::with_shape(bits, self.shape());

        Ok(match self.src_loc() {
            Some(src_loc) => folded.with_src_loc(*src_loc),
            None => folded,
        })
    }
}

/// A slice can be driven exactly when the sliced value can.
impl Assignable for Slice {
    fn lhs_signals(&self) -> Result<SignalSet> {
        self.value.lhs_signals()
    }
}

impl From<Slice> for Value {
    fn from(value: Slice) -> Self {
        Value::Slice(Arc::new(value))
    }
}
