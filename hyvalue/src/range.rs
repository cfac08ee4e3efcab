//! Integer ranges.
//!
//! [`IntRange`] mirrors a half-open `start..stop` sequence with an arbitrary
//! non-zero step, ascending or descending. It is mostly used as a source for
//! [`crate::shape::Shape::cast`], where it is sized by its first and last element.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::utils::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntRange {
    start: i64,
    stop: i64,
    step: i64,
}

impl IntRange {
    /// Create a new range. Fails when `step` is zero.
    ///
    /// ```rust
    /// # use hyvalue::range::IntRange;
    /// let r = IntRange::new(0, 5, 2).unwrap();
    /// assert_eq!(r.iter().collect::<Vec<_>>(), vec![0, 2, 4]);
    ///
    /// let r = IntRange::new(5, 0, -2).unwrap();
    /// assert_eq!(r.iter().collect::<Vec<_>>(), vec![5, 3, 1]);
    /// ```
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::InvalidRangeStep);
        }
        Ok(Self { start, stop, step })
    }

    /// Shorthand for `IntRange::new(start, stop, 1)`.
    pub fn ascending(start: i64, stop: i64) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> i64 {
        self.stop
    }

    #[inline]
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of elements produced by the range.
    pub fn len(&self) -> u64 {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        let span = if step > 0 { stop - start } else { start - stop };
        if span <= 0 {
            0
        } else {
            let step = step.abs();
            ((span + step - 1) / step) as u64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First element of the range, if any.
    pub fn first(&self) -> Option<i64> {
        (!self.is_empty()).then_some(self.start)
    }

    /// Last element of the range, if any.
    pub fn last(&self) -> Option<i64> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let last = self.start as i128 + (len as i128 - 1) * self.step as i128;
        Some(last as i64)
    }

    pub fn iter(&self) -> IntRangeIter {
        IntRangeIter {
            next: self.start as i128,
            remaining: self.len(),
            step: self.step as i128,
        }
    }
}

impl IntoIterator for IntRange {
    type Item = i64;
    type IntoIter = IntRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &IntRange {
    type Item = i64;
    type IntoIter = IntRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`IntRange`].
#[derive(Debug, Clone)]
pub struct IntRangeIter {
    next: i128,
    remaining: u64,
    step: i128,
}

impl Iterator for IntRangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        self.next += self.step;
        Some(current as i64)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, usize::try_from(self.remaining).ok())
    }
}

impl std::fmt::Display for IntRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.step == 1 {
            write!(f, "range({}, {})", self.start, self.stop)
        } else {
            write!(f, "range({}, {}, {})", self.start, self.stop, self.step)
        }
    }
}
