#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    location::{Provenance, SrcLoc},
    shape::Shape,
};

/// An unconstrained value of a given shape.
///
/// Placeholders have no signal identity: they never appear in signal sets and
/// cannot be folded into a constant. They stand for "any possible value" in
/// assertions and proofs and have no hardware counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnyValue {
    shape: Shape,
    #[cfg_attr(feature = "serde", serde(skip))]
    src_loc: Provenance,
}

impl AnyValue {
    #[track_caller]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            src_loc: Provenance::here(),
        }
    }

    pub fn with_src_loc(mut self, src_loc: SrcLoc) -> Self {
        self.src_loc = src_loc.into();
        self
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn src_loc(&self) -> Option<&SrcLoc> {
        self.src_loc.get()
    }
}

impl std::fmt::Display for AnyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(any {})", self.shape)
    }
}
