//! References to declared signals.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    registry::SignalId,
    shape::Shape,
    utils::Result,
    value::{Assignable, SignalSet},
};

/// Reference to a signal declared in a [`crate::registry::SignalRegistry`].
///
/// The reference carries the shape of the signal so that shape inference never
/// needs to consult the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalRef {
    id: SignalId,
    shape: Shape,
}

impl SignalRef {
    pub(crate) fn new(id: SignalId, shape: Shape) -> Self {
        Self { id, shape }
    }

    #[inline]
    pub fn id(&self) -> SignalId {
        self.id
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rhs_signals(&self) -> SignalSet {
        SignalSet::from([self.id])
    }
}

impl Assignable for SignalRef {
    fn lhs_signals(&self) -> Result<SignalSet> {
        Ok(SignalSet::from([self.id]))
    }
}
