//! Signal registry
//!
//! Signals are the only named, assignable leaves of the expression algebra.
//! Rather than relying on a hidden process-wide counter, identifiers are
//! handed out by an explicit [`SignalRegistry`] that callers thread through
//! construction. The registry is internally synchronized so that it can be
//! shared (e.g. behind an `Arc`) between threads building independent trees.
use log::debug;
use num_bigint::BigInt;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    location::{Provenance, SrcLoc},
    shape::Shape,
    value::{constant::Const, signal::SignalRef},
};

/// Identifier of a signal declared in a [`SignalRegistry`].
///
/// Identifiers are allocated monotonically, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalId(pub u32);

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Declaration record of a signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signal {
    pub id: SignalId,
    pub name: String,
    pub shape: Shape,

    /// Value the signal takes on reset, already normalized to `shape`.
    pub reset: BigInt,

    pub src_loc: Provenance,
}

/// Owner of every signal declaration and of the id counter.
///
/// ```rust
/// # use hyvalue::{registry::SignalRegistry, shape::Shape};
/// let reg = SignalRegistry::new();
/// let a = reg.declare(Some("a"), Shape::unsigned(8).unwrap());
/// let b = reg.declare(None, Shape::signed(4).unwrap());
/// assert_ne!(a.id(), b.id());
/// assert_eq!(reg.name(a.id()).as_deref(), Some("a"));
/// assert_eq!(reg.name(b.id()), Some(format!("${}", b.id().0)));
/// ```
#[derive(Debug, Default)]
pub struct SignalRegistry {
    signals: RwLock<Vec<Signal>>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new signal with a zero reset value.
    ///
    /// Unnamed signals are given the name `$<id>`.
    #[track_caller]
    pub fn declare(&self, name: Option<&str>, shape: Shape) -> SignalRef {
        self.declare_at(name, shape, BigInt::ZERO, SrcLoc::caller())
    }

    /// Declare a new signal with an explicit reset value.
    ///
    /// The reset value is truncated and sign-extended to the shape of the signal.
    #[track_caller]
    pub fn declare_with_reset(
        &self,
        name: Option<&str>,
        shape: Shape,
        reset: impl Into<BigInt>,
    ) -> SignalRef {
        self.declare_at(name, shape, reset.into(), SrcLoc::caller())
    }

    /// Declare a new signal, recording an explicit construction site.
    pub fn declare_at(
        &self,
        name: Option<&str>,
        shape: Shape,
        reset: BigInt,
        src_loc: SrcLoc,
    ) -> SignalRef {
        let reset = Const::normalize(&reset, shape);
        let mut signals = self.signals.write();

        // Ids are indices; allocation happens under the write lock.
        let id = SignalId(signals.len() as u32);
        let name = match name {
            Some(name) => name.to_string(),
            None => id.to_string(),
        };

        debug!(
            "Declared signal `{}` ({}) with shape {} and reset {} at {}.",
            name, id, shape, reset, src_loc
        );

        signals.push(Signal {
            id,
            name,
            shape,
            reset,
            src_loc: src_loc.into(),
        });

        SignalRef::new(id, shape)
    }

    /// Retrieve the declaration of `id`, if it was declared in this registry.
    ///
    /// The returned guard holds a read lock; drop it before declaring new signals
    /// on the same thread.
    pub fn get(&self, id: SignalId) -> Option<MappedRwLockReadGuard<'_, Signal>> {
        let lock = self.signals.read_recursive();
        RwLockReadGuard::try_map(lock, |signals| signals.get(id.0 as usize)).ok()
    }

    /// Name of the signal `id`, if it was declared in this registry.
    pub fn name(&self, id: SignalId) -> Option<String> {
        self.get(id).map(|signal| signal.name.clone())
    }

    /// Number of signals declared so far.
    pub fn len(&self) -> usize {
        self.signals.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
