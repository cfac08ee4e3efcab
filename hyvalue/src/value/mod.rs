//! Value expressions
//!
//! This module holds the expression algebra itself. A [`Value`] is an
//! immutable tree built bottom-up from leaves and inner nodes:
//!
//! - `constant`: fixed-width literals ([`Const`])
//! - `any`: unconstrained placeholders for formal reasoning ([`AnyValue`])
//! - `signal`: references to declared signals ([`SignalRef`])
//! - `operator`: n-ary operations with derived shapes ([`Operator`])
//! - `slice`: contiguous bit ranges ([`Slice`])
//! - `pattern`: `0`/`1`/`*` pattern matching
//!
//! Inner nodes are reference counted, so cloning a [`Value`] is cheap and
//! sub-expressions can be shared freely between trees. Whole-expression queries
//! ([`Value::rhs_signals`], [`Value::as_const`]) visit each shared node once.
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    sync::Arc,
};

use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use strum::{EnumIs, EnumTryAs};

use crate::{
    location::SrcLoc,
    registry::SignalId,
    shape::Shape,
    utils::{Error, Result},
    value::{
        any::AnyValue,
        constant::Const,
        operator::{OpKind, Operator},
        signal::SignalRef,
        slice::Slice,
    },
};

pub mod any;
pub mod constant;
pub mod fmt;
pub mod operator;
pub mod pattern;
pub mod signal;
pub mod slice;

/// Set of signals read or driven by an expression.
pub type SignalSet = BTreeSet<SignalId>;

/// Capability of expressions that can be the target of an assignment.
pub trait Assignable {
    /// Signals driven when this expression is assigned to.
    ///
    /// Fails with [`Error::NotAssignable`] when the expression cannot be driven.
    fn lhs_signals(&self) -> Result<SignalSet>;
}

/// Constants already folded during one [`Value::as_const`] query, keyed by node address.
pub(crate) type FoldCache = HashMap<*const (), Const>;

fn fold_shared<T>(
    node: &Arc<T>,
    cache: &mut FoldCache,
    fold: impl FnOnce(&T, &mut FoldCache) -> Result<Const>,
) -> Result<Const> {
    let key = Arc::as_ptr(node) as *const ();
    if let Some(folded) = cache.get(&key) {
        return Ok(folded.clone());
    }
    let folded = fold(node, cache)?;
    cache.insert(key, folded.clone());
    Ok(folded)
}

/// Signals read by any of `roots`, walking shared sub-expressions once.
pub(crate) fn collect_signals<'a>(roots: impl IntoIterator<Item = &'a Value>) -> SignalSet {
    let mut signals = SignalSet::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<&'a Value> = roots.into_iter().collect();

    while let Some(value) = stack.pop() {
        match value {
            Value::Const(_) | Value::Any(_) => {}
            Value::Signal(signal) => {
                signals.insert(signal.id());
            }
            Value::Operator(op) => {
                if visited.insert(Arc::as_ptr(op) as *const ()) {
                    stack.extend(op.operands());
                }
            }
            Value::Slice(slice) => {
                if visited.insert(Arc::as_ptr(slice) as *const ()) {
                    stack.push(slice.value());
                }
            }
        }
    }
    signals
}

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Const(Const),
    Any(AnyValue),
    Signal(SignalRef),
    Operator(Arc<Operator>),
    Slice(Arc<Slice>),
}

/// Everything a [`Value`] can be cast from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// An existing value, used as-is.
    FromValue(Value),

    /// An integer, wrapped into a minimally shaped constant.
    FromInt(BigInt),

    /// A mapping of named values. Not supported as a value.
    FromNamedMap(BTreeMap<String, BigInt>),
}

impl Value {
    /// Cast a [`ValueSource`] into a value.
    ///
    /// ```rust
    /// # use hyvalue::{value::{Value, ValueSource}, shape::Shape};
    /// let v = Value::cast(7).unwrap();
    /// assert_eq!(v.shape(), Shape::unsigned(3).unwrap());
    /// ```
    #[track_caller]
    pub fn cast(source: impl Into<ValueSource>) -> Result<Value> {
        match source.into() {
            ValueSource::FromValue(value) => Ok(value),
            ValueSource::FromInt(value) => Ok(Value::Const(Const::new(value, None))),
            ValueSource::FromNamedMap(_) => Err(Error::EnumCastUnsupported),
        }
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Const(_) => "const",
            Value::Any(_) => "any",
            Value::Signal(_) => "signal",
            Value::Operator(_) => "operator",
            Value::Slice(_) => "slice",
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::Const(c) => c.shape(),
            Value::Any(any) => any.shape(),
            Value::Signal(signal) => signal.shape(),
            Value::Operator(op) => op.shape(),
            Value::Slice(slice) => slice.shape(),
        }
    }

    /// Construction site of the node, when recorded.
    pub fn src_loc(&self) -> Option<&SrcLoc> {
        match self {
            Value::Const(c) => c.src_loc(),
            Value::Any(any) => any.src_loc(),
            Value::Signal(_) => None,
            Value::Operator(op) => op.src_loc(),
            Value::Slice(slice) => slice.src_loc(),
        }
    }

    /// Signals read when the expression is evaluated.
    pub fn rhs_signals(&self) -> SignalSet {
        collect_signals([self])
    }

    /// Signals driven when the expression is assigned to.
    ///
    /// Only signals and slices of assignable values can be driven.
    pub fn lhs_signals(&self) -> Result<SignalSet> {
        match self {
            Value::Signal(signal) => signal.lhs_signals(),
            Value::Slice(slice) => slice.lhs_signals(),
            Value::Const(_) | Value::Any(_) | Value::Operator(_) => {
                Err(Error::NotAssignable { kind: self.kind() })
            }
        }
    }

    /// Fold the expression into a constant, if every leaf is a constant.
    pub fn as_const(&self) -> Result<Const> {
        self.fold(&mut FoldCache::default())
    }

    pub(crate) fn fold(&self, cache: &mut FoldCache) -> Result<Const> {
        match self {
            Value::Const(c) => Ok(c.clone()),
            Value::Operator(op) => fold_shared(op, cache, Operator::fold),
            Value::Slice(slice) => fold_shared(slice, cache, Slice::fold),
            Value::Any(_) | Value::Signal(_) => Err(Error::NotConstant { kind: self.kind() }),
        }
    }

    #[track_caller]
    fn unary(self, op: OpKind) -> Value {
        Operator::from_parts(op, smallvec![self]).into()
    }

    #[track_caller]
    fn binary(self, op: OpKind, rhs: impl Into<Value>) -> Value {
        Operator::from_parts(op, smallvec![self, rhs.into()]).into()
    }

    /// Bits `[start, stop)`, with negative bounds counted from the end.
    #[track_caller]
    pub fn slice(&self, start: i64, stop: i64) -> Result<Value> {
        Slice::new(self.clone(), start, stop).map(Value::from)
    }

    /// Single bit `index`, with negative indices counted from the end.
    #[track_caller]
    pub fn bit(&self, index: i64) -> Result<Value> {
        let width = self.shape().width();
        let bit = if index < 0 { index + width as i64 } else { index };
        if !(0..width as i64).contains(&bit) {
            return Err(Error::OutOfRange {
                start: index,
                stop: index + 1,
                width,
            });
        }
        self.slice(bit, bit + 1)
    }

    #[track_caller]
    pub fn as_unsigned(&self) -> Value {
        self.clone().unary(OpKind::AsUnsigned)
    }

    #[track_caller]
    pub fn as_signed(&self) -> Value {
        self.clone().unary(OpKind::AsSigned)
    }

    /// `1` when any bit is set.
    #[track_caller]
    pub fn as_bool(&self) -> Value {
        self.clone().unary(OpKind::Bool)
    }

    #[track_caller]
    pub fn any(&self) -> Value {
        self.clone().unary(OpKind::Any)
    }

    #[track_caller]
    pub fn all(&self) -> Value {
        self.clone().unary(OpKind::All)
    }

    #[track_caller]
    pub fn abs(&self) -> Value {
        self.clone().unary(OpKind::Abs)
    }

    #[track_caller]
    pub fn shr_logical(&self, amount: impl Into<Value>) -> Value {
        self.clone().binary(OpKind::LogicalShr, amount)
    }

    #[track_caller]
    pub fn cmp_eq(&self, rhs: impl Into<Value>) -> Value {
        self.clone().binary(OpKind::Eq, rhs)
    }

    #[track_caller]
    pub fn cmp_ne(&self, rhs: impl Into<Value>) -> Value {
        self.clone().binary(OpKind::Ne, rhs)
    }

    #[track_caller]
    pub fn cmp_lt(&self, rhs: impl Into<Value>) -> Value {
        self.clone().binary(OpKind::Lt, rhs)
    }

    #[track_caller]
    pub fn cmp_le(&self, rhs: impl Into<Value>) -> Value {
        self.clone().binary(OpKind::Le, rhs)
    }

    #[track_caller]
    pub fn cmp_gt(&self, rhs: impl Into<Value>) -> Value {
        self.clone().binary(OpKind::Gt, rhs)
    }

    #[track_caller]
    pub fn cmp_ge(&self, rhs: impl Into<Value>) -> Value {
        self.clone().binary(OpKind::Ge, rhs)
    }
}

/// Select `when_true` if `selector` is non-zero, `when_false` otherwise.
///
/// Selectors wider than one bit are reduced through `b` first.
///
/// ```rust
/// # use hyvalue::{value::{mux, Value}, shape::Shape};
/// let m = mux(Value::from(2), 3, -3);
/// assert_eq!(m.shape(), Shape::signed(3).unwrap());
/// assert_eq!(m.as_const().unwrap().value(), &3.into());
/// ```
#[track_caller]
pub fn mux(
    selector: impl Into<Value>,
    when_true: impl Into<Value>,
    when_false: impl Into<Value>,
) -> Value {
    Operator::from_parts(
        OpKind::Mux,
        smallvec![selector.into(), when_true.into(), when_false.into()],
    )
    .into()
}

macro_rules! value_binary_op {
    ($($trait:ident :: $method:ident => $op:ident),* $(,)?) => {
        $(
            impl<T: Into<Value>> std::ops::$trait<T> for Value {
                type Output = Value;

                #[track_caller]
                fn $method(self, rhs: T) -> Value {
                    self.binary(OpKind::$op, rhs)
                }
            }
        )*
    };
}

value_binary_op! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Mod,
    Shl::shl => Shl,
    Shr::shr => Shr,
    BitAnd::bitand => And,
    BitOr::bitor => Or,
    BitXor::bitxor => Xor,
}

impl Assignable for Value {
    fn lhs_signals(&self) -> Result<SignalSet> {
        Value::lhs_signals(self)
    }
}

impl std::ops::Not for Value {
    type Output = Value;

    #[track_caller]
    fn not(self) -> Value {
        self.unary(OpKind::Not)
    }
}

impl std::ops::Neg for Value {
    type Output = Value;

    #[track_caller]
    fn neg(self) -> Value {
        self.unary(OpKind::Neg)
    }
}

impl From<Const> for Value {
    fn from(value: Const) -> Self {
        Value::Const(value)
    }
}

impl From<AnyValue> for Value {
    fn from(value: AnyValue) -> Self {
        Value::Any(value)
    }
}

impl From<SignalRef> for Value {
    fn from(value: SignalRef) -> Self {
        Value::Signal(value)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

macro_rules! value_from_int {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for Value {
                #[track_caller]
                fn from(value: $typ) -> Self {
                    Value::Const(Const::new(value, None))
                }
            }

            impl From<$typ> for ValueSource {
                fn from(value: $typ) -> Self {
                    ValueSource::FromInt(value.into())
                }
            }
        )*
    };
}

value_from_int! { i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, BigInt }

impl From<bool> for Value {
    #[track_caller]
    fn from(value: bool) -> Self {
        Value::Const(Const::from(value))
    }
}

macro_rules! value_source_from_value {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for ValueSource {
                fn from(value: $typ) -> Self {
                    ValueSource::FromValue(value.into())
                }
            }
        )*
    };
}

value_source_from_value! { Value, &Value, Const, AnyValue, SignalRef, Operator, Slice, bool }

impl From<BTreeMap<String, BigInt>> for ValueSource {
    fn from(value: BTreeMap<String, BigInt>) -> Self {
        ValueSource::FromNamedMap(value)
    }
}
