//! Operator nodes
//!
//! An [`Operator`] combines one to three child values under an [`OpKind`].
//! The result shape is derived once, when the node is built, from the operand
//! shapes by [`OpKind::infer_shape`], following two's-complement growth rules.
//! Every width saturates at [`Shape::MAX_WIDTH`].
//!
//! | Operators                      | Width                          | Signed                |
//! |--------------------------------|--------------------------------|-----------------------|
//! | `~`                            | `wa`                           | `sa`                  |
//! | unary `-`                      | `wa + 1`                       | always                |
//! | `+`, `-`                       | `max(wa, wb) + 1`              | `sa \|\| sb`          |
//! | `*`                            | `wa + wb`                      | `sa \|\| sb`          |
//! | `/`, `%`                       | `wa`                           | `sa`                  |
//! | `<<`                           | `wa + 2^wb - 1`                | `sa`                  |
//! | `>>`                           | `wa`                           | `sa`                  |
//! | `>>>`                          | `wa`                           | never                 |
//! | `&`, `^`, `\|`                 | `max(wa, wb)`                  | `sa && sb`            |
//! | comparisons, `b`, `any`, `all` | 1                              | never                 |
//! | `abs`                          | `wa`                           | never                 |
//! | `u`, `s`                       | `wa`                           | never / always        |
//! | `mux`                          | `max(wt, wf)`                  | `st \|\| sf`          |
use std::sync::Arc;

use log::trace;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumIter, IntoEnumIterator};

use crate::{
    location::{Provenance, SrcLoc},
    shape::Shape,
    utils::{Error, Result},
    value::{FoldCache, SignalSet, Value, ValueSource, collect_signals, constant::Const},
};

/// Every operation an [`Operator`] node can perform.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OpKind {
    /// Bitwise inversion (`~`)
    Not,
    /// Arithmetic negation (unary `-`)
    Neg,
    /// Absolute value
    Abs,
    /// Reinterpret as unsigned
    AsUnsigned,
    /// Reinterpret as signed
    AsSigned,
    /// Non-zero test
    Bool,
    /// OR-reduction
    Any,
    /// AND-reduction
    All,

    Add,
    Sub,
    Mul,
    /// Floor division
    Div,
    /// Floor modulo
    Mod,

    /// Left shift
    Shl,
    /// Right shift, arithmetic for signed left operands
    Shr,
    /// Logical right shift
    LogicalShr,

    And,
    Or,
    Xor,

    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    /// Two-way selection: `mux(selector, when_true, when_false)`
    Mux,
}

impl OpKind {
    /// Returns the textual symbol of the [`OpKind`].
    ///
    /// Negation and subtraction share the `-` symbol; they are told apart by arity.
    pub fn symbol(&self) -> &'static str {
        match self {
            OpKind::Not => "~",
            OpKind::Neg => "-",
            OpKind::Abs => "abs",
            OpKind::AsUnsigned => "u",
            OpKind::AsSigned => "s",
            OpKind::Bool => "b",
            OpKind::Any => "any",
            OpKind::All => "all",
            OpKind::Add => "+",
            OpKind::Sub => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
            OpKind::Mod => "%",
            OpKind::Shl => "<<",
            OpKind::Shr => ">>",
            OpKind::LogicalShr => ">>>",
            OpKind::And => "&",
            OpKind::Or => "|",
            OpKind::Xor => "^",
            OpKind::Eq => "==",
            OpKind::Ne => "!=",
            OpKind::Lt => "<",
            OpKind::Le => "<=",
            OpKind::Gt => ">",
            OpKind::Ge => ">=",
            OpKind::Mux => "mux",
        }
    }

    /// Number of operands the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            OpKind::Not
            | OpKind::Neg
            | OpKind::Abs
            | OpKind::AsUnsigned
            | OpKind::AsSigned
            | OpKind::Bool
            | OpKind::Any
            | OpKind::All => 1,
            OpKind::Mux => 3,
            _ => 2,
        }
    }

    /// Resolve a symbol given the number of operands it is applied to.
    pub fn from_symbol(symbol: &str, arity: usize) -> Option<Self> {
        OpKind::iter().find(|op| op.symbol() == symbol && op.arity() == arity)
    }

    /// Returns true for the relational operators, which always produce a single bit.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            OpKind::Eq | OpKind::Ne | OpKind::Lt | OpKind::Le | OpKind::Gt | OpKind::Ge
        )
    }

    /// Derive the result shape from the operand shapes.
    ///
    /// `operands` must hold exactly [`OpKind::arity`] shapes.
    pub fn infer_shape(&self, operands: &[Shape]) -> Shape {
        let a = operands[0];
        let b = operands.get(1).copied().unwrap_or(a);
        let (wa, wb) = (a.width(), b.width());
        let (sa, sb) = (a.is_signed(), b.is_signed());

        match self {
            OpKind::Not => a,
            OpKind::Neg => Shape::derived(wa.saturating_add(1), true),
            OpKind::Abs | OpKind::AsUnsigned => a.as_unsigned(),
            OpKind::AsSigned => a.as_signed(),
            OpKind::Bool | OpKind::Any | OpKind::All => Shape::BIT,
            OpKind::Add | OpKind::Sub => Shape::derived(wa.max(wb).saturating_add(1), sa || sb),
            OpKind::Mul => Shape::derived(wa.saturating_add(wb), sa || sb),
            OpKind::Div | OpKind::Mod => a,
            OpKind::Shl => {
                let growth = if wb >= 32 { u32::MAX } else { (1u64 << wb) as u32 - 1 };
                Shape::derived(wa.saturating_add(growth), sa)
            }
            OpKind::Shr => a,
            OpKind::LogicalShr => a.as_unsigned(),
            OpKind::And | OpKind::Or | OpKind::Xor => Shape::derived(wa.max(wb), sa && sb),
            OpKind::Eq | OpKind::Ne | OpKind::Lt | OpKind::Le | OpKind::Gt | OpKind::Ge => {
                Shape::BIT
            }
            OpKind::Mux => {
                let (t, f) = (operands[1], operands[2]);
                Shape::derived(t.width().max(f.width()), t.is_signed() || f.is_signed())
            }
        }
    }

    /// Evaluate the operation on constant operands.
    ///
    /// The returned integer is not yet normalized to the result shape.
    pub fn evaluate(&self, operands: &[Const]) -> BigInt {
        let a = &operands[0];
        let bool_int = |b: bool| if b { BigInt::one() } else { BigInt::ZERO };

        match self {
            OpKind::Not => !a.value(),
            OpKind::Neg => -a.value(),
            OpKind::Abs => a.value().abs(),
            OpKind::AsUnsigned | OpKind::AsSigned => a.value().clone(),
            OpKind::Bool | OpKind::Any => bool_int(!a.is_zero()),
            OpKind::All => bool_int(a.bits() == a.shape().as_unsigned().max_value()),
            OpKind::Mux => {
                if operands[0].is_zero() {
                    operands[2].value().clone()
                } else {
                    operands[1].value().clone()
                }
            }
            _ => {
                let (x, y) = (a.value(), operands[1].value());
                match self {
                    OpKind::Add => x + y,
                    OpKind::Sub => x - y,
                    OpKind::Mul => x * y,
                    OpKind::Div => floor_div(x, y),
                    OpKind::Mod => floor_mod(x, y),
                    OpKind::Shl => {
                        let limit = self.infer_shape(&[a.shape(), operands[1].shape()]).width();
                        x << shift_amount(&operands[1], limit)
                    }
                    OpKind::Shr => x >> shift_amount(&operands[1], a.shape().width()),
                    OpKind::LogicalShr => a.bits() >> shift_amount(&operands[1], a.shape().width()),
                    OpKind::And => x & y,
                    OpKind::Or => x | y,
                    OpKind::Xor => x ^ y,
                    OpKind::Eq => bool_int(x == y),
                    OpKind::Ne => bool_int(x != y),
                    OpKind::Lt => bool_int(x < y),
                    OpKind::Le => bool_int(x <= y),
                    OpKind::Gt => bool_int(x > y),
                    OpKind::Ge => bool_int(x >= y),
                    _ => unreachable!("unary and ternary operators are handled above"),
                }
            }
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Shift amounts are the unsigned reinterpretation of the right operand, clamped
/// to `limit` since shifting further cannot change a normalized result.
fn shift_amount(amount: &Const, limit: u32) -> u32 {
    amount
        .bits()
        .to_u32()
        .map_or(limit, |amount| amount.min(limit))
}

/// Division rounding towards negative infinity. Division by zero yields zero.
fn floor_div(x: &BigInt, y: &BigInt) -> BigInt {
    if y.is_zero() {
        return BigInt::ZERO;
    }
    let q = x / y;
    if (x % y).is_zero() || (x.is_negative() == y.is_negative()) {
        q
    } else {
        q - 1
    }
}

/// Remainder taking the sign of the divisor. Modulo by zero yields zero.
fn floor_mod(x: &BigInt, y: &BigInt) -> BigInt {
    if y.is_zero() {
        return BigInt::ZERO;
    }
    let r = x % y;
    if r.is_zero() || (r.is_negative() == y.is_negative()) {
        r
    } else {
        r + y
    }
}

/// An n-ary expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Operator {
    op: OpKind,
    operands: SmallVec<Value, 3>,
    shape: Shape,
    #[cfg_attr(feature = "serde", serde(skip))]
    src_loc: Provenance,
}

impl Operator {
    /// Build an operator node, casting every operand first.
    ///
    /// The selector of a `mux` is coerced to a single bit through `b` unless it
    /// already is one.
    ///
    /// ```rust
    /// # use hyvalue::{value::{constant::Const, operator::{Operator, OpKind}}, shape::Shape};
    /// let u4 = Shape::unsigned(4).unwrap();
    /// let op = Operator::new(OpKind::Add, [Const::with_shape(3, u4), Const::with_shape(2, u4)]).unwrap();
    /// assert_eq!(op.shape(), Shape::unsigned(5).unwrap());
    ///
    /// assert!(Operator::new(OpKind::Add, [Const::with_shape(3, u4)]).unwrap_err().is_arity_mismatch());
    /// ```
    #[track_caller]
    pub fn new<S: Into<ValueSource>>(
        op: OpKind,
        operands: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let src_loc = SrcLoc::caller();
        let operands = operands
            .into_iter()
            .map(|operand| Value::cast(operand.into()))
            .collect::<Result<SmallVec<Value, 3>>>()?;

        if operands.len() != op.arity() {
            return Err(Error::ArityMismatch {
                op,
                expected: op.arity(),
                found: operands.len(),
            });
        }

        Ok(Self::from_parts(op, operands).with_src_loc(src_loc))
    }

    /// Build an operator node from its textual symbol, resolved by operand count.
    ///
    /// ```rust
    /// # use hyvalue::value::operator::{Operator, OpKind};
    /// assert_eq!(Operator::parse("-", [1]).unwrap().op(), OpKind::Neg);
    /// assert_eq!(Operator::parse("-", [1, 2]).unwrap().op(), OpKind::Sub);
    /// assert!(Operator::parse("+", [1]).unwrap_err().is_arity_mismatch());
    /// assert!(Operator::parse("@", [1]).unwrap_err().is_unknown_operator());
    /// ```
    #[track_caller]
    pub fn parse<S: Into<ValueSource>>(
        symbol: &str,
        operands: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let src_loc = SrcLoc::caller();
        let operands = operands
            .into_iter()
            .map(|operand| Value::cast(operand.into()))
            .collect::<Result<SmallVec<Value, 3>>>()?;

        match OpKind::from_symbol(symbol, operands.len()) {
            Some(op) => Ok(Self::from_parts(op, operands).with_src_loc(src_loc)),
            None => match OpKind::iter().find(|op| op.symbol() == symbol) {
                Some(op) => Err(Error::ArityMismatch {
                    op,
                    expected: op.arity(),
                    found: operands.len(),
                }),
                None => Err(Error::UnknownOperator {
                    symbol: symbol.to_string(),
                    arity: operands.len(),
                }),
            },
        }
    }

    /// Assemble a node whose operand count is already known to match `op`.
    #[track_caller]
    pub(crate) fn from_parts(op: OpKind, mut operands: SmallVec<Value, 3>) -> Self {
        debug_assert_eq!(operands.len(), op.arity());
        if op == OpKind::Mux && operands[0].shape() != Shape::BIT {
            let selector = operands[0].clone();
            operands[0] = Self::from_parts(OpKind::Bool, [selector].into()).into();
        }
        let shapes: SmallVec<Shape, 3> = operands.iter().map(Value::shape).collect();
        Self {
            op,
            shape: op.infer_shape(&shapes),
            operands,
            src_loc: Provenance::here(),
        }
    }

    pub fn with_src_loc(mut self, src_loc: SrcLoc) -> Self {
        self.src_loc = src_loc.into();
        self
    }

    #[inline]
    pub fn op(&self) -> OpKind {
        self.op
    }

    #[inline]
    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    pub fn src_loc(&self) -> Option<&SrcLoc> {
        self.src_loc.get()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Union of the signals read by every operand.
    pub fn rhs_signals(&self) -> SignalSet {
        collect_signals(self.operands.iter())
    }

    /// Fold the whole subtree into a constant of the node's shape.
    pub fn as_const(&self) -> Result<Const> {
        self.fold(&mut FoldCache::default())
    }

    pub(crate) fn fold(&self, cache: &mut FoldCache) -> Result<Const> {
        let operands = self
            .operands
            .iter()
            .map(|operand| operand.fold(cache))
            .collect::<Result<SmallVec<Const, 3>>>()?;

        let folded = Const::with_shape(self.op.evaluate(&operands), self.shape);
        trace!(
            "Folded `{}` over {} operand(s) into {}.",
            self.op,
            operands.len(),
            folded
        );

        Ok(match self.src_loc() {
            Some(src_loc) => folded.with_src_loc(*src_loc),
            None => folded,
        })
    }
}

impl From<Operator> for Value {
    fn from(value: Operator) -> Self {
        Value::Operator(Arc::new(value))
    }
}
