use num_bigint::BigInt;
use strum::EnumIs;
use thiserror::Error;

use crate::value::operator::OpKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum Error {
    /// A shape was requested with a width that is not strictly positive or too large.
    #[error(
        "Invalid shape width {width}. A shape must be at least 1 bit wide and at most {max} bits wide."
    )]
    InvalidShape { width: i64, max: u32 },

    /// An operator received the wrong number of operands.
    #[error(
        "Operator `{op}` expects {expected} operand(s), but {found} operand(s) were provided."
    )]
    ArityMismatch {
        op: OpKind,
        expected: usize,
        found: usize,
    },

    /// Slice bounds fall outside of the sliced value after wraparound.
    #[error(
        "Slice bounds [{start}:{stop}] are out of range for a value of width {width}. After wraparound, bounds must satisfy 0 <= start < stop <= width."
    )]
    OutOfRange { start: i64, stop: i64, width: u32 },

    /// A pattern given to `matches` is malformed.
    #[error("Invalid pattern `{pattern}`: {reason}.")]
    InvalidPattern { pattern: String, reason: String },

    /// The left-hand-side signal set was requested on a node that cannot be assigned to.
    #[error(
        "A `{kind}` expression is not assignable. Only signals and slices of signals can be driven."
    )]
    NotAssignable { kind: &'static str },

    /// A constant value was requested from a subtree that is not compile-time constant.
    #[error(
        "A `{kind}` expression cannot be folded into a constant. Only trees whose leaves are constants can be folded."
    )]
    NotConstant { kind: &'static str },

    /// An exact base-2 logarithm was requested for a value that is not a power of two.
    #[error("The value {value} is not a power of two.")]
    NotPowerOfTwo { value: BigInt },

    /// A logarithm was requested for a negative value.
    #[error("Cannot compute the base-2 logarithm of the negative value {value}.")]
    NegativeLogarithm { value: BigInt },

    /// A range was declared with a zero step.
    #[error("Range step must be non-zero.")]
    InvalidRangeStep,

    /// A shape was derived from a source that produces no values at all.
    #[error(
        "Cannot derive a shape from an empty {source_kind}. At least one value is required to size a shape."
    )]
    EmptyShapeSource { source_kind: &'static str },

    /// No operator matches the given symbol and operand count.
    #[error("Unknown operator `{symbol}` taking {arity} operand(s).")]
    UnknownOperator { symbol: String, arity: usize },

    /// Enumeration-valued casting is not supported.
    #[error(
        "Casting a mapping of named values into a value is not supported. Declare a signal with a shape derived from the mapping instead."
    )]
    EnumCastUnsupported,
}

pub type Result<T> = std::result::Result<T, Error>;
