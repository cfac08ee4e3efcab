//! Shape and value expression algebra for hardware descriptions.
//!
//! Expressions are immutable trees of [`value::Value`] nodes whose bit width and
//! signedness ([`shape::Shape`]) are derived bottom-up from their operands.
//!
//! ```rust
//! use hyvalue::{registry::SignalRegistry, shape::Shape, value::{Value, constant::Const}};
//!
//! let reg = SignalRegistry::new();
//! let a_sig = reg.declare(Some("a"), Shape::unsigned(8).unwrap());
//! let a = Value::from(a_sig);
//!
//! let sum = a.clone() + Const::new(3, None);
//! assert_eq!(sum.shape(), Shape::unsigned(9).unwrap());
//! assert!(sum.rhs_signals().contains(&a_sig.id()));
//! assert!(sum.lhs_signals().unwrap_err().is_not_assignable());
//! ```
pub mod location;
pub mod range;
pub mod registry;
pub mod shape;
pub mod sizing;
pub mod utils;
pub mod value;

pub use utils::{Error, Result};
