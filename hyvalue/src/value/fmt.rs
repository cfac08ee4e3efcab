//! Pretty printing of expressions as s-expressions.
use crate::{registry::SignalRegistry, value::Value};

impl Value {
    /// Build a formatting helper for this expression.
    ///
    /// Signal names are resolved through `registry` when provided; otherwise
    /// signals are rendered by id.
    ///
    /// ```rust
    /// # use hyvalue::{registry::SignalRegistry, shape::Shape, value::Value};
    /// let reg = SignalRegistry::new();
    /// let a = Value::from(reg.declare(Some("a"), Shape::unsigned(4).unwrap()));
    /// let e = a.clone() + 1;
    /// assert_eq!(format!("{}", e.fmt(Some(&reg))), "(+ (sig a) (const 1'd1))");
    /// assert_eq!(format!("{}", a.slice(0, 2).unwrap().fmt(Some(&reg))), "(slice (sig a) 0:2)");
    /// ```
    pub fn fmt<'a>(&'a self, registry: Option<&'a SignalRegistry>) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            value: &'a Value,
            registry: Option<&'a SignalRegistry>,
        }

        impl<'a> std::fmt::Display for Fmt<'a> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.value {
                    Value::Const(c) => write!(f, "{}", c),
                    Value::Any(any) => write!(f, "{}", any),
                    Value::Signal(signal) => {
                        match self.registry.and_then(|reg| reg.name(signal.id())) {
                            Some(name) => write!(f, "(sig {})", name),
                            None => write!(f, "(sig {})", signal.id()),
                        }
                    }
                    Value::Operator(op) => {
                        write!(f, "({}", op.op())?;
                        for operand in op.operands() {
                            write!(f, " {}", operand.fmt(self.registry))?;
                        }
                        write!(f, ")")
                    }
                    Value::Slice(slice) => write!(
                        f,
                        "(slice {} {}:{})",
                        slice.value().fmt(self.registry),
                        slice.start(),
                        slice.stop()
                    ),
                }
            }
        }

        Fmt {
            value: self,
            registry,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&Value::fmt(self, None), f)
    }
}
