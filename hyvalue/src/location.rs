//! Construction-site provenance.
//!
//! Expression constructors are `#[track_caller]` and record where they were
//! called from. The recorded [`SrcLoc`] is only used to produce better
//! diagnostics; it is never compared, hashed or serialized.

/// Source location of the code that built an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SrcLoc {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
    /// Enclosing function or module path, when known.
    pub function: Option<&'static str>,
}

impl SrcLoc {
    /// Location of the caller of the current `#[track_caller]` function.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self::from(std::panic::Location::caller())
    }
}

impl From<&'static std::panic::Location<'static>> for SrcLoc {
    fn from(location: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
            function: None,
        }
    }
}

impl std::fmt::Display for SrcLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.function {
            Some(function) => write!(f, "{}:{}:{} ({})", self.file, self.line, self.column, function),
            None => write!(f, "{}:{}:{}", self.file, self.line, self.column),
        }
    }
}

/// Build a [`SrcLoc`] pointing at the macro invocation, tagged with the current module path.
///
/// ```rust
/// # use hyvalue::srcloc;
/// let loc = srcloc!();
/// assert_eq!(loc.line, line!());
/// ```
#[macro_export]
macro_rules! srcloc {
    () => {
        $crate::location::SrcLoc {
            file: file!(),
            line: line!(),
            column: column!(),
            function: Some(module_path!()),
        }
    };
}

/// Optional provenance attached to a node.
///
/// All instances compare equal and hash to nothing so that provenance never
/// influences structural equality of expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Provenance(Option<SrcLoc>);

impl Provenance {
    pub const NONE: Self = Self(None);

    #[track_caller]
    #[inline]
    pub fn here() -> Self {
        Self(Some(SrcLoc::caller()))
    }

    pub fn get(&self) -> Option<&SrcLoc> {
        self.0.as_ref()
    }
}

impl From<SrcLoc> for Provenance {
    fn from(value: SrcLoc) -> Self {
        Self(Some(value))
    }
}

impl From<Option<SrcLoc>> for Provenance {
    fn from(value: Option<SrcLoc>) -> Self {
        Self(value)
    }
}

impl PartialEq for Provenance {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Provenance {}

impl std::hash::Hash for Provenance {
    fn hash<H: std::hash::Hasher>(&self, _state: &mut H) {}
}
