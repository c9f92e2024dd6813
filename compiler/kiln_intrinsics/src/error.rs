//! Resolution errors.
//!
//! Resolution failures and a missing insertion point are detected before the
//! compilation unit is touched. Matching and instantiation are pure, so such
//! an `Err` means nothing was declared and no call was built. Only a
//! [`ResolveError::Ir`] raised by the backend while building the call itself
//! can follow a fresh declaration, which then stays in the unit.

use std::fmt;

use kiln_ir::IrError;
use kiln_types::{TemplateType, Type};

/// Why a single template rejected an argument list.
///
/// Produced by [`try_match`](crate::try_match); carries no intrinsic name so
/// it can be computed for every member of a family cheaply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchFailure {
    /// Wrong number of arguments.
    Arity {
        expected: usize,
        found: usize,
        variadic: bool,
    },
    /// The argument at `position` does not fit its template.
    Shape {
        position: usize,
        expected: TemplateType,
        found: Type,
    },
}

impl MatchFailure {
    /// Attach the intrinsic name.
    pub fn into_error(self, intrinsic: &str) -> ResolveError {
        match self {
            MatchFailure::Arity {
                expected,
                found,
                variadic,
            } => ResolveError::ArgumentArityMismatch {
                intrinsic: intrinsic.to_owned(),
                expected,
                found,
                variadic,
            },
            MatchFailure::Shape {
                position,
                expected,
                found,
            } => ResolveError::ArgumentShapeMismatch {
                intrinsic: intrinsic.to_owned(),
                position,
                expected,
                found,
            },
        }
    }
}

/// Intrinsic resolution or emission failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(
        "`{intrinsic}` expects {}{expected} argument(s), found {found}",
        at_least(.variadic)
    )]
    ArgumentArityMismatch {
        intrinsic: String,
        expected: usize,
        found: usize,
        variadic: bool,
    },

    #[error("argument {position} of `{intrinsic}` must fit `{expected}`, found `{found}`")]
    ArgumentShapeMismatch {
        intrinsic: String,
        position: usize,
        expected: TemplateType,
        found: Type,
    },

    #[error("no overload of `{family}` accepts ({})", TypeList(.args))]
    NoCandidate { family: String, args: Vec<Type> },

    #[error(
        "unable to infer the return type of overloaded intrinsic `{intrinsic}`; provide one explicitly"
    )]
    AmbiguousReturnType { intrinsic: String },

    #[error("call to `{family}` is ambiguous between {}", .candidates.join(", "))]
    AmbiguousOverload {
        family: String,
        candidates: Vec<String>,
    },

    #[error("type `{ty}` bound in `{intrinsic}` has no mangled form")]
    UnmangleableType { intrinsic: String, ty: Type },

    #[error("`{intrinsic}` is overloaded on {expected} type(s), {found} supplied")]
    OverloadTypeCount {
        intrinsic: String,
        expected: usize,
        found: usize,
    },

    #[error("`{intrinsic}` has an open-count vector that only an argument can fix")]
    OpenVectorCount { intrinsic: String },

    #[error("substitution does not fill every hole of `{intrinsic}`")]
    IncompleteSubstitution { intrinsic: String },

    #[error("intrinsic `{0}` is already registered")]
    DuplicateIntrinsic(String),

    #[error("overload family `{0}` has no members")]
    EmptyFamily(String),

    #[error(transparent)]
    Ir(#[from] IrError),
}

#[allow(
    clippy::trivially_copy_pass_by_ref,
    reason = "error format arguments are borrowed fields"
)]
fn at_least(variadic: &bool) -> &'static str {
    if *variadic {
        "at least "
    } else {
        ""
    }
}

/// Comma-separated type list for diagnostics.
struct TypeList<'a>(&'a [Type]);

impl fmt::Display for TypeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
