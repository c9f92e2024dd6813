//! Builder errors.

use kiln_types::Type;

/// Misuse of an [`IrBuilder`](crate::IrBuilder) or backend builder.
///
/// These indicate a bug in the code driving the builder, never a problem
/// with user input. They are returned rather than panicking so a front end
/// can surface them as internal compiler errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    #[error("builder has no insertion point")]
    NoInsertionPoint,

    #[error("symbol `{0}` is already defined in this module")]
    DuplicateSymbol(String),

    #[error("expected a pointer operand, found `{found}`")]
    NotAPointer { found: Type },

    #[error("`{callee}` takes {expected} argument(s), {found} supplied")]
    ArgumentCount {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of `{callee}` must be `{expected}`, found `{found}`")]
    ArgumentType {
        callee: String,
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("return of `{found}` from a function returning `{expected}`")]
    ReturnType { expected: Type, found: Type },

    #[error("backend error: {0}")]
    Backend(String),
}
