//! Backend Traits
//!
//! The interface the intrinsic engine consumes from a code-generation
//! backend, split the way `rustc_codegen_ssa` splits its traits:
//!
//! - `BackendTypes`: associated handle types
//! - `DeclareMethods`: the unit's symbol table (lookup and declaration)
//! - `BuilderMethods`: value types and call emission at the insertion point
//!
//! The engine never constructs instructions other than calls, so nothing
//! else is required here.

use std::fmt;

use kiln_types::{ConcreteSig, Type};

use crate::attrs::FnAttrs;
use crate::error::IrError;

/// Associated handle types of a backend.
pub trait BackendTypes {
    type Value: Copy + fmt::Debug;
    type Function: Copy + PartialEq + fmt::Debug;
}

/// Symbol-table access on one compilation unit.
///
/// A unit holds at most one function per name; the unit itself is the
/// owner of every declaration made through it.
pub trait DeclareMethods: BackendTypes {
    /// Find an already declared (or defined) function by symbol name.
    fn get_function(&self, name: &str) -> Option<Self::Function>;

    /// Declare an external function.
    ///
    /// If `name` is already taken the existing function is returned
    /// unchanged, whatever its signature.
    fn declare_extern_function(
        &mut self,
        name: &str,
        signature: &ConcreteSig,
        attrs: FnAttrs,
    ) -> Self::Function;
}

/// Instruction emission at the current insertion point.
pub trait BuilderMethods: DeclareMethods {
    /// The concrete type of a value.
    fn value_type(&self, value: Self::Value) -> Type;

    /// Whether a call emitted now would have somewhere to go.
    ///
    /// Lets callers refuse early, before declaring anything for the call.
    fn has_insertion_point(&self) -> bool;

    /// Emit a direct call.
    ///
    /// Returns `Ok(None)` when the callee returns `void`.
    fn call(
        &mut self,
        callee: Self::Function,
        args: &[Self::Value],
    ) -> Result<Option<Self::Value>, IrError>;
}
