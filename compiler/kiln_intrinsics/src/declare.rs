//! Per-unit declaration cache.
//!
//! The cache is the unit's own symbol table: an instantiation is declared
//! once under its mangled name and every later request returns the same
//! function. A name that is already taken is reused as is. The existing
//! signature is not compared against the requested one, so a user symbol
//! that happens to share a mangled name is silently returned.

use kiln_ir::DeclareMethods;
use kiln_types::Type;

use crate::def::IntrinsicDef;
use crate::error::ResolveError;
use crate::instantiate::{instantiate_with_overloads, ResolvedIntrinsic};

/// Fetch `resolved` from the unit, declaring it on first use.
pub fn declare_intrinsic<D: DeclareMethods + ?Sized>(
    cx: &mut D,
    resolved: &ResolvedIntrinsic,
) -> D::Function {
    if let Some(existing) = cx.get_function(&resolved.name) {
        tracing::trace!(name = %resolved.name, "intrinsic already declared");
        return existing;
    }
    tracing::debug!(
        name = %resolved.name,
        signature = %resolved.signature,
        "declaring intrinsic"
    );
    cx.declare_extern_function(&resolved.name, &resolved.signature, resolved.attrs)
}

/// Declare `def` instantiated on explicit `overloads`.
///
/// For taking a declaration up front, before any argument value exists.
pub fn declare_with_overloads<D: DeclareMethods + ?Sized>(
    cx: &mut D,
    def: &IntrinsicDef,
    overloads: &[Type],
) -> Result<D::Function, ResolveError> {
    let resolved = instantiate_with_overloads(def, overloads)?;
    Ok(declare_intrinsic(cx, &resolved))
}
