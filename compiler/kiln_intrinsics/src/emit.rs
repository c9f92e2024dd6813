//! Call emission.
//!
//! [`resolve`] is pure. [`emit_intrinsic_call`] adds the two side effects,
//! declaring (or fetching) the instantiation and building the call, and only
//! after resolution has fully succeeded and the builder has an insertion
//! point.

use smallvec::SmallVec;

use kiln_ir::{BuilderMethods, IrError};
use kiln_types::{ConcreteSig, Type};

use crate::config::ResolveConfig;
use crate::declare::{declare_intrinsic, declare_with_overloads};
use crate::def::{Intrinsic, IntrinsicDef};
use crate::error::ResolveError;
use crate::instantiate::{instantiate, ResolvedIntrinsic};
use crate::matcher::{capture_positional, try_match};
use crate::select::select;

/// Resolve a call site to a concrete, named instantiation.
///
/// A family goes through overload selection. A single definition is matched
/// directly: with `config.check_arguments` set the template walk compares
/// every concrete part; without it holes are captured positionally and the
/// instantiated parameters are compared against `args` once instead. Either
/// way an incompatible argument is an error here, before anything is
/// declared.
pub fn resolve(
    intrinsic: Intrinsic<'_>,
    args: &[Type],
    hint: Option<&Type>,
    config: &ResolveConfig,
) -> Result<ResolvedIntrinsic, ResolveError> {
    match intrinsic {
        Intrinsic::Family(family) => {
            let (def, subst) = select(family, args, config.policy)?;
            instantiate(def, &subst, hint)
        }
        Intrinsic::Single(def) if config.check_arguments => {
            let subst = try_match(&def.signature, args)
                .map_err(|failure| failure.into_error(&def.selector))?;
            instantiate(def, &subst, hint)
        }
        Intrinsic::Single(def) => {
            let subst = capture_positional(&def.signature, args)
                .map_err(|failure| failure.into_error(&def.selector))?;
            let resolved = instantiate(def, &subst, hint)?;
            check_instantiated(def, &resolved.signature, args)?;
            Ok(resolved)
        }
    }
}

/// The first fixed parameter of `signature` that `args` does not supply.
fn check_instantiated(
    def: &IntrinsicDef,
    signature: &ConcreteSig,
    args: &[Type],
) -> Result<(), ResolveError> {
    let mismatch = signature
        .params
        .iter()
        .zip(args)
        .zip(&def.signature.params)
        .enumerate()
        .find(|(_, ((param, arg), _))| param != arg);
    match mismatch {
        None => Ok(()),
        Some((position, ((_, found), expected))) => Err(ResolveError::ArgumentShapeMismatch {
            intrinsic: def.selector.clone(),
            position,
            expected: expected.clone(),
            found: found.clone(),
        }),
    }
}

/// Resolve, declare and call.
///
/// Returns `Ok(None)` for intrinsics returning `void`. A builder without an
/// insertion point is refused before the declaration is made.
#[tracing::instrument(level = "debug", skip_all, fields(intrinsic = intrinsic.name()))]
pub fn emit_intrinsic_call<B: BuilderMethods + ?Sized>(
    bx: &mut B,
    intrinsic: Intrinsic<'_>,
    args: &[B::Value],
    hint: Option<&Type>,
    config: &ResolveConfig,
) -> Result<Option<B::Value>, ResolveError> {
    let arg_types: SmallVec<[Type; 4]> = args.iter().map(|&arg| bx.value_type(arg)).collect();
    let resolved = resolve(intrinsic, &arg_types, hint, config)?;
    if !bx.has_insertion_point() {
        return Err(IrError::NoInsertionPoint.into());
    }
    let function = declare_intrinsic(bx, &resolved);
    tracing::debug!(name = %resolved.name, "emitting intrinsic call");
    Ok(bx.call(function, args)?)
}

/// Intrinsic calls as builder methods.
pub trait IntrinsicCallExt: BuilderMethods {
    /// Call `intrinsic` with the default [`ResolveConfig`].
    fn intrinsic_call<'a>(
        &mut self,
        intrinsic: impl Into<Intrinsic<'a>>,
        args: &[Self::Value],
        hint: Option<&Type>,
    ) -> Result<Option<Self::Value>, ResolveError> {
        emit_intrinsic_call(self, intrinsic.into(), args, hint, &ResolveConfig::default())
    }

    /// Call `intrinsic` under an explicit configuration.
    fn intrinsic_call_with<'a>(
        &mut self,
        intrinsic: impl Into<Intrinsic<'a>>,
        args: &[Self::Value],
        hint: Option<&Type>,
        config: &ResolveConfig,
    ) -> Result<Option<Self::Value>, ResolveError> {
        emit_intrinsic_call(self, intrinsic.into(), args, hint, config)
    }

    /// Declare `def` overloaded on `overloads`, without calling it.
    fn intrinsic_declaration(
        &mut self,
        def: &IntrinsicDef,
        overloads: &[Type],
    ) -> Result<Self::Function, ResolveError> {
        declare_with_overloads(self, def, overloads)
    }
}

impl<B: BuilderMethods + ?Sized> IntrinsicCallExt for B {}

#[cfg(test)]
mod tests;
