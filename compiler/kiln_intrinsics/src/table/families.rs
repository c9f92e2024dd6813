//! Overload families enumerated as concrete members.
//!
//! Members of a family are distinguished by argument types alone, and the
//! selector tries them in the order listed here.

use kiln_ir::FnAttrs;
use kiln_types::{FloatKind, Signature, TemplateType, Type};

use super::{def, t, IntrinsicTable};
use crate::def::{IntrinsicDef, IntrinsicFamily};
use crate::error::ResolveError;
use crate::mangle::{mangle, Unmangleable};

const FLOAT_KINDS: [FloatKind; 6] = [
    FloatKind::Half,
    FloatKind::Float,
    FloatKind::Double,
    FloatKind::X86Fp80,
    FloatKind::Fp128,
    FloatKind::PpcFp128,
];

const UNARY_FLOAT: [&str; 6] = [
    "llvm.sqrt",
    "llvm.sin",
    "llvm.cos",
    "llvm.log",
    "llvm.exp",
    "llvm.fabs",
];

pub(super) fn register(table: &mut IntrinsicTable) -> Result<(), ResolveError> {
    for name in UNARY_FLOAT {
        table.insert_family(float_family(name, 1)?)?;
    }
    table.insert_family(float_family("llvm.fma", 3)?)?;

    table.insert_family(int_family("llvm.ctpop", &[8, 16, 32, 64, 128])?)?;
    table.insert_family(int_family("llvm.bswap", &[16, 32, 64])?)?;

    let flag = || t(Type::i1());
    let byte_ptr = || t(Type::i8_ptr());
    let mem = FnAttrs::ARGMEMONLY | FnAttrs::NOUNWIND | FnAttrs::WILLRETURN;

    table.insert_family(IntrinsicFamily::new(
        "llvm.memcpy",
        [32, 64].map(|width| {
            def(
                &format!("llvm.memcpy.p0i8.p0i8.i{width}"),
                [byte_ptr(), byte_ptr(), t(Type::int(width)), flag()],
                t(Type::Void),
                mem,
            )
        }),
    ))?;
    table.insert_family(IntrinsicFamily::new(
        "llvm.memset",
        [32, 64].map(|width| {
            def(
                &format!("llvm.memset.p0i8.i{width}"),
                [byte_ptr(), t(Type::i8()), t(Type::int(width)), flag()],
                t(Type::Void),
                mem,
            )
        }),
    ))?;

    // Both members take the same argument, so selection is positional:
    // the first (i32) wins unless a stricter overload policy is in force.
    table.insert_family(int_family_with(
        "llvm.read_register",
        &[32, 64],
        |_| vec![t(Type::Metadata)],
        FnAttrs::NOUNWIND | FnAttrs::READONLY,
    )?)?;

    Ok(())
}

/// `name.<f>` for every float kind, taking `arity` operands of that kind.
fn float_family(name: &str, arity: usize) -> Result<IntrinsicFamily, ResolveError> {
    let members = FLOAT_KINDS
        .iter()
        .map(|&kind| {
            let ty = Type::Float(kind);
            Ok(def(
                &member_name(name, &ty)?,
                vec![t(ty.clone()); arity],
                t(ty),
                FnAttrs::PURE,
            ))
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;
    Ok(IntrinsicFamily::new(name, members))
}

/// `name.i<w>` for each width, unary on that integer.
fn int_family(name: &str, widths: &[u32]) -> Result<IntrinsicFamily, ResolveError> {
    int_family_with(name, widths, |ty| vec![t(ty.clone())], FnAttrs::PURE)
}

fn int_family_with(
    name: &str,
    widths: &[u32],
    params: impl Fn(&Type) -> Vec<TemplateType>,
    attrs: FnAttrs,
) -> Result<IntrinsicFamily, ResolveError> {
    let members = widths
        .iter()
        .map(|&width| {
            let ty = Type::int(width);
            Ok(IntrinsicDef::new(
                member_name(name, &ty)?,
                Signature::new(params(&ty), t(ty)),
                attrs,
            ))
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;
    Ok(IntrinsicFamily::new(name, members))
}

fn member_name(family: &str, ty: &Type) -> Result<String, ResolveError> {
    mangle(family, [ty]).map_err(|Unmangleable(ty)| ResolveError::UnmangleableType {
        intrinsic: family.to_owned(),
        ty,
    })
}
