//! Overload name mangling.
//!
//! A concrete instantiation is named `<selector>.<tok>.<tok>...`, one token
//! per binding in substitution order. The scheme has to agree with the
//! backend's own naming, since intrinsics are resolved by symbol name alone.

use std::fmt::Write as _;

use kiln_types::{FloatKind, Type};

/// The type that could not be mangled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unmangleable(pub Type);

/// Append the token for `ty` to `out`.
///
/// `i<w>`, `f16`/`f32`/`f64`/`f80`/`f128`/`ppcf128`, `p<addrspace><pointee>`
/// and `v<count><element>`. Nothing else has a token.
pub fn push_type_token(out: &mut String, ty: &Type) -> Result<(), Unmangleable> {
    match ty {
        Type::Int { width } => {
            let _ = write!(out, "i{width}");
        }
        Type::Float(kind) => out.push_str(float_token(*kind)),
        Type::Pointer {
            pointee,
            address_space,
        } => {
            let _ = write!(out, "p{address_space}");
            push_type_token(out, pointee)?;
        }
        Type::Vector { element, count } => {
            let _ = write!(out, "v{count}");
            push_type_token(out, element)?;
        }
        Type::Void | Type::Label | Type::Token | Type::Metadata | Type::Struct(_) => {
            return Err(Unmangleable(ty.clone()));
        }
    }
    Ok(())
}

/// Token for a single type.
pub fn type_token(ty: &Type) -> Result<String, Unmangleable> {
    let mut out = String::new();
    push_type_token(&mut out, ty)?;
    Ok(out)
}

/// Full mangled name for `selector` overloaded on `types`, in order.
pub fn mangle<'t>(
    selector: &str,
    types: impl IntoIterator<Item = &'t Type>,
) -> Result<String, Unmangleable> {
    let mut name = selector.to_owned();
    for ty in types {
        name.push('.');
        push_type_token(&mut name, ty)?;
    }
    Ok(name)
}

fn float_token(kind: FloatKind) -> &'static str {
    match kind {
        FloatKind::Half => "f16",
        FloatKind::Float => "f32",
        FloatKind::Double => "f64",
        FloatKind::X86Fp80 => "f80",
        FloatKind::Fp128 => "f128",
        FloatKind::PpcFp128 => "ppcf128",
    }
}
