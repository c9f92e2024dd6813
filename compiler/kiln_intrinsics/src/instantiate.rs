//! Instantiation: template + substitution -> concrete, named signature.

use std::slice;

use kiln_ir::FnAttrs;
use kiln_types::{ConcreteSig, TemplateType, Type, VectorCount};

use crate::def::IntrinsicDef;
use crate::error::ResolveError;
use crate::mangle::{mangle, Unmangleable};
use crate::subst::{Binding, Extent, Substitution};

/// A concrete instantiation, ready to declare.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedIntrinsic {
    /// Mangled symbol name.
    pub name: String,
    pub signature: ConcreteSig,
    pub attrs: FnAttrs,
}

/// Fill `def`'s holes from `subst`.
///
/// Parameters consume bindings and extents in walk order. The return type
/// is the caller's `hint` when it is generic and a hint was given;
/// otherwise its holes are filled from the front of the substitution, so a
/// bare placeholder return takes the first bound type.
pub fn instantiate(
    def: &IntrinsicDef,
    subst: &Substitution,
    hint: Option<&Type>,
) -> Result<ResolvedIntrinsic, ResolveError> {
    let template = &def.signature;

    let mut filler = Filler::new(subst);
    let params = template
        .params
        .iter()
        .map(|param| filler.fill(param))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ResolveError::IncompleteSubstitution {
            intrinsic: def.selector.clone(),
        })?;

    let ret = match hint {
        Some(hint) if template.ret.is_generic() => hint.clone(),
        _ => Filler::new(subst).fill(&template.ret).ok_or_else(|| {
            ResolveError::AmbiguousReturnType {
                intrinsic: def.selector.clone(),
            }
        })?,
    };

    let name = mangle(&def.selector, subst.types()).map_err(|Unmangleable(ty)| {
        ResolveError::UnmangleableType {
            intrinsic: def.selector.clone(),
            ty,
        }
    })?;

    Ok(ResolvedIntrinsic {
        name,
        signature: ConcreteSig {
            params,
            ret,
            variadic: template.variadic,
        },
        attrs: def.attrs,
    })
}

/// Instantiate `def` from explicit overload types, without argument values.
///
/// `types` fill the parameter placeholders in order; when no parameter is
/// generic they fill the return type instead. Open vector counts cannot be
/// fixed this way.
pub fn instantiate_with_overloads(
    def: &IntrinsicDef,
    types: &[Type],
) -> Result<ResolvedIntrinsic, ResolveError> {
    let template = &def.signature;
    if template
        .params
        .iter()
        .chain(std::iter::once(&template.ret))
        .any(has_open_count)
    {
        return Err(ResolveError::OpenVectorCount {
            intrinsic: def.selector.clone(),
        });
    }

    let param_holes: usize = template
        .params
        .iter()
        .map(TemplateType::placeholder_count)
        .sum();
    let expected = if param_holes == 0 {
        template.ret.placeholder_count()
    } else {
        param_holes
    };
    if types.len() != expected {
        return Err(ResolveError::OverloadTypeCount {
            intrinsic: def.selector.clone(),
            expected,
            found: types.len(),
        });
    }

    instantiate(def, &Substitution::from_types(types.iter().cloned()), None)
}

fn has_open_count(template: &TemplateType) -> bool {
    match template {
        TemplateType::Vector {
            count: VectorCount::Any,
            ..
        } => true,
        TemplateType::Vector { element, .. } => has_open_count(element),
        TemplateType::Pointer { pointee, .. } => has_open_count(pointee),
        TemplateType::Struct(fields) => fields.iter().any(has_open_count),
        _ => false,
    }
}

/// Replays the matcher's walk, consuming holes in order.
struct Filler<'s> {
    bindings: slice::Iter<'s, Binding>,
    extents: slice::Iter<'s, Extent>,
}

impl<'s> Filler<'s> {
    fn new(subst: &'s Substitution) -> Self {
        Self {
            bindings: subst.bindings().iter(),
            extents: subst.extents().iter(),
        }
    }

    fn fill(&mut self, template: &TemplateType) -> Option<Type> {
        Some(match template {
            TemplateType::Placeholder => self.bindings.next()?.ty.clone(),
            TemplateType::Vector { element, count } => {
                let count = match count {
                    VectorCount::Fixed(n) => *n,
                    VectorCount::Any => self.extents.next()?.count,
                };
                Type::vector(self.fill(element)?, count)
            }
            TemplateType::Pointer {
                pointee,
                address_space,
            } => Type::ptr_in(self.fill(pointee)?, *address_space),
            TemplateType::Struct(fields) => Type::Struct(
                fields
                    .iter()
                    .map(|field| self.fill(field))
                    .collect::<Option<Vec<_>>>()?,
            ),
            TemplateType::Void => Type::Void,
            TemplateType::Int { width } => Type::int(*width),
            TemplateType::Float(kind) => Type::Float(*kind),
            TemplateType::Label => Type::Label,
            TemplateType::Token => Type::Token,
            TemplateType::Metadata => Type::Metadata,
        })
    }
}
