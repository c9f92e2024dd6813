//! Structural matching of argument types against a template signature.
//!
//! One recursive walk covers every rule:
//!
//! - a placeholder captures the concrete type found at its position
//! - a vector needs a vector; a fixed count must agree, an open count is
//!   recorded as an extent
//! - a pointer needs a pointer in the same address space, then recurses
//! - a struct recurses field-wise with equal arity
//! - any other leaf must be equal
//!
//! The walk visits parameters left to right and each parameter depth-first.
//! [`instantiate`](crate::instantiate) replays the same order, which is what
//! lets it consume the substitution positionally.
//!
//! There is no backtracking: each parameter is decided on its own, so a
//! single pass suffices and the first failure ends the match.

use kiln_types::{TemplateSig, TemplateType, Type, VectorCount};

use crate::error::MatchFailure;
use crate::subst::Substitution;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mode {
    /// Every concrete leaf must be equal.
    Strict,
    /// Only the shape around holes is required; concrete parts are trusted.
    Lenient,
}

/// Match `args` against `signature`, explaining any rejection.
///
/// Trailing arguments of a variadic template are accepted unchecked and
/// never bind anything. The return type takes no part in matching.
pub fn try_match(signature: &TemplateSig, args: &[Type]) -> Result<Substitution, MatchFailure> {
    walk(signature, args, Mode::Strict)
}

/// [`try_match`] without the explanation.
pub fn match_signature(signature: &TemplateSig, args: &[Type]) -> Option<Substitution> {
    try_match(signature, args).ok()
}

/// Capture holes positionally without checking concrete parts.
///
/// Used when argument checking is disabled. A hole still needs an argument
/// of the right shape around it (a vector for a vector template, and so on)
/// because otherwise nothing could fill it.
pub fn capture_positional(
    signature: &TemplateSig,
    args: &[Type],
) -> Result<Substitution, MatchFailure> {
    walk(signature, args, Mode::Lenient)
}

fn walk(signature: &TemplateSig, args: &[Type], mode: Mode) -> Result<Substitution, MatchFailure> {
    if !signature.accepts_arity(args.len()) {
        return Err(MatchFailure::Arity {
            expected: signature.params.len(),
            found: args.len(),
            variadic: signature.variadic,
        });
    }

    let mut subst = Substitution::new();
    for (position, (template, arg)) in signature.params.iter().zip(args).enumerate() {
        let mut walker = Walker {
            position,
            mode,
            subst: &mut subst,
        };
        if !walker.unify(template, arg) {
            tracing::trace!(position, %template, %arg, "argument rejected");
            return Err(MatchFailure::Shape {
                position,
                expected: template.clone(),
                found: arg.clone(),
            });
        }
    }
    Ok(subst)
}

struct Walker<'s> {
    position: usize,
    mode: Mode,
    subst: &'s mut Substitution,
}

impl Walker<'_> {
    fn unify(&mut self, template: &TemplateType, arg: &Type) -> bool {
        let strict = self.mode == Mode::Strict;
        if !strict && !template.is_generic() {
            return true;
        }

        match (template, arg) {
            (TemplateType::Placeholder, _) => {
                self.subst.bind(self.position, arg.clone());
                true
            }
            (
                TemplateType::Vector { element, count },
                Type::Vector {
                    element: arg_element,
                    count: arg_count,
                },
            ) => {
                match count {
                    VectorCount::Fixed(n) => {
                        if strict && n != arg_count {
                            return false;
                        }
                    }
                    VectorCount::Any => self.subst.fix_count(self.position, *arg_count),
                }
                self.unify(element, arg_element)
            }
            (
                TemplateType::Pointer {
                    pointee,
                    address_space,
                },
                Type::Pointer {
                    pointee: arg_pointee,
                    address_space: arg_space,
                },
            ) => {
                if strict && address_space != arg_space {
                    return false;
                }
                self.unify(pointee, arg_pointee)
            }
            (TemplateType::Struct(fields), Type::Struct(arg_fields)) => {
                fields.len() == arg_fields.len()
                    && fields
                        .iter()
                        .zip(arg_fields)
                        .all(|(field, arg_field)| self.unify(field, arg_field))
            }
            (TemplateType::Int { width }, Type::Int { width: arg_width }) => width == arg_width,
            (TemplateType::Float(kind), Type::Float(arg_kind)) => kind == arg_kind,
            (TemplateType::Void, Type::Void)
            | (TemplateType::Label, Type::Label)
            | (TemplateType::Token, Type::Token)
            | (TemplateType::Metadata, Type::Metadata) => true,
            _ => false,
        }
    }
}
