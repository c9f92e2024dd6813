//! Overload selection within a family.

use smallvec::SmallVec;

use kiln_types::Type;

use crate::config::OverloadPolicy;
use crate::def::{IntrinsicDef, IntrinsicFamily};
use crate::error::ResolveError;
use crate::matcher::match_signature;
use crate::subst::Substitution;

/// Pick the member of `family` that accepts `args`.
///
/// Every member is tried. No match is [`ResolveError::NoCandidate`]. More
/// than one is resolved by `policy`: the first in table order, or an error.
pub fn select<'f>(
    family: &'f IntrinsicFamily,
    args: &[Type],
    policy: OverloadPolicy,
) -> Result<(&'f IntrinsicDef, Substitution), ResolveError> {
    let matches: SmallVec<[(&IntrinsicDef, Substitution); 2]> = family
        .members
        .iter()
        .filter_map(|def| match_signature(&def.signature, args).map(|subst| (def, subst)))
        .collect();

    if matches.len() > 1 {
        let candidates: Vec<String> = matches
            .iter()
            .map(|(def, _)| format!("{} {}", def.selector, def.signature))
            .collect();
        match policy {
            OverloadPolicy::FirstMatch => {
                tracing::warn!(
                    family = %family.name,
                    chosen = %candidates[0],
                    candidates = ?candidates,
                    "ambiguous overload, taking the first match"
                );
            }
            OverloadPolicy::Reject => {
                return Err(ResolveError::AmbiguousOverload {
                    family: family.name.clone(),
                    candidates,
                });
            }
        }
    }

    matches
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::NoCandidate {
            family: family.name.clone(),
            args: args.to_vec(),
        })
}
