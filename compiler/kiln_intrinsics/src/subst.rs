//! Substitutions: what a match discovered about a template's holes.

use smallvec::SmallVec;

use kiln_types::Type;

/// A placeholder filled by a concrete type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    /// Parameter index the placeholder occurred in.
    pub position: usize,
    pub ty: Type,
}

/// An open vector count fixed by an argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Parameter index the vector occurred in.
    pub position: usize,
    pub count: u32,
}

/// Ordered record of every hole filled during one match.
///
/// Bindings and extents are each kept in walk order (parameters left to
/// right, depth-first within a parameter). The instantiator consumes them
/// in exactly that order, so both sides must walk templates identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Substitution {
    bindings: SmallVec<[Binding; 2]>,
    extents: SmallVec<[Extent; 2]>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit overload types, one binding per type.
    pub fn from_types(types: impl IntoIterator<Item = Type>) -> Self {
        Self {
            bindings: types
                .into_iter()
                .enumerate()
                .map(|(position, ty)| Binding { position, ty })
                .collect(),
            extents: SmallVec::new(),
        }
    }

    pub(crate) fn bind(&mut self, position: usize, ty: Type) {
        self.bindings.push(Binding { position, ty });
    }

    pub(crate) fn fix_count(&mut self, position: usize, count: u32) {
        self.extents.push(Extent { position, count });
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn extents(&self) -> &[Extent] {
        &self.extents
    }

    /// Bound types in order.
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.bindings.iter().map(|b| &b.ty)
    }

    /// The type inferred for the first placeholder, if any.
    pub fn first_type(&self) -> Option<&Type> {
        self.bindings.first().map(|b| &b.ty)
    }

    /// True when nothing was bound and no count was fixed.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.extents.is_empty()
    }
}
