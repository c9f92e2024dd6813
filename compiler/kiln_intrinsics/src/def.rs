//! Intrinsic definitions.

use kiln_ir::FnAttrs;
use kiln_types::TemplateSig;

/// One intrinsic signature, possibly generic.
///
/// `selector` is the base name (`llvm.ssa.copy`); the mangled name of a
/// concrete instantiation appends one type token per placeholder binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntrinsicDef {
    pub selector: String,
    pub signature: TemplateSig,
    pub attrs: FnAttrs,
}

impl IntrinsicDef {
    pub fn new(selector: impl Into<String>, signature: TemplateSig, attrs: FnAttrs) -> Self {
        Self {
            selector: selector.into(),
            signature,
            attrs,
        }
    }

    /// Whether any parameter or the return type has a hole.
    pub fn is_overloaded(&self) -> bool {
        !self.signature.is_concrete()
    }
}

/// A named, ordered set of overloads.
///
/// Members are tried in order; the table author keeps their argument shapes
/// mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntrinsicFamily {
    pub name: String,
    pub members: Vec<IntrinsicDef>,
}

impl IntrinsicFamily {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = IntrinsicDef>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }
}

/// Call-site selector: a single known template, or a family to choose from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intrinsic<'a> {
    Single(&'a IntrinsicDef),
    Family(&'a IntrinsicFamily),
}

impl Intrinsic<'_> {
    /// Selector of a single definition, or the family name.
    pub fn name(&self) -> &str {
        match self {
            Intrinsic::Single(def) => &def.selector,
            Intrinsic::Family(family) => &family.name,
        }
    }
}

impl<'a> From<&'a IntrinsicDef> for Intrinsic<'a> {
    fn from(def: &'a IntrinsicDef) -> Self {
        Intrinsic::Single(def)
    }
}

impl<'a> From<&'a IntrinsicFamily> for Intrinsic<'a> {
    fn from(family: &'a IntrinsicFamily) -> Self {
        Intrinsic::Family(family)
    }
}
