//! Intrinsic signature table.
//!
//! Maps a name to a single definition or to an overload family. The engine
//! works over any well-formed table; [`IntrinsicTable::builtin`] loads the
//! data shipped with this crate.
//!
//! # Builtin Data
//!
//! - `global`: non-overloaded intrinsics with fixed signatures
//! - `generic`: templates with placeholders, instantiated per call site
//! - `families`: overload sets enumerated as concrete members

mod families;
mod generic;
mod global;

use rustc_hash::FxHashMap;

use kiln_ir::FnAttrs;
use kiln_types::{Signature, TemplateType, Type};

use crate::def::{Intrinsic, IntrinsicDef, IntrinsicFamily};
use crate::error::ResolveError;

/// One named table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEntry {
    Single(IntrinsicDef),
    Family(IntrinsicFamily),
}

impl TableEntry {
    pub fn name(&self) -> &str {
        match self {
            TableEntry::Single(def) => &def.selector,
            TableEntry::Family(family) => &family.name,
        }
    }

    pub fn as_intrinsic(&self) -> Intrinsic<'_> {
        match self {
            TableEntry::Single(def) => Intrinsic::Single(def),
            TableEntry::Family(family) => Intrinsic::Family(family),
        }
    }
}

/// Name-indexed registry of intrinsics, iterated in insertion order.
#[derive(Clone, Debug, Default)]
pub struct IntrinsicTable {
    entries: Vec<TableEntry>,
    index: FxHashMap<String, usize>,
}

impl IntrinsicTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped intrinsic data.
    pub fn builtin() -> Result<Self, ResolveError> {
        let mut table = Self::new();
        global::register(&mut table)?;
        generic::register(&mut table)?;
        families::register(&mut table)?;
        tracing::debug!(entries = table.len(), "loaded builtin intrinsic table");
        Ok(table)
    }

    pub fn insert_single(&mut self, def: IntrinsicDef) -> Result<(), ResolveError> {
        self.insert(TableEntry::Single(def))
    }

    /// Register an overload family. Families must have at least one member.
    pub fn insert_family(&mut self, family: IntrinsicFamily) -> Result<(), ResolveError> {
        if family.members.is_empty() {
            return Err(ResolveError::EmptyFamily(family.name));
        }
        self.insert(TableEntry::Family(family))
    }

    fn insert(&mut self, entry: TableEntry) -> Result<(), ResolveError> {
        let name = entry.name();
        if self.index.contains_key(name) {
            return Err(ResolveError::DuplicateIntrinsic(name.to_owned()));
        }
        self.index.insert(name.to_owned(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Look up an entry as a call-site selector.
    pub fn get(&self, name: &str) -> Option<Intrinsic<'_>> {
        self.entry(name).map(TableEntry::as_intrinsic)
    }

    pub fn entry(&self, name: &str) -> Option<&TableEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// A single definition by name; `None` for families.
    pub fn single(&self, name: &str) -> Option<&IntrinsicDef> {
        match self.entry(name)? {
            TableEntry::Single(def) => Some(def),
            TableEntry::Family(_) => None,
        }
    }

    /// A family by name; `None` for single definitions.
    pub fn family(&self, name: &str) -> Option<&IntrinsicFamily> {
        match self.entry(name)? {
            TableEntry::Family(family) => Some(family),
            TableEntry::Single(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.iter()
    }
}

impl<'t> IntoIterator for &'t IntrinsicTable {
    type Item = &'t TableEntry;
    type IntoIter = std::slice::Iter<'t, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// -- Data helpers --

/// A concrete type used in template position.
fn t(ty: Type) -> TemplateType {
    ty.into()
}

fn def(
    selector: &str,
    params: impl IntoIterator<Item = TemplateType>,
    ret: TemplateType,
    attrs: FnAttrs,
) -> IntrinsicDef {
    IntrinsicDef::new(selector, Signature::new(params, ret), attrs)
}

fn variadic_def(
    selector: &str,
    params: impl IntoIterator<Item = TemplateType>,
    ret: TemplateType,
    attrs: FnAttrs,
) -> IntrinsicDef {
    IntrinsicDef::new(selector, Signature::variadic(params, ret), attrs)
}
