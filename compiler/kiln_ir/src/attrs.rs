//! Function attributes and linkage.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Function attributes attached to a declaration.
    ///
    /// Rendered as a `; Function Attrs:` comment above the function, with
    /// keywords in alphabetical order.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FnAttrs: u16 {
        /// Never unwinds.
        const NOUNWIND = 1 << 0;
        /// Reads no memory.
        const READNONE = 1 << 1;
        /// Only reads memory.
        const READONLY = 1 << 2;
        /// Only touches memory reachable from pointer arguments.
        const ARGMEMONLY = 1 << 3;
        /// Never returns.
        const NORETURN = 1 << 4;
        /// Always returns.
        const WILLRETURN = 1 << 5;

        /// Pure computation on values (math, bit manipulation).
        const PURE = Self::NOUNWIND.bits() | Self::READNONE.bits() | Self::WILLRETURN.bits();
    }
}

impl FnAttrs {
    const KEYWORDS: [(FnAttrs, &'static str); 6] = [
        (FnAttrs::ARGMEMONLY, "argmemonly"),
        (FnAttrs::NORETURN, "noreturn"),
        (FnAttrs::NOUNWIND, "nounwind"),
        (FnAttrs::READNONE, "readnone"),
        (FnAttrs::READONLY, "readonly"),
        (FnAttrs::WILLRETURN, "willreturn"),
    ];
}

impl fmt::Display for FnAttrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, keyword) in Self::KEYWORDS {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(keyword)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Symbol linkage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Linkage {
    /// Visible to and resolvable from other units. Intrinsics always use this.
    #[default]
    External,
    /// Local to the unit, but keeps its symbol name.
    Internal,
    /// Local to the unit, no symbol table entry.
    Private,
}

impl Linkage {
    /// Keyword emitted after `define`/`declare`, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Linkage::External => None,
            Linkage::Internal => Some("internal"),
            Linkage::Private => Some("private"),
        }
    }
}
