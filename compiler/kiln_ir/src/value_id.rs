//! Opaque ID newtypes for the `Module` arena.
//!
//! Each ID is a `u32` index into the corresponding `Module` vector. IDs are
//! only meaningful for the module that issued them.

/// Handle to a value (parameter, constant or instruction result).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

/// Handle to a function declaration or definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

/// Handle to a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

macro_rules! arena_id {
    ($($id:ident),*) => {$(
        impl $id {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "arena sizes stay far below u32::MAX"
            )]
            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// Position of this handle in its arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The raw index.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    )*};
}

arena_id!(ValueId, FunctionId, BlockId);
