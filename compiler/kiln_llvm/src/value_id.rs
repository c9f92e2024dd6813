//! Opaque ID newtypes and `ValueArena` for [`LlvmBuilder`](crate::LlvmBuilder).
//!
//! Callers never see inkwell's `'ll` lifetime. Each ID is a `u32` index into
//! the corresponding arena `Vec` and is only meaningful for the builder that
//! issued it.

use inkwell::basic_block::BasicBlock;
use inkwell::values::{BasicValueEnum, FunctionValue};

use kiln_types::{ConcreteSig, Type};

/// Opaque handle to an LLVM value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

/// Opaque handle to an LLVM basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

/// Opaque handle to an LLVM function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

macro_rules! arena_id {
    ($($id:ident),*) => {$(
        impl $id {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "arena sizes stay far below u32::MAX"
            )]
            #[inline]
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    )*};
}

arena_id!(ValueId, BlockId, FunctionId);

/// A function together with the kiln signature it was declared with.
#[derive(Clone)]
pub(crate) struct FunctionSlot<'ll> {
    pub(crate) value: FunctionValue<'ll>,
    pub(crate) signature: ConcreteSig,
    pub(crate) name: String,
    /// False when `signature` had no LLVM lowering and `value` is a placeholder.
    pub(crate) lowered: bool,
}

/// Stores LLVM values behind opaque IDs, each with its kiln type.
pub(crate) struct ValueArena<'ll> {
    values: Vec<(BasicValueEnum<'ll>, Type)>,
    blocks: Vec<(BasicBlock<'ll>, FunctionId)>,
    functions: Vec<FunctionSlot<'ll>>,
}

impl<'ll> ValueArena<'ll> {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            blocks: Vec::new(),
            functions: Vec::new(),
        }
    }

    // -- Values --

    pub(crate) fn push_value(&mut self, value: BasicValueEnum<'ll>, ty: Type) -> ValueId {
        let id = ValueId::from_index(self.values.len());
        self.values.push((value, ty));
        id
    }

    pub(crate) fn get_value(&self, id: ValueId) -> BasicValueEnum<'ll> {
        self.values[id.index()].0
    }

    pub(crate) fn value_type(&self, id: ValueId) -> &Type {
        &self.values[id.index()].1
    }

    // -- Blocks --

    pub(crate) fn push_block(&mut self, block: BasicBlock<'ll>, parent: FunctionId) -> BlockId {
        let id = BlockId::from_index(self.blocks.len());
        self.blocks.push((block, parent));
        id
    }

    pub(crate) fn get_block(&self, id: BlockId) -> BasicBlock<'ll> {
        self.blocks[id.index()].0
    }

    pub(crate) fn block_parent(&self, id: BlockId) -> FunctionId {
        self.blocks[id.index()].1
    }

    // -- Functions --

    pub(crate) fn push_function(&mut self, slot: FunctionSlot<'ll>) -> FunctionId {
        let id = FunctionId::from_index(self.functions.len());
        self.functions.push(slot);
        id
    }

    pub(crate) fn get_function(&self, id: FunctionId) -> &FunctionSlot<'ll> {
        &self.functions[id.index()]
    }
}
