//! The compilation unit.
//!
//! `Module` is an arena: it owns every function, block and value created in
//! it, and hands out `Copy` IDs. Functions are also indexed by symbol name,
//! which is what makes the module usable as a declaration cache.

use rustc_hash::FxHashMap;

use kiln_types::{ConcreteSig, Type};

use crate::attrs::{FnAttrs, Linkage};
use crate::error::IrError;
use crate::traits::{BackendTypes, DeclareMethods};
use crate::value_id::{BlockId, FunctionId, ValueId};

/// A function declaration or definition.
///
/// A function with no blocks is a declaration.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub signature: ConcreteSig,
    pub linkage: Linkage,
    pub attrs: FnAttrs,
    pub(crate) params: Vec<ValueId>,
    pub(crate) blocks: Vec<BlockId>,
}

impl Function {
    #[inline]
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Parameter values, one per fixed parameter.
    pub fn params(&self) -> &[ValueId] {
        &self.params
    }

    /// Blocks in layout order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }
}

/// A basic block.
#[derive(Clone, Debug)]
pub struct Block {
    pub name: String,
    pub parent: FunctionId,
    pub(crate) instructions: Vec<Instruction>,
}

impl Block {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// True once a `ret` has been appended.
    pub fn is_terminated(&self) -> bool {
        matches!(self.instructions.last(), Some(Instruction::Ret(_)))
    }
}

/// An instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Alloca {
        result: ValueId,
        allocated: Type,
    },
    Load {
        result: ValueId,
        ptr: ValueId,
    },
    Store {
        value: ValueId,
        ptr: ValueId,
    },
    Call {
        result: Option<ValueId>,
        callee: FunctionId,
        args: Vec<ValueId>,
    },
    Ret(Option<ValueId>),
}

impl Instruction {
    /// The value this instruction defines, if any.
    pub fn result(&self) -> Option<ValueId> {
        match self {
            Instruction::Alloca { result, .. } | Instruction::Load { result, .. } => Some(*result),
            Instruction::Call { result, .. } => *result,
            Instruction::Store { .. } | Instruction::Ret(_) => None,
        }
    }
}

/// What produced a value.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Param { function: FunctionId, index: usize },
    ConstInt(i64),
    ConstFloat(f64),
    ConstNull,
    /// Result of an instruction in some block.
    Instruction(BlockId),
}

/// A value and its type.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueData {
    pub ty: Type,
    pub kind: ValueKind,
}

/// A compilation unit.
#[derive(Debug, Default)]
pub struct Module {
    name: String,
    functions: Vec<Function>,
    symbols: FxHashMap<String, FunctionId>,
    blocks: Vec<Block>,
    values: Vec<ValueData>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look a function up by symbol name.
    pub fn function(&self, name: &str) -> Option<FunctionId> {
        self.symbols.get(name).copied()
    }

    pub fn function_data(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub(crate) fn function_data_mut(&mut self, id: FunctionId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    /// All functions, in creation order.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FunctionId::from_index(i), f))
    }

    /// Number of functions (declared or defined).
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Number of body-less functions.
    pub fn declaration_count(&self) -> usize {
        self.functions.iter().filter(|f| f.is_declaration()).count()
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    pub fn value(&self, id: ValueId) -> &ValueData {
        &self.values[id.index()]
    }

    pub fn value_type(&self, id: ValueId) -> &Type {
        &self.value(id).ty
    }

    /// Add a function. Fails if the name is taken.
    pub fn add_function(
        &mut self,
        name: &str,
        signature: ConcreteSig,
        linkage: Linkage,
    ) -> Result<FunctionId, IrError> {
        if self.symbols.contains_key(name) {
            return Err(IrError::DuplicateSymbol(name.to_owned()));
        }

        tracing::trace!(name, %signature, "add function");
        let id = self.insert_function(name, signature, linkage, FnAttrs::empty());
        Ok(id)
    }

    fn insert_function(
        &mut self,
        name: &str,
        signature: ConcreteSig,
        linkage: Linkage,
        attrs: FnAttrs,
    ) -> FunctionId {
        let id = FunctionId::from_index(self.functions.len());
        let params = signature
            .params
            .iter()
            .enumerate()
            .map(|(index, ty)| {
                let kind = ValueKind::Param {
                    function: id,
                    index,
                };
                let value = ValueId::from_index(self.values.len());
                self.values.push(ValueData {
                    ty: ty.clone(),
                    kind,
                });
                value
            })
            .collect();
        self.functions.push(Function {
            name: name.to_owned(),
            signature,
            linkage,
            attrs,
            params,
            blocks: Vec::new(),
        });
        self.symbols.insert(name.to_owned(), id);
        id
    }

    pub(crate) fn push_value(&mut self, ty: Type, kind: ValueKind) -> ValueId {
        let id = ValueId::from_index(self.values.len());
        self.values.push(ValueData { ty, kind });
        id
    }

    pub(crate) fn push_block(&mut self, parent: FunctionId, name: &str) -> BlockId {
        let id = BlockId::from_index(self.blocks.len());
        self.blocks.push(Block {
            name: name.to_owned(),
            parent,
            instructions: Vec::new(),
        });
        self.function_data_mut(parent).blocks.push(id);
        id
    }
}

impl BackendTypes for Module {
    type Value = ValueId;
    type Function = FunctionId;
}

impl DeclareMethods for Module {
    fn get_function(&self, name: &str) -> Option<FunctionId> {
        self.function(name)
    }

    fn declare_extern_function(
        &mut self,
        name: &str,
        signature: &ConcreteSig,
        attrs: FnAttrs,
    ) -> FunctionId {
        if let Some(existing) = self.function(name) {
            return existing;
        }
        tracing::debug!(name, %signature, "declare extern function");
        self.insert_function(name, signature.clone(), Linkage::External, attrs)
    }
}

#[cfg(test)]
mod tests;
