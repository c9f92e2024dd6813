//! Instruction builder over a [`Module`].
//!
//! The builder borrows the module mutably for its lifetime and tracks one
//! insertion point (a block). Every instruction-producing method fails with
//! [`IrError::NoInsertionPoint`] until `position_at_end` has been called.

use kiln_types::{ConcreteSig, Type};

use crate::attrs::{FnAttrs, Linkage};
use crate::error::IrError;
use crate::module::{Instruction, Module, ValueKind};
use crate::traits::{BackendTypes, BuilderMethods, DeclareMethods};
use crate::value_id::{BlockId, FunctionId, ValueId};

/// Builds instructions into a borrowed [`Module`].
pub struct IrBuilder<'m> {
    module: &'m mut Module,
    block: Option<BlockId>,
}

impl<'m> IrBuilder<'m> {
    pub fn new(module: &'m mut Module) -> Self {
        Self {
            module,
            block: None,
        }
    }

    /// The module being built.
    pub fn module(&self) -> &Module {
        self.module
    }

    // -- Functions and blocks --

    pub fn add_function(
        &mut self,
        name: &str,
        signature: ConcreteSig,
        linkage: Linkage,
    ) -> Result<FunctionId, IrError> {
        self.module.add_function(name, signature, linkage)
    }

    pub fn append_block(&mut self, function: FunctionId, name: &str) -> BlockId {
        self.module.push_block(function, name)
    }

    pub fn position_at_end(&mut self, block: BlockId) {
        self.block = Some(block);
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.block
    }

    /// The function owning the insertion point.
    pub fn current_function(&self) -> Option<FunctionId> {
        self.block.map(|b| self.module.block(b).parent)
    }

    /// Parameter `index` of `function`.
    pub fn param(&self, function: FunctionId, index: usize) -> Option<ValueId> {
        self.module.function_data(function).params.get(index).copied()
    }

    // -- Constants --

    pub fn const_int(&mut self, ty: Type, value: i64) -> ValueId {
        self.module.push_value(ty, ValueKind::ConstInt(value))
    }

    pub fn const_float(&mut self, ty: Type, value: f64) -> ValueId {
        self.module.push_value(ty, ValueKind::ConstFloat(value))
    }

    /// A null pointer of type `ty`.
    pub fn const_null(&mut self, ty: Type) -> Result<ValueId, IrError> {
        if !ty.is_pointer() {
            return Err(IrError::NotAPointer { found: ty });
        }
        Ok(self.module.push_value(ty, ValueKind::ConstNull))
    }

    // -- Memory --

    /// Stack slot for one `allocated`; yields a pointer to it.
    pub fn alloca(&mut self, allocated: Type) -> Result<ValueId, IrError> {
        let block = self.insertion_point()?;
        let result = self
            .module
            .push_value(Type::ptr(allocated.clone()), ValueKind::Instruction(block));
        self.push(block, Instruction::Alloca { result, allocated });
        Ok(result)
    }

    pub fn load(&mut self, ptr: ValueId) -> Result<ValueId, IrError> {
        let block = self.insertion_point()?;
        let pointee = match self.module.value_type(ptr) {
            Type::Pointer { pointee, .. } => (**pointee).clone(),
            other => return Err(IrError::NotAPointer { found: other.clone() }),
        };
        let result = self
            .module
            .push_value(pointee, ValueKind::Instruction(block));
        self.push(block, Instruction::Load { result, ptr });
        Ok(result)
    }

    pub fn store(&mut self, value: ValueId, ptr: ValueId) -> Result<(), IrError> {
        let block = self.insertion_point()?;
        let ptr_ty = self.module.value_type(ptr);
        if !ptr_ty.is_pointer() {
            return Err(IrError::NotAPointer {
                found: ptr_ty.clone(),
            });
        }
        self.push(block, Instruction::Store { value, ptr });
        Ok(())
    }

    // -- Terminators --

    pub fn ret(&mut self, value: ValueId) -> Result<(), IrError> {
        let block = self.insertion_point()?;
        let expected = self.return_type_of(block);
        let found = self.module.value_type(value);
        if *found != expected {
            return Err(IrError::ReturnType {
                expected,
                found: found.clone(),
            });
        }
        self.push(block, Instruction::Ret(Some(value)));
        Ok(())
    }

    pub fn ret_void(&mut self) -> Result<(), IrError> {
        let block = self.insertion_point()?;
        let expected = self.return_type_of(block);
        if !expected.is_void() {
            return Err(IrError::ReturnType {
                expected,
                found: Type::Void,
            });
        }
        self.push(block, Instruction::Ret(None));
        Ok(())
    }

    // -- Helpers --

    fn insertion_point(&self) -> Result<BlockId, IrError> {
        self.block.ok_or(IrError::NoInsertionPoint)
    }

    fn return_type_of(&self, block: BlockId) -> Type {
        let parent = self.module.block(block).parent;
        self.module.function_data(parent).signature.ret.clone()
    }

    fn push(&mut self, block: BlockId, inst: Instruction) {
        self.module.block_mut(block).instructions.push(inst);
    }
}

impl BackendTypes for IrBuilder<'_> {
    type Value = ValueId;
    type Function = FunctionId;
}

impl DeclareMethods for IrBuilder<'_> {
    fn get_function(&self, name: &str) -> Option<FunctionId> {
        self.module.get_function(name)
    }

    fn declare_extern_function(
        &mut self,
        name: &str,
        signature: &ConcreteSig,
        attrs: FnAttrs,
    ) -> FunctionId {
        self.module.declare_extern_function(name, signature, attrs)
    }
}

impl BuilderMethods for IrBuilder<'_> {
    fn value_type(&self, value: ValueId) -> Type {
        self.module.value_type(value).clone()
    }

    fn has_insertion_point(&self) -> bool {
        self.block.is_some()
    }

    fn call(
        &mut self,
        callee: FunctionId,
        args: &[ValueId],
    ) -> Result<Option<ValueId>, IrError> {
        let block = self.insertion_point()?;
        let function = self.module.function_data(callee);
        let signature = &function.signature;

        if !signature.accepts_arity(args.len()) {
            return Err(IrError::ArgumentCount {
                callee: function.name.clone(),
                expected: signature.params.len(),
                found: args.len(),
            });
        }
        for (index, (param, &arg)) in signature.params.iter().zip(args).enumerate() {
            let found = self.module.value_type(arg);
            if found != param {
                return Err(IrError::ArgumentType {
                    callee: function.name.clone(),
                    index,
                    expected: param.clone(),
                    found: found.clone(),
                });
            }
        }

        let ret = signature.ret.clone();
        let result = if ret.is_void() {
            None
        } else {
            Some(self.module.push_value(ret, ValueKind::Instruction(block)))
        };
        self.push(block, Instruction::Call {
            result,
            callee,
            args: args.to_vec(),
        });
        Ok(result)
    }
}
