//! ID-based LLVM instruction builder.
//!
//! `LlvmBuilder` wraps inkwell's `Builder` and keeps every value it hands
//! out in a `ValueArena`, next to the value's kiln type. It implements the
//! `kiln_ir` backend traits, so intrinsic calls can be emitted into a real
//! LLVM module.
//!
//! # Method Organization
//!
//! | Category | Methods |
//! |----------|---------|
//! | Functions | `add_function`, `declare_extern_function`, `get_function`, `param` |
//! | Blocks | `append_block`, `position_at_end`, `current_block` |
//! | Constants | `const_int`, `const_float`, `const_null` |
//! | Memory | `alloca`, `load`, `store` |
//! | Control flow | `ret`, `ret_void` |
//! | Calls | `call` |

use std::cell::Cell;

use inkwell::builder::{Builder as InkwellBuilder, BuilderError};
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicMetadataValueEnum, FunctionValue};
use rustc_hash::FxHashMap;

use kiln_ir::{BackendTypes, BuilderMethods, DeclareMethods, FnAttrs, IrError, Linkage};
use kiln_types::{ConcreteSig, Type};

use crate::context::SimpleCx;
use crate::value_id::{BlockId, FunctionId, FunctionSlot, ValueArena, ValueId};

/// ID-based LLVM IR builder.
///
/// Two lifetimes:
/// - `'ll`: the LLVM context lifetime (from `Context::create()`).
/// - `'scx`: the borrow of the `SimpleCx`.
pub struct LlvmBuilder<'scx, 'll> {
    builder: InkwellBuilder<'ll>,
    scx: &'scx SimpleCx<'ll>,
    arena: ValueArena<'ll>,
    /// Functions created through this builder, by symbol name.
    symbols: FxHashMap<String, FunctionId>,
    current_block: Option<BlockId>,
    /// Declarations whose kiln signature had no LLVM lowering.
    ///
    /// Such a declaration falls back to `void (...)` and the module must not
    /// be handed to LLVM's code generator.
    codegen_errors: Cell<u32>,
}

impl<'scx, 'll> LlvmBuilder<'scx, 'll> {
    pub fn new(scx: &'scx SimpleCx<'ll>) -> Self {
        Self {
            builder: scx.llcx.create_builder(),
            scx,
            arena: ValueArena::new(),
            symbols: FxHashMap::default(),
            current_block: None,
            codegen_errors: Cell::new(0),
        }
    }

    #[inline]
    pub fn scx(&self) -> &'scx SimpleCx<'ll> {
        self.scx
    }

    fn record_codegen_error(&self) {
        self.codegen_errors.set(self.codegen_errors.get() + 1);
    }

    /// Number of declarations that fell back to a placeholder type.
    pub fn codegen_error_count(&self) -> u32 {
        self.codegen_errors.get()
    }

    // -- Functions and blocks --

    /// Add a function that will receive a body.
    pub fn add_function(
        &mut self,
        name: &str,
        signature: ConcreteSig,
        linkage: Linkage,
    ) -> Result<FunctionId, IrError> {
        if self.symbols.contains_key(name) || self.scx.llmod.get_function(name).is_some() {
            return Err(IrError::DuplicateSymbol(name.to_owned()));
        }
        let fn_type = self.scx.lower_signature(&signature).ok_or_else(|| {
            IrError::Backend(format!("signature of `{name}` has no LLVM lowering"))
        })?;
        let value = self
            .scx
            .add_function(name, fn_type, linkage, FnAttrs::empty());
        Ok(self.register(name, value, signature, true))
    }

    fn register(
        &mut self,
        name: &str,
        value: FunctionValue<'ll>,
        signature: ConcreteSig,
        lowered: bool,
    ) -> FunctionId {
        let id = self.arena.push_function(FunctionSlot {
            value,
            signature,
            name: name.to_owned(),
            lowered,
        });
        self.symbols.insert(name.to_owned(), id);
        id
    }

    pub fn append_block(&mut self, function: FunctionId, name: &str) -> BlockId {
        let value = self.arena.get_function(function).value;
        let block = self.scx.llcx.append_basic_block(value, name);
        self.arena.push_block(block, function)
    }

    pub fn position_at_end(&mut self, block: BlockId) {
        self.builder.position_at_end(self.arena.get_block(block));
        self.current_block = Some(block);
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    /// Parameter `index` of `function`.
    pub fn param(&mut self, function: FunctionId, index: usize) -> Option<ValueId> {
        let slot = self.arena.get_function(function);
        let ty = slot.signature.params.get(index)?.clone();
        let value = slot.value.get_nth_param(u32::try_from(index).ok()?)?;
        Some(self.arena.push_value(value, ty))
    }

    // -- Constants --

    #[allow(
        clippy::cast_sign_loss,
        reason = "const_int takes the two's complement bits and sign-extends"
    )]
    pub fn const_int(&mut self, ty: Type, value: i64) -> Result<ValueId, IrError> {
        let Some(BasicTypeEnum::IntType(int)) = self.scx.lower_basic(&ty) else {
            return Err(IrError::Backend(format!("`{ty}` is not an integer type")));
        };
        let v = int.const_int(value as u64, value < 0);
        Ok(self.arena.push_value(v.into(), ty))
    }

    pub fn const_float(&mut self, ty: Type, value: f64) -> Result<ValueId, IrError> {
        let Some(BasicTypeEnum::FloatType(float)) = self.scx.lower_basic(&ty) else {
            return Err(IrError::Backend(format!("`{ty}` is not a float type")));
        };
        let v = float.const_float(value);
        Ok(self.arena.push_value(v.into(), ty))
    }

    pub fn const_null(&mut self, ty: Type) -> Result<ValueId, IrError> {
        let Some(BasicTypeEnum::PointerType(ptr)) = self.scx.lower_basic(&ty) else {
            return Err(IrError::NotAPointer { found: ty });
        };
        let v = ptr.const_null();
        Ok(self.arena.push_value(v.into(), ty))
    }

    // -- Memory --

    /// Stack slot for `allocated`; the result has type `allocated*`.
    pub fn alloca(&mut self, allocated: Type) -> Result<ValueId, IrError> {
        self.insertion_point()?;
        let llvm_ty = self.lower(&allocated)?;
        let ptr = self.builder.build_alloca(llvm_ty, "").map_err(backend)?;
        Ok(self.arena.push_value(ptr.into(), Type::ptr(allocated)))
    }

    pub fn load(&mut self, ptr: ValueId) -> Result<ValueId, IrError> {
        self.insertion_point()?;
        let pointee = self.pointee(ptr)?;
        let llvm_ty = self.lower(&pointee)?;
        let raw = self.arena.get_value(ptr).into_pointer_value();
        let v = self.builder.build_load(llvm_ty, raw, "").map_err(backend)?;
        Ok(self.arena.push_value(v, pointee))
    }

    pub fn store(&mut self, value: ValueId, ptr: ValueId) -> Result<(), IrError> {
        self.insertion_point()?;
        self.pointee(ptr)?;
        let raw = self.arena.get_value(ptr).into_pointer_value();
        self.builder
            .build_store(raw, self.arena.get_value(value))
            .map_err(backend)?;
        Ok(())
    }

    // -- Control flow --

    pub fn ret(&mut self, value: ValueId) -> Result<(), IrError> {
        let expected = self.current_return_type()?;
        let found = self.arena.value_type(value);
        if *found != expected {
            return Err(IrError::ReturnType {
                expected,
                found: found.clone(),
            });
        }
        let v = self.arena.get_value(value);
        self.builder.build_return(Some(&v)).map_err(backend)?;
        Ok(())
    }

    pub fn ret_void(&mut self) -> Result<(), IrError> {
        let expected = self.current_return_type()?;
        if !expected.is_void() {
            return Err(IrError::ReturnType {
                expected,
                found: Type::Void,
            });
        }
        self.builder.build_return(None).map_err(backend)?;
        Ok(())
    }

    // -- Helpers --

    fn insertion_point(&self) -> Result<BlockId, IrError> {
        self.current_block.ok_or(IrError::NoInsertionPoint)
    }

    fn current_return_type(&self) -> Result<Type, IrError> {
        let block = self.insertion_point()?;
        let function = self.arena.block_parent(block);
        Ok(self.arena.get_function(function).signature.ret.clone())
    }

    fn pointee(&self, ptr: ValueId) -> Result<Type, IrError> {
        match self.arena.value_type(ptr) {
            Type::Pointer { pointee, .. } => Ok((**pointee).clone()),
            other => Err(IrError::NotAPointer {
                found: other.clone(),
            }),
        }
    }

    fn lower(&self, ty: &Type) -> Result<BasicTypeEnum<'ll>, IrError> {
        self.scx
            .lower_basic(ty)
            .ok_or_else(|| IrError::Backend(format!("`{ty}` has no LLVM lowering")))
    }
}

fn backend(err: BuilderError) -> IrError {
    IrError::Backend(err.to_string())
}

impl BackendTypes for LlvmBuilder<'_, '_> {
    type Value = ValueId;
    type Function = FunctionId;
}

impl DeclareMethods for LlvmBuilder<'_, '_> {
    fn get_function(&self, name: &str) -> Option<FunctionId> {
        self.symbols.get(name).copied()
    }

    fn declare_extern_function(
        &mut self,
        name: &str,
        signature: &ConcreteSig,
        attrs: FnAttrs,
    ) -> FunctionId {
        if let Some(existing) = self.get_function(name) {
            return existing;
        }
        let lowered = self.scx.lower_signature(signature);
        let fn_type = lowered.unwrap_or_else(|| {
            tracing::error!(name, %signature, "declaration has no LLVM lowering");
            self.record_codegen_error();
            self.scx.llcx.void_type().fn_type(&[], true)
        });
        let value = self
            .scx
            .llmod
            .get_function(name)
            .unwrap_or_else(|| self.scx.add_function(name, fn_type, Linkage::External, attrs));
        tracing::debug!(name, %signature, "declared external function");
        self.register(name, value, signature.clone(), lowered.is_some())
    }
}

impl BuilderMethods for LlvmBuilder<'_, '_> {
    fn value_type(&self, value: ValueId) -> Type {
        self.arena.value_type(value).clone()
    }

    fn has_insertion_point(&self) -> bool {
        self.current_block.is_some()
    }

    fn call(
        &mut self,
        callee: FunctionId,
        args: &[ValueId],
    ) -> Result<Option<ValueId>, IrError> {
        self.insertion_point()?;
        let slot = self.arena.get_function(callee);
        if !slot.lowered {
            return Err(IrError::Backend(format!(
                "`{}` has no LLVM lowering and cannot be called",
                slot.name
            )));
        }
        let signature = &slot.signature;

        if !signature.accepts_arity(args.len()) {
            return Err(IrError::ArgumentCount {
                callee: slot.name.clone(),
                expected: signature.params.len(),
                found: args.len(),
            });
        }
        for (index, (param, &arg)) in signature.params.iter().zip(args).enumerate() {
            let found = self.arena.value_type(arg);
            if found != param {
                return Err(IrError::ArgumentType {
                    callee: slot.name.clone(),
                    index,
                    expected: param.clone(),
                    found: found.clone(),
                });
            }
        }

        let ret = signature.ret.clone();
        let function = slot.value;
        let arg_vals: Vec<BasicMetadataValueEnum<'_>> = args
            .iter()
            .map(|&id| self.arena.get_value(id).into())
            .collect();
        let call = self
            .builder
            .build_call(function, &arg_vals, "")
            .map_err(backend)?;
        Ok(call
            .try_as_basic_value()
            .basic()
            .map(|v| self.arena.push_value(v, ret)))
    }
}
