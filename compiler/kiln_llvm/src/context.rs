//! LLVM context and type lowering.

use inkwell::attributes::{Attribute, AttributeLoc};
use inkwell::context::Context;
use inkwell::module::{Linkage as LlvmLinkage, Module};
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FloatType, FunctionType};
use inkwell::values::FunctionValue;
use inkwell::AddressSpace;

use kiln_ir::{FnAttrs, Linkage};
use kiln_types::{ConcreteSig, FloatKind, Type};

/// Minimal LLVM context: the LLVM context and one module.
pub struct SimpleCx<'ll> {
    /// The LLVM context (owns all LLVM types and values).
    pub llcx: &'ll Context,
    /// The LLVM module being compiled.
    pub llmod: Module<'ll>,
}

impl<'ll> SimpleCx<'ll> {
    #[must_use]
    pub fn new(context: &'ll Context, module_name: &str) -> Self {
        Self {
            llcx: context,
            llmod: context.create_module(module_name),
        }
    }

    /// Textual IR of the whole module.
    pub fn print_to_string(&self) -> String {
        self.llmod.print_to_string().to_string()
    }

    // -- Type lowering --

    /// Lower a first-class kiln type.
    ///
    /// `None` for `void`, `label`, `token` and `metadata`, and for vectors
    /// of anything but integers, floats and pointers.
    pub fn lower_basic(&self, ty: &Type) -> Option<BasicTypeEnum<'ll>> {
        Some(match ty {
            Type::Int { width } => self.llcx.custom_width_int_type(*width).into(),
            Type::Float(kind) => self.lower_float(*kind).into(),
            Type::Pointer { address_space, .. } => {
                let space = u16::try_from(*address_space).ok()?;
                self.llcx.ptr_type(AddressSpace::from(space)).into()
            }
            Type::Vector { element, count } => match self.lower_basic(element)? {
                BasicTypeEnum::IntType(t) => t.vec_type(*count).into(),
                BasicTypeEnum::FloatType(t) => t.vec_type(*count).into(),
                BasicTypeEnum::PointerType(t) => t.vec_type(*count).into(),
                _ => return None,
            },
            Type::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| self.lower_basic(field))
                    .collect::<Option<Vec<_>>>()?;
                self.llcx.struct_type(&fields, false).into()
            }
            Type::Void | Type::Label | Type::Token | Type::Metadata => return None,
        })
    }

    /// Lower a parameter type; unlike [`lower_basic`](Self::lower_basic)
    /// this admits `metadata`.
    pub fn lower_param(&self, ty: &Type) -> Option<BasicMetadataTypeEnum<'ll>> {
        match ty {
            Type::Metadata => Some(self.llcx.metadata_type().into()),
            _ => self.lower_basic(ty).map(Into::into),
        }
    }

    /// Lower a function signature; a `void` return lowers to LLVM's void.
    pub fn lower_signature(&self, signature: &ConcreteSig) -> Option<FunctionType<'ll>> {
        let params = signature
            .params
            .iter()
            .map(|param| self.lower_param(param))
            .collect::<Option<Vec<_>>>()?;
        Some(if signature.ret.is_void() {
            self.llcx.void_type().fn_type(&params, signature.variadic)
        } else {
            self.lower_basic(&signature.ret)?
                .fn_type(&params, signature.variadic)
        })
    }

    fn lower_float(&self, kind: FloatKind) -> FloatType<'ll> {
        match kind {
            FloatKind::Half => self.llcx.f16_type(),
            FloatKind::Float => self.llcx.f32_type(),
            FloatKind::Double => self.llcx.f64_type(),
            FloatKind::X86Fp80 => self.llcx.x86_f80_type(),
            FloatKind::Fp128 => self.llcx.f128_type(),
            FloatKind::PpcFp128 => self.llcx.ppc_f128_type(),
        }
    }

    // -- Functions --

    /// Add a function to the module, with kiln linkage and attributes.
    pub fn add_function(
        &self,
        name: &str,
        fn_type: FunctionType<'ll>,
        linkage: Linkage,
        attrs: FnAttrs,
    ) -> FunctionValue<'ll> {
        let function = self
            .llmod
            .add_function(name, fn_type, Some(lower_linkage(linkage)));
        self.apply_attrs(function, attrs);
        function
    }

    fn apply_attrs(&self, function: FunctionValue<'ll>, attrs: FnAttrs) {
        for (flag, keyword) in [
            (FnAttrs::NOUNWIND, "nounwind"),
            (FnAttrs::NORETURN, "noreturn"),
            (FnAttrs::WILLRETURN, "willreturn"),
        ] {
            if attrs.contains(flag) {
                self.add_enum_attribute(function, keyword, 0);
            }
        }
        if let Some(effects) = memory_effects(attrs) {
            self.add_enum_attribute(function, "memory", effects);
        }
    }

    fn add_enum_attribute(&self, function: FunctionValue<'ll>, keyword: &str, value: u64) {
        let kind = Attribute::get_named_enum_kind_id(keyword);
        let attr = self.llcx.create_enum_attribute(kind, value);
        function.add_attribute(AttributeLoc::Function, attr);
    }
}

fn lower_linkage(linkage: Linkage) -> LlvmLinkage {
    match linkage {
        Linkage::External => LlvmLinkage::External,
        Linkage::Internal => LlvmLinkage::Internal,
        Linkage::Private => LlvmLinkage::Private,
    }
}

/// Encode `readnone`/`readonly`/`argmemonly` as an LLVM 17 `memory(...)`
/// attribute value.
///
/// Two bits per location (argument memory, inaccessible memory, other):
/// `1` reads, `2` writes.
fn memory_effects(attrs: FnAttrs) -> Option<u64> {
    const READ: u64 = 0b01;
    const READ_WRITE: u64 = 0b11;

    let access = if attrs.contains(FnAttrs::READNONE) {
        0
    } else if attrs.contains(FnAttrs::READONLY) {
        READ
    } else {
        READ_WRITE
    };
    if attrs.contains(FnAttrs::ARGMEMONLY) {
        Some(access)
    } else if attrs.intersects(FnAttrs::READNONE | FnAttrs::READONLY) {
        Some(access | (access << 2) | (access << 4))
    } else {
        None
    }
}
