//! Templates with placeholders.
//!
//! Each placeholder contributes one name token, so a placeholder appears
//! only where the real intrinsic name carries a type suffix. Other
//! operands stay concrete.

use kiln_ir::FnAttrs;
use kiln_types::{TemplateType, Type};

use super::{def, t, variadic_def, IntrinsicTable};
use crate::error::ResolveError;

/// Unary float operations overloaded on their operand.
const UNARY_FLOAT: [&str; 9] = [
    "llvm.floor",
    "llvm.ceil",
    "llvm.trunc",
    "llvm.rint",
    "llvm.nearbyint",
    "llvm.round",
    "llvm.exp2",
    "llvm.log2",
    "llvm.log10",
];

pub(super) fn register(table: &mut IntrinsicTable) -> Result<(), ResolveError> {
    let any = TemplateType::any;
    let void = || t(Type::Void);
    let flag = || t(Type::i1());
    let int32 = || t(Type::i32());
    let mask = || TemplateType::vector_any(t(Type::i1()));
    let lanes = || TemplateType::vector_any(TemplateType::any());

    let pure = FnAttrs::PURE;
    let writes_args = FnAttrs::ARGMEMONLY | FnAttrs::NOUNWIND | FnAttrs::WILLRETURN;
    let reads_args = writes_args | FnAttrs::READONLY;

    let mut defs = vec![
        def(
            "llvm.ssa.copy",
            [any()],
            any(),
            FnAttrs::NOUNWIND | FnAttrs::READNONE,
        ),
        // Masked vector memory
        def(
            "llvm.masked.load",
            [TemplateType::ptr(lanes()), int32(), mask(), lanes()],
            lanes(),
            reads_args,
        ),
        def(
            "llvm.masked.store",
            [lanes(), TemplateType::ptr(lanes()), int32(), mask()],
            void(),
            writes_args,
        ),
        def(
            "llvm.masked.expandload",
            [TemplateType::ptr(any()), mask(), lanes()],
            lanes(),
            FnAttrs::NOUNWIND | FnAttrs::READONLY | FnAttrs::WILLRETURN,
        ),
        def(
            "llvm.masked.compressstore",
            [lanes(), TemplateType::ptr(any()), mask()],
            void(),
            FnAttrs::NOUNWIND | FnAttrs::WILLRETURN,
        ),
        // Memory hints
        def(
            "llvm.prefetch",
            [any(), int32(), int32(), int32()],
            void(),
            FnAttrs::ARGMEMONLY | FnAttrs::NOUNWIND | FnAttrs::WILLRETURN,
        ),
        def("llvm.lifetime.start", [t(Type::i64()), any()], void(), writes_args),
        def("llvm.lifetime.end", [t(Type::i64()), any()], void(), writes_args),
        // Integer bit manipulation
        def("llvm.ctlz", [any(), flag()], any(), pure),
        def("llvm.cttz", [any(), flag()], any(), pure),
        def("llvm.abs", [any(), flag()], any(), pure),
        def("llvm.bitreverse", [any()], any(), pure),
        // Return-type-only genericity: needs a hint or explicit overloads
        def(
            "llvm.experimental.gc.result",
            [t(Type::Token)],
            any(),
            FnAttrs::NOUNWIND | FnAttrs::READNONE,
        ),
        variadic_def("llvm.experimental.deoptimize", [], any(), FnAttrs::empty()),
    ];
    defs.extend(
        UNARY_FLOAT
            .iter()
            .map(|selector| def(selector, [any()], any(), pure)),
    );

    for entry in defs {
        table.insert_single(entry)?;
    }
    Ok(())
}
