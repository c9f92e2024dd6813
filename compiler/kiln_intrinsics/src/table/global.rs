//! Non-overloaded intrinsics.

use kiln_ir::FnAttrs;
use kiln_types::{TemplateType, Type};

use super::{def, t, IntrinsicTable};
use crate::error::ResolveError;

pub(super) fn register(table: &mut IntrinsicTable) -> Result<(), ResolveError> {
    let i8_ptr = || t(Type::i8_ptr());
    let token = || t(Type::Token);
    let void = || t(Type::Void);

    let nounwind = FnAttrs::NOUNWIND;
    let reads_args = FnAttrs::ARGMEMONLY | FnAttrs::NOUNWIND | FnAttrs::READONLY;

    let defs = [
        // Varargs
        def("llvm.va_start", [i8_ptr()], void(), nounwind),
        def("llvm.va_copy", [i8_ptr(), i8_ptr()], void(), nounwind),
        def("llvm.va_end", [i8_ptr()], void(), nounwind),
        // Control
        def(
            "llvm.trap",
            [],
            void(),
            FnAttrs::NORETURN | FnAttrs::NOUNWIND,
        ),
        def("llvm.debugtrap", [], void(), nounwind),
        def(
            "llvm.donothing",
            [],
            void(),
            FnAttrs::NOUNWIND | FnAttrs::READNONE,
        ),
        def(
            "llvm.assume",
            [t(Type::i1())],
            void(),
            FnAttrs::NOUNWIND | FnAttrs::WILLRETURN,
        ),
        // Stack and frame
        def("llvm.stacksave", [], i8_ptr(), nounwind),
        def("llvm.stackrestore", [i8_ptr()], void(), nounwind),
        def(
            "llvm.returnaddress",
            [t(Type::i32())],
            i8_ptr(),
            FnAttrs::NOUNWIND | FnAttrs::READNONE,
        ),
        def(
            "llvm.frameaddress",
            [t(Type::i32())],
            TemplateType::any(),
            FnAttrs::NOUNWIND | FnAttrs::READNONE,
        ),
        def("llvm.readcyclecounter", [], t(Type::i64()), nounwind),
        // Coroutines
        def(
            "llvm.coro.id",
            [t(Type::i32()), i8_ptr(), i8_ptr(), i8_ptr()],
            token(),
            reads_args,
        ),
        def("llvm.coro.begin", [token(), i8_ptr()], i8_ptr(), nounwind),
        def("llvm.coro.free", [token(), i8_ptr()], i8_ptr(), reads_args),
        def("llvm.coro.end", [i8_ptr(), t(Type::i1())], t(Type::i1()), nounwind),
        def(
            "llvm.coro.suspend",
            [token(), t(Type::i1())],
            t(Type::i8()),
            nounwind,
        ),
        def("llvm.coro.resume", [i8_ptr()], void(), FnAttrs::empty()),
        def("llvm.coro.destroy", [i8_ptr()], void(), FnAttrs::empty()),
        def("llvm.coro.done", [i8_ptr()], t(Type::i1()), reads_args),
    ];

    for entry in defs {
        table.insert_single(entry)?;
    }
    Ok(())
}
