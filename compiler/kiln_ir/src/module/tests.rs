#![allow(clippy::unwrap_used, reason = "tests can panic")]

use kiln_types::{ConcreteSig, Type};
use pretty_assertions::assert_eq;

use super::*;

fn binary_f64() -> ConcreteSig {
    ConcreteSig::new([Type::f64(), Type::f64()], Type::f64())
}

#[test]
fn new_module_is_empty() {
    let module = Module::new("empty");
    assert_eq!(module.name(), "empty");
    assert_eq!(module.function_count(), 0);
    assert_eq!(module.declaration_count(), 0);
    assert!(module.function("anything").is_none());
}

#[test]
fn add_function_creates_params() {
    let mut module = Module::new("m");
    let id = module
        .add_function("pow", binary_f64(), Linkage::Internal)
        .unwrap();

    let function = module.function_data(id);
    assert_eq!(function.name, "pow");
    assert_eq!(function.linkage, Linkage::Internal);
    assert!(function.is_declaration());
    assert_eq!(function.params().len(), 2);

    let second = module.value(function.params()[1]);
    assert_eq!(second.ty, Type::f64());
    assert_eq!(second.kind, ValueKind::Param {
        function: id,
        index: 1,
    });
}

#[test]
fn add_function_rejects_duplicate_names() {
    let mut module = Module::new("m");
    module
        .add_function("f", binary_f64(), Linkage::External)
        .unwrap();
    let err = module
        .add_function("f", binary_f64(), Linkage::External)
        .unwrap_err();
    assert_eq!(err, IrError::DuplicateSymbol("f".to_owned()));
    assert_eq!(module.function_count(), 1);
}

#[test]
fn declare_extern_function_is_idempotent_by_name() {
    let mut module = Module::new("m");
    let sig = ConcreteSig::new([Type::f64()], Type::f64());

    let first = module.declare_extern_function("llvm.sin.f64", &sig, FnAttrs::PURE);
    let second = module.declare_extern_function("llvm.sin.f64", &sig, FnAttrs::PURE);

    assert_eq!(first, second);
    assert_eq!(module.function_count(), 1);
    assert_eq!(module.get_function("llvm.sin.f64"), Some(first));

    let function = module.function_data(first);
    assert_eq!(function.linkage, Linkage::External);
    assert_eq!(function.attrs, FnAttrs::PURE);
}

#[test]
fn declare_extern_function_returns_existing_even_with_other_signature() {
    let mut module = Module::new("m");
    let existing = module
        .add_function("clash", binary_f64(), Linkage::External)
        .unwrap();

    let other = ConcreteSig::new([Type::i32()], Type::i32());
    let found = module.declare_extern_function("clash", &other, FnAttrs::empty());

    assert_eq!(found, existing);
    assert_eq!(module.function_data(found).signature, binary_f64());
}

#[test]
fn functions_iterate_in_creation_order() {
    let mut module = Module::new("m");
    let sig = ConcreteSig::new([], Type::Void);
    for name in ["c", "a", "b"] {
        module.declare_extern_function(name, &sig, FnAttrs::empty());
    }
    let names: Vec<_> = module.functions().map(|(_, f)| f.name.as_str()).collect();
    assert_eq!(names, ["c", "a", "b"]);
}

#[test]
fn declaration_count_excludes_definitions() {
    let mut module = Module::new("m");
    let sig = ConcreteSig::new([], Type::Void);
    let defined = module.add_function("main", sig.clone(), Linkage::External).unwrap();
    module.push_block(defined, "entry");
    module.declare_extern_function("llvm.trap", &sig, FnAttrs::NORETURN);

    assert_eq!(module.function_count(), 2);
    assert_eq!(module.declaration_count(), 1);
    assert!(!module.function_data(defined).is_declaration());
}

#[test]
fn instruction_result() {
    let mut module = Module::new("m");
    let v = module.push_value(Type::i32(), ValueKind::ConstInt(1));

    assert_eq!(Instruction::Ret(Some(v)).result(), None);
    assert_eq!(
        Instruction::Load {
            result: v,
            ptr: v
        }
        .result(),
        Some(v)
    );
    assert_eq!(
        Instruction::Call {
            result: None,
            callee: module.declare_extern_function(
                "f",
                &ConcreteSig::new([], Type::Void),
                FnAttrs::empty()
            ),
            args: Vec::new(),
        }
        .result(),
        None
    );
}
