#![allow(clippy::unwrap_used, reason = "tests can panic")]

use kiln_ir::{DeclareMethods, FnAttrs, FunctionId, IrBuilder, Linkage, Module};
use kiln_types::{ConcreteSig, Signature, TemplateType, Type};
use pretty_assertions::assert_eq;

use super::*;
use crate::def::IntrinsicFamily;
use crate::OverloadPolicy;

fn start(bx: &mut IrBuilder<'_>, params: &[Type]) -> FunctionId {
    let f = bx
        .add_function(
            "caller",
            ConcreteSig::new(params.iter().cloned(), Type::Void),
            Linkage::External,
        )
        .unwrap();
    let entry = bx.append_block(f, "entry");
    bx.position_at_end(entry);
    f
}

fn ctpop() -> IntrinsicDef {
    IntrinsicDef::new(
        "llvm.ctpop",
        Signature::new([TemplateType::any()], TemplateType::any()),
        FnAttrs::PURE,
    )
}

fn checked() -> ResolveConfig {
    ResolveConfig::default().with_check_arguments(true)
}

// -- resolve --

#[test]
fn resolve_single_definition() {
    let def = ctpop();
    let resolved = resolve(Intrinsic::Single(&def), &[Type::i64()], None, &checked()).unwrap();
    assert_eq!(resolved.name, "llvm.ctpop.i64");
    assert_eq!(
        resolved.signature,
        ConcreteSig::new([Type::i64()], Type::i64())
    );
}

#[test]
fn resolve_reports_arity_and_shape() {
    let def = IntrinsicDef::new(
        "llvm.ctlz",
        Signature::new([TemplateType::any(), Type::i1().into()], TemplateType::any()),
        FnAttrs::PURE,
    );
    assert_eq!(
        resolve(Intrinsic::Single(&def), &[Type::i32()], None, &checked()),
        Err(ResolveError::ArgumentArityMismatch {
            intrinsic: "llvm.ctlz".to_owned(),
            expected: 2,
            found: 1,
            variadic: false,
        })
    );
    assert_eq!(
        resolve(
            Intrinsic::Single(&def),
            &[Type::i32(), Type::i8()],
            None,
            &checked()
        ),
        Err(ResolveError::ArgumentShapeMismatch {
            intrinsic: "llvm.ctlz".to_owned(),
            position: 1,
            expected: Type::i1().into(),
            found: Type::i8(),
        })
    );
}

#[test]
fn unchecked_resolution_captures_positionally() {
    let def = IntrinsicDef::new(
        "llvm.ctlz",
        Signature::new([TemplateType::any(), Type::i1().into()], TemplateType::any()),
        FnAttrs::PURE,
    );
    let config = ResolveConfig::default().with_check_arguments(false);
    let resolved = resolve(
        Intrinsic::Single(&def),
        &[Type::i32(), Type::i1()],
        None,
        &config,
    )
    .unwrap();
    assert_eq!(resolved.name, "llvm.ctlz.i32");
    assert_eq!(resolved.signature.params, [Type::i32(), Type::i1()]);

    // Concrete parameters are still compared once the holes are filled.
    let err = resolve(
        Intrinsic::Single(&def),
        &[Type::i32(), Type::i8()],
        None,
        &config,
    )
    .unwrap_err();
    assert_eq!(
        err,
        ResolveError::ArgumentShapeMismatch {
            intrinsic: "llvm.ctlz".to_owned(),
            position: 1,
            expected: Type::i1().into(),
            found: Type::i8(),
        }
    );
}

#[test]
fn unchecked_shape_mismatch_declares_nothing() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = start(&mut bx, &[Type::vector(Type::i32(), 8)]);
    let block = bx.current_block().unwrap();
    let wide = bx.param(f, 0).unwrap();

    let def = IntrinsicDef::new(
        "llvm.x",
        Signature::new(
            [TemplateType::vector(TemplateType::any(), 4)],
            TemplateType::any(),
        ),
        FnAttrs::PURE,
    );
    let config = ResolveConfig::default().with_check_arguments(false);
    let err = bx.intrinsic_call_with(&def, &[wide], None, &config).unwrap_err();
    assert_eq!(
        err,
        ResolveError::ArgumentShapeMismatch {
            intrinsic: "llvm.x".to_owned(),
            position: 0,
            expected: TemplateType::vector(TemplateType::any(), 4),
            found: Type::vector(Type::i32(), 8),
        }
    );
    assert_eq!(bx.get_function("llvm.x.i32"), None);
    drop(bx);

    assert_eq!(module.function_count(), 1);
    assert!(module.block(block).instructions().is_empty());
}

#[test]
fn resolve_family_uses_policy() {
    let family = IntrinsicFamily::new("dup", [
        IntrinsicDef::new(
            "dup.a",
            Signature::new([TemplateType::any()], Type::Void.into()),
            FnAttrs::empty(),
        ),
        IntrinsicDef::new(
            "dup.b",
            Signature::new([TemplateType::any()], Type::Void.into()),
            FnAttrs::empty(),
        ),
    ]);
    let first = resolve(
        Intrinsic::Family(&family),
        &[Type::i8()],
        None,
        &ResolveConfig::default(),
    )
    .unwrap();
    assert_eq!(first.name, "dup.a.i8");

    let strict = ResolveConfig::default().with_policy(OverloadPolicy::Reject);
    assert!(matches!(
        resolve(Intrinsic::Family(&family), &[Type::i8()], None, &strict),
        Err(ResolveError::AmbiguousOverload { .. })
    ));
}

// -- emit_intrinsic_call --

#[test]
fn emitting_twice_declares_once() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = start(&mut bx, &[Type::i32()]);
    let x = bx.param(f, 0).unwrap();

    let def = ctpop();
    let a = emit_intrinsic_call(&mut bx, (&def).into(), &[x], None, &checked()).unwrap();
    let b = bx.intrinsic_call_with(&def, &[x], None, &checked()).unwrap();
    assert!(a.is_some() && b.is_some());
    assert_ne!(a, b);

    let declared = bx.get_function("llvm.ctpop.i32").unwrap();
    drop(bx);
    assert_eq!(module.declaration_count(), 1);
    assert_eq!(module.function("llvm.ctpop.i32"), Some(declared));
}

#[test]
fn distinct_instantiations_get_distinct_declarations() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = start(&mut bx, &[Type::i32(), Type::i64()]);
    let x = bx.param(f, 0).unwrap();
    let y = bx.param(f, 1).unwrap();

    let def = ctpop();
    bx.intrinsic_call(&def, &[x], None).unwrap();
    bx.intrinsic_call(&def, &[y], None).unwrap();
    bx.intrinsic_call(&def, &[x], None).unwrap();
    drop(bx);

    assert_eq!(module.declaration_count(), 2);
    assert!(module.function("llvm.ctpop.i32").is_some());
    assert!(module.function("llvm.ctpop.i64").is_some());
}

#[test]
fn void_intrinsic_yields_none() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    start(&mut bx, &[]);

    let trap = IntrinsicDef::new(
        "llvm.trap",
        Signature::new([], Type::Void.into()),
        FnAttrs::NORETURN | FnAttrs::NOUNWIND,
    );
    assert_eq!(bx.intrinsic_call(&trap, &[], None), Ok(None));
}

#[test]
fn result_has_instantiated_return_type() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = start(&mut bx, &[Type::i16()]);
    let x = bx.param(f, 0).unwrap();

    let result = bx
        .intrinsic_call(&ctpop(), &[x], Some(&Type::i16()))
        .unwrap()
        .unwrap();
    assert_eq!(bx.value_type(result), Type::i16());
}

#[test]
fn failed_resolution_leaves_the_unit_untouched() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    start(&mut bx, &[]);
    let block = bx.current_block().unwrap();

    let gc_result = IntrinsicDef::new(
        "llvm.experimental.gc.result",
        Signature::new([], TemplateType::any()),
        FnAttrs::empty(),
    );
    let err = bx.intrinsic_call(&gc_result, &[], None).unwrap_err();
    assert!(matches!(err, ResolveError::AmbiguousReturnType { .. }));
    drop(bx);

    assert_eq!(module.function_count(), 1);
    assert!(module.block(block).instructions().is_empty());
}

#[test]
fn builder_errors_surface_as_ir_errors() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let x = bx.const_int(Type::i32(), 7);

    let err = bx.intrinsic_call(&ctpop(), &[x], None).unwrap_err();
    assert_eq!(err, ResolveError::Ir(kiln_ir::IrError::NoInsertionPoint));
    assert_eq!(bx.get_function("llvm.ctpop.i32"), None);
    drop(bx);

    assert_eq!(module.function_count(), 0);
}

#[test]
fn explicit_declaration_through_the_builder() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let def = ctpop();
    let f = bx.intrinsic_declaration(&def, &[Type::i8()]).unwrap();
    assert_eq!(bx.get_function("llvm.ctpop.i8"), Some(f));
}
