#![allow(clippy::unwrap_used, reason = "tests can panic")]

use kiln_types::{ConcreteSig, Type};
use pretty_assertions::assert_eq;

use crate::{BuilderMethods, DeclareMethods, FnAttrs, IrBuilder, Linkage, Module};

use super::format_float;

#[test]
fn empty_module_header() {
    let module = Module::new("unit");
    assert_eq!(
        module.to_string(),
        "; ModuleID = 'unit'\nsource_filename = \"unit\"\n"
    );
}

#[test]
fn declarations_with_attributes() {
    let mut module = Module::new("m");
    module.declare_extern_function(
        "llvm.va_start",
        &ConcreteSig::new([Type::i8_ptr()], Type::Void),
        FnAttrs::NOUNWIND,
    );
    module.declare_extern_function(
        "printf",
        &ConcreteSig::variadic([Type::i8_ptr()], Type::i32()),
        FnAttrs::empty(),
    );

    let expected = "\
; ModuleID = 'm'
source_filename = \"m\"

; Function Attrs: nounwind
declare void @llvm.va_start(i8*)

declare i32 @printf(i8*, ...)
";
    assert_eq!(module.to_string(), expected);
}

#[test]
fn definition_numbers_params_then_results() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = bx
        .add_function(
            "twice_sin",
            ConcreteSig::new([Type::f64()], Type::f64()),
            Linkage::Internal,
        )
        .unwrap();
    let entry = bx.append_block(f, "entry");
    bx.position_at_end(entry);

    let sin = bx.declare_extern_function(
        "llvm.sin.f64",
        &ConcreteSig::new([Type::f64()], Type::f64()),
        FnAttrs::PURE,
    );
    let x = bx.param(f, 0).unwrap();
    let once = bx.call(sin, &[x]).unwrap().unwrap();
    let twice = bx.call(sin, &[once]).unwrap().unwrap();
    bx.ret(twice).unwrap();

    let expected = "\
; ModuleID = 'm'
source_filename = \"m\"

define internal double @twice_sin(double %0) {
entry:
  %1 = call double @llvm.sin.f64(double %0)
  %2 = call double @llvm.sin.f64(double %1)
  ret double %2
}

; Function Attrs: nounwind readnone willreturn
declare double @llvm.sin.f64(double)
";
    assert_eq!(module.to_string(), expected);
}

#[test]
fn memory_and_constants() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = bx
        .add_function(
            "main",
            ConcreteSig::new([], Type::Void),
            Linkage::External,
        )
        .unwrap();
    let entry = bx.append_block(f, "entry");
    bx.position_at_end(entry);

    let slot = bx.alloca(Type::f32()).unwrap();
    let one = bx.const_float(Type::f32(), 1.0);
    bx.store(one, slot).unwrap();
    bx.load(slot).unwrap();
    let flag = bx.alloca(Type::i1()).unwrap();
    let yes = bx.const_int(Type::i1(), 1);
    bx.store(yes, flag).unwrap();
    bx.ret_void().unwrap();

    let expected = "\
; ModuleID = 'm'
source_filename = \"m\"

define void @main() {
entry:
  %0 = alloca float
  store float 1.000000e+00, float* %0
  %1 = load float, float* %0
  %2 = alloca i1
  store i1 true, i1* %2
  ret void
}
";
    assert_eq!(module.to_string(), expected);
}

#[test]
fn variadic_call_prints_callee_type() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = bx
        .add_function("main", ConcreteSig::new([], Type::Void), Linkage::External)
        .unwrap();
    let entry = bx.append_block(f, "entry");
    bx.position_at_end(entry);

    let printf = bx.declare_extern_function(
        "printf",
        &ConcreteSig::variadic([Type::i8_ptr()], Type::i32()),
        FnAttrs::empty(),
    );
    let fmt = bx.const_null(Type::i8_ptr()).unwrap();
    let n = bx.const_int(Type::i32(), -3);
    bx.call(printf, &[fmt, n]).unwrap();
    bx.ret_void().unwrap();

    let text = module.to_string();
    assert!(
        text.contains("  %0 = call i32 (i8*, ...) @printf(i8* null, i32 -3)\n"),
        "{text}"
    );
}

#[test]
fn multiple_blocks_are_separated() {
    let mut module = Module::new("m");
    let mut bx = IrBuilder::new(&mut module);
    let f = bx
        .add_function("f", ConcreteSig::new([], Type::Void), Linkage::Private)
        .unwrap();
    let entry = bx.append_block(f, "entry");
    let exit = bx.append_block(f, "exit");
    bx.position_at_end(entry);
    bx.ret_void().unwrap();
    bx.position_at_end(exit);
    bx.ret_void().unwrap();

    let text = module.to_string();
    assert!(
        text.contains("define private void @f() {\nentry:\n  ret void\n\nexit:\n  ret void\n}\n"),
        "{text}"
    );
}

#[test]
fn float_formatting() {
    assert_eq!(format_float(1.0), "1.000000e+00");
    assert_eq!(format_float(0.0), "0.000000e+00");
    assert_eq!(format_float(-2.5), "-2.500000e+00");
    assert_eq!(format_float(1.0e-7), "1.000000e-07");
    assert_eq!(format_float(6.02e23), "6.020000e+23");
    assert_eq!(format_float(1.0e100), "1.000000e+100");
}
