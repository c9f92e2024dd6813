use kiln_types::{TemplateType, Type};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn match_failure_gains_the_intrinsic_name() {
    let arity = MatchFailure::Arity {
        expected: 2,
        found: 3,
        variadic: false,
    };
    assert_eq!(
        arity.into_error("llvm.ctlz"),
        ResolveError::ArgumentArityMismatch {
            intrinsic: "llvm.ctlz".to_owned(),
            expected: 2,
            found: 3,
            variadic: false,
        }
    );

    let shape = MatchFailure::Shape {
        position: 0,
        expected: TemplateType::vector(TemplateType::any(), 4),
        found: Type::i32(),
    };
    assert!(matches!(
        shape.into_error("op"),
        ResolveError::ArgumentShapeMismatch { position: 0, .. }
    ));
}

#[test]
fn messages() {
    let cases = [
        (
            ResolveError::ArgumentArityMismatch {
                intrinsic: "llvm.va_start".to_owned(),
                expected: 1,
                found: 0,
                variadic: false,
            },
            "`llvm.va_start` expects 1 argument(s), found 0",
        ),
        (
            ResolveError::ArgumentArityMismatch {
                intrinsic: "printf".to_owned(),
                expected: 1,
                found: 0,
                variadic: true,
            },
            "`printf` expects at least 1 argument(s), found 0",
        ),
        (
            ResolveError::ArgumentShapeMismatch {
                intrinsic: "op".to_owned(),
                position: 0,
                expected: TemplateType::vector_any(Type::i1().into()),
                found: Type::vector(Type::i8(), 2),
            },
            "argument 0 of `op` must fit `<? x i1>`, found `<2 x i8>`",
        ),
        (
            ResolveError::NoCandidate {
                family: "llvm.sin".to_owned(),
                args: vec![Type::i32(), Type::i8_ptr()],
            },
            "no overload of `llvm.sin` accepts (i32, i8*)",
        ),
        (
            ResolveError::AmbiguousReturnType {
                intrinsic: "llvm.experimental.gc.result".to_owned(),
            },
            "unable to infer the return type of overloaded intrinsic \
             `llvm.experimental.gc.result`; provide one explicitly",
        ),
        (
            ResolveError::AmbiguousOverload {
                family: "f".to_owned(),
                candidates: vec!["f.a".to_owned(), "f.b".to_owned()],
            },
            "call to `f` is ambiguous between f.a, f.b",
        ),
        (
            ResolveError::UnmangleableType {
                intrinsic: "llvm.ssa.copy".to_owned(),
                ty: Type::Token,
            },
            "type `token` bound in `llvm.ssa.copy` has no mangled form",
        ),
        (
            ResolveError::Ir(IrError::NoInsertionPoint),
            "builder has no insertion point",
        ),
    ];
    for (error, message) in cases {
        assert_eq!(error.to_string(), message);
    }
}
