//! Declarations are created once per unit and printed deterministically.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;

use kiln_intrinsics::{IntrinsicCallExt, IntrinsicTable};
use kiln_ir::{IrBuilder, Linkage, Module};
use kiln_types::{ConcreteSig, Type};
use rustc_hash::FxHashSet;

const FLOATS: [fn() -> Type; 3] = [Type::f64, Type::f32, Type::half];
const FAMILIES: [&str; 3] = ["llvm.sqrt", "llvm.fabs", "llvm.exp"];

/// Emit one call per `(type, family)` pair into a fresh module.
fn emit_calls(table: &IntrinsicTable, calls: &[(usize, usize)]) -> Module {
    let mut module = Module::new("cache");
    let mut bx = IrBuilder::new(&mut module);
    let params: Vec<Type> = FLOATS.iter().map(|ty| ty()).collect();
    let f = bx
        .add_function("body", ConcreteSig::new(params, Type::Void), Linkage::Internal)
        .unwrap();
    let entry = bx.append_block(f, "entry");
    bx.position_at_end(entry);

    for &(ty, family) in calls {
        let arg = bx.param(f, ty).unwrap();
        let family = table.get(FAMILIES[family]).unwrap();
        bx.intrinsic_call(family, &[arg], None).unwrap();
    }
    bx.ret_void().unwrap();
    module
}

#[test]
fn repeated_calls_share_one_declaration() {
    let table = IntrinsicTable::builtin().unwrap();
    let module = emit_calls(&table, &[(0, 0), (0, 0), (0, 0)]);
    assert_eq!(module.declaration_count(), 1);

    let text = module.to_string();
    assert_eq!(text.matches("declare double @llvm.sqrt.f64(double)").count(), 1);
    assert_eq!(text.matches("call double @llvm.sqrt.f64(double %0)").count(), 3);
}

proptest! {
    #[test]
    fn one_declaration_per_distinct_instantiation(
        calls in prop::collection::vec((0..FLOATS.len(), 0..FAMILIES.len()), 0..24)
    ) {
        let table = IntrinsicTable::builtin().unwrap();
        let module = emit_calls(&table, &calls);
        let distinct: FxHashSet<_> = calls.iter().copied().collect();
        prop_assert_eq!(module.declaration_count(), distinct.len());
    }

    #[test]
    fn emission_is_deterministic(
        calls in prop::collection::vec((0..FLOATS.len(), 0..FAMILIES.len()), 1..16)
    ) {
        let table = IntrinsicTable::builtin().unwrap();
        let first = emit_calls(&table, &calls).to_string();
        let second = emit_calls(&table, &calls).to_string();
        prop_assert_eq!(first, second);
    }
}
