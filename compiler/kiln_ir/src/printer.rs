//! Textual IR.
//!
//! Renders a [`Module`] in LLVM assembly syntax, close enough that the
//! output reads like `llvm-dis` would print it. Values are numbered per
//! function: parameters first, then instruction results in layout order.

use std::fmt;

use rustc_hash::FxHashMap;

use kiln_types::Type;

use crate::module::{Function, Instruction, Module, ValueKind};
use crate::value_id::ValueId;

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name())?;
        writeln!(f, "source_filename = \"{}\"", self.name())?;
        for (_, function) in self.functions() {
            f.write_str("\n")?;
            FunctionPrinter::new(self, function).print(f)?;
        }
        Ok(())
    }
}

struct FunctionPrinter<'a> {
    module: &'a Module,
    function: &'a Function,
    slots: FxHashMap<ValueId, usize>,
}

impl<'a> FunctionPrinter<'a> {
    fn new(module: &'a Module, function: &'a Function) -> Self {
        let mut slots = FxHashMap::default();
        for &param in function.params() {
            let next = slots.len();
            slots.insert(param, next);
        }
        for &block in function.blocks() {
            for inst in module.block(block).instructions() {
                if let Some(result) = inst.result() {
                    let next = slots.len();
                    slots.insert(result, next);
                }
            }
        }
        Self {
            module,
            function,
            slots,
        }
    }

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let function = self.function;
        if !function.attrs.is_empty() {
            writeln!(f, "; Function Attrs: {}", function.attrs)?;
        }

        let keyword = if function.is_declaration() {
            "declare"
        } else {
            "define"
        };
        f.write_str(keyword)?;
        if let Some(linkage) = function.linkage.keyword() {
            write!(f, " {linkage}")?;
        }
        write!(f, " {} @{}(", function.signature.ret, function.name)?;
        for (i, ty) in function.signature.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if function.is_declaration() {
                write!(f, "{ty}")?;
            } else {
                write!(f, "{ty} %{i}")?;
            }
        }
        if function.signature.variadic {
            if function.signature.params.is_empty() {
                f.write_str("...")?;
            } else {
                f.write_str(", ...")?;
            }
        }
        f.write_str(")")?;

        if function.is_declaration() {
            return f.write_str("\n");
        }

        f.write_str(" {\n")?;
        for (i, &block) in function.blocks().iter().enumerate() {
            let block = self.module.block(block);
            if i > 0 {
                f.write_str("\n")?;
            }
            writeln!(f, "{}:", block.name)?;
            for inst in block.instructions() {
                f.write_str("  ")?;
                self.instruction(f, inst)?;
                f.write_str("\n")?;
            }
        }
        f.write_str("}\n")
    }

    fn instruction(&self, f: &mut fmt::Formatter<'_>, inst: &Instruction) -> fmt::Result {
        match inst {
            Instruction::Alloca { result, allocated } => {
                write!(f, "{} = alloca {allocated}", self.operand(*result))
            }
            Instruction::Load { result, ptr } => write!(
                f,
                "{} = load {}, {}",
                self.operand(*result),
                self.module.value_type(*result),
                self.typed(*ptr)
            ),
            Instruction::Store { value, ptr } => {
                write!(f, "store {}, {}", self.typed(*value), self.typed(*ptr))
            }
            Instruction::Call {
                result,
                callee,
                args,
            } => {
                if let Some(result) = result {
                    write!(f, "{} = ", self.operand(*result))?;
                }
                let callee = self.module.function_data(*callee);
                let signature = &callee.signature;
                write!(f, "call {}", signature.ret)?;
                if signature.variadic {
                    write!(f, " {}", FnType(&signature.params))?;
                }
                write!(f, " @{}(", callee.name)?;
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&self.typed(arg))?;
                }
                f.write_str(")")
            }
            Instruction::Ret(Some(value)) => write!(f, "ret {}", self.typed(*value)),
            Instruction::Ret(None) => f.write_str("ret void"),
        }
    }

    /// `<type> <operand>`
    fn typed(&self, value: ValueId) -> String {
        format!("{} {}", self.module.value_type(value), self.operand(value))
    }

    fn operand(&self, value: ValueId) -> String {
        let data = self.module.value(value);
        match &data.kind {
            ValueKind::ConstInt(n) if data.ty == Type::i1() => (*n != 0).to_string(),
            ValueKind::ConstInt(n) => n.to_string(),
            ValueKind::ConstFloat(x) => format_float(*x),
            ValueKind::ConstNull => "null".to_owned(),
            ValueKind::Param { .. } | ValueKind::Instruction(_) => match self.slots.get(&value) {
                Some(slot) => format!("%{slot}"),
                None => "<badref>".to_owned(),
            },
        }
    }
}

/// Parameter list of a variadic callee, as printed in `call` instructions.
struct FnType<'a>(&'a [Type]);

impl fmt::Display for FnType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for ty in self.0 {
            write!(f, "{ty}, ")?;
        }
        f.write_str("...)")
    }
}

/// Floats print in LLVM's exponent form: `1.000000e+00`.
fn format_float(value: f64) -> String {
    let raw = format!("{value:.6e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

#[cfg(test)]
mod tests;
